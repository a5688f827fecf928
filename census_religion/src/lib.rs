/*!
Reshaping and aggregation of the Hungarian census tables on religious affiliation.

The census publishes, for each district, the number of people declaring each religion
(2011 and 2022), and a separate table with the change of the share of each religion
between the two censuses. The charts of the dashboard consume these tables in a
long format: one row per (district, religion) pair, labelled with the county of the district.

```
use census_religion::*;

let lookup = CountyLookup::new(&[CountyEntry {
    name: "Pest".to_string(),
    ids: vec!["001".to_string(), "002".to_string()],
}])?;

let raw = vec![WideRecord {
    id: "001".to_string(),
    values: ReligionValues::from_fn(|r| if r == Religion::Catholic { -0.02 } else { 0.0 }),
}];
let (changes, _report) = lookup.join(&raw, JoinMode::Strict)?;

let long = to_long_changes(&changes, &[Religion::Catholic]);
assert_eq!(long[0].group.key(), "change_catholic");
assert_eq!(long[0].value, -2.0);

let means = mean_change_by_county(&long, "catholic")?;
assert_eq!(means[0].county, "Pest");
# Ok::<(), StatsError>(())
```

See the [manual] for the formats of the input files.
*/

mod config;
mod lookup;
pub mod manual;

use log::debug;
use std::collections::HashMap;

pub use crate::config::*;
pub use crate::lookup::CountyLookup;

/// Parses religion keys such as `catholic` or `orthodox_christian`.
pub fn parse_religion_keys<S: AsRef<str>>(keys: &[S]) -> Result<Vec<Religion>, StatsError> {
    keys.iter().map(|k| Religion::from_key(k.as_ref())).collect()
}

/// Converts the fraction stored in the change table into percentage points,
/// rounded to 2 decimals.
///
/// Ties are rounded to even: 0.00125 gives 0.12.
pub fn percentage_points(fraction: f64) -> f64 {
    (fraction * 100.0 * 100.0).round_ties_even() / 100.0
}

/// The religions carried by a table: those with a value in at least one row.
pub fn table_columns(table: &[DistrictRecord]) -> Vec<Religion> {
    Religion::ALL
        .iter()
        .copied()
        .filter(|r| table.iter().any(|rec| rec.values.has(*r)))
        .collect()
}

/// Flattens a wide table into long rows of counts.
///
/// Rows are emitted row by row, and within a row in the order of `religions`.
/// A religion listed several times is only emitted once, and a religion that
/// is not a column of the table is not emitted. A row without a value for a
/// column of the table gets NaN.
pub fn to_long(table: &[DistrictRecord], religions: &[Religion]) -> Vec<LongRow> {
    flatten(table, religions, Measure::Count, |x| x)
}

/// Flattens the change table into long rows of percentage points.
///
/// The groups keep the `change_` form of the source columns.
pub fn to_long_changes(table: &[DistrictRecord], religions: &[Religion]) -> Vec<LongRow> {
    flatten(table, religions, Measure::Change, percentage_points)
}

fn flatten<F: Fn(f64) -> f64>(
    table: &[DistrictRecord],
    religions: &[Religion],
    measure: Measure,
    scale: F,
) -> Vec<LongRow> {
    let present = table_columns(table);
    let mut columns: Vec<Religion> = Vec::new();
    for r in religions {
        if !columns.contains(r) && present.contains(r) {
            columns.push(*r);
        }
    }

    let mut res: Vec<LongRow> = Vec::with_capacity(table.len() * columns.len());
    for rec in table.iter() {
        for r in columns.iter() {
            res.push(LongRow {
                id: rec.id.clone(),
                county: rec.county.clone(),
                group: Group {
                    religion: *r,
                    measure,
                },
                value: rec.values.get(*r).map(&scale).unwrap_or(f64::NAN),
            });
        }
    }
    debug!(
        "flatten: {} rows x {} columns -> {} long rows",
        table.len(),
        columns.len(),
        res.len()
    );
    res
}

/// Keeps the rows of one group.
pub fn filter_group(rows: &[LongRow], group: Group) -> Vec<LongRow> {
    rows.iter().filter(|r| r.group == group).cloned().collect()
}

/// The mean change per county for one religion.
///
/// Only the rows of the `change_<religion_key>` group are considered. The counties
/// are returned in order of first appearance, and counties without any matching row
/// are absent. NaN values are left out of the mean.
pub fn mean_change_by_county(
    rows: &[LongRow],
    religion_key: &str,
) -> Result<Vec<CountyAggregate>, StatsError> {
    let religion = Religion::from_key(religion_key)?;
    let group = Group::change(religion);

    let mut sums: Vec<(String, f64, u32)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for r in rows.iter().filter(|r| r.group == group) {
        let idx = match index.get(r.county.as_str()) {
            Some(&idx) => idx,
            None => {
                index.insert(r.county.as_str(), sums.len());
                sums.push((r.county.clone(), 0.0, 0));
                sums.len() - 1
            }
        };
        if !r.value.is_nan() {
            sums[idx].1 += r.value;
            sums[idx].2 += 1;
        }
    }

    Ok(sums
        .into_iter()
        .map(|(county, total, count)| CountyAggregate {
            county,
            value: total / (count as f64),
        })
        .collect())
}

/// The sum of the values per county, largest total first.
///
/// Counties with equal totals keep their order of first appearance. NaN values
/// count as nothing.
pub fn total_by_county(rows: &[LongRow]) -> Vec<CountyAggregate> {
    let mut totals: Vec<CountyAggregate> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for r in rows.iter() {
        let idx = match index.get(r.county.as_str()) {
            Some(&idx) => idx,
            None => {
                index.insert(r.county.as_str(), totals.len());
                totals.push(CountyAggregate {
                    county: r.county.clone(),
                    value: 0.0,
                });
                totals.len() - 1
            }
        };
        if !r.value.is_nan() {
            totals[idx].value += r.value;
        }
    }
    totals.sort_by(|a, b| b.value.total_cmp(&a.value));
    totals
}
