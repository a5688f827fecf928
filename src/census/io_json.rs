// Readers for the JSON assets of the dashboard.

use log::{debug, info, warn};
use std::collections::HashSet;
use std::path::Path;

use census_religion::*;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value as JSValue;
use snafu::prelude::*;

use crate::census::config_reader::{read_json_file, AssetPaths};
use crate::census::io_common::simplify_file_name;
use crate::census::{
    CensusResult, DuplicateRecordSnafu, InvalidRecordSnafu, ParsingJsonSnafu, PipelineSnafu,
};

/// A district identifier as written in the files: either a string or an integer.
#[derive(Eq, PartialEq, Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Deserialize)]
struct CountyFileEntry {
    name: String,
    ids: Vec<RawId>,
}

// A table may carry only some of the religions: a missing field is None.
#[derive(PartialEq, Debug, Clone, Deserialize)]
struct YearRow {
    id: RawId,
    catholic: Option<f64>,
    calvinist: Option<f64>,
    lutheran: Option<f64>,
    orthodox_christian: Option<f64>,
    other_christian: Option<f64>,
    jewish: Option<f64>,
    other: Option<f64>,
    atheist: Option<f64>,
}

#[derive(PartialEq, Debug, Clone, Deserialize)]
struct ChangeRow {
    id: RawId,
    change_catholic: Option<f64>,
    change_calvinist: Option<f64>,
    change_lutheran: Option<f64>,
    change_orthodox_christian: Option<f64>,
    change_other_christian: Option<f64>,
    change_jewish: Option<f64>,
    change_other: Option<f64>,
    change_atheist: Option<f64>,
}

/// A row of one of the wide tables.
trait TableRow: DeserializeOwned {
    fn into_record(self) -> WideRecord;
}

impl TableRow for YearRow {
    fn into_record(self) -> WideRecord {
        let values = ReligionValues::from_partial_fn(|r| match r {
            Religion::Catholic => self.catholic,
            Religion::Calvinist => self.calvinist,
            Religion::Lutheran => self.lutheran,
            Religion::OrthodoxChristian => self.orthodox_christian,
            Religion::OtherChristian => self.other_christian,
            Religion::Jewish => self.jewish,
            Religion::Other => self.other,
            Religion::Atheist => self.atheist,
        });
        WideRecord {
            id: self.id.into_string(),
            values,
        }
    }
}

impl TableRow for ChangeRow {
    fn into_record(self) -> WideRecord {
        let values = ReligionValues::from_partial_fn(|r| match r {
            Religion::Catholic => self.change_catholic,
            Religion::Calvinist => self.change_calvinist,
            Religion::Lutheran => self.change_lutheran,
            Religion::OrthodoxChristian => self.change_orthodox_christian,
            Religion::OtherChristian => self.change_other_christian,
            Religion::Jewish => self.change_jewish,
            Religion::Other => self.change_other,
            Religion::Atheist => self.change_atheist,
        });
        WideRecord {
            id: self.id.into_string(),
            values,
        }
    }
}

/// A yearly table, joined with the counties.
#[derive(PartialEq, Debug, Clone)]
pub struct YearTable {
    pub year: CensusYear,
    pub rows: Vec<DistrictRecord>,
    pub report: JoinReport,
}

/// The change table, joined with the counties. The values are fractions.
#[derive(PartialEq, Debug, Clone)]
pub struct ChangeTable {
    pub rows: Vec<DistrictRecord>,
    pub report: JoinReport,
}

/// All the tables of the dashboard, loaded once.
#[derive(PartialEq, Debug, Clone)]
pub struct Datasets {
    pub lookup: CountyLookup,
    pub year_2011: YearTable,
    pub year_2022: YearTable,
    pub changes: ChangeTable,
    pub geojson: Option<JSValue>,
}

impl Datasets {
    pub fn table_for_year(&self, year: CensusYear) -> &YearTable {
        match year {
            CensusYear::Y2011 => &self.year_2011,
            CensusYear::Y2022 => &self.year_2022,
        }
    }
}

pub fn load_counties(path: &Path) -> CensusResult<CountyLookup> {
    info!("Attempting to read county file {:?}", path);
    let contents = read_json_file(path)?;
    let entries: Vec<CountyFileEntry> = serde_json::from_str(contents.as_str())
        .context(ParsingJsonSnafu {
            path: path.display().to_string(),
        })?;
    let entries: Vec<CountyEntry> = entries
        .into_iter()
        .map(|e| CountyEntry {
            name: e.name,
            ids: e.ids.into_iter().map(RawId::into_string).collect(),
        })
        .collect();
    CountyLookup::new(&entries).context(PipelineSnafu {})
}

fn read_wide_table<R: TableRow>(path: &Path) -> CensusResult<Vec<WideRecord>> {
    let p = path.display().to_string();
    info!("Attempting to read table {:?}", p);
    let contents = read_json_file(path)?;
    let raw_rows: Vec<JSValue> =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path: p.as_str() })?;

    let mut seen: HashSet<String> = HashSet::new();
    let mut res: Vec<WideRecord> = Vec::with_capacity(raw_rows.len());
    for (index, js) in raw_rows.into_iter().enumerate() {
        let row: R = match serde_json::from_value(js) {
            Ok(r) => r,
            Err(e) => {
                return InvalidRecordSnafu {
                    path: p.as_str(),
                    index,
                    message: e.to_string(),
                }
                .fail();
            }
        };
        let rec = row.into_record();
        if !seen.insert(rec.id.clone()) {
            return DuplicateRecordSnafu {
                path: p.as_str(),
                id: rec.id,
            }
            .fail();
        }
        res.push(rec);
    }
    debug!("read {} rows from {}", res.len(), simplify_file_name(&p));
    Ok(res)
}

fn log_columns(rows: &[DistrictRecord]) {
    let columns = table_columns(rows);
    if columns.len() < Religion::ALL.len() {
        warn!(
            "only {} religion columns: {:?}",
            columns.len(),
            columns.iter().map(|r| r.key()).collect::<Vec<&str>>()
        );
    } else {
        debug!("all religion columns present");
    }
}

pub fn load_year_table(
    assets: &AssetPaths,
    year: CensusYear,
    lookup: &CountyLookup,
    mode: JoinMode,
) -> CensusResult<YearTable> {
    let records = read_wide_table::<YearRow>(assets.year(year))?;
    let (rows, report) = lookup.join(&records, mode).context(PipelineSnafu {})?;
    info!(
        "Census {}: {} districts ({} dropped)",
        year,
        rows.len(),
        report.dropped.len()
    );
    log_columns(&rows);
    Ok(YearTable { year, rows, report })
}

pub fn load_change_table(
    assets: &AssetPaths,
    lookup: &CountyLookup,
    mode: JoinMode,
) -> CensusResult<ChangeTable> {
    let records = read_wide_table::<ChangeRow>(&assets.changes)?;
    let (rows, report) = lookup.join(&records, mode).context(PipelineSnafu {})?;
    info!(
        "Changes 2011-2022: {} districts ({} dropped)",
        rows.len(),
        report.dropped.len()
    );
    log_columns(&rows);
    Ok(ChangeTable { rows, report })
}

pub fn load_geojson(path: &Path) -> CensusResult<JSValue> {
    info!("Attempting to read boundaries {:?}", path);
    let contents = read_json_file(path)?;
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {
        path: path.display().to_string(),
    })
}

/// Loads every table. Any failure aborts the whole load.
pub fn load_datasets(assets: &AssetPaths, mode: JoinMode) -> CensusResult<Datasets> {
    let lookup = load_counties(&assets.counties)?;
    let year_2011 = load_year_table(assets, CensusYear::Y2011, &lookup, mode)?;
    let year_2022 = load_year_table(assets, CensusYear::Y2022, &lookup, mode)?;
    let changes = load_change_table(assets, &lookup, mode)?;
    let geojson = match &assets.geojson {
        Some(p) => Some(load_geojson(p)?),
        None => {
            info!("No district boundaries, the maps will only carry the data");
            None
        }
    };
    Ok(Datasets {
        lookup,
        year_2011,
        year_2022,
        changes,
        geojson,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::census::CensusError;
    use std::path::PathBuf;

    fn testdata_dir() -> PathBuf {
        [env!("CARGO_MANIFEST_DIR"), "testdata"].iter().collect()
    }

    fn assets() -> AssetPaths {
        AssetPaths::in_directory(&testdata_dir())
    }

    fn bad_file(name: &str) -> PathBuf {
        testdata_dir().join("bad").join(name)
    }

    #[test]
    fn counties_are_loaded() {
        let lookup = load_counties(&assets().counties).unwrap();
        assert_eq!(
            lookup.county_names(),
            &["Pest".to_string(), "Baranya".to_string(), "Fejér".to_string()]
        );
        assert_eq!(lookup.resolve("201"), Ok("Baranya"));
        assert_eq!(lookup.num_districts(), 5);
    }

    #[test]
    fn year_tables_row_counts() {
        let a = assets();
        let lookup = load_counties(&a.counties).unwrap();
        // 2011 misses 702 and has an unknown district 099.
        let t2011 = load_year_table(&a, CensusYear::Y2011, &lookup, JoinMode::Permissive).unwrap();
        assert_eq!(t2011.rows.len(), lookup.num_districts() - 1);
        assert_eq!(t2011.report.dropped, vec!["099".to_string()]);
        // The leading zeros of string identifiers are kept.
        assert!(t2011.rows.iter().all(|r| r.id != "99"));

        // 2022 writes some identifiers as integers.
        let t2022 = load_year_table(&a, CensusYear::Y2022, &lookup, JoinMode::Strict).unwrap();
        assert_eq!(t2022.rows.len(), lookup.num_districts());
        let baranya = t2022.rows.iter().find(|r| r.id == "201").unwrap();
        assert_eq!(baranya.county, "Baranya");
        assert_eq!(baranya.values.get(Religion::Catholic), Some(61000.0));
    }

    #[test]
    fn change_table_is_not_scaled() {
        let a = assets();
        let lookup = load_counties(&a.counties).unwrap();
        let changes = load_change_table(&a, &lookup, JoinMode::Strict).unwrap();
        let pest = changes.rows.iter().find(|r| r.id == "1101").unwrap();
        assert_eq!(pest.county, "Pest");
        assert_eq!(pest.values.get(Religion::Catholic), Some(-0.02));

        let long = to_long_changes(&changes.rows, &[Religion::Catholic]);
        let first = long.iter().find(|r| r.id == "1101").unwrap();
        assert_eq!(first.group.key(), "change_catholic");
        assert_eq!(first.value, -2.0);
    }

    #[test]
    fn datasets_by_year() {
        let data = load_datasets(&assets(), JoinMode::Permissive).unwrap();
        assert_eq!(data.table_for_year(CensusYear::Y2011).year, CensusYear::Y2011);
        assert_eq!(data.table_for_year(CensusYear::Y2022).year, CensusYear::Y2022);
        assert!(data.geojson.is_some());
    }

    #[test]
    fn missing_year_file() {
        let mut a = assets();
        a.year_2022 = testdata_dir().join("religious_denominations_1990.json");
        let lookup = load_counties(&a.counties).unwrap();
        let res = load_year_table(&a, CensusYear::Y2022, &lookup, JoinMode::Permissive);
        assert!(matches!(res, Err(CensusError::NotFound { .. })));
        assert!(matches!(
            load_datasets(&a, JoinMode::Permissive),
            Err(CensusError::NotFound { .. })
        ));
    }

    #[test]
    fn malformed_files() {
        let mut a = assets();
        let lookup = load_counties(&a.counties).unwrap();

        a.year_2011 = bad_file("not_json.json");
        assert!(matches!(
            load_year_table(&a, CensusYear::Y2011, &lookup, JoinMode::Permissive),
            Err(CensusError::ParsingJson { .. })
        ));

        a.year_2011 = bad_file("non_numeric_value.json");
        assert!(matches!(
            load_year_table(&a, CensusYear::Y2011, &lookup, JoinMode::Permissive),
            Err(CensusError::InvalidRecord { index: 1, .. })
        ));

        a.year_2011 = bad_file("missing_id.json");
        assert!(matches!(
            load_year_table(&a, CensusYear::Y2011, &lookup, JoinMode::Permissive),
            Err(CensusError::InvalidRecord { index: 0, .. })
        ));

        a.year_2011 = bad_file("duplicate_id.json");
        assert!(matches!(
            load_year_table(&a, CensusYear::Y2011, &lookup, JoinMode::Permissive),
            Err(CensusError::DuplicateRecord { .. })
        ));
    }

    #[test]
    fn table_with_some_columns() {
        let a = AssetPaths::in_directory(&testdata_dir().join("partial"));
        let lookup = load_counties(&a.counties).unwrap();
        let t = load_year_table(&a, CensusYear::Y2011, &lookup, JoinMode::Strict).unwrap();
        assert_eq!(t.rows.len(), 2);
        assert_eq!(table_columns(&t.rows), vec![Religion::Catholic]);
        assert_eq!(t.rows[0].values.get(Religion::Catholic), Some(100.0));
        assert_eq!(t.rows[0].values.get(Religion::Jewish), None);

        let long = to_long(&t.rows, &[Religion::Catholic, Religion::Lutheran]);
        let got: Vec<(&str, &str, f64)> = long
            .iter()
            .map(|r| (r.id.as_str(), r.county.as_str(), r.value))
            .collect();
        assert_eq!(got, vec![("001", "Pest", 100.0), ("002", "Pest", 50.0)]);
        assert!(to_long(&t.rows, &[Religion::Lutheran]).is_empty());
    }

    #[test]
    fn yearly_table_read_as_changes_has_no_columns() {
        let mut a = assets();
        let lookup = load_counties(&a.counties).unwrap();
        a.changes = assets().year_2011;
        let changes = load_change_table(&a, &lookup, JoinMode::Permissive).unwrap();
        assert_eq!(changes.rows.len(), 4);
        assert!(table_columns(&changes.rows).is_empty());
        assert!(to_long_changes(&changes.rows, &Religion::ALL).is_empty());
    }

    #[test]
    fn overlapping_counties_are_rejected() {
        let res = load_counties(&bad_file("overlapping_counties.json"));
        assert!(matches!(
            res,
            Err(CensusError::Pipeline {
                source: StatsError::DuplicateDistrict { .. }
            })
        ));
    }
}
