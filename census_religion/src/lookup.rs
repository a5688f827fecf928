use log::{debug, info, warn};
use std::collections::HashMap;

use crate::config::*;

/// Maps each district identifier to the county that owns it.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CountyLookup {
    // County names, in order of first appearance in the lookup file.
    counties: Vec<String>,
    // District id -> index in counties
    by_district: HashMap<String, usize>,
}

impl CountyLookup {
    /// Builds the lookup from the entries of the county file.
    ///
    /// Two entries with the same name are merged into the same county. A
    /// district listed under two different counties is rejected.
    pub fn new(entries: &[CountyEntry]) -> Result<CountyLookup, StatsError> {
        let mut counties: Vec<String> = Vec::new();
        let mut by_district: HashMap<String, usize> = HashMap::new();
        for entry in entries.iter() {
            let county_idx = match counties.iter().position(|c| *c == entry.name) {
                Some(idx) => idx,
                None => {
                    counties.push(entry.name.clone());
                    counties.len() - 1
                }
            };
            for id in entry.ids.iter() {
                match by_district.get(id) {
                    Some(&idx) if idx != county_idx => {
                        return Err(StatsError::DuplicateDistrict {
                            id: id.clone(),
                            first: counties[idx].clone(),
                            second: entry.name.clone(),
                        });
                    }
                    // Listed twice under the same county: harmless.
                    Some(_) => {}
                    None => {
                        by_district.insert(id.clone(), county_idx);
                    }
                }
            }
        }
        info!(
            "CountyLookup: {} counties, {} districts",
            counties.len(),
            by_district.len()
        );
        Ok(CountyLookup {
            counties,
            by_district,
        })
    }

    /// The name of the county owning the district.
    pub fn resolve(&self, district_id: &str) -> Result<&str, StatsError> {
        self.by_district
            .get(district_id)
            .map(|idx| self.counties[*idx].as_str())
            .ok_or_else(|| StatsError::LookupError {
                id: district_id.to_string(),
            })
    }

    pub fn county_names(&self) -> &[String] {
        &self.counties
    }

    pub fn num_districts(&self) -> usize {
        self.by_district.len()
    }

    /// Attaches the county name to every record.
    ///
    /// Under [JoinMode::Permissive] the records with an unknown district are
    /// left out and listed in the report. Under [JoinMode::Strict] the first
    /// unknown district is returned as an error.
    pub fn join(
        &self,
        records: &[WideRecord],
        mode: JoinMode,
    ) -> Result<(Vec<DistrictRecord>, JoinReport), StatsError> {
        let mut rows: Vec<DistrictRecord> = Vec::with_capacity(records.len());
        let mut report = JoinReport::default();
        for rec in records.iter() {
            match (self.resolve(&rec.id), mode) {
                (Ok(county), _) => {
                    rows.push(DistrictRecord {
                        id: rec.id.clone(),
                        county: county.to_string(),
                        values: rec.values,
                    });
                }
                (Err(e), JoinMode::Strict) => {
                    return Err(e);
                }
                (Err(_), JoinMode::Permissive) => {
                    warn!("join: dropping district {:?}: no county", rec.id);
                    report.dropped.push(rec.id.clone());
                }
            }
        }
        report.joined = rows.len();
        debug!(
            "join: {} rows joined, {} dropped",
            report.joined,
            report.dropped.len()
        );
        if !report.dropped.is_empty() {
            warn!(
                "join: {} of {} districts have no county and were dropped",
                report.dropped.len(),
                records.len()
            );
        }
        Ok((rows, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn entry(name: &str, ids: &[&str]) -> CountyEntry {
        CountyEntry {
            name: name.to_string(),
            ids: ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn record(id: &str) -> WideRecord {
        WideRecord {
            id: id.to_string(),
            values: ReligionValues::from_fn(|_| 1.0),
        }
    }

    fn lookup() -> CountyLookup {
        CountyLookup::new(&[
            entry("Pest", &["001", "002"]),
            entry("Baranya", &["010"]),
            entry("Fejér", &["020", "021"]),
        ])
        .unwrap()
    }

    #[test]
    fn resolve_known_and_unknown() {
        let l = lookup();
        assert_eq!(l.resolve("002"), Ok("Pest"));
        assert_eq!(l.resolve("010"), Ok("Baranya"));
        assert_eq!(
            l.resolve("2"),
            Err(StatsError::LookupError {
                id: "2".to_string()
            })
        );
        assert_eq!(l.num_districts(), 5);
    }

    #[test]
    fn duplicate_district_rejected() {
        let res = CountyLookup::new(&[entry("Pest", &["001"]), entry("Baranya", &["001"])]);
        assert_eq!(
            res,
            Err(StatsError::DuplicateDistrict {
                id: "001".to_string(),
                first: "Pest".to_string(),
                second: "Baranya".to_string()
            })
        );
    }

    #[test]
    fn repeated_county_name_is_merged() {
        let l = CountyLookup::new(&[entry("Pest", &["001"]), entry("Pest", &["002"])]).unwrap();
        assert_eq!(l.county_names(), &["Pest".to_string()]);
        assert_eq!(l.resolve("002"), Ok("Pest"));
    }

    #[test]
    fn permissive_join_drops_unknown() {
        let _ = env_logger::try_init();
        let l = lookup();
        let (rows, report) = l
            .join(
                &[record("001"), record("999"), record("010")],
                JoinMode::Permissive,
            )
            .unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["001", "010"]);
        assert_eq!(rows[1].county, "Baranya");
        assert_eq!(report.joined, 2);
        assert_eq!(report.dropped, vec!["999".to_string()]);
    }

    #[test]
    fn strict_join_fails_on_unknown() {
        let l = lookup();
        let res = l.join(&[record("001"), record("999")], JoinMode::Strict);
        assert_eq!(
            res,
            Err(StatsError::LookupError {
                id: "999".to_string()
            })
        );
    }

    #[test]
    fn join_then_group_recovers_counties() {
        let l = lookup();
        let records: Vec<WideRecord> = ["020", "001", "021", "002", "010"]
            .iter()
            .map(|id| record(id))
            .collect();
        let (rows, _) = l.join(&records, JoinMode::Strict).unwrap();
        let mut seen: Vec<String> = Vec::new();
        for r in rows.iter() {
            if !seen.contains(&r.county) {
                seen.push(r.county.clone());
            }
        }
        assert_eq!(seen.len(), 3);
        let got: HashSet<&String> = seen.iter().collect();
        let expected: HashSet<&String> = l.county_names().iter().collect();
        assert_eq!(got, expected);
    }
}
