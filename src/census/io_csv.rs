// Export of the long tables as CSV files.

use census_religion::LongRow;
use log::info;
use serde::Serialize;
use snafu::prelude::*;

use crate::census::{CensusResult, WritingCsvSnafu};

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    id: &'a str,
    county: &'a str,
    group: &'a str,
    value: f64,
}

pub fn write_long_csv(path: &str, rows: &[LongRow]) -> CensusResult<()> {
    info!("Writing {} long rows to {}", rows.len(), path);
    let mut wtr = csv::Writer::from_path(path).context(WritingCsvSnafu { path })?;
    for r in rows.iter() {
        wtr.serialize(CsvRow {
            id: &r.id,
            county: &r.county,
            group: r.group.key(),
            value: r.value,
        })
        .context(WritingCsvSnafu { path })?;
    }
    wtr.flush()
        .map_err(csv::Error::from)
        .context(WritingCsvSnafu { path })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use census_religion::{Group, Religion};

    #[test]
    fn long_rows_as_csv() {
        let dir = std::env::temp_dir().join("relcensus_long_csv");
        std::fs::create_dir_all(&dir).unwrap();
        let p = dir.join("long.csv").display().to_string();
        let rows = vec![
            LongRow {
                id: "001".to_string(),
                county: "Pest".to_string(),
                group: Group::count(Religion::Catholic),
                value: 100.0,
            },
            LongRow {
                id: "001".to_string(),
                county: "Pest".to_string(),
                group: Group::change(Religion::OtherChristian),
                value: -2.5,
            },
        ];
        write_long_csv(&p, &rows).unwrap();

        let mut rdr = csv::Reader::from_path(&p).unwrap();
        let header: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(header, vec!["id", "county", "group", "value"]);
        let records: Vec<Vec<String>> = rdr
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect();
        assert_eq!(
            records,
            vec![
                vec!["001", "Pest", "catholic", "100.0"],
                vec!["001", "Pest", "change_other_christian", "-2.5"],
            ]
        );
    }
}
