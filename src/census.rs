use log::{debug, info, warn};

use census_religion::*;
use snafu::{prelude::*, Snafu};

use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::census::charts::*;
use crate::census::config_reader::*;
use crate::census::io_common::write_output;
use crate::census::io_json::*;

pub mod charts;
pub mod config_reader;
mod io_common;
mod io_csv;
pub mod io_json;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CensusError {
    #[snafu(display("Input file not found: {path}"))]
    NotFound { path: String },
    #[snafu(display("Census year {year} is not supported (available: 2011, 2022)"))]
    UnsupportedYear { year: u32 },
    #[snafu(display("Error reading file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Malformed JSON in {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Could not serialize {what} as JSON"))]
    SerializingJson {
        source: serde_json::Error,
        what: String,
    },
    #[snafu(display("Could not understand number {value}"))]
    ParsingJsonNumber { value: String },
    #[snafu(display("Record #{index} in {path} does not match the expected schema: {message}"))]
    InvalidRecord {
        path: String,
        index: usize,
        message: String,
    },
    #[snafu(display("District {id} appears more than once in {path}"))]
    DuplicateRecord { path: String, id: String },
    #[snafu(display("{source}"))]
    Pipeline { source: StatsError },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing CSV file {path}"))]
    WritingCsv { source: csv::Error, path: String },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type CensusResult<T> = Result<T, CensusError>;

/// Everything needed for one run, after merging the configuration file and the flags.
#[derive(PartialEq, Debug, Clone)]
pub struct RunOptions {
    pub assets: AssetPaths,
    pub join_mode: JoinMode,
    pub year: CensusYear,
    pub religion: Religion,
    /// None or "stdout" prints the summary.
    pub out: Option<String>,
    pub long_csv: Option<String>,
    pub reference: Option<String>,
}

impl RunOptions {
    pub fn with_assets(assets: AssetPaths) -> RunOptions {
        RunOptions {
            assets,
            join_mode: JoinMode::Permissive,
            year: CensusYear::Y2011,
            religion: Religion::Catholic,
            out: None,
            long_csv: None,
            reference: None,
        }
    }
}

/// The flags of the command line, which override the configuration file.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Overrides {
    pub assets_dir: Option<String>,
    pub year: Option<u32>,
    pub religion: Option<String>,
    pub strict: bool,
    pub out: Option<String>,
    pub long_csv: Option<String>,
    pub reference: Option<String>,
}

/// Merges the defaults, the optional configuration file and the command line flags.
pub fn build_options(config_path: Option<&str>, overrides: &Overrides) -> CensusResult<RunOptions> {
    let cwd = PathBuf::from(".");
    let mut opts = match config_path {
        Some(p) => {
            let config = read_config(p)?;
            let config_dir = Path::new(p).parent().context(MissingParentDirSnafu {})?;
            config.to_options(config_dir)?
        }
        None => RunOptions::with_assets(AssetPaths::in_directory(&cwd)),
    };

    if let Some(dir) = overrides.assets_dir.as_deref() {
        opts.assets = AssetPaths::in_directory(Path::new(dir));
    }
    if let Some(y) = overrides.year {
        opts.year = CensusYear::from_number(y).context(UnsupportedYearSnafu { year: y })?;
    }
    if let Some(key) = overrides.religion.as_deref() {
        opts.religion = Religion::from_key(key).context(PipelineSnafu {})?;
    }
    if overrides.strict {
        opts.join_mode = JoinMode::Strict;
    }
    if overrides.out.is_some() {
        opts.out = overrides.out.clone();
    }
    if overrides.long_csv.is_some() {
        opts.long_csv = overrides.long_csv.clone();
    }
    if overrides.reference.is_some() {
        opts.reference = overrides.reference.clone();
    }
    debug!("build_options: {:?}", opts);
    Ok(opts)
}

fn join_report_js(report: &JoinReport) -> JSValue {
    json!({
        "joined": report.joined,
        "dropped": report.dropped,
    })
}

/// Assembles the data of every chart of the dashboard for one selection.
pub fn build_summary_js(
    data: &Datasets,
    year: CensusYear,
    religion: Religion,
) -> CensusResult<JSValue> {
    let table = data.table_for_year(year);
    let geo = data.geojson.as_ref();

    let mut reports: JSMap<String, JSValue> = JSMap::new();
    for y in CensusYear::ALL {
        reports.insert(y.to_string(), join_report_js(&data.table_for_year(y).report));
    }
    reports.insert("change".to_string(), join_report_js(&data.changes.report));

    let change_bar = bar_chart_of_changes_by_group(&data.changes.rows, religion)
        .context(PipelineSnafu {})?;

    Ok(json!({
        "selection": {
            "year": table.year.number(),
            "religion": religion.key(),
            "religionLabel": religion.label(),
        },
        "counties": data.lookup.county_names(),
        "joinReport": reports,
        "charts": {
            "map": choropleth_map(&table.rows, religion, geo),
            "religionBar": bar_chart_by_county_and_group(&table.rows, religion),
            "allReligionsBar": bar_chart_by_county(&table.rows),
            "changeMap": change_choropleth_map(&data.changes.rows, religion, geo),
            "changeBar": change_bar,
        }
    }))
}

pub fn run_dashboard(opts: &RunOptions) -> CensusResult<()> {
    info!(
        "run_dashboard: year {} religion {} ({:?} join)",
        opts.year, opts.religion, opts.join_mode
    );
    let data = load_datasets(&opts.assets, opts.join_mode)?;

    let summary_js = build_summary_js(&data, opts.year, opts.religion)?;
    let pretty_js_summary = serde_json::to_string_pretty(&summary_js)
        .context(SerializingJsonSnafu { what: "summary" })?;
    write_output(opts.out.as_deref(), &pretty_js_summary)?;

    if let Some(csv_path) = opts.long_csv.as_deref() {
        let rows = to_long(&data.table_for_year(opts.year).rows, &Religion::ALL);
        io_csv::write_long_csv(csv_path, &rows)?;
    }

    // The reference summary, if provided for comparison
    if let Some(reference_p) = opts.reference.as_deref() {
        let summary_ref = read_summary(reference_p)?;
        let pretty_js_summary_ref = serde_json::to_string_pretty(&summary_ref)
            .context(SerializingJsonSnafu { what: reference_p })?;
        if pretty_js_summary_ref != pretty_js_summary {
            warn!("Found differences with the reference summary {}", reference_p);
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_summary.as_str(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
        info!("Summary matches the reference {}", reference_p);
    }

    Ok(())
}
