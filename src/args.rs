use clap::Parser;

/// Prepares the Hungarian census tables on religious affiliation (2011, 2022) for the dashboard charts.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration file with the location of the input files and
    /// the output settings. See the manual of census_religion for the format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (directory, optional) The directory containing counties.json, religious_denominations_<year>.json,
    /// change_between_2011_and_2022_by_district.json and optionally geo.json. Setting this option
    /// overrides the files that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub assets: Option<String>,

    /// (default 2011) The census year: 2011 or 2022.
    #[clap(short, long, value_parser)]
    pub year: Option<u32>,

    /// (default catholic) The religion key: catholic, calvinist, lutheran, orthodox_christian,
    /// other_christian, jewish, other or atheist.
    #[clap(long, value_parser)]
    pub religion: Option<String>,

    /// If passed as an argument, a district missing from the county file stops the program
    /// instead of being dropped.
    #[clap(long, takes_value = false)]
    pub strict: bool,

    /// (file path, 'stdout' or empty) If specified, the summary will be written in JSON format to the given
    /// location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path, optional) If specified, the long table of the selected year is written in CSV format
    /// to the given location.
    #[clap(long, value_parser)]
    pub long_csv: Option<String>,

    /// (file path) A reference file containing a summary in JSON format. If provided, relcensus will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
