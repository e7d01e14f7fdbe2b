use clap::Parser;

/// Geographic diversity of systems conferences.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON file describing the analysis: input files, rules and output directory.
    /// The format is described in the manual of the geo_diversity crate.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference summary in JSON format. If provided, confgeo will check that the computed
    /// summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the analysis will be written in JSON format
    /// to the given location. Otherwise it is printed.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (directory) Where the output tables are written. Overrides the directory of the configuration.
    #[clap(long, value_parser)]
    pub out_dir: Option<String>,

    /// (file path) The accepted papers, one row per paper.
    #[clap(long, value_parser)]
    pub papers: Option<String>,

    /// (file path) The program committee members, one row per member.
    #[clap(long, value_parser)]
    pub committee: Option<String>,

    /// (file path) The number of citing papers per conference and continent.
    #[clap(long, value_parser)]
    pub citations: Option<String>,

    /// (file path) The big tech affiliation percentages per conference and year.
    #[clap(long, value_parser)]
    pub affiliations: Option<String>,

    /// (file path) The big tech percentages per conference, year and continent.
    #[clap(long, value_parser)]
    pub affiliations_by_continent: Option<String>,

    /// (default csv) The type of the input files given on the command line: csv or xlsx.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use. The first worksheet is used
    /// otherwise.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (default NA) The continent code used to order the conferences.
    #[clap(long, value_parser)]
    pub ranking_continent: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
