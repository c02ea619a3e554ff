use crate::CLAP_STYLING;
use clap::{arg, command};

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("seoreport")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("seoreport")
        .about("Exports SISTRIX Optimizer visibility, crawl and ranking data to CSV")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress progress output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(--"api-key" <KEY>)
                .required(false)
                .help("SISTRIX API key")
                .env("API_KEY")
                .hide_env_values(true)
                .global(true),
        )
        .arg(
            arg!(--"base-url" <URL>)
                .required(false)
                .help("Base URL of the API")
                .env("SEOREPORT_BASE_URL")
                .default_value(seoreport_api::config::DEFAULT_BASE_URL)
                .global(true),
        )
        .arg(
            arg!(--"delay-ms" <MILLIS>)
                .required(false)
                .help("Pause after every API call, in milliseconds")
                .value_parser(clap::value_parser!(u64))
                .default_value("1500")
                .global(true),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Request timeout in seconds")
                .value_parser(clap::value_parser!(u64).range(1..))
                .default_value("30")
                .global(true),
        )
        .arg(
            arg!(-o --"out-dir" <PATH>)
                .required(false)
                .help("Directory the CSV files are written to")
                .default_value(seoreport_core::projects::DEFAULT_OUT_DIR),
        )
        .arg(
            arg!(-w --"weeks" <WEEKS>)
                .required(false)
                .help("Number of weeks of visibility history before the most recent Monday")
                .value_parser(
                    clap::builder::RangedU64ValueParser::<usize>::new()
                        .range(0..=seoreport_core::projects::MAX_WEEKS_BACK),
                )
                .default_value("10"),
        )
        .arg(
            arg!(-x --"exclude" <HASH>)
                .required(false)
                .help("Project hash to skip; repeat to skip several (replaces the built-in list)")
                .action(clap::ArgAction::Append)
                .conflicts_with("include-all")
                .global(true),
        )
        .arg(
            arg!(--"include-all")
                .required(false)
                .help("Process every project, including the built-in inactive ones")
                .action(clap::ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(command!("projects").about("List the active projects without fetching reports"))
        .subcommand(
            command!("keywords")
                .about("Print the tracked keywords of one project")
                .arg(
                    arg!(-p --"project" <HASH>)
                        .required(true)
                        .help("Hash of the project"),
                ),
        )
}
