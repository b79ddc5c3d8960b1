use crate::CLAP_STYLING;
use clap::{arg, command};
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("armiger")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("armiger")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("harvest")
                .about(
                    "Fetch national emblem SVGs from Wikimedia Commons and merge them into the \
                symbols dataset.",
                )
                .arg(
                    arg!(-c --"country" <NAME>)
                        .required(false)
                        .help("Harvest a single country by name (repeatable)")
                        .action(clap::ArgAction::Append)
                        .conflicts_with("countries-file"),
                )
                .arg(
                    arg!(-f --"countries-file" <PATH>)
                        .required(false)
                        .help("Path to a newline-delimited file of country names to harvest")
                        .value_parser(clap::value_parser!(std::path::PathBuf))
                        .conflicts_with("country"),
                )
                .arg(
                    arg!(-d --"cache-dir" <PATH>)
                        .required(false)
                        .help("Directory where downloaded SVG files are cached between runs")
                        .value_parser(clap::value_parser!(std::path::PathBuf))
                        .default_value("public/emblems"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("The symbols dataset file to merge harvested records into")
                        .value_parser(clap::value_parser!(std::path::PathBuf))
                        .default_value("public/symbols.json"),
                )
                .arg(
                    arg!(--"api-url" <URL>)
                        .required(false)
                        .help("MediaWiki API endpoint to query")
                        .value_parser(clap::value_parser!(Url))
                        .default_value("https://commons.wikimedia.org/w/api.php"),
                )
                .arg(
                    arg!(--"contact" <CONTACT>)
                        .required(false)
                        .help("Contact URL or email advertised in the User-Agent header")
                        .default_value("https://github.com/halbard/armiger"),
                )
                .arg(
                    arg!(-n --"limit" <COUNT>)
                        .required(false)
                        .help("Stop after the first COUNT countries (useful for a trial run)")
                        .value_parser(clap::value_parser!(usize)),
                ),
        )
        .subcommand(command!("countries").about("Print the built-in list of UN member states"))
}
