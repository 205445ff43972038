use crate::CLAP_STYLING;
use clap::{arg, command};
use flock_core::report::REPORT_FILE;
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("flock")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("flock")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("crawl")
                .about(
                    "Crawl the reciprocal-connection graph around a seed user, then analyze \
                and report on it.",
                )
                .arg(
                    arg!(-s --"seed" <SCREEN_NAME>)
                        .required(true)
                        .help("Screen name of the user to start from"),
                )
                .arg(
                    arg!(--"api-url" <URL>)
                        .required(false)
                        .help("Base URL of the social-graph API")
                        .value_parser(clap::value_parser!(Url))
                        .default_value("https://api.twitter.com/1.1/"),
                )
                .arg(
                    arg!(--"token" <TOKEN>)
                        .required(false)
                        .help("Bearer token for the API (default: the FLOCK_API_TOKEN environment variable)"),
                )
                .arg(
                    arg!(--"friends-cap" <N>)
                        .required(false)
                        .help("Maximum friend ids fetched per expanded user")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("5000"),
                )
                .arg(
                    arg!(--"followers-cap" <N>)
                        .required(false)
                        .help("Maximum follower ids fetched per expanded user")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("5000"),
                )
                .arg(
                    arg!(-k --"trim-width" <N>)
                        .required(false)
                        .help("Top-ranked reciprocal connections kept per expansion step")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("5"),
                )
                .arg(
                    arg!(-n --"steps" <N>)
                        .required(false)
                        .help("Number of frontier entries expanded after the seed")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("30"),
                )
                .arg(
                    arg!(--"max-network-errors" <N>)
                        .required(false)
                        .help("Consecutive network errors tolerated before the run aborts")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("10"),
                )
                .arg(
                    arg!(--"base-wait" <SECONDS>)
                        .required(false)
                        .help("Initial backoff sleep before the first retry")
                        .value_parser(clap::value_parser!(f64))
                        .default_value("2"),
                )
                .arg(
                    arg!(--"backoff-multiplier" <FACTOR>)
                        .required(false)
                        .help("Growth factor applied to the backoff sleep after each retry")
                        .value_parser(clap::value_parser!(f64))
                        .default_value("1.5"),
                )
                .arg(
                    arg!(--"backoff-ceiling" <SECONDS>)
                        .required(false)
                        .help("Abandon retries once the backoff sleep would exceed this")
                        .value_parser(clap::value_parser!(f64))
                        .default_value("3600"),
                )
                .arg(
                    arg!(--"cooldown" <SECONDS>)
                        .required(false)
                        .help("Rate-limit cooldown before the single follow-up attempt")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("905"),
                )
                .arg(
                    arg!(--"no-cooldown")
                        .required(false)
                        .help("Treat rate limiting as fatal instead of cooling down")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Report file path")
                        .value_parser(clap::value_parser!(std::path::PathBuf))
                        .default_value(REPORT_FILE),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                )
                .arg(
                    arg!(--"dot" <PATH>)
                        .required(false)
                        .help("Also write the graph in Graphviz DOT form to this path")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                ),
        )
}
