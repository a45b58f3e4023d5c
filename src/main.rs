use anyhow::Result;
use clap::{Arg, Command};

fn main() -> Result<()> {
    let matches = Command::new("presswatch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Memory pressure sensing and scoring")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("watch")
                .about("Run the sampling loop and print a status line per tick")
                .arg(
                    Arg::new("interval")
                        .short('i')
                        .long("interval")
                        .value_name("SECONDS")
                        .help("Override the configured sampling interval")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Emit one JSON object per tick")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("no-history")
                        .long("no-history")
                        .help("Do not record samples to the history database")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("sample")
                .about("Collect one snapshot and print it with its raw score")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the snapshot as JSON")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("history")
                .about("Query recorded samples")
                .arg(
                    Arg::new("hours")
                        .long("hours")
                        .value_name("HOURS")
                        .help("Time range to query (default: 24)")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("limit")
                        .short('n')
                        .long("limit")
                        .value_name("COUNT")
                        .help("Show at most the newest COUNT samples")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Emit one JSON object per sample")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("cleanup")
                        .long("cleanup")
                        .help("Delete samples older than the configured retention")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .get_matches();

    let verbose = matches.get_flag("verbose")
        || presswatch::MonitorConfig::load()
            .map(|c| c.verbose_logging)
            .unwrap_or(false);
    presswatch::init_logging(verbose);

    match matches.subcommand() {
        Some(("watch", sub_matches)) => presswatch::commands::watch(sub_matches),
        Some(("sample", sub_matches)) => presswatch::commands::sample(sub_matches),
        Some(("history", sub_matches)) => presswatch::commands::history(sub_matches),
        _ => {
            // No subcommand given: one-shot sample is the friendliest default
            let sample_matches = Command::new("sample")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(clap::ArgAction::SetTrue),
                )
                .get_matches_from(vec!["sample"]);
            presswatch::commands::sample(&sample_matches)
        }
    }
}
