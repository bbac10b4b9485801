// crates/cli/src/main.rs

use anyhow::Result;
use clap::{Arg, ArgAction, Command};

mod commands;

fn build_cli() -> Command {
    Command::new("brewbooks")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Search free audiobook sources and list their chapters")
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_name("SECONDS")
                .help("Per-source timeout for searches")
                .default_value("30")
                .global(true),
        )
        .subcommand(
            Command::new("search")
                .about("Search across sources")
                .arg(Arg::new("query").required(true).value_name("QUERY").help("Free-text search query"))
                .arg(
                    Arg::new("source")
                        .short('s')
                        .long("source")
                        .value_name("SOURCE")
                        .help("Search one source instead of the combined set (librivox, archive, openlibrary, gutenberg, bbc, lit2go, storynory, podcast)"),
                )
                .arg(Arg::new("limit").short('n').long("limit").value_name("N").help("Maximum number of results").default_value("20"))
                .arg(Arg::new("json").long("json").help("Print the raw response as JSON").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("featured")
                .about("Show popular audiobooks")
                .arg(Arg::new("limit").short('n').long("limit").value_name("N").help("Maximum number of results").default_value("20"))
                .arg(Arg::new("json").long("json").help("Print the raw response as JSON").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("chapters")
                .about("List the chapters or episodes of one item")
                .arg(Arg::new("id").required(true).value_name("ITEM_ID").help("Item ID as printed by search, e.g. librivox-52")),
        )
        .subcommand(Command::new("sources").about("List the available sources"))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let matches = build_cli().get_matches();

    let timeout: u64 = matches
        .get_one::<String>("timeout")
        .map(|s| s.parse())
        .transpose()?
        .unwrap_or(30);

    match matches.subcommand() {
        Some(("search", sub_matches)) => commands::search(sub_matches, timeout).await,
        Some(("featured", sub_matches)) => commands::featured(sub_matches, timeout).await,
        Some(("chapters", sub_matches)) => commands::chapters(sub_matches).await,
        Some(("sources", _)) => commands::list_sources(timeout),
        _ => {
            build_cli().print_help()?;
            Ok(())
        }
    }
}
