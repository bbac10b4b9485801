// crates/cli/src/commands.rs

use anyhow::{bail, Context, Result};
use brewbooks_aggregator::{Aggregator, AggregatorConfig, SearchResponse};
use brewbooks_core::{Item, SourceId};
use brewbooks_network::HttpClient;
use brewbooks_resolver::ChapterResolver;
use clap::ArgMatches;
use console::style;
use std::time::Duration;

fn aggregator(timeout_secs: u64) -> Result<Aggregator> {
    let client = HttpClient::new().context("Failed to build HTTP client")?;
    let config = AggregatorConfig {
        source_timeout: Duration::from_secs(timeout_secs),
    };
    Ok(Aggregator::with_default_sources(client, config))
}

fn parse_limit(matches: &ArgMatches) -> Result<usize> {
    matches
        .get_one::<String>("limit")
        .map(|s| s.parse())
        .transpose()
        .context("Limit must be a number")?
        .ok_or_else(|| anyhow::anyhow!("Limit is required"))
}

/// Search the combined set, or one source with --source
pub async fn search(matches: &ArgMatches, timeout_secs: u64) -> Result<()> {
    let query = matches
        .get_one::<String>("query")
        .ok_or_else(|| anyhow::anyhow!("Search query is required"))?;
    let limit = parse_limit(matches)?;

    let agg = aggregator(timeout_secs)?;
    let response = match matches.get_one::<String>("source") {
        Some(source) => agg.search_source(source, query, limit).await,
        None => agg.search_all(query, limit).await,
    };

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }
    print_response(&response, &format!("Results for '{query}'"))
}

/// Popular audiobooks from the archive source
pub async fn featured(matches: &ArgMatches, timeout_secs: u64) -> Result<()> {
    let limit = parse_limit(matches)?;
    let agg = aggregator(timeout_secs)?;
    let response = agg.featured(limit).await;

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }
    print_response(&response, "Featured audiobooks")
}

/// List the chapters of one item by its printed id
pub async fn chapters(matches: &ArgMatches) -> Result<()> {
    let item_id = matches
        .get_one::<String>("id")
        .ok_or_else(|| anyhow::anyhow!("Item ID is required"))?;
    let (source, local_id) = split_item_id(item_id)?;

    let client = HttpClient::new().context("Failed to build HTTP client")?;
    let resolver = ChapterResolver::new(client);
    let item = Item::new(source, local_id, source.as_str());
    let manifest = resolver.fetch_chapters(&item).await;

    if manifest.is_empty() {
        println!("No playable chapters found for {item_id}");
        return Ok(());
    }

    println!(
        "\n{} chapters, {}",
        style(manifest.len()).bold().cyan(),
        format_duration(manifest.total_duration_seconds)
    );
    println!("{}", "=".repeat(72));
    for segment in &manifest.items {
        let duration = format_duration(segment.duration_seconds);
        print!("{:>4}. {} ({})", segment.ordinal, segment.title, duration);
        if let Some(reader) = &segment.reader {
            print!(" read by {reader}");
        }
        println!();
        println!("      {}", style(&segment.audio_url).dim());
    }
    Ok(())
}

/// List the sources the aggregator knows about
pub fn list_sources(timeout_secs: u64) -> Result<()> {
    let agg = aggregator(timeout_secs)?;
    for id in agg.sources() {
        println!("{}", id.as_str());
    }
    Ok(())
}

fn split_item_id(item_id: &str) -> Result<(SourceId, &str)> {
    let Some((prefix, local_id)) = item_id.split_once('-') else {
        bail!("Item ID must look like 'source-id', e.g. librivox-52");
    };
    let source: SourceId = prefix
        .parse()
        .map_err(|_| anyhow::anyhow!("Unknown source '{prefix}'"))?;
    if local_id.is_empty() {
        bail!("Item ID is missing its source-local part");
    }
    Ok((source, local_id))
}

fn print_response(response: &SearchResponse, heading: &str) -> Result<()> {
    if !response.success {
        let reason = response.error.as_deref().unwrap_or("unknown error");
        bail!("Search failed: {reason}");
    }
    if response.items.is_empty() {
        println!("No results.");
        return Ok(());
    }

    println!("\n{} {heading}", style(response.total).bold().cyan());
    println!("{}", "=".repeat(72));
    for item in &response.items {
        print_item(item);
    }

    if !response.sources.is_empty() {
        println!();
        for report in &response.sources {
            match &report.error {
                Some(error) => println!(
                    "{} {}: {}",
                    style("!").yellow().bold(),
                    report.source.as_str(),
                    error
                ),
                None => println!(
                    "{} {}: {} items",
                    style("✓").green().bold(),
                    report.source.as_str(),
                    report.count
                ),
            }
        }
    }
    Ok(())
}

fn print_item(item: &Item) {
    println!(
        "{}  {} by {}",
        style(&item.id).dim(),
        style(&item.title).bold(),
        item.author
    );
    let mut details = vec![item.source_label.clone(), item.genre.clone()];
    if item.duration_seconds > 0 {
        details.push(format_duration(item.duration_seconds));
    }
    if item.needs_audio_resolution() {
        details.push("audio on demand".to_string());
    } else if item.audio_url.is_none() {
        details.push("no audio".to_string());
    }
    println!("      {}", details.join(" | "));
}

fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}
