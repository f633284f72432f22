mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::{debug, warn};
use std::path::{Path, PathBuf};

use roadmap_core::{
    decode_file, encode_to_file, priority_label, validate_with, Item, Priority, Roadmap,
    RoadmapConfig, Status,
};

use crate::cli::{Cli, Command, GroupBy};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = RoadmapConfig::load_user()?;
    let roadmap_path = cli.file.clone().unwrap_or_else(|| config.roadmap_path());
    debug!("using roadmap file {}", roadmap_path.display());

    let roadmap = load_roadmap(&roadmap_path)?;

    match &cli.command {
        Command::Validate => validate_roadmap(&roadmap, &config, &roadmap_path)?,
        Command::Stats => show_stats(&roadmap),
        Command::Group { by } => show_groups(&roadmap, *by),
        Command::Legend => show_legend(&roadmap),
        Command::Fmt { output } => {
            format_roadmap(&roadmap, &config, &roadmap_path, output.as_deref())?
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn load_roadmap(path: &Path) -> Result<Roadmap> {
    decode_file(path).with_context(|| format!("Failed to load roadmap from {:?}", path))
}

fn validate_roadmap(roadmap: &Roadmap, config: &RoadmapConfig, path: &Path) -> Result<()> {
    let result = validate_with(roadmap, &config.change_types());

    if result.valid {
        println!("{} {}", "✓".green(), format!("{} is valid", path.display()).green());
        return Ok(());
    }

    println!(
        "{}",
        format!("{} has {} problem(s):", path.display(), result.errors.len()).red()
    );
    for error in &result.errors {
        println!("  {} {}", error.field.yellow(), error.message);
    }
    anyhow::bail!("Validation failed with {} error(s)", result.errors.len())
}

fn show_stats(roadmap: &Roadmap) {
    let stats = roadmap.stats();

    println!("{}", roadmap.project.bold());
    println!(
        "Items: {}  Completed: {} ({:.1}%)",
        stats.total,
        stats.completed_count(),
        stats.completed_percent()
    );

    println!("\n{}", "By status:".bold());
    for (status, count) in &stats.by_status {
        println!("  {} {:<12} {}", roadmap.get_status_emoji(status), status, count);
    }

    if !stats.by_area.is_empty() {
        println!("\n{}", "By area:".bold());
        for (area, count) in &stats.by_area {
            println!("  {:<15} {}", area, count);
        }
    }

    if !stats.by_type.is_empty() {
        println!("\n{}", "By type:".bold());
        for (change_type, count) in &stats.by_type {
            println!("  {:<15} {}", change_type, count);
        }
    }

    if !stats.by_priority.is_empty() {
        println!("\n{}", "By priority:".bold());
        for (priority, count) in &stats.by_priority {
            println!("  {:<15} {}", priority_key(Some(priority)), count);
        }
    }
}

fn priority_key(priority: Option<&Priority>) -> String {
    match priority {
        Some(Priority::Other(raw)) => raw.clone(),
        other => priority_label(other).to_string(),
    }
}

fn show_groups(roadmap: &Roadmap, by: GroupBy) {
    let groups: Vec<(String, Vec<&Item>)> = match by {
        GroupBy::Area => roadmap.items_by_area().into_iter().collect(),
        GroupBy::Type => roadmap.items_by_type().into_iter().collect(),
        GroupBy::Phase => roadmap.items_by_phase().into_iter().collect(),
        GroupBy::Quarter => roadmap.items_by_quarter().into_iter().collect(),
        GroupBy::Status => roadmap
            .items_by_status()
            .into_iter()
            .map(|(status, items)| {
                (format!("{} {}", roadmap.get_status_emoji(&status), status), items)
            })
            .collect(),
        GroupBy::Priority => roadmap
            .items_by_priority()
            .into_iter()
            .map(|(priority, items)| (priority_key(priority.as_ref()), items))
            .collect(),
    };

    if groups.is_empty() {
        println!("{}", "No items found.".yellow());
        return;
    }

    for (key, items) in groups {
        println!("{} ({})", key.bold(), items.len());
        for item in items {
            println!(
                "  {} {} {}",
                roadmap.get_status_emoji(&item.status),
                item.id.cyan(),
                item.title
            );
        }
    }
}

fn show_legend(roadmap: &Roadmap) {
    let legend = roadmap.get_legend();
    for status in Status::ORDER.iter() {
        if let Some(entry) = legend.get(status) {
            println!("{} {:<12} {}", entry.emoji, status, entry.description);
        }
    }
    // document-defined statuses outside the known set
    for (status, entry) in legend.iter().filter(|(status, _)| !status.is_known()) {
        println!("{} {:<12} {}", entry.emoji, status, entry.description);
    }
}

fn format_roadmap(
    roadmap: &Roadmap,
    config: &RoadmapConfig,
    input: &Path,
    output: Option<&Path>,
) -> Result<()> {
    let result = validate_with(roadmap, &config.change_types());
    if !result.valid {
        warn!(
            "formatting a roadmap with {} validation error(s)",
            result.errors.len()
        );
    }

    let target: PathBuf = output.map_or_else(|| input.to_path_buf(), Path::to_path_buf);
    encode_to_file(&target, roadmap)
        .with_context(|| format!("Failed to write roadmap to {:?}", target))?;

    println!("{}", format!("Wrote {}", target.display()).green());
    Ok(())
}
