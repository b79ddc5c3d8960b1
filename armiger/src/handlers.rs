use armiger_commons::pace::DEFAULT_NAP_MS;
use armiger_core::UN_MEMBER_STATES;
use clap::ArgMatches;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber;
use url::Url;

// Helper functions for the harvest handler

/// Resolve the country list from repeated --country flags, a countries file,
/// or the built-in UN member state list
pub fn load_countries_from_source(
    names: &[String],
    countries_file: Option<&PathBuf>,
) -> Result<Vec<String>, String> {
    if let Some(countries_file_path) = countries_file {
        load_countries_from_file(countries_file_path)
    } else if !names.is_empty() {
        Ok(names.to_vec())
    } else {
        Ok(UN_MEMBER_STATES.iter().map(|s| s.to_string()).collect())
    }
}

/// Load and parse country names from a file
pub fn load_countries_from_file(path: &PathBuf) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read countries file {}: {}", path.display(), e))?;

    let countries: Vec<String> = content.lines().filter_map(parse_country_line).collect();

    if countries.is_empty() {
        return Err(format!("No country names found in {}", path.display()));
    }

    Ok(countries)
}

/// Parse a single line of a countries file; blank lines and # comments are
/// skipped
pub fn parse_country_line(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    Some(trimmed.to_string())
}

/// Expand a leading ~ in a path argument
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(raw.as_ref()).into_owned())
}

// Re-export harvest types and functions from armiger-core
pub use armiger_core::harvest::{
    HarvestOptions, HarvestProgressCallback, HarvestSummary, execute_harvest,
};
pub use armiger_core::report::generate_harvest_report;

pub async fn handle_harvest(sub_matches: &ArgMatches) {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let names: Vec<String> = sub_matches
        .get_many::<String>("country")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let countries_file = sub_matches.get_one::<std::path::PathBuf>("countries-file");
    let cache_dir = sub_matches
        .get_one::<std::path::PathBuf>("cache-dir")
        .unwrap();
    let output = sub_matches.get_one::<std::path::PathBuf>("output").unwrap();
    let api_url = sub_matches.get_one::<Url>("api-url").unwrap();
    let contact = sub_matches.get_one::<String>("contact").unwrap();
    let limit = sub_matches.get_one::<usize>("limit").copied();

    // Load the list of countries to harvest
    let mut countries = match load_countries_from_source(&names, countries_file) {
        Ok(countries) => countries,
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    };
    if let Some(limit) = limit {
        countries.truncate(limit);
    }

    let cache_dir = expand_path(cache_dir);
    let output = expand_path(output);

    // Print harvest configuration
    println!("\n🛡️  Harvesting emblems for {} countries", countries.len());
    println!("API: {}", api_url);
    println!("Cache dir: {}", cache_dir.display());
    println!("Output: {}\n", output.display());

    // Create harvest options
    let options = HarvestOptions {
        countries,
        cache_dir,
        output,
        api_url: api_url.as_str().to_string(),
        contact: contact.clone(),
        politeness_ms: DEFAULT_NAP_MS,
        backoff_base_ms: 1000,
        show_progress_bar: true, // Enable the progress bar in CLI mode
    };

    // Execute harvest with progress callback
    let progress_callback = Arc::new(|msg: String| {
        println!("{}", msg);
    });

    let summary = match execute_harvest(options, Some(progress_callback)).await {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("✗ Harvest failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("\n{} Harvest complete!\n", "✓".green().bold());

    // Generate and display report
    let report = generate_harvest_report(&summary);
    print!("{}", report);
}

pub fn handle_countries() {
    for country in UN_MEMBER_STATES {
        println!("{}", country);
    }
}
