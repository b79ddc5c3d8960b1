use crate::countries::UN_MEMBER_STATES;
use crate::record::EmblemRecord;
use crate::store::SymbolStore;
use armiger_commons::client::{COMMONS_API, CommonsClient, DEFAULT_CONTACT};
use armiger_commons::extract;
use armiger_commons::fetch::{self, FetchOutcome};
use armiger_commons::lookup;
use armiger_commons::pace::DEFAULT_NAP_MS;
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Options for configuring a harvest run
pub struct HarvestOptions {
    pub countries: Vec<String>,
    pub cache_dir: PathBuf,
    pub output: PathBuf,
    pub api_url: String,
    pub contact: String,
    pub politeness_ms: RangeInclusive<u64>,
    pub backoff_base_ms: u64,
    pub show_progress_bar: bool,
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self {
            countries: UN_MEMBER_STATES.iter().map(|s| s.to_string()).collect(),
            cache_dir: PathBuf::from("public/emblems"),
            output: PathBuf::from("public/symbols.json"),
            api_url: COMMONS_API.to_string(),
            contact: DEFAULT_CONTACT.to_string(),
            politeness_ms: DEFAULT_NAP_MS,
            backoff_base_ms: 1000,
            show_progress_bar: true,
        }
    }
}

/// Callback for reporting harvest progress lines
pub type HarvestProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// A country the run could not produce a record for, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryFailure {
    pub country: String,
    pub reason: String,
}

/// Counts and timing for one completed harvest run.
#[derive(Debug, Clone)]
pub struct HarvestSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Countries attempted.
    pub total: usize,
    /// Records produced this run and merged into the dataset.
    pub added_updated: usize,
    /// How many of those reused a cached asset instead of downloading.
    pub cached_hits: usize,
    pub failed: usize,
    /// Pre-existing records left untouched by the merge.
    pub kept: usize,
    pub output: PathBuf,
    pub failures: Vec<CountryFailure>,
}

enum CountryOutcome {
    Harvested { record: EmblemRecord, cached: bool },
    NotFound,
    Failed(String),
}

async fn harvest_country(
    client: &CommonsClient,
    country: &str,
    cache_dir: &Path,
) -> CountryOutcome {
    let Some(hit) = lookup::resolve_emblem(client, country).await else {
        return CountryOutcome::NotFound;
    };

    let safe = fetch::sanitize_filename(&hit.title);
    let dest = cache_dir.join(&safe);
    let outcome = match fetch::fetch_asset(client, &hit.asset_url, &dest).await {
        Ok(outcome) => outcome,
        Err(e) => return CountryOutcome::Failed(format!("download failed: {}", e)),
    };
    if outcome == FetchOutcome::Downloaded {
        client.nap().await;
    }

    let fragment = match extract::extract_svg_file(&dest) {
        Ok(fragment) => fragment,
        Err(e) => return CountryOutcome::Failed(e.to_string()),
    };

    let source = hit
        .page_url
        .clone()
        .unwrap_or_else(|| format!("https://commons.wikimedia.org/wiki/{}", safe));
    let record = EmblemRecord::for_country(country, fragment.view_box, fragment.inner, source);

    CountryOutcome::Harvested {
        record,
        cached: outcome == FetchOutcome::Cached,
    }
}

/// Execute a harvest with the given options
/// Returns the run summary
pub async fn execute_harvest(
    options: HarvestOptions,
    progress_callback: Option<HarvestProgressCallback>,
) -> Result<HarvestSummary, String> {
    let HarvestOptions {
        countries,
        cache_dir,
        output,
        api_url,
        contact,
        politeness_ms,
        backoff_base_ms,
        show_progress_bar,
    } = options;

    let started_at = Utc::now();
    let total = countries.len();

    let client = CommonsClient::with_contact(&contact)
        .with_api_url(api_url)
        .with_politeness_ms(politeness_ms)
        .with_backoff_base(Duration::from_millis(backoff_base_ms));

    // Set up progress bar for the run (only if enabled)
    let progress_bar = if show_progress_bar {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{bar:30.cyan} {pos}/{len} {msg}")
                .unwrap(),
        );
        Some(pb)
    } else {
        None
    };

    // Status lines go to the caller's callback when one is given, otherwise
    // above the progress bar.
    let status = |line: String| {
        if let Some(ref callback) = progress_callback {
            callback(line);
        } else if let Some(ref pb) = progress_bar {
            pb.println(&line);
        }
    };

    let mut harvested: Vec<EmblemRecord> = Vec::new();
    let mut failures: Vec<CountryFailure> = Vec::new();
    let mut cached_hits = 0usize;

    for (idx, country) in countries.iter().enumerate() {
        if let Some(ref pb) = progress_bar {
            pb.set_message(country.clone());
        }
        status(format!("[{}/{}] {} …", idx + 1, total, country));

        match harvest_country(&client, country, &cache_dir).await {
            CountryOutcome::Harvested { record, cached } => {
                if cached {
                    cached_hits += 1;
                    status("  • cached".to_string());
                }
                harvested.push(record);
            }
            CountryOutcome::NotFound => {
                status("  ✗ not found via API/search".to_string());
                warn!("no emblem found for {}", country);
                failures.push(CountryFailure {
                    country: country.clone(),
                    reason: "not found via API/search".to_string(),
                });
            }
            CountryOutcome::Failed(reason) => {
                status(format!("  ✗ {}", reason));
                warn!("{}: {}", country, reason);
                failures.push(CountryFailure {
                    country: country.clone(),
                    reason,
                });
            }
        }

        if let Some(ref pb) = progress_bar {
            pb.inc(1);
        }
    }

    if let Some(ref pb) = progress_bar {
        pb.finish_with_message("harvest complete");
    }

    // Merge this run's records into whatever the output file already holds.
    let added_updated = harvested.len();
    let mut store = SymbolStore::load(&output);
    for record in harvested {
        store.upsert(record);
    }
    store
        .save(&output)
        .map_err(|e| format!("failed to write {}: {}", output.display(), e))?;

    let kept = store.len().saturating_sub(added_updated);
    info!(
        "harvest complete: {} added/updated, {} failed, {} kept",
        added_updated,
        failures.len(),
        kept
    );

    Ok(HarvestSummary {
        started_at,
        finished_at: Utc::now(),
        total,
        added_updated,
        cached_hits,
        failed: failures.len(),
        kept,
        output,
        failures,
    })
}
