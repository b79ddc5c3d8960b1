// Plain-text run report, printed after a harvest and suitable for logs.

use crate::harvest::HarvestSummary;

const RULE: &str =
    "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

pub fn generate_harvest_report(summary: &HarvestSummary) -> String {
    let mut report = String::new();

    // Header
    report.push_str(RULE);
    report.push('\n');
    report.push_str("                            ARMIGER HARVEST REPORT\n");
    report.push_str(RULE);
    report.push_str("\n\n");

    report.push_str(&format!(
        "Started:      {}\n",
        summary.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    report.push_str(&format!(
        "Finished:     {}\n",
        summary.finished_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    let duration = (summary.finished_at - summary.started_at).num_seconds();
    report.push_str(&format!("Duration:     {} seconds\n", duration));
    report.push_str(&format!("Countries:    {}\n", summary.total));
    report.push_str(&format!("Cache hits:   {}\n", summary.cached_hits));
    report.push('\n');

    report.push_str(&format!(
        "Added/updated {}, failed {}, kept {} existing.\n",
        summary.added_updated, summary.failed, summary.kept
    ));
    report.push_str(&format!("→ Wrote {}\n", summary.output.display()));

    if !summary.failures.is_empty() {
        report.push('\n');
        report.push_str(RULE);
        report.push('\n');
        report.push_str("FAILURES\n");
        report.push_str(RULE);
        report.push_str("\n\n");

        for failure in &summary.failures {
            report.push_str(&format!("  {}: {}\n", failure.country, failure.reason));
        }

        report.push_str("\nIf any countries failed, re-run later; caching avoids redownloading.\n");
    }

    report
}
