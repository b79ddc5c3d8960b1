use serde::{Deserialize, Serialize};

/// Category string stamped on every harvested record.
pub const CATEGORY: &str = "National Emblems";

/// Placeholder license note; actual terms vary per file and live on the
/// Commons file page.
pub const LICENSE_NOTE: &str = "Check file page on Wikimedia Commons";

/// One entry of the symbols dataset consumed by the frontend.
///
/// Field order matters: serde serializes in declaration order and the
/// dataset is diffed in review, so keep `id` first and `license` last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmblemRecord {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(rename = "viewBox")]
    pub view_box: String,
    pub svg: String,
    pub source: String,
    pub license: String,
}

impl EmblemRecord {
    pub fn for_country(country: &str, view_box: String, svg: String, source: String) -> Self {
        Self {
            id: symbol_id(country),
            name: display_name(country),
            category: CATEGORY.to_string(),
            view_box,
            svg,
            source,
            license: LICENSE_NOTE.to_string(),
        }
    }
}

/// Deterministic dataset identifier for a country.
///
/// Lowercases the name, turns spaces and hyphens into underscores, drops
/// apostrophes, and appends `_emblem`. Accented letters stay as they are,
/// so Côte d'Ivoire becomes `côte_divoire_emblem`.
pub fn symbol_id(country: &str) -> String {
    let safe = country
        .to_lowercase()
        .replace(' ', "_")
        .replace('\'', "")
        .replace('-', "_");
    format!("{}_emblem", safe)
}

pub fn display_name(country: &str) -> String {
    format!("{} – National emblem", country)
}
