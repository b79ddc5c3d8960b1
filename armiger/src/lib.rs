// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    expand_path,
    load_countries_from_file,
    load_countries_from_source,
    parse_country_line,
};

// Re-export harvest functionality from armiger-core
pub use armiger_core::harvest::{
    execute_harvest, HarvestOptions, HarvestProgressCallback, HarvestSummary,
};
pub use armiger_core::report::generate_harvest_report;
