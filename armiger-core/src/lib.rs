pub mod countries;
pub mod harvest;
pub mod record;
pub mod report;
pub mod store;

pub use countries::UN_MEMBER_STATES;
pub use harvest::{HarvestOptions, HarvestProgressCallback, HarvestSummary, execute_harvest};
pub use record::EmblemRecord;
pub use report::generate_harvest_report;
pub use store::SymbolStore;

use colored::Colorize;

/// Print the armiger startup banner
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════════╗
║   █████╗ ██████╗ ███╗   ███╗██╗ ██████╗ ███████╗██████╗   ║
║  ██╔══██╗██╔══██╗████╗ ████║██║██╔════╝ ██╔════╝██╔══██╗  ║
║  ███████║██████╔╝██╔████╔██║██║██║  ███╗█████╗  ██████╔╝  ║
║  ██╔══██║██╔══██╗██║╚██╔╝██║██║██║   ██║██╔══╝  ██╔══██╗  ║
║  ██║  ██║██║  ██║██║ ╚═╝ ██║██║╚██████╔╝███████╗██║  ██║  ║
║  ╚═╝  ╚═╝╚═╝  ╚═╝╚═╝     ╚═╝╚═╝ ╚═════╝ ╚══════╝╚═╝  ╚═╝  ║
║                                                           ║
║    ⚜ National emblem harvester for Wikimedia Commons ⚜    ║
╚═══════════════════════════════════════════════════════════╝"#;
    println!("{}", banner.cyan());
    println!("{}", format!("  v{}", env!("CARGO_PKG_VERSION")).dimmed());
    println!();
}
