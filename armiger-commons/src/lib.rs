pub mod client;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod lookup;
pub mod pace;

pub use client::CommonsClient;
pub use error::HarvestError;
pub use extract::SvgFragment;
pub use fetch::FetchOutcome;
pub use lookup::LookupHit;
