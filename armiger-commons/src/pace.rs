use std::ops::RangeInclusive;
use std::time::Duration;

use rand::Rng;

/// Default politeness window between remote calls, in milliseconds.
pub const DEFAULT_NAP_MS: RangeInclusive<u64> = 350..=700;

pub(crate) fn jitter_ms(range: &RangeInclusive<u64>) -> u64 {
    if range.start() >= range.end() {
        return *range.start();
    }
    let mut rng = rand::thread_rng();
    rng.gen_range(range.clone())
}

/// Sleep for a random duration drawn from `range` milliseconds.
///
/// The RNG is dropped before the await point so callers stay `Send`.
pub async fn jitter_sleep(range: &RangeInclusive<u64>) {
    let millis = jitter_ms(range);
    if millis == 0 {
        return;
    }
    tokio::time::sleep(Duration::from_millis(millis)).await;
}
