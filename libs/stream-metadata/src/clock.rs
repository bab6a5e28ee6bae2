use std::sync::OnceLock;
use std::time::Instant;

/// Readings start here so that `0.0` stays reserved for "not recorded".
const EPOCH_OFFSET_SECS: f64 = 1.0;

static BASE: OnceLock<Instant> = OnceLock::new();

/// Current monotonic reading in seconds.
///
/// Non-decreasing within a process run and always `>= 1.0`. The base is
/// fixed on first use, so values mean nothing across processes and must only
/// be compared with other readings from this function.
pub fn now_secs() -> f64 {
    let base = BASE.get_or_init(Instant::now);
    EPOCH_OFFSET_SECS + base.elapsed().as_secs_f64()
}
