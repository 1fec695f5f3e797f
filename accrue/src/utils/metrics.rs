#[cfg(feature = "metrics")]
use std::time::Instant;

/// Runs given closure; with the `metrics` feature enabled, also logs how long
/// it took.
#[cfg(feature = "metrics")]
pub fn measure<T>(label: &str, f: impl FnOnce() -> T) -> T {
    let started_at = Instant::now();
    let result = f();

    log::info!(
        "{label}: {}",
        humantime::format_duration(started_at.elapsed())
    );

    result
}

#[cfg(not(feature = "metrics"))]
pub fn measure<T>(_: &str, f: impl FnOnce() -> T) -> T {
    f()
}
