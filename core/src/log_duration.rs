use std::time::Instant;

/// Reports how long a scope took through `tracing` when dropped.
#[must_use = "the duration is reported when the guard is dropped"]
pub struct LogDuration {
    operation: &'static str,
    start: Instant,
}

impl LogDuration {
    pub fn new(operation: &'static str) -> Self {
        Self { operation, start: Instant::now() }
    }
}

impl Drop for LogDuration {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        tracing::info!(operation = self.operation, elapsed_ms = elapsed.as_secs_f64() * 1000.0, "operation finished");
    }
}
