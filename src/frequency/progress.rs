//! Progress reporting for long profiling passes

/// Receives `(processed, total)` block counts during a pass
///
/// Closures taking two `u64`s implement this trait.
pub trait ProgressObserver {
    fn on_progress(&mut self, processed: u64, total: u64);
}

impl<F: FnMut(u64, u64)> ProgressObserver for F {
    fn on_progress(&mut self, processed: u64, total: u64) {
        self(processed, total)
    }
}

/// Observer that ignores all reports
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _processed: u64, _total: u64) {}
}
