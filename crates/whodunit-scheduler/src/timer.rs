//! Countdown handle for the active phase.

use tokio::task::JoinHandle;

/// Holds the abort handle of the active countdown task.
///
/// One timer per scheduler: arming while a countdown is running aborts
/// the previous run, so two concurrent countdowns can never exist.
#[derive(Debug, Default)]
pub(crate) struct PhaseTimer {
    handle: Option<JoinHandle<()>>,
}

impl PhaseTimer {
    /// Arms the timer with a freshly spawned countdown, aborting any
    /// previous one.
    pub(crate) fn arm(&mut self, handle: JoinHandle<()>) {
        self.stop();
        self.handle = Some(handle);
    }

    /// Cancels the outstanding countdown, if any.
    pub(crate) fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for PhaseTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
