//! Loading view
//!
//! A one-shot delay shown before the first list render. The timer runs as a
//! tokio task so it overlaps with opening the registry; dropping the screen
//! before it elapses aborts it.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

/// Handle to a running loading delay
pub struct LoadingScreen {
    timer: Option<JoinHandle<()>>,
}

impl LoadingScreen {
    /// Show the loading message and start the timer
    ///
    /// A zero delay shows nothing.
    pub fn start(delay: Duration) -> Self {
        if delay.is_zero() {
            return Self { timer: None };
        }

        eprintln!("Loading Sclicky...");
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
        });
        Self { timer: Some(timer) }
    }

    /// Wait for the delay to elapse
    ///
    /// Dropping the returned future leaves the timer running, so this can
    /// race other futures in `tokio::select!`.
    pub async fn wait(&mut self) {
        if let Some(timer) = self.timer.as_mut() {
            if let Err(e) = timer.await {
                debug!(error = %e, "Loading timer ended early");
            }
            self.timer = None;
        }
    }

    /// Stop the timer without waiting
    pub fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
            debug!("Loading screen cancelled");
        }
    }

    /// True while the timer has not fired yet
    pub fn is_pending(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for LoadingScreen {
    fn drop(&mut self) {
        if self.is_pending() {
            self.cancel();
        }
    }
}
