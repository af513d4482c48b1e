//! Per-device delayed work
//!
//! A [`DelayedWork`] owns one tokio task that runs a body after a fixed delay.
//! Scheduling while a run is pending pushes the deadline back instead of
//! queueing a second run, so a burst of requests collapses into one run that
//! happens `delay` after the last request. The body never runs concurrently
//! with itself.
//!
//! # Example
//!
//! ```rust,ignore
//! let (handle, pending) = delayed_work("detect", Duration::from_millis(20));
//! let work = pending.spawn(move || println!("settled"));
//!
//! handle.schedule();
//! handle.schedule(); // coalesces with the first request
//!
//! work.cancel_and_join().await;
//! ```

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, trace};

/// Commands sent to a delayed work task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkCommand {
    /// (Re)arm the timer
    Schedule,
    /// Drop any pending run and exit
    Cancel,
}

/// Cloneable handle used to request a run
#[derive(Debug, Clone)]
pub struct WorkHandle {
    name: &'static str,
    cmd_tx: mpsc::UnboundedSender<WorkCommand>,
}

impl WorkHandle {
    /// Request a run after the work's delay
    ///
    /// Returns false if the work has already been cancelled.
    pub fn schedule(&self) -> bool {
        let sent = self.cmd_tx.send(WorkCommand::Schedule).is_ok();
        if !sent {
            trace!("{}: schedule after cancel ignored", self.name);
        }
        sent
    }
}

/// Delayed work that has a handle but no running task yet
///
/// Splitting creation from spawning lets the body capture state that itself
/// holds the [`WorkHandle`].
#[derive(Debug)]
pub struct PendingWork {
    handle: WorkHandle,
    delay: Duration,
    cmd_rx: mpsc::UnboundedReceiver<WorkCommand>,
}

/// Create a delayed work item
pub fn delayed_work(name: &'static str, delay: Duration) -> (WorkHandle, PendingWork) {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let handle = WorkHandle { name, cmd_tx };
    (
        handle.clone(),
        PendingWork {
            handle,
            delay,
            cmd_rx,
        },
    )
}

impl PendingWork {
    /// Start the task that runs `body`
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F>(self, body: F) -> DelayedWork
    where
        F: FnMut() + Send + 'static,
    {
        let name = self.handle.name;
        let task = tokio::spawn(run_work_task(name, self.delay, self.cmd_rx, body));
        DelayedWork {
            name,
            cancel: self.handle,
            task: Some(task),
        }
    }
}

/// A running delayed work task
#[derive(Debug)]
pub struct DelayedWork {
    name: &'static str,
    cancel: WorkHandle,
    task: Option<JoinHandle<()>>,
}

impl DelayedWork {
    /// Cancel any pending run and wait for the task to exit
    ///
    /// A body that is already executing completes before this returns.
    pub async fn cancel_and_join(mut self) {
        let _ = self.cancel.cmd_tx.send(WorkCommand::Cancel);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                debug!("{}: work task ended abnormally: {}", self.name, e);
            }
        }
    }
}

impl Drop for DelayedWork {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run_work_task<F>(
    name: &'static str,
    delay: Duration,
    mut cmd_rx: mpsc::UnboundedReceiver<WorkCommand>,
    mut body: F,
) where
    F: FnMut() + Send + 'static,
{
    debug!("{}: work task started (delay {:?})", name, delay);
    let mut deadline: Option<Instant> = None;

    loop {
        tokio::select! {
            biased;

            cmd = cmd_rx.recv() => match cmd {
                Some(WorkCommand::Schedule) => {
                    deadline = Some(Instant::now() + delay);
                }
                Some(WorkCommand::Cancel) | None => break,
            },

            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                deadline = None;
                body();
            }
        }
    }

    if deadline.is_some() {
        debug!("{}: pending run cancelled", name);
    }
    debug!("{}: work task stopped", name);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const DELAY: Duration = Duration::from_millis(20);

    fn counting_work() -> (WorkHandle, DelayedWork, Arc<AtomicUsize>) {
        let runs = Arc::new(AtomicUsize::new(0));
        let (handle, pending) = delayed_work("test", DELAY);
        let counter = runs.clone();
        let work = pending.spawn(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (handle, work, runs)
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_once_after_delay() {
        let (handle, work, runs) = counting_work();

        assert!(handle.schedule());
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(15)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        work.cancel_and_join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_requests_within_delay_coalesce() {
        let (handle, work, runs) = counting_work();

        for _ in 0..4 {
            handle.schedule();
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        // Deadline was pushed back by every request
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        work.cancel_and_join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_run() {
        let (handle, work, runs) = counting_work();

        handle.schedule();
        tokio::task::yield_now().await;
        work.cancel_and_join().await;

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert!(!handle.schedule());
    }
}
