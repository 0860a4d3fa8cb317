//! Watchers with cleanup and a post-flush job queue.
//!
//! A [`Watcher`] re-runs its callback when the watched value changes. The
//! callback may return a [`Cleanup`], which always runs before the next
//! invocation and when the watcher is stopped or dropped.
//!
//! A [`Scheduler`] defers jobs until after the current render pass has
//! mutated the document. Jobs queued while flushing run in the same flush.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use tracing::trace;

/// Cleanup returned by a watcher callback.
pub type Cleanup = Box<dyn FnOnce()>;

/// Deferred job.
pub type Job = Box<dyn FnOnce()>;

/// Observer of a value that runs side effects on change.
pub struct Watcher<T> {
    callback: Box<dyn FnMut(&T) -> Option<Cleanup>>,
    last: Option<T>,
    cleanup: Option<Cleanup>,
    stopped: bool,
}

impl<T: PartialEq + Clone> Watcher<T> {
    /// Create a watcher. The first [`Watcher::notify`] always runs the
    /// callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: FnMut(&T) -> Option<Cleanup> + 'static,
    {
        Self {
            callback: Box::new(callback),
            last: None,
            cleanup: None,
            stopped: false,
        }
    }

    /// Report the current value.
    ///
    /// Runs the previous cleanup and then the callback if the value differs
    /// from the last one seen. Returns whether the callback ran.
    pub fn notify(&mut self, value: &T) -> bool {
        if self.stopped || self.last.as_ref() == Some(value) {
            return false;
        }
        self.run_cleanup();
        self.last = Some(value.clone());
        self.cleanup = (self.callback)(value);
        true
    }

    /// Run the pending cleanup and ignore further notifications.
    pub fn stop(&mut self) {
        self.stopped = true;
        self.run_cleanup();
    }

    /// Whether the watcher still reacts to notifications.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.stopped
    }

    /// Whether a cleanup from the last run is pending.
    #[must_use]
    pub const fn has_cleanup(&self) -> bool {
        self.cleanup.is_some()
    }

    /// Last value the callback ran for.
    #[must_use]
    pub const fn last_value(&self) -> Option<&T> {
        self.last.as_ref()
    }

    fn run_cleanup(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

impl<T> Drop for Watcher<T> {
    fn drop(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Watcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watcher")
            .field("last", &self.last)
            .field("has_cleanup", &self.cleanup.is_some())
            .field("stopped", &self.stopped)
            .finish_non_exhaustive()
    }
}

/// Cloneable handle to a post-flush job queue.
#[derive(Clone, Default)]
pub struct Scheduler {
    queue: Rc<RefCell<VecDeque<Job>>>,
}

impl Scheduler {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `job` to run on the next [`Scheduler::flush`].
    pub fn queue_post_flush<F>(&self, job: F)
    where
        F: FnOnce() + 'static,
    {
        self.queue.borrow_mut().push_back(Box::new(job));
    }

    /// Number of queued jobs.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run queued jobs in order until the queue is empty. Returns the number
    /// of jobs run.
    pub fn flush(&self) -> usize {
        let mut ran = 0;
        loop {
            let job = self.queue.borrow_mut().pop_front();
            let Some(job) = job else { break };
            job();
            ran += 1;
        }
        if ran > 0 {
            trace!(jobs = ran, "post-flush queue drained");
        }
        ran
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    type Log = Rc<RefCell<Vec<String>>>;

    fn logging_watcher(log: &Log) -> Watcher<bool> {
        let log = Rc::clone(log);
        Watcher::new(move |value: &bool| {
            log.borrow_mut().push(format!("run {value}"));
            let log = Rc::clone(&log);
            let value = *value;
            Some(Box::new(move || log.borrow_mut().push(format!("cleanup {value}"))) as Cleanup)
        })
    }

    // =========================================================================
    // Watcher Tests
    // =========================================================================

    #[test]
    fn test_first_notify_runs() {
        let log: Log = Rc::default();
        let mut watcher = logging_watcher(&log);
        assert!(watcher.notify(&false));
        assert_eq!(*log.borrow(), vec!["run false"]);
        assert_eq!(watcher.last_value(), Some(&false));
    }

    #[test]
    fn test_unchanged_value_is_skipped() {
        let log: Log = Rc::default();
        let mut watcher = logging_watcher(&log);
        watcher.notify(&true);
        assert!(!watcher.notify(&true));
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_cleanup_runs_before_next_invocation() {
        let log: Log = Rc::default();
        let mut watcher = logging_watcher(&log);
        watcher.notify(&true);
        watcher.notify(&false);
        assert_eq!(*log.borrow(), vec!["run true", "cleanup true", "run false"]);
    }

    #[test]
    fn test_stop_runs_cleanup_and_ignores_updates() {
        let log: Log = Rc::default();
        let mut watcher = logging_watcher(&log);
        watcher.notify(&true);
        watcher.stop();
        assert!(!watcher.is_active());
        assert!(!watcher.has_cleanup());
        assert!(!watcher.notify(&false));
        assert_eq!(*log.borrow(), vec!["run true", "cleanup true"]);
    }

    #[test]
    fn test_drop_runs_cleanup() {
        let log: Log = Rc::default();
        {
            let mut watcher = logging_watcher(&log);
            watcher.notify(&true);
        }
        assert_eq!(log.borrow().last().map(String::as_str), Some("cleanup true"));
    }

    #[test]
    fn test_callback_without_cleanup() {
        let mut watcher = Watcher::new(|_: &u32| None);
        assert!(watcher.notify(&1));
        assert!(!watcher.has_cleanup());
        assert!(watcher.notify(&2));
    }

    // =========================================================================
    // Scheduler Tests
    // =========================================================================

    #[test]
    fn test_flush_runs_jobs_in_order() {
        let scheduler = Scheduler::new();
        let log: Log = Rc::default();
        for i in 0..3 {
            let log = Rc::clone(&log);
            scheduler.queue_post_flush(move || log.borrow_mut().push(i.to_string()));
        }
        assert_eq!(scheduler.pending(), 3);
        assert_eq!(scheduler.flush(), 3);
        assert_eq!(*log.borrow(), vec!["0", "1", "2"]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_jobs_queued_during_flush_run_in_same_flush() {
        let scheduler = Scheduler::new();
        let log: Log = Rc::default();
        let inner_scheduler = scheduler.clone();
        let inner_log = Rc::clone(&log);
        scheduler.queue_post_flush(move || {
            inner_log.borrow_mut().push("outer".into());
            let log = Rc::clone(&inner_log);
            inner_scheduler.queue_post_flush(move || log.borrow_mut().push("inner".into()));
        });

        assert_eq!(scheduler.flush(), 2);
        assert_eq!(*log.borrow(), vec!["outer", "inner"]);
    }

    #[test]
    fn test_flush_empty_queue() {
        assert_eq!(Scheduler::new().flush(), 0);
    }

    proptest! {
        #[test]
        fn prop_runs_and_cleanups_stay_balanced(values in proptest::collection::vec(any::<bool>(), 1..20)) {
            let log: Log = Rc::default();
            let mut watcher = logging_watcher(&log);
            for v in &values {
                watcher.notify(v);
            }
            drop(watcher);
            let runs = log.borrow().iter().filter(|l| l.starts_with("run")).count();
            let cleanups = log.borrow().iter().filter(|l| l.starts_with("cleanup")).count();
            prop_assert_eq!(runs, cleanups);
        }
    }
}
