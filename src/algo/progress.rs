//! Progress reporting for multi-step mesh operations.
//!
//! Iterated subdivision and multi-patch tessellation do their work in
//! discrete steps (one subdivision level, one patch). After each step they
//! hand a [`ProgressEvent`] to a caller-supplied [`Progress`] callback, which
//! a CLI can turn into a progress bar.
//!
//! ```
//! use tessel::algo::Progress;
//!
//! let progress = Progress::new(|event| {
//!     println!("{} {}/{}: {} faces", event.stage, event.step, event.total, event.faces);
//! });
//! # drop(progress);
//! ```

/// A single progress update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent<'a> {
    /// Name of the running operation.
    pub stage: &'a str,
    /// Steps completed so far (`0..=total`).
    pub step: usize,
    /// Total number of steps.
    pub total: usize,
    /// Face count of the mesh after the last completed step.
    pub faces: usize,
}

impl ProgressEvent<'_> {
    /// Completion in `[0, 1]`. An operation with no steps counts as done.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.step.min(self.total) as f64 / self.total as f64
        }
    }

    /// Whether this is the final update.
    pub fn is_done(&self) -> bool {
        self.step >= self.total
    }
}

/// Callback receiving [`ProgressEvent`]s.
pub struct Progress {
    callback: Box<dyn Fn(&ProgressEvent<'_>) + Send + Sync>,
}

impl Progress {
    /// Create a reporter from a callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&ProgressEvent<'_>) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// A reporter that ignores every update.
    pub fn none() -> Self {
        Self::new(|_| {})
    }

    #[inline]
    pub(crate) fn emit(&self, stage: &str, step: usize, total: usize, faces: usize) {
        (self.callback)(&ProgressEvent {
            stage,
            step,
            total,
            faces,
        });
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_events_reach_callback() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress = Progress::new(move |e| sink.lock().unwrap().push((e.step, e.total, e.faces)));

        progress.emit("work", 0, 2, 6);
        progress.emit("work", 2, 2, 96);

        assert_eq!(*seen.lock().unwrap(), vec![(0, 2, 6), (2, 2, 96)]);
    }

    #[test]
    fn test_fraction() {
        let e = ProgressEvent {
            stage: "x",
            step: 1,
            total: 4,
            faces: 0,
        };
        assert!((e.fraction() - 0.25).abs() < 1e-12);
        assert!(!e.is_done());

        let e = ProgressEvent { step: 0, total: 0, ..e };
        assert_eq!(e.fraction(), 1.0);
        assert!(e.is_done());
    }
}
