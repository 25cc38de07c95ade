//! Cooperative cancellation flag shared between a job and the scheduler.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

const RUNNING: u8 = 0;
const FINISHING: u8 = 1;
const STORING: u8 = 2;

/// Lifecycle of a running job. `Finishing` and `Storing` are terminal from
/// the move loop's point of view: once observed, the loop exits at the next
/// check point, never mid-round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Running,
    Finishing,
    Storing,
}

/// Handle the scheduler keeps to signal a job from another task. The job
/// polls it once per move; it never blocks on it.
#[derive(Debug, Clone)]
pub struct StateHandle {
    flag: Arc<AtomicU8>,
}

impl StateHandle {
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicU8::new(RUNNING)),
        }
    }

    /// Ask the job to stop once the current game completes.
    pub fn finish(&self) {
        self.flag.store(FINISHING, Ordering::SeqCst);
    }

    /// Ask the job to pause now and persist a resumable state.
    pub fn store(&self) {
        self.flag.store(STORING, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> JobState {
        match self.flag.load(Ordering::SeqCst) {
            RUNNING => JobState::Running,
            FINISHING => JobState::Finishing,
            _ => JobState::Storing,
        }
    }

    pub fn is_running(&self) -> bool {
        self.snapshot() == JobState::Running
    }
}

impl Default for StateHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_running() {
        let handle = StateHandle::new();
        assert_eq!(handle.snapshot(), JobState::Running);
        assert!(handle.is_running());
    }

    #[test]
    fn test_finish_and_store() {
        let handle = StateHandle::new();
        handle.finish();
        assert_eq!(handle.snapshot(), JobState::Finishing);

        let handle = StateHandle::new();
        handle.store();
        assert_eq!(handle.snapshot(), JobState::Storing);
        assert!(!handle.is_running());
    }

    #[test]
    fn test_clones_share_the_flag() {
        let handle = StateHandle::new();
        let clone = handle.clone();
        clone.store();
        assert_eq!(handle.snapshot(), JobState::Storing);
    }
}
