//! A single cached search job.
//!
//! A job wraps one plan's computation: its lifecycle phase, the shared
//! outcome or stored error, a reference count, and timing diagnostics. Jobs
//! are owned exclusively by the cache and mutated only by the engine;
//! consumers observe them through counted handles.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::SearchError;
use crate::plan::{SearchOutcome, SearchPlan};

use std::sync::Arc;

/// Lifecycle of a job. Transitions only move forward; `Finished` and
/// `Failed` are terminal.
#[derive(Debug, Clone)]
pub enum JobPhase {
    Created,
    Running,
    Finished(Arc<SearchOutcome>),
    Failed(Arc<SearchError>),
}

impl JobPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobPhase::Finished(_) | JobPhase::Failed(_))
    }
}

/// Result of polling a job without suspending. `Busy` is a status, not an
/// error.
#[derive(Debug, Clone)]
pub enum JobPoll {
    Busy,
    Done(Arc<SearchOutcome>),
    Failed(Arc<SearchError>),
}

/// One plan's computation and cached outcome.
pub struct Job {
    plan: SearchPlan,
    phase: watch::Sender<JobPhase>,
    ref_count: AtomicUsize,
    created_at: Instant,
    finished_at: Mutex<Option<Instant>>,
    /// Handle of the spawned computation, kept for cooperative
    /// interruption.
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Job {
    pub(crate) fn new(plan: SearchPlan) -> Self {
        let (phase, _) = watch::channel(JobPhase::Created);
        Self {
            plan,
            phase,
            ref_count: AtomicUsize::new(0),
            created_at: Instant::now(),
            finished_at: Mutex::new(None),
            task: Mutex::new(None),
        }
    }

    pub fn plan(&self) -> &SearchPlan {
        &self.plan
    }

    /// Snapshot of the current phase.
    pub fn phase(&self) -> JobPhase {
        self.phase.borrow().clone()
    }

    pub fn finished(&self) -> bool {
        self.phase.borrow().is_terminal()
    }

    /// Poll without suspending.
    pub fn poll(&self) -> JobPoll {
        match self.phase() {
            JobPhase::Created | JobPhase::Running => JobPoll::Busy,
            JobPhase::Finished(outcome) => JobPoll::Done(outcome),
            JobPhase::Failed(error) => JobPoll::Failed(error),
        }
    }

    /// Suspends until the job reaches a terminal phase, then returns the
    /// stored outcome or error.
    pub async fn wait(&self) -> Result<Arc<SearchOutcome>, Arc<SearchError>> {
        let mut receiver = self.phase.subscribe();
        loop {
            let current = receiver.borrow_and_update().clone();
            match current {
                JobPhase::Finished(outcome) => return Ok(outcome),
                JobPhase::Failed(error) => return Err(error),
                _ => {}
            }
            if receiver.changed().await.is_err() {
                // Sender gone without a terminal phase: treat as failure.
                return Err(Arc::new(SearchError::JobFailed(
                    "job abandoned before completion".to_string(),
                )));
            }
        }
    }

    pub(crate) fn mark_running(&self) {
        self.phase.send_if_modified(|phase| {
            if phase.is_terminal() {
                return false;
            }
            *phase = JobPhase::Running;
            true
        });
    }

    pub(crate) fn finish(&self, outcome: SearchOutcome) {
        self.terminate(JobPhase::Finished(Arc::new(outcome)));
    }

    pub(crate) fn fail(&self, error: SearchError) {
        self.terminate(JobPhase::Failed(Arc::new(error)));
    }

    fn terminate(&self, terminal: JobPhase) {
        let changed = self.phase.send_if_modified(|phase| {
            if phase.is_terminal() {
                // First terminal phase wins; later attempts are ignored.
                return false;
            }
            *phase = terminal.clone();
            true
        });
        if changed {
            *self.finished_at.lock().unwrap() = Some(Instant::now());
        }
    }

    pub(crate) fn attach_task(&self, handle: JoinHandle<()>) {
        *self.task.lock().unwrap() = Some(handle);
    }

    /// Cooperative interruption: aborts the computation and records the
    /// distinguished cancellation failure for every holder.
    pub fn interrupt(&self) {
        if let Some(handle) = self.task.lock().unwrap().take() {
            handle.abort();
        }
        self.fail(SearchError::Cancelled);
        tracing::info!("Interrupted job: {}", self.plan);
    }

    pub(crate) fn incr_ref(&self) -> usize {
        self.ref_count.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn decr_ref(&self) -> usize {
        self.ref_count.fetch_sub(1, Ordering::SeqCst) - 1
    }

    /// Number of outstanding (un-released) acquisitions.
    pub fn ref_count(&self) -> usize {
        self.ref_count.load(Ordering::SeqCst)
    }

    /// How long the job has existed, or took from creation to completion.
    pub fn user_wait_time(&self) -> Duration {
        match *self.finished_at.lock().unwrap() {
            Some(finished) => finished.duration_since(self.created_at),
            None => self.created_at.elapsed(),
        }
    }
}
