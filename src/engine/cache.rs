//! The plan-keyed job cache.
//!
//! A `DashMap` from plan identity to job is the single synchronization
//! domain for cache membership: get-or-create happens under the map's entry
//! lock, so concurrent acquires of structurally equal plans always observe
//! the same job. Computations run as spawned tasks on the shared runtime;
//! nothing executes at plan-construction or acquire time except the job's
//! own spawn.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::SearchError;
use crate::index::engine::IndexEngine;
use crate::plan::{execute, SearchOutcome, SearchPlan};
use crate::results::window::window;
use crate::results::{Group, GroupProperty, WindowStats};

use super::config::SearchConfig;
use super::job::{Job, JobPoll};

/// Either a finished payload or a "still computing" status for non-blocking
/// consumers.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery<T> {
    Busy,
    Ready(T),
}

/// A page of sorted-or-first-seen groups plus the totals a response needs.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedWindow {
    pub groups: Vec<Group>,
    pub stats: WindowStats,
    /// Number of groups overall, before windowing.
    pub group_count: usize,
    /// Total size of the grouped collection, from the shared count job.
    pub total_results: u64,
}

/// Cache of search jobs, keyed by plan structural identity.
pub struct SearchCache {
    jobs: DashMap<SearchPlan, Arc<Job>>,
    index: Arc<dyn IndexEngine>,
    config: SearchConfig,
}

impl SearchCache {
    pub fn new(index: Arc<dyn IndexEngine>, config: SearchConfig) -> Arc<Self> {
        Arc::new(Self {
            jobs: DashMap::new(),
            index,
            config,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Number of jobs currently cached.
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Looks up or creates the job for a plan and returns a counted handle.
    ///
    /// On first lookup of a plan the job is created and its computation
    /// starts immediately on the shared runtime. With `blocking` the call
    /// suspends until the job is terminal; without it the handle returns
    /// right away and the caller polls.
    pub async fn acquire(self: &Arc<Self>, plan: SearchPlan, blocking: bool) -> JobHandle {
        // The reference count is bumped while the entry lock is held, so an
        // acquire can never race a concurrent release into evicting the job
        // it just observed.
        let job = match self.jobs.entry(plan) {
            Entry::Occupied(entry) => {
                let job = entry.get().clone();
                job.incr_ref();
                tracing::debug!("Job cache hit: {}", job.plan());
                job
            }
            Entry::Vacant(entry) => {
                let job = Arc::new(Job::new(entry.key().clone()));
                job.incr_ref();
                entry.insert(job.clone());
                tracing::debug!("Job cache miss, starting: {}", job.plan());
                self.start(&job);
                job
            }
        };

        let handle = JobHandle {
            cache: self.clone(),
            job,
        };
        if blocking {
            // Outcome is picked up by the caller via result()/poll();
            // waiting only synchronizes.
            let _ = handle.job.wait().await;
        }
        handle
    }

    /// Spawns the job's computation. Called under the map entry lock, which
    /// is what guarantees at-most-one execution per distinct plan.
    fn start(self: &Arc<Self>, job: &Arc<Job>) {
        let cache = self.clone();
        let job = job.clone();
        let spawned = job.clone();
        let task = tokio::spawn(async move {
            spawned.mark_running();
            let result = execute(spawned.plan(), &cache.index, &cache.config).await;
            match result {
                Ok(outcome) => {
                    tracing::debug!(
                        "Job finished in {:?}: {}",
                        spawned.user_wait_time(),
                        spawned.plan()
                    );
                    spawned.finish(outcome);
                }
                Err(error) => {
                    tracing::warn!("Job failed: {}: {}", spawned.plan(), error);
                    spawned.fail(error);
                }
            }
            // The last holder may already have released while we ran.
            cache.maybe_evict(spawned.plan());
        });
        job.attach_task(task);
    }

    /// Called by handle drop. At refcount zero the job becomes eligible for
    /// eviction; running jobs are left to finish (releasing never
    /// interrupts).
    fn release(self: &Arc<Self>, job: &Arc<Job>) {
        let remaining = job.decr_ref();
        tracing::trace!("Released job ({} refs left): {}", remaining, job.plan());
        if remaining == 0 {
            let linger = self.config.finished_job_linger;
            if linger.is_zero() {
                self.maybe_evict(job.plan());
            } else if let Ok(runtime) = tokio::runtime::Handle::try_current() {
                let cache = self.clone();
                let plan = job.plan().clone();
                runtime.spawn(async move {
                    tokio::time::sleep(linger).await;
                    cache.maybe_evict(&plan);
                });
            } else {
                self.maybe_evict(job.plan());
            }
        }
    }

    /// Removes the job for a plan if it is terminal and unreferenced.
    fn maybe_evict(&self, plan: &SearchPlan) {
        let removed = self
            .jobs
            .remove_if(plan, |_, job| job.ref_count() == 0 && job.finished());
        if removed.is_some() {
            tracing::debug!("Evicted job: {}", plan);
        }
    }

    /// Grouped results plus the total hit/doc count, delivered as one
    /// response-shaped value.
    ///
    /// Acquires the group job and the count job independently; both handles
    /// release on every exit path when this scope ends. Non-blocking calls
    /// report `Busy` while either job is still computing.
    pub async fn grouped_window(
        self: &Arc<Self>,
        source: SearchPlan,
        property: GroupProperty,
        first: i64,
        number: i64,
        blocking: bool,
    ) -> Result<Delivery<GroupedWindow>, SearchError> {
        let group_plan = source.clone().group(property, None);
        let count_plan = source.count();

        let group_job = self.acquire(group_plan, blocking).await;
        let count_job = self.acquire(count_plan, blocking).await;

        let groups = match group_job.poll() {
            JobPoll::Busy => return Ok(Delivery::Busy),
            JobPoll::Failed(error) => return Err((*error).clone()),
            JobPoll::Done(outcome) => outcome,
        };
        let count = match count_job.poll() {
            JobPoll::Busy => return Ok(Delivery::Busy),
            JobPoll::Failed(error) => return Err((*error).clone()),
            JobPoll::Done(outcome) => outcome,
        };

        let SearchOutcome::Groups(groups) = &*groups else {
            return Err(SearchError::JobFailed(
                "group job produced unexpected result shape".to_string(),
            ));
        };
        let SearchOutcome::Count(total_results) = &*count else {
            return Err(SearchError::JobFailed(
                "count job produced unexpected result shape".to_string(),
            ));
        };

        let (page, stats) = window(&groups.groups, first, number, &self.config);
        Ok(Delivery::Ready(GroupedWindow {
            groups: page,
            stats,
            group_count: groups.len(),
            total_results: *total_results,
        }))
    }
}

/// Counted reference to a cached job.
///
/// Dropping the handle releases the reference, on success and error paths
/// alike; that is the guaranteed-release discipline the cache relies on to
/// evict exactly when the last holder is gone.
pub struct JobHandle {
    cache: Arc<SearchCache>,
    job: Arc<Job>,
}

impl JobHandle {
    pub fn finished(&self) -> bool {
        self.job.finished()
    }

    /// Poll once; never suspends, never errors for "not done yet".
    pub fn poll(&self) -> JobPoll {
        self.job.poll()
    }

    /// The finished outcome, or `Busy`/the stored failure.
    pub fn result(&self) -> Result<Delivery<Arc<SearchOutcome>>, SearchError> {
        match self.job.poll() {
            JobPoll::Busy => Ok(Delivery::Busy),
            JobPoll::Done(outcome) => Ok(Delivery::Ready(outcome)),
            JobPoll::Failed(error) => Err((*error).clone()),
        }
    }

    /// Suspends until terminal, then returns the shared outcome or the
    /// stored error.
    pub async fn wait(&self) -> Result<Arc<SearchOutcome>, SearchError> {
        self.job.wait().await.map_err(|e| (*e).clone())
    }

    /// Delivers the cooperative interruption signal to the computation.
    pub fn interrupt(&self) {
        self.job.interrupt();
    }

    pub fn plan(&self) -> &SearchPlan {
        self.job.plan()
    }

    /// Outstanding acquisitions on the underlying job.
    pub fn job_ref_count(&self) -> usize {
        self.job.ref_count()
    }

    pub fn user_wait_time(&self) -> std::time::Duration {
        self.job.user_wait_time()
    }
}

impl Drop for JobHandle {
    fn drop(&mut self) {
        self.cache.release(&self.job);
    }
}
