//! Background task execution with main-thread completion callbacks.
//!
//! Work closures run on a small pool of worker threads. Their results are
//! queued, and the completion callbacks run on whichever thread calls
//! [`BackgroundExecutor::process_results`], so editor state is only ever
//! touched from one thread.

use parking_lot::Mutex;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use tracing::{debug, warn};

/// Outcome of a background task
pub type TaskResult<T> = Result<T, String>;

type Completion = Box<dyn FnOnce() + Send>;
type Job = Box<dyn FnOnce() -> Completion + Send>;

/// Fixed-size worker pool.
///
/// With no workers, work runs inline on the spawning thread; callbacks are
/// still deferred to `process_results`.
pub struct BackgroundExecutor {
    jobs: Option<Sender<Job>>,
    results_tx: Sender<Completion>,
    results: Mutex<Receiver<Completion>>,
    pending: Arc<AtomicUsize>,
    workers: Vec<JoinHandle<()>>,
}

impl BackgroundExecutor {
    /// Start `workers` threads. Zero gives an inline executor.
    pub fn new(workers: usize) -> Self {
        let (jobs_tx, jobs_rx) = mpsc::channel::<Job>();
        let (results_tx, results_rx) = mpsc::channel::<Completion>();
        let jobs_rx = Arc::new(Mutex::new(jobs_rx));

        let workers: Vec<_> = (0..workers)
            .filter_map(|i| {
                let jobs_rx = Arc::clone(&jobs_rx);
                let results_tx = results_tx.clone();
                std::thread::Builder::new()
                    .name(format!("docmark-worker-{i}"))
                    .spawn(move || worker_loop(jobs_rx, results_tx))
                    .map_err(|e| warn!("failed to start worker {i}: {e}"))
                    .ok()
            })
            .collect();

        if workers.is_empty() {
            debug!("background executor running tasks inline");
        }
        Self {
            jobs: (!workers.is_empty()).then_some(jobs_tx),
            results_tx,
            results: Mutex::new(results_rx),
            pending: Arc::new(AtomicUsize::new(0)),
            workers,
        }
    }

    /// Run `work` on a worker; `callback` runs later inside `process_results`.
    pub fn spawn<T, W, C>(&self, name: &str, work: W, callback: C)
    where
        T: Send + 'static,
        W: FnOnce() -> TaskResult<T> + Send + 'static,
        C: FnOnce(TaskResult<T>) + Send + 'static,
    {
        let name = name.to_string();
        let job: Job = Box::new(move || {
            let result = catch_unwind(AssertUnwindSafe(work))
                .unwrap_or_else(|_| Err(format!("task '{name}' panicked")));
            if let Err(e) = &result {
                debug!(task = %name, "background task failed: {e}");
            }
            Box::new(move || callback(result))
        });

        self.pending.fetch_add(1, Ordering::SeqCst);
        let unsent = match &self.jobs {
            Some(jobs) => jobs.send(job).err().map(|e| e.0),
            None => Some(job),
        };
        if let Some(job) = unsent {
            if !self.workers.is_empty() {
                warn!("background workers gone, running task inline");
            }
            let _ = self.results_tx.send(job());
        }
    }

    /// Run the callbacks of every finished task. Returns how many ran.
    pub fn process_results(&self) -> usize {
        let completions: Vec<Completion> = {
            let results = self.results.lock();
            results.try_iter().collect()
        };
        let count = completions.len();
        for completion in completions {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            completion();
        }
        count
    }

    /// Number of worker threads; zero means tasks run inline
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    pub fn has_pending(&self) -> bool {
        self.pending_count() > 0
    }

    /// Tasks spawned whose callbacks have not run yet
    pub fn pending_count(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }
}

impl Default for BackgroundExecutor {
    fn default() -> Self {
        Self::new(crate::constants::RENDER_WORKERS)
    }
}

impl Drop for BackgroundExecutor {
    fn drop(&mut self) {
        // Closing the job channel ends every worker loop.
        self.jobs.take();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

fn worker_loop(jobs: Arc<Mutex<Receiver<Job>>>, results: Sender<Completion>) {
    loop {
        let job = {
            let jobs = jobs.lock();
            jobs.recv()
        };
        let Ok(job) = job else {
            break;
        };
        if results.send(job()).is_err() {
            break;
        }
    }
}
