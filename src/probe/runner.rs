// src/probe/runner.rs
// =============================================================================
// The probe runner: a small, bounded worker pool.
//
// How a run works:
// 1. Every word is put on a FIFO task queue together with its position
// 2. `concurrency` workers take tasks off the queue one at a time
// 3. Each worker builds base_url + word, asks the renderer to measure the
//    page, and sends a ProbeRecord to the collector
// 4. The collector (the caller's task) owns the results; when every worker
//    has finished it sorts the hits by position and builds the RunReport
// 5. The renderer is closed exactly once, after the last worker is done
//
// Failures are per word: a timeout, a 404, a missing root element or even a
// panicking renderer only mark that one word as "did not work".
//
// Cancellation: once the token is cancelled, workers stop taking new tasks.
// Probes already in flight finish (or time out) and the report is flagged
// as interrupted.
//
// Rust concepts:
// - Arc<T>: shared ownership of the renderer and the queue across tasks
// - tokio::sync::Mutex: a lock that can be held across .await
// - mpsc channels: workers send records, one collector receives them
// - CancellationToken: a cheap, clonable "please stop" flag
// =============================================================================

use std::any::Any;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

use super::outcome::{Outcome, ProbeError, ProbeRecord};
use super::render::Renderer;

// Receives every finished probe, in completion order
pub trait Observer: Send + Sync {
    fn on_probe(&self, record: &ProbeRecord);
}

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Always ends with '/'
    pub base_url: String,
    /// Number of probes in flight at once (at least 1)
    pub concurrency: usize,
    pub probe_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    /// Words that rendered content, in wordlist order, without duplicates
    pub found: Vec<String>,
    pub probed: usize,
    pub failed: usize,
    /// Words that never got a record (left in the queue)
    pub unprobed: usize,
    /// True when a cancellation left some words unprobed
    pub interrupted: bool,
    pub elapsed: Duration,
}

struct ProbeTask {
    index: usize,
    word: String,
}

pub struct ProbeRunner {
    renderer: Arc<dyn Renderer>,
    config: RunnerConfig,
}

impl ProbeRunner {
    pub fn new(renderer: Arc<dyn Renderer>, config: RunnerConfig) -> Self {
        Self { renderer, config }
    }

    pub async fn run(
        &self,
        words: Vec<String>,
        observer: &dyn Observer,
        cancel: CancellationToken,
    ) -> RunReport {
        let started = Instant::now();
        let total = words.len();

        // Fill the queue up front and close it, so an empty queue means "done"
        let (task_tx, task_rx) = mpsc::unbounded_channel();
        for (index, word) in words.into_iter().enumerate() {
            // The receiver is alive until the end of this function
            let _ = task_tx.send(ProbeTask { index, word });
        }
        drop(task_tx);

        let tasks = Arc::new(Mutex::new(task_rx));
        let (record_tx, mut record_rx) = mpsc::unbounded_channel();
        let base_url: Arc<str> = Arc::from(self.config.base_url.as_str());
        let worker_count = self.config.concurrency.max(1).min(total.max(1));

        let mut workers = Vec::with_capacity(worker_count);
        for id in 0..worker_count {
            workers.push(tokio::spawn(worker(
                id,
                Arc::clone(&tasks),
                record_tx.clone(),
                Arc::clone(&self.renderer),
                Arc::clone(&base_url),
                self.config.probe_timeout,
                cancel.clone(),
            )));
        }
        // Only the workers hold senders now; recv() returns None when all are done
        drop(record_tx);

        let mut records = Vec::with_capacity(total);
        while let Some(record) = record_rx.recv().await {
            observer.on_probe(&record);
            records.push(record);
        }

        for result in futures::future::join_all(workers).await {
            if let Err(e) = result {
                tracing::error!(error = %e, "probe worker panicked");
            }
        }

        if let Err(e) = self.renderer.close().await {
            tracing::error!(error = %e, "failed to release renderer");
        }

        let probed = records.len();
        let failed = records.iter().filter(|r| r.outcome.is_failed()).count();
        let unprobed = total - probed;
        let interrupted = cancel.is_cancelled() && unprobed > 0;
        if unprobed > 0 && !interrupted {
            tracing::error!(unprobed, "run ended with words left in the queue");
        }

        let report = RunReport {
            found: collect_found(records),
            probed,
            failed,
            unprobed,
            interrupted,
            elapsed: started.elapsed(),
        };

        tracing::info!(
            probed = report.probed,
            unprobed = report.unprobed,
            found = report.found.len(),
            failed = report.failed,
            interrupted = report.interrupted,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "run finished"
        );

        report
    }
}

async fn worker(
    id: usize,
    tasks: Arc<Mutex<mpsc::UnboundedReceiver<ProbeTask>>>,
    records: mpsc::UnboundedSender<ProbeRecord>,
    renderer: Arc<dyn Renderer>,
    base_url: Arc<str>,
    probe_timeout: Duration,
    cancel: CancellationToken,
) {
    tracing::debug!(worker_id = id, "worker started");

    loop {
        if cancel.is_cancelled() {
            tracing::debug!(worker_id = id, "worker stopping on cancellation");
            break;
        }

        // Hold the lock only long enough to take one task
        let task = tasks.lock().await.recv().await;
        let Some(task) = task else {
            break;
        };

        let record = probe(renderer.as_ref(), &base_url, task, probe_timeout).await;
        if records.send(record).is_err() {
            break;
        }
    }

    tracing::debug!(worker_id = id, "worker finished");
}

async fn probe(
    renderer: &dyn Renderer,
    base_url: &str,
    task: ProbeTask,
    probe_timeout: Duration,
) -> ProbeRecord {
    let url = format!("{}{}", base_url, task.word);
    let started = Instant::now();

    // A panic inside the renderer fails this word only; the worker keeps going
    let measurement = AssertUnwindSafe(renderer.measure(&url)).catch_unwind();
    let outcome = match tokio::time::timeout(probe_timeout, measurement).await {
        Ok(Ok(Ok(length))) => Outcome::from_measurement(length),
        Ok(Ok(Err(e))) => Outcome::Failed(e),
        Ok(Err(panic)) => Outcome::Failed(ProbeError::Renderer(format!(
            "renderer panicked: {}",
            panic_message(&*panic)
        ))),
        Err(_) => Outcome::Failed(ProbeError::Timeout(probe_timeout)),
    };

    if let Outcome::Failed(e) = &outcome {
        tracing::warn!(word = %task.word, url = %url, error = %e, "probe failed");
    }

    ProbeRecord {
        index: task.index,
        word: task.word,
        url,
        outcome,
        elapsed: started.elapsed(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

// Keeps the words that worked, ordered by their position in the wordlist.
// A word listed twice is reported once.
fn collect_found(mut records: Vec<ProbeRecord>) -> Vec<String> {
    records.retain(|r| r.outcome.is_worked());
    records.sort_by_key(|r| r.index);

    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert(r.word.clone()))
        .map(|r| r.word)
        .collect()
}

// BEGINNER NOTES:
//
// 1. Why is the task receiver behind a Mutex?
//    - An mpsc receiver has a single owner, but every worker needs to pull
//      from it, so they take turns through the lock
//    - The lock is released right after one task is taken, so workers never
//      wait on each other while a page loads
//
// 2. How does the run know it is finished?
//    - The queue sender is dropped before the workers start, so recv()
//      returns None once the queue is empty
//    - Each worker owns a record sender; when the last worker ends, the
//      collector's recv() returns None too
//
// 3. What is catch_unwind doing here?
//    - It turns a panic inside the renderer's future into an Err value
//    - AssertUnwindSafe tells the compiler we accept the future might have
//      been left half-done; we drop it right away anyway
//
// 4. Why drop the future on timeout?
//    - Dropping a future in Rust cancels it; tokio::time::timeout does that
//      for us when the page takes too long
