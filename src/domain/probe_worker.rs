//! Bounded, delayed worker pool for outbound image probes.
//!
//! The analyzer submits [`ProbeTask`]s through a [`ProbeScheduler`]; the
//! worker waits a fixed delay before each probe, then runs it on one of a
//! fixed number of slots. Probes are independent: a failed probe is logged
//! and abandoned without retry.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;

use crate::domain::detection::scan;
use crate::domain::entities::{LeakRecord, LeakSource};
use crate::domain::leak_recorder::LeakRecorder;
use crate::domain::probe_task::ProbeTask;
use crate::domain::repositories::{RedirectRepository, chain_to_hops};
use crate::infrastructure::http::PageFetcher;

/// Sending half of the probe queue.
#[derive(Clone)]
pub struct ProbeScheduler {
    tx: mpsc::Sender<ProbeTask>,
}

impl ProbeScheduler {
    pub fn new(tx: mpsc::Sender<ProbeTask>) -> Self {
        Self { tx }
    }

    /// Creates a scheduler together with the receiver the worker drains.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ProbeTask>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }

    /// Queues a probe without waiting. Returns false if it was dropped.
    pub fn schedule(&self, task: ProbeTask) -> bool {
        match self.tx.try_send(task) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(task)) => {
                tracing::warn!(url = %task.url, "Probe queue full, dropping probe");
                metrics::counter!("leakmail_probes_total", "outcome" => "dropped").increment(1);
                false
            }
            Err(mpsc::error::TrySendError::Closed(task)) => {
                tracing::warn!(url = %task.url, "Probe worker stopped, dropping probe");
                metrics::counter!("leakmail_probes_total", "outcome" => "dropped").increment(1);
                false
            }
        }
    }

    /// Free slots left in the queue.
    pub fn available(&self) -> usize {
        self.tx.capacity()
    }

    pub fn max_capacity(&self) -> usize {
        self.tx.max_capacity()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Result of running one probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Completed { redirects: usize, leaks_recorded: usize },
    Failed,
}

/// Fetches one probe URL and persists what it reveals.
///
/// Chains with at least one redirect are stored hop by hop. Every redirect
/// target is scanned against the task's catalog and each match becomes an
/// image leak with `is_redirect` set.
pub struct ProbeExecutor {
    fetcher: Arc<dyn PageFetcher>,
    redirects: Arc<dyn RedirectRepository>,
    recorder: Arc<LeakRecorder>,
}

impl ProbeExecutor {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        redirects: Arc<dyn RedirectRepository>,
        recorder: Arc<LeakRecorder>,
    ) -> Self {
        Self {
            fetcher,
            redirects,
            recorder,
        }
    }

    pub async fn execute(&self, task: &ProbeTask) -> ProbeOutcome {
        let chain = match self.fetcher.fetch(&task.url).await {
            Ok(chain) => chain,
            Err(e) => {
                tracing::warn!(url = %task.url, reason = ?task.reason, "Probe abandoned: {}", e);
                metrics::counter!("leakmail_probes_total", "outcome" => "failed").increment(1);
                return ProbeOutcome::Failed;
            }
        };

        if chain.has_redirects() {
            let hops = chain_to_hops(&chain, &task.origin, |url| self.recorder.label(url));
            if let Err(e) = self.redirects.record_hops(hops).await {
                tracing::error!(url = %task.url, "Failed to record redirect chain: {}", e);
            }
        }

        let leaks: Vec<LeakRecord> = chain
            .redirects
            .iter()
            .flat_map(|url| {
                scan(url, &task.catalog).into_iter().map(move |enc| {
                    LeakRecord::new(url, LeakSource::Image, enc.name, true, true, &task.origin)
                })
            })
            .collect();
        let leaks_recorded = self.recorder.record_all(leaks).await;

        tracing::debug!(
            url = %task.url,
            redirects = chain.redirects.len(),
            status = ?chain.final_status,
            leaks_recorded,
            "Probe completed"
        );
        metrics::counter!("leakmail_probes_total", "outcome" => "completed").increment(1);

        ProbeOutcome::Completed {
            redirects: chain.redirects.len(),
            leaks_recorded,
        }
    }
}

/// Drains the probe queue until every sender is dropped.
///
/// A task is taken off the queue only once one of `concurrency` slots is
/// free, so a busy worker leaves tasks in the channel and the scheduler
/// starts dropping when it fills. Each task runs no earlier than `delay`
/// after it was queued. Tasks still in flight when the channel closes are
/// awaited.
pub async fn run_probe_worker(
    mut rx: mpsc::Receiver<ProbeTask>,
    executor: Arc<ProbeExecutor>,
    concurrency: usize,
    delay: Duration,
) {
    let slots = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut in_flight = JoinSet::new();

    loop {
        let Ok(permit) = slots.clone().acquire_owned().await else {
            break;
        };
        let Some(task) = rx.recv().await else {
            break;
        };
        let executor = executor.clone();

        in_flight.spawn(async move {
            let _permit = permit;
            tokio::time::sleep_until(task.queued_at + delay).await;
            executor.execute(&task).await;
        });

        while in_flight.try_join_next().is_some() {}
    }

    while in_flight.join_next().await.is_some() {}
    tracing::info!("Probe worker stopped");
}
