use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::{CycleReport, QuoteUpdateService};
use crate::settings::clamp_refresh_interval;

const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(30);

/// Pending cycle request. Requests that arrive while one is pending merge,
/// and a forced request wins over a scheduled one.
#[derive(Default)]
struct RequestQueue {
    pending: Mutex<Option<bool>>,
    notify: Notify,
}

impl RequestQueue {
    fn enqueue(&self, forced: bool) {
        {
            let mut pending = lock_recovering(&self.pending);
            *pending = Some(pending.unwrap_or(false) || forced);
        }
        self.notify.notify_one();
    }

    async fn next(&self) -> bool {
        loop {
            let pending = lock_recovering(&self.pending).take();
            if let Some(forced) = pending {
                return forced;
            }
            self.notify.notified().await;
        }
    }
}

/// Drives [`QuoteUpdateService`] from a recurring timer and on-demand triggers.
///
/// A single worker task executes cycles one at a time, so a trigger that
/// arrives mid-cycle runs after the current cycle completes.
pub struct UpdateScheduler {
    service: Arc<QuoteUpdateService>,
    queue: Arc<RequestQueue>,
    timer: Mutex<Option<(u32, JoinHandle<()>)>>,
    worker: JoinHandle<()>,
    reports: watch::Receiver<Option<CycleReport>>,
}

impl UpdateScheduler {
    /// Starts the worker task. Must be called inside a tokio runtime.
    pub fn start(service: Arc<QuoteUpdateService>) -> Self {
        Self::with_retry_backoff(service, DEFAULT_RETRY_BACKOFF)
    }

    /// Like [`start`](Self::start) with a custom delay before retrying a
    /// failed cycle.
    pub fn with_retry_backoff(service: Arc<QuoteUpdateService>, retry_backoff: Duration) -> Self {
        let queue = Arc::new(RequestQueue::default());
        let (report_tx, reports) = watch::channel(None);

        let worker = tokio::spawn(run_worker(
            service.clone(),
            queue.clone(),
            report_tx,
            retry_backoff,
        ));

        Self {
            service,
            queue,
            timer: Mutex::new(None),
            worker,
            reports,
        }
    }

    pub fn service(&self) -> &Arc<QuoteUpdateService> {
        &self.service
    }

    /// (Re)starts the recurring timer. The first tick fires one interval
    /// from now. Returns the interval actually used.
    pub fn schedule_recurring(&self, interval_minutes: u32) -> u32 {
        let minutes = clamp_refresh_interval(interval_minutes);
        let period = Duration::from_secs(u64::from(minutes) * 60);

        let queue = self.queue.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                queue.enqueue(false);
            }
        });

        if let Some((_, previous)) = lock_recovering(&self.timer).replace((minutes, handle)) {
            previous.abort();
        }
        info!("Scheduled recurring quote updates every {} minutes", minutes);
        minutes
    }

    /// Stops the recurring timer. Cycles already queued still run.
    pub fn cancel_recurring(&self) {
        if let Some((_, handle)) = lock_recovering(&self.timer).take() {
            handle.abort();
            info!("Cancelled recurring quote updates");
        }
    }

    /// Interval of the active timer, if any.
    pub fn recurring_interval(&self) -> Option<u32> {
        lock_recovering(&self.timer).as_ref().map(|(minutes, _)| *minutes)
    }

    /// Queues a forced cycle that bypasses the market-hours gate.
    pub fn trigger_immediate(&self) {
        debug!("Immediate quote update requested");
        self.queue.enqueue(true);
    }

    /// Receiver for the report of the most recent completed cycle.
    pub fn reports(&self) -> watch::Receiver<Option<CycleReport>> {
        self.reports.clone()
    }

    pub fn last_report(&self) -> Option<CycleReport> {
        self.reports.borrow().clone()
    }
}

impl Drop for UpdateScheduler {
    fn drop(&mut self) {
        if let Some((_, handle)) = lock_recovering(&self.timer).take() {
            handle.abort();
        }
        self.worker.abort();
    }
}

async fn run_worker(
    service: Arc<QuoteUpdateService>,
    queue: Arc<RequestQueue>,
    reports: watch::Sender<Option<CycleReport>>,
    retry_backoff: Duration,
) {
    loop {
        let forced = queue.next().await;

        let result = match service.run_cycle(forced).await {
            Ok(report) => Ok(report),
            Err(e) => {
                warn!("{}; retrying in {:?}", e, retry_backoff);
                tokio::time::sleep(retry_backoff).await;
                service.run_cycle(forced).await
            }
        };

        match result {
            Ok(report) => {
                reports.send_replace(Some(report));
            }
            Err(e) => error!("Giving up until the next trigger: {}", e),
        }
    }
}

fn lock_recovering<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        warn!("Scheduler mutex was poisoned, recovering");
        poisoned.into_inner()
    })
}
