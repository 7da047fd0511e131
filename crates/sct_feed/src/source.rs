use std::collections::VecDeque;
use std::sync::{mpsc, Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use sct_core::Message;
use sct_logging::{sct_debug, sct_info};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::SourceError;

#[derive(Debug, Clone, Default)]
pub struct SourceSettings {
    /// Delay before each delivery. Zero still hands over one message per turn.
    pub delivery_interval: Duration,
}

struct Backlog {
    queue: Mutex<VecDeque<Message>>,
    wake: Notify,
}

impl Backlog {
    fn lock(&self) -> MutexGuard<'_, VecDeque<Message>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Feeds messages to a consumer asynchronously, one at a time, in order.
///
/// Delivery runs on a background thread that owns a tokio runtime. Messages
/// already handed to the consumer channel are never retracted; only the
/// pending backlog is replaced by `set_messages`.
pub struct MessageSource {
    backlog: Arc<Backlog>,
    delivered_rx: mpsc::Receiver<Message>,
    shutdown: CancellationToken,
    worker: Option<thread::JoinHandle<()>>,
}

impl MessageSource {
    pub fn new(settings: SourceSettings) -> Result<Self, SourceError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;
        let backlog = Arc::new(Backlog {
            queue: Mutex::new(VecDeque::new()),
            wake: Notify::new(),
        });
        let (delivered_tx, delivered_rx) = mpsc::channel();
        let shutdown = CancellationToken::new();

        let worker = {
            let backlog = backlog.clone();
            let shutdown = shutdown.clone();
            thread::spawn(move || {
                runtime.block_on(deliver(
                    backlog,
                    settings.delivery_interval,
                    delivered_tx,
                    shutdown,
                ));
            })
        };

        Ok(Self {
            backlog,
            delivered_rx,
            shutdown,
            worker: Some(worker),
        })
    }

    /// Replaces every message that has not been delivered yet with `batch`.
    pub fn set_messages(&self, batch: Vec<Message>) {
        let loaded = batch.len();
        let replaced = {
            let mut queue = self.backlog.lock();
            let replaced = queue.len();
            *queue = batch.into();
            replaced
        };
        sct_info!(
            "message source loaded {} messages ({} pending dropped)",
            loaded,
            replaced
        );
        self.backlog.wake.notify_one();
    }

    /// Number of messages still waiting for delivery.
    pub fn pending(&self) -> usize {
        self.backlog.lock().len()
    }

    pub fn try_recv(&self) -> Option<Message> {
        self.delivered_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<Message> {
        self.delivered_rx.recv_timeout(timeout).ok()
    }
}

impl Drop for MessageSource {
    fn drop(&mut self) {
        self.shutdown.cancel();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

async fn deliver(
    backlog: Arc<Backlog>,
    interval: Duration,
    delivered_tx: mpsc::Sender<Message>,
    shutdown: CancellationToken,
) {
    loop {
        if backlog.lock().is_empty() {
            tokio::select! {
                _ = backlog.wake.notified() => continue,
                _ = shutdown.cancelled() => break,
            }
        }

        if interval.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = shutdown.cancelled() => break,
            }
        }

        // Pop and hand over under one lock so `pending() == 0` implies the
        // consumer channel already holds every message.
        let mut queue = backlog.lock();
        if let Some(message) = queue.pop_front() {
            sct_debug!("delivering {:?} message", message.kind());
            if delivered_tx.send(message).is_err() {
                break;
            }
        }
    }
    sct_debug!("message source delivery stopped");
}
