//! The caller side: lifecycle, pending calls and reply dispatch.
//!
//! ```text
//!  caller ──call()──► pending[id] = oneshot ──request──► worker thread
//!                                                             │
//!  caller ◄──oneshot── dispatcher task ◄──────reply───────────┘
//! ```
//!
//! A single dispatcher task reads every worker message, so replies are
//! handled one at a time. Callers only insert their own entry and, on
//! timeout, remove it again.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::config::WorkerConfig;
use crate::error::{Error, Result};
use crate::runner::{spawn_worker, TaskHandler};
use crate::wire::{Request, TaskKind, WorkerMessage};

type PendingCalls = Arc<Mutex<HashMap<String, oneshot::Sender<Result<Value>>>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Readiness {
    Starting,
    Ready,
    Exited,
}

/// One running worker and the plumbing around it.
struct WorkerHandle {
    requests: mpsc::UnboundedSender<String>,
    pending: PendingCalls,
    ready: watch::Receiver<Readiness>,
    dispatcher: JoinHandle<()>,
    thread: thread::JoinHandle<()>,
}

impl WorkerHandle {
    fn is_ready(&self) -> bool {
        *self.ready.borrow() == Readiness::Ready
    }

    /// Stop dispatching and reject everything still waiting.
    async fn shutdown(self, reason: &'static str) {
        self.dispatcher.abort();
        // Closing the queue makes the thread exit once its current task ends.
        drop(self.requests);
        drop(self.thread);

        let mut calls = self.pending.lock().await;
        let rejected = calls.len();
        for (_, waiter) in calls.drain() {
            let _ = waiter.send(Err(Error::Terminated));
        }
        info!(rejected, reason, "background worker stopped");
    }
}

/// A single off-thread worker for long-running, pure computations.
///
/// The service is an ordinary value: whoever wires up the application
/// creates it, shares it (usually behind an `Arc`) and decides when to
/// [`init`](Self::init) and [`terminate`](Self::terminate) it.
pub struct BackgroundService {
    config: WorkerConfig,
    handler: Arc<dyn TaskHandler>,
    worker: Mutex<Option<WorkerHandle>>,
    next_call: AtomicU64,
}

impl BackgroundService {
    /// Create a service; no thread is started until [`init`](Self::init).
    pub fn new(config: WorkerConfig, handler: Arc<dyn TaskHandler>) -> Self {
        Self {
            config,
            handler,
            worker: Mutex::new(None),
            next_call: AtomicU64::new(1),
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Start the worker if needed and wait for its ready signal.
    ///
    /// Idempotent: a running worker is reused, and concurrent callers wait
    /// on the same handshake.
    pub async fn init(&self) -> Result<()> {
        let mut ready = {
            let mut worker = self.worker.lock().await;
            if worker.is_none() {
                *worker = Some(self.spawn()?);
            }
            match worker.as_ref() {
                Some(handle) => handle.ready.clone(),
                None => return Err(Error::NotReady),
            }
        };

        let handshake = async {
            loop {
                let state = *ready.borrow_and_update();
                match state {
                    Readiness::Ready => return Ok(()),
                    Readiness::Exited => {
                        return Err(Error::InitFailed(
                            "worker exited before signalling ready".to_string(),
                        ))
                    }
                    Readiness::Starting => {}
                }
                if ready.changed().await.is_err() {
                    return Err(Error::InitFailed("worker dispatcher stopped".to_string()));
                }
            }
        };

        let outcome = match tokio::time::timeout(self.config.init_timeout, handshake).await {
            Ok(outcome) => outcome,
            Err(_) => Err(Error::InitTimeout(self.config.init_timeout)),
        };

        match outcome {
            Ok(()) => {
                debug!(thread = %self.config.thread_name, "background worker ready");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "background worker failed to initialise");
                self.stop("initialisation failed").await;
                Err(e)
            }
        }
    }

    fn spawn(&self) -> Result<WorkerHandle> {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = watch::channel(Readiness::Starting);
        let pending = PendingCalls::default();

        let thread = spawn_worker(
            &self.config.thread_name,
            Arc::clone(&self.handler),
            request_rx,
            reply_tx,
        )
        .map_err(|e| Error::InitFailed(e.to_string()))?;

        let dispatcher = tokio::spawn(dispatch_replies(reply_rx, ready_tx, Arc::clone(&pending)));

        info!(thread = %self.config.thread_name, "spawned background worker");
        Ok(WorkerHandle {
            requests: request_tx,
            pending,
            ready: ready_rx,
            dispatcher,
            thread,
        })
    }

    /// True once the worker has signalled ready and until it stops.
    pub async fn is_ready(&self) -> bool {
        self.worker
            .lock()
            .await
            .as_ref()
            .is_some_and(WorkerHandle::is_ready)
    }

    /// Number of calls waiting for a reply.
    pub async fn pending_calls(&self) -> usize {
        let pending = match self.worker.lock().await.as_ref() {
            Some(handle) => Arc::clone(&handle.pending),
            None => return 0,
        };
        let calls = pending.lock().await;
        calls.len()
    }

    /// Run `task` on the worker and wait for its result.
    ///
    /// Calls issued before the worker is ready are rejected with
    /// [`Error::NotReady`].
    pub async fn call(&self, task: TaskKind, args: Vec<Value>) -> Result<Value> {
        let id = self.next_call.fetch_add(1, Ordering::SeqCst).to_string();
        let line = serde_json::to_string(&Request {
            id: id.clone(),
            task,
            args,
        })?;

        // Register under the worker lock so a concurrent stop either sees
        // this waiter when it drains or has already cleared the worker.
        let (waiter, reply) = oneshot::channel();
        let (requests, pending) = {
            let worker = self.worker.lock().await;
            match worker.as_ref() {
                Some(handle) if handle.is_ready() => {
                    handle.pending.lock().await.insert(id.clone(), waiter);
                    (handle.requests.clone(), Arc::clone(&handle.pending))
                }
                _ => return Err(Error::NotReady),
            }
        };

        if requests.send(line).is_err() {
            pending.lock().await.remove(&id);
            return Err(Error::WorkerGone);
        }
        trace!(id = %id, task = %task, "dispatched call");

        match tokio::time::timeout(self.config.call_timeout, reply).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(Error::Terminated),
            Err(_) => {
                pending.lock().await.remove(&id);
                warn!(id = %id, task = %task, timeout = ?self.config.call_timeout, "call timed out");
                Err(Error::CallTimeout {
                    id,
                    after: self.config.call_timeout,
                })
            }
        }
    }

    /// [`call`](Self::call), decoding the result into `R`.
    pub async fn call_as<R: DeserializeOwned>(&self, task: TaskKind, args: Vec<Value>) -> Result<R> {
        let value = self.call(task, args).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Stop the worker and reject every pending call with
    /// [`Error::Terminated`]. A later [`init`](Self::init) starts afresh.
    pub async fn terminate(&self) {
        self.stop("terminated").await;
    }

    async fn stop(&self, reason: &'static str) {
        let handle = self.worker.lock().await.take();
        if let Some(handle) = handle {
            handle.shutdown(reason).await;
        }
    }
}

impl Drop for BackgroundService {
    fn drop(&mut self) {
        if let Some(handle) = self.worker.get_mut().take() {
            handle.dispatcher.abort();
        }
    }
}

/// Route worker messages to their waiting callers, one at a time.
async fn dispatch_replies(
    mut replies: mpsc::UnboundedReceiver<String>,
    ready: watch::Sender<Readiness>,
    pending: PendingCalls,
) {
    while let Some(line) = replies.recv().await {
        match serde_json::from_str::<WorkerMessage>(&line) {
            Ok(WorkerMessage::Ready(_)) => {
                if *ready.borrow() == Readiness::Ready {
                    debug!("ignoring repeated ready signal");
                } else {
                    ready.send_replace(Readiness::Ready);
                }
            }
            Ok(WorkerMessage::Reply(reply)) => {
                let waiter = pending.lock().await.remove(&reply.id);
                match waiter {
                    Some(waiter) => {
                        let _ = waiter.send(reply.into_result());
                    }
                    None => debug!(id = %reply.id, "dropping reply with no pending call"),
                }
            }
            Err(e) => warn!(error = %e, "unreadable worker message"),
        }
    }

    ready.send_replace(Readiness::Exited);
    let mut calls = pending.lock().await;
    if !calls.is_empty() {
        warn!(pending = calls.len(), "worker exited with calls in flight");
    }
    for (_, waiter) in calls.drain() {
        let _ = waiter.send(Err(Error::WorkerGone));
    }
}
