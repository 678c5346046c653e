//! The worker side: a dedicated thread that runs one task at a time.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::wire::{ReadySignal, Reply, Request, TaskKind, WorkerMessage};

/// The computations a worker can run, keyed by [`TaskKind`].
///
/// Implementations are registered when the service is built; nothing but
/// the task name and its JSON arguments ever crosses the wire.
pub trait TaskHandler: Send + Sync + 'static {
    /// Run once on the worker thread before the ready signal is sent.
    fn warm_up(&self) -> Result<(), String> {
        Ok(())
    }

    /// Run `task` to completion.
    fn handle(&self, task: TaskKind, args: Vec<Value>) -> Result<Value, String>;
}

/// Start the worker thread.
pub(crate) fn spawn_worker(
    name: &str,
    handler: Arc<dyn TaskHandler>,
    requests: mpsc::UnboundedReceiver<String>,
    replies: mpsc::UnboundedSender<String>,
) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name(name.to_string())
        .spawn(move || run(handler.as_ref(), requests, replies))
}

/// Worker loop: handshake, then answer requests until the queue closes.
pub(crate) fn run(
    handler: &dyn TaskHandler,
    mut requests: mpsc::UnboundedReceiver<String>,
    replies: mpsc::UnboundedSender<String>,
) {
    if let Err(e) = handler.warm_up() {
        warn!(error = %e, "worker warm-up failed");
        return;
    }

    if !send(&replies, &WorkerMessage::Ready(ReadySignal::new())) {
        return;
    }
    debug!("worker ready");

    while let Some(line) = requests.blocking_recv() {
        let Some(reply) = answer(handler, &line) else {
            continue;
        };
        if !send(&replies, &WorkerMessage::Reply(reply)) {
            break;
        }
    }

    debug!("worker queue closed, exiting");
}

fn answer(handler: &dyn TaskHandler, line: &str) -> Option<Reply> {
    let request = match serde_json::from_str::<Request>(line) {
        Ok(request) => request,
        Err(e) => {
            // Answer under the request's id when one can be recovered.
            let id = serde_json::from_str::<Value>(line)
                .ok()
                .and_then(|v| v.get("id").and_then(Value::as_str).map(str::to_string));
            warn!(error = %e, id = ?id, "rejecting malformed request");
            return id.map(|id| Reply::failure(id, format!("malformed request: {}", e)));
        }
    };

    trace!(id = %request.id, task = %request.task, "running task");
    let Request { id, task, args } = request;
    let outcome = catch_unwind(AssertUnwindSafe(|| handler.handle(task, args)));

    Some(match outcome {
        Ok(Ok(result)) => Reply::success(id, result),
        Ok(Err(error)) => Reply::failure(id, error),
        Err(_) => {
            warn!(id = %id, task = %task, "task panicked");
            Reply::failure(id, format!("task {} panicked", task))
        }
    })
}

fn send(replies: &mpsc::UnboundedSender<String>, message: &WorkerMessage) -> bool {
    match serde_json::to_string(message) {
        Ok(line) => replies.send(line).is_ok(),
        Err(e) => {
            warn!(error = %e, "failed to encode worker message");
            true
        }
    }
}
