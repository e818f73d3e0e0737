//! The bridge between a session and its browser client.
//!
//! A bridge carries client messages (data text) in and scripts out. Getter
//! scripts are correlated with their answers by `answerID`: the script is
//! prefixed with `var answerID = N;` and the client posts back an `answer`
//! object carrying the same id.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot, Notify};

use crate::data::DataObject;
use crate::error::{self, Error};

/// Boxed `Send` future, the return type of the bridge's async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Key of the correlation id in getter answers.
pub const ANSWER_ID: &str = "answerID";

/// Bidirectional text channel to one browser client.
pub trait Bridge: Send + Sync {
    /// Next client message; `None` once the bridge is closed.
    fn read_message(&self) -> BoxFuture<'_, Option<String>>;

    /// Send a script for execution. Returns `false` when the bridge is closed.
    fn write_message(&self, script: &str) -> bool;

    /// Send a getter script and wait for its answer. Resolves to `None` when
    /// the answer can no longer arrive (closed bridge, discarded id).
    fn run_getter_script(&self, script: &str) -> BoxFuture<'static, Option<DataObject>>;

    /// Route an `answer` message to the waiting getter.
    fn answer_received(&self, answer: &DataObject) -> bool;

    /// Forget every getter still waiting for an answer.
    fn discard_answers(&self);

    fn close(&self);

    fn remote_addr(&self) -> String;
}

/// `script` as a getter: the correlation id comes first.
pub fn getter_script(answer_id: u64, script: &str) -> String {
    format!("var answerID = {answer_id};\n{script}")
}

// ---------------------------------------------------------------------------
// AnswerRouter
// ---------------------------------------------------------------------------

/// Pending getter answers: `answerID` to a one-shot channel.
#[derive(Debug, Default)]
pub struct AnswerRouter {
    next_id: AtomicU64,
    pending: Mutex<HashMap<u64, oneshot::Sender<DataObject>>>,
}

impl AnswerRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an id and the receiver its answer will arrive on.
    pub fn register(&self) -> (u64, oneshot::Receiver<DataObject>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let (sender, receiver) = oneshot::channel();
        self.pending.lock().insert(id, sender);
        (id, receiver)
    }

    /// Deliver `answer` to its getter; the id is released either way.
    pub fn deliver(&self, answer: &DataObject) -> bool {
        let Some(id) = answer
            .property_int(ANSWER_ID)
            .and_then(|id| u64::try_from(id).ok())
        else {
            error::report(Error::MissingKey {
                tag: answer.tag().to_owned(),
                key: ANSWER_ID.to_owned(),
            });
            return false;
        };
        let Some(sender) = self.pending.lock().remove(&id) else {
            error::report(Error::UnknownAnswer(id));
            return false;
        };
        sender.send(answer.clone()).is_ok()
    }

    pub fn cancel(&self, id: u64) {
        self.pending.lock().remove(&id);
    }

    /// Drop every pending sender; their getters resolve to `None`.
    pub fn discard_all(&self) {
        let discarded = std::mem::take(&mut *self.pending.lock());
        if !discarded.is_empty() {
            log::debug!("discarded {} pending answers", discarded.len());
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    /// Register, send with `write`, and wait for the answer.
    pub fn run_getter(
        &self,
        script: &str,
        write: impl FnOnce(&str) -> bool,
    ) -> BoxFuture<'static, Option<DataObject>> {
        let (id, receiver) = self.register();
        if !write(&getter_script(id, script)) {
            self.cancel(id);
            return Box::pin(async { None });
        }
        Box::pin(async move { receiver.await.ok() })
    }
}

// ---------------------------------------------------------------------------
// LocalBridge
// ---------------------------------------------------------------------------

/// In-process bridge: one queue in, one queue out.
#[derive(Debug)]
pub struct LocalBridge {
    incoming: tokio::sync::Mutex<mpsc::Receiver<String>>,
    outgoing: mpsc::UnboundedSender<String>,
    answers: AnswerRouter,
    closed: AtomicBool,
    close_notify: Notify,
}

/// The client end of a [`LocalBridge`].
#[derive(Debug)]
pub struct LocalClient {
    sender: mpsc::Sender<String>,
    scripts: mpsc::UnboundedReceiver<String>,
}

/// A connected bridge/client pair; the client queue holds `capacity` messages.
pub fn local_bridge(capacity: usize) -> (Arc<LocalBridge>, LocalClient) {
    let (sender, incoming) = mpsc::channel(capacity.max(1));
    let (outgoing, scripts) = mpsc::unbounded_channel();
    let bridge = LocalBridge {
        incoming: tokio::sync::Mutex::new(incoming),
        outgoing,
        answers: AnswerRouter::new(),
        closed: AtomicBool::new(false),
        close_notify: Notify::new(),
    };
    (Arc::new(bridge), LocalClient { sender, scripts })
}

impl LocalBridge {
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn pending_answers(&self) -> usize {
        self.answers.pending_count()
    }
}

impl Bridge for LocalBridge {
    fn read_message(&self) -> BoxFuture<'_, Option<String>> {
        Box::pin(async move {
            if self.is_closed() {
                return None;
            }
            let mut incoming = self.incoming.lock().await;
            tokio::select! {
                message = incoming.recv() => message,
                _ = self.close_notify.notified() => None,
            }
        })
    }

    fn write_message(&self, script: &str) -> bool {
        if self.is_closed() {
            log::warn!("write to a closed bridge");
            return false;
        }
        log::trace!("script: {script}");
        self.outgoing.send(script.to_owned()).is_ok()
    }

    fn run_getter_script(&self, script: &str) -> BoxFuture<'static, Option<DataObject>> {
        self.answers
            .run_getter(script, |script| self.write_message(script))
    }

    fn answer_received(&self, answer: &DataObject) -> bool {
        self.answers.deliver(answer)
    }

    fn discard_answers(&self) {
        self.answers.discard_all();
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            self.close_notify.notify_one();
            self.answers.discard_all();
        }
    }

    fn remote_addr(&self) -> String {
        "local".to_owned()
    }
}

impl LocalClient {
    /// Send a message to the server side; `false` once it is gone.
    pub async fn send(&self, message: &str) -> bool {
        self.sender.send(message.to_owned()).await.is_ok()
    }

    /// Next script from the server; `None` once the bridge is dropped.
    pub async fn next_script(&mut self) -> Option<String> {
        self.scripts.recv().await
    }

    /// Every script received so far.
    pub fn drain_scripts(&mut self) -> Vec<String> {
        let mut scripts = Vec::new();
        while let Ok(script) = self.scripts.try_recv() {
            scripts.push(script);
        }
        scripts
    }
}

#[cfg(test)]
mod tests {
    use tokio_test::{assert_pending, assert_ready_eq, task};

    use super::*;
    use crate::data::parse_data_text;

    #[test]
    fn getter_waits_for_its_answer() {
        let (bridge, mut client) = local_bridge(4);
        let mut getter = task::spawn(bridge.run_getter_script("sendAnswer(answerID, 'x')"));
        assert_pending!(getter.poll());

        let scripts = client.drain_scripts();
        assert_eq!(scripts.len(), 1);
        assert!(scripts[0].starts_with("var answerID = 1;\n"));

        let answer = parse_data_text("answer { answerID = 1, width = 640 }").unwrap();
        assert!(bridge.answer_received(&answer));
        assert!(getter.is_woken());
        assert_ready_eq!(getter.poll(), Some(answer));
        assert_eq!(bridge.pending_answers(), 0);
    }

    #[test]
    fn unknown_and_missing_ids_are_reported() {
        let (bridge, _client) = local_bridge(4);
        let (delivered, errors) = error::capture(|| {
            let unknown = parse_data_text("answer { answerID = 42 }").unwrap();
            let missing = parse_data_text("answer { width = 1 }").unwrap();
            (bridge.answer_received(&unknown), bridge.answer_received(&missing))
        });
        assert_eq!(delivered, (false, false));
        assert_eq!(errors[0], Error::UnknownAnswer(42));
        assert!(matches!(errors[1], Error::MissingKey { .. }));
    }

    #[test]
    fn discarded_getter_resolves_to_none() {
        let (bridge, _client) = local_bridge(4);
        let mut getter = task::spawn(bridge.run_getter_script("getValue()"));
        assert_pending!(getter.poll());
        bridge.discard_answers();
        assert_ready_eq!(getter.poll(), None);
    }

    #[tokio::test]
    async fn messages_arrive_in_order() {
        let (bridge, client) = local_bridge(4);
        assert!(client.send("first {}").await);
        assert!(client.send("second {}").await);
        assert_eq!(bridge.read_message().await.as_deref(), Some("first {}"));
        assert_eq!(bridge.read_message().await.as_deref(), Some("second {}"));
    }

    #[tokio::test]
    async fn close_wakes_the_reader() {
        let (bridge, _client) = local_bridge(4);
        let (message, ()) = tokio::join!(bridge.read_message(), async { bridge.close() });
        assert_eq!(message, None);
        assert!(!bridge.write_message("alert(1)"));
        assert_eq!(bridge.run_getter_script("x").await, None);
    }
}
