//! [`Application`]: the session registry and the tasks that drive sessions.
//!
//! Every connection gets a reader task. The first `startSession` (or
//! `reconnect`) binds the connection to a session, whose own task consumes a
//! bounded queue of events in arrival order:
//!
//! ```text
//! bridge ──read──> reader task ──mpsc(1024)──> session task ──> Session
//!                      │ answer                                   │
//!                      └──────────> Bridge::answer_received <─────┘ getters
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::app::download::{Downloads, Route};
use crate::app::page::start_page;
use crate::app::params::AppParams;
use crate::data::{parse_data_text, DataObject};
use crate::error::{self, Error};
use crate::session::{Bridge, ClientInfo, Session, SessionContent};
use crate::theme::Theme;

/// Capacity of each session's event queue.
pub const SESSION_QUEUE_CAPACITY: usize = 1024;

/// How long [`Application::shutdown`] waits for session tasks.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds the content of each new session.
pub type ContentFactory = Arc<dyn Fn() -> Box<dyn SessionContent> + Send + Sync>;

enum SessionMessage {
    Event(DataObject),
    Reconnect(Arc<dyn Bridge>, DataObject),
    /// The reader of this bridge saw the end of the connection.
    Disconnect(Arc<dyn Bridge>),
    Close,
}

struct SessionHandle {
    sender: mpsc::Sender<SessionMessage>,
    bridge: Arc<dyn Bridge>,
    task: JoinHandle<()>,
}

struct Shared {
    params: AppParams,
    factory: ContentFactory,
    theme: Mutex<Option<Theme>>,
    sessions: Mutex<HashMap<u32, SessionHandle>>,
    next_session_id: AtomicU32,
    downloads: Arc<Downloads>,
}

/// The application host: creates sessions for connections and routes their messages.
#[derive(Clone)]
pub struct Application {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("params", &self.shared.params)
            .field("sessions", &self.session_count())
            .finish()
    }
}

impl Application {
    pub fn new(
        params: AppParams,
        factory: impl Fn() -> Box<dyn SessionContent> + Send + Sync + 'static,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                params,
                factory: Arc::new(factory),
                theme: Mutex::new(None),
                sessions: Mutex::new(HashMap::new()),
                next_session_id: AtomicU32::new(0),
                downloads: Arc::new(Downloads::new()),
            }),
        }
    }

    pub fn params(&self) -> &AppParams {
        &self.shared.params
    }

    /// Theme overlaid on the built-in one in sessions started from now on.
    pub fn set_custom_theme(&self, theme: Theme) {
        *self.shared.theme.lock() = Some(theme);
    }

    pub fn downloads(&self) -> &Arc<Downloads> {
        &self.shared.downloads
    }

    pub fn start_page(&self) -> String {
        start_page(&self.shared.params)
    }

    /// What a `GET` of `path` is answered with.
    pub fn route(&self, path: &str) -> Route {
        Route::resolve(path, &self.shared.downloads)
    }

    pub fn session_count(&self) -> usize {
        self.shared.sessions.lock().len()
    }

    pub fn contains_session(&self, id: u32) -> bool {
        self.shared.sessions.lock().contains_key(&id)
    }

    /// Serve a new connection until its bridge closes.
    pub fn connect(&self, bridge: Arc<dyn Bridge>) -> JoinHandle<()> {
        log::debug!("connection from {}", bridge.remote_addr());
        tokio::spawn(read_messages(self.clone(), bridge))
    }

    /// Queue `message` for session `id`, for hosts that receive messages
    /// outside a bridge (long polling). Answers are routed at once.
    pub fn dispatch(&self, id: u32, message: DataObject) -> bool {
        let sessions = self.shared.sessions.lock();
        let Some(handle) = sessions.get(&id) else {
            error::report(Error::SessionNotExists(id));
            return false;
        };
        if message.tag() == "answer" {
            return handle.bridge.answer_received(&message);
        }
        match handle.sender.try_send(SessionMessage::Event(message)) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("session {id}: event dropped: {err}");
                false
            }
        }
    }

    /// Point session `id` at a new connection.
    fn rebind_session(&self, id: u32, bridge: Arc<dyn Bridge>) -> Option<mpsc::Sender<SessionMessage>> {
        let mut sessions = self.shared.sessions.lock();
        let handle = sessions.get_mut(&id)?;
        handle.bridge = bridge;
        Some(handle.sender.clone())
    }

    fn start_session(&self, bridge: Arc<dyn Bridge>, message: &DataObject) -> mpsc::Sender<SessionMessage> {
        let id = self.shared.next_session_id.fetch_add(1, Ordering::Relaxed) + 1;
        let mut session = Session::new(id, bridge.clone(), ClientInfo::from_object(message))
            .with_downloads(self.shared.downloads.clone());
        if let Some(theme) = self.shared.theme.lock().clone() {
            session.set_custom_theme(theme);
        }
        session.set_content((self.shared.factory)());
        session.start();

        let (sender, receiver) = mpsc::channel(SESSION_QUEUE_CAPACITY);
        let timeouts = SessionTimeouts {
            auto_close: Duration::from_secs(u64::from(self.shared.params.socket_auto_close)),
            retention: Duration::from_secs(u64::from(self.shared.params.session_retention)),
        };
        let task = tokio::spawn(run_session(
            Arc::downgrade(&self.shared),
            session,
            receiver,
            timeouts,
        ));
        self.shared.sessions.lock().insert(
            id,
            SessionHandle {
                sender: sender.clone(),
                bridge,
                task,
            },
        );
        sender
    }

    /// Close every session and wait up to [`SHUTDOWN_TIMEOUT`] for their tasks.
    pub async fn shutdown(&self) {
        let handles: Vec<SessionHandle> = self
            .shared
            .sessions
            .lock()
            .drain()
            .map(|(_, handle)| handle)
            .collect();
        log::debug!("shutting down {} sessions", handles.len());
        for handle in &handles {
            handle.bridge.close();
            let _ = handle.sender.try_send(SessionMessage::Close);
        }
        let tasks = async {
            for handle in handles {
                let _ = handle.task.await;
            }
        };
        if tokio::time::timeout(SHUTDOWN_TIMEOUT, tasks).await.is_err() {
            log::warn!("sessions still running after {SHUTDOWN_TIMEOUT:?}");
        }
    }
}

async fn read_messages(app: Application, bridge: Arc<dyn Bridge>) {
    let mut session: Option<mpsc::Sender<SessionMessage>> = None;
    while let Some(text) = bridge.read_message().await {
        let message = match parse_data_text(&text) {
            Ok(message) => message,
            Err(err) => {
                error::report(err);
                continue;
            }
        };
        let tag = message.tag().to_owned();
        match tag.as_str() {
            "startSession" => {
                if session.is_some() {
                    log::warn!("startSession on a connection that has a session");
                    continue;
                }
                session = Some(app.start_session(bridge.clone(), &message));
            }
            "reconnect" => {
                let Some(id) = message
                    .property_int("session")
                    .and_then(|id| u32::try_from(id).ok())
                else {
                    error::report(Error::MissingKey {
                        tag: tag.clone(),
                        key: "session".to_owned(),
                    });
                    continue;
                };
                let Some(sender) = app.rebind_session(id, bridge.clone()) else {
                    error::report(Error::SessionNotExists(id));
                    continue;
                };
                if sender
                    .send(SessionMessage::Reconnect(bridge.clone(), message))
                    .await
                    .is_ok()
                {
                    session = Some(sender);
                }
            }
            "answer" => {
                bridge.answer_received(&message);
            }
            _ => match &session {
                Some(sender) => {
                    if sender.send(SessionMessage::Event(message)).await.is_err() {
                        break;
                    }
                }
                None => log::warn!("{tag} before startSession ignored"),
            },
        }
    }

    log::debug!("connection from {} closed", bridge.remote_addr());
    if let Some(sender) = session {
        let _ = sender.send(SessionMessage::Disconnect(bridge)).await;
    }
}

async fn run_session(
    shared: Weak<Shared>,
    mut session: Session,
    mut receiver: mpsc::Receiver<SessionMessage>,
    timeouts: SessionTimeouts,
) {
    let mut paused_at: Option<Instant> = None;
    let mut disconnected_at: Option<Instant> = None;
    loop {
        let pause_deadline = paused_at
            .filter(|_| !timeouts.auto_close.is_zero())
            .map(|paused| paused + timeouts.auto_close);
        let retention_deadline = disconnected_at
            .filter(|_| !timeouts.retention.is_zero())
            .map(|disconnected| disconnected + timeouts.retention);

        let message = tokio::select! {
            message = receiver.recv() => message,
            _ = sleep_until(pause_deadline) => {
                log::debug!("session {}: paused too long, closing the socket", session.id());
                session.bridge().close();
                paused_at = None;
                continue;
            }
            _ = sleep_until(retention_deadline) => {
                log::debug!("session {}: not reconnected in time, finishing", session.id());
                session.finish();
                if let Some(shared) = shared.upgrade() {
                    shared.sessions.lock().remove(&session.id());
                }
                break;
            }
        };
        let Some(message) = message else {
            break;
        };

        match message {
            SessionMessage::Event(event) => match event.tag() {
                "session-close" => {
                    session.finish();
                    if let Some(shared) = shared.upgrade() {
                        shared.sessions.lock().remove(&session.id());
                    }
                    session.bridge().close();
                    break;
                }
                "disconnect" => {
                    disconnected_at = Some(Instant::now());
                    session.disconnected();
                }
                tag => {
                    match tag {
                        "session-pause" => paused_at = Some(Instant::now()),
                        "session-resume" => paused_at = None,
                        _ => {}
                    }
                    session.dispatch(&event);
                }
            },
            SessionMessage::Reconnect(bridge, message) => {
                paused_at = None;
                disconnected_at = None;
                session.reconnect(bridge, &message);
            }
            SessionMessage::Disconnect(bridge) => {
                if session.is_bridge(&bridge) {
                    disconnected_at = Some(Instant::now());
                    session.disconnected();
                }
            }
            SessionMessage::Close => {
                session.finish();
                break;
            }
        }
    }
}

/// Timers of a session task; a zero duration disables the timer.
#[derive(Debug, Clone, Copy)]
struct SessionTimeouts {
    auto_close: Duration,
    retention: Duration,
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::session::{local_bridge, LocalBridge, LocalClient};
    use crate::units::SizeUnit;
    use crate::view::{View, ViewId, Widget};

    fn build_root(session: &mut Session) -> Option<ViewId> {
        let mut button = View::new(Widget::Button).with("text", "Go");
        button.on_event("click", |session, id, _| {
            session.set_property(id, "width", SizeUnit::px(80.0));
            session.set_property(id, "opacity", 0.5);
        });
        Some(session.set_root_view(button))
    }

    fn application() -> Application {
        Application::new(AppParams::new(), || Box::new(build_root) as Box<dyn SessionContent>)
    }

    async fn start(app: &Application) -> (Arc<LocalBridge>, LocalClient, JoinHandle<()>) {
        let (bridge, mut client) = local_bridge(8);
        let reader = app.connect(bridge.clone());
        assert!(client.send("startSession { width = 800, height = 600 }").await);
        let script = client.next_script().await.unwrap();
        assert!(script.starts_with("sessionID = 1;\n"));
        (bridge, client, reader)
    }

    #[tokio::test]
    async fn start_session_registers_it() {
        let app = application();
        let (_bridge, _client, _reader) = start(&app).await;
        assert_eq!(app.session_count(), 1);
        assert!(app.contains_session(1));
    }

    #[tokio::test]
    async fn handler_updates_arrive_as_one_script() {
        let app = application();
        let (_bridge, mut client, _reader) = start(&app).await;
        assert!(client.send("click { id = id1 }").await);
        let script = client.next_script().await.unwrap();
        assert_eq!(
            script,
            "var element = document.getElementById('id1'); if (element) {\n\
             element.style['opacity'] = '0.5';\n\
             element.style['width'] = '80px';\n\
             scanElementsSize();}\n"
        );
    }

    #[tokio::test]
    async fn closed_session_is_gone() {
        let app = application();
        let (bridge, client, reader) = start(&app).await;
        assert!(client.send("session-close {}").await);
        reader.await.unwrap();
        assert!(bridge.is_closed());
        assert!(!app.contains_session(1));

        let (accepted, errors) =
            error::capture(|| app.dispatch(1, DataObject::new("click").with("id", "id1")));
        assert!(!accepted);
        assert_eq!(errors, vec![Error::SessionNotExists(1)]);
        assert_eq!(errors[0].to_string(), "session 1 not exists");
        assert_eq!(app.session_count(), 0);
    }

    #[tokio::test]
    async fn reconnect_resends_the_page() {
        let disconnects = Arc::new(AtomicUsize::new(0));
        struct Content(Arc<AtomicUsize>);
        impl SessionContent for Content {
            fn create_root_view(&mut self, session: &mut Session) -> Option<ViewId> {
                build_root(session)
            }
            fn on_disconnect(&mut self, _session: &mut Session) {
                self.0.fetch_add(1, Ordering::Relaxed);
            }
        }
        let counter = disconnects.clone();
        let app = Application::new(AppParams::new(), move || {
            Box::new(Content(counter.clone())) as Box<dyn SessionContent>
        });

        let (_bridge, client, reader) = start(&app).await;
        drop(client);
        reader.await.unwrap();
        assert!(app.contains_session(1));

        let (second, mut client) = local_bridge(8);
        let _reader = app.connect(second);
        assert!(client.send("reconnect { session = 1 }").await);
        let script = client.next_script().await.unwrap();
        assert!(script.starts_with("sessionID = 1;\nupdateCSS('"));
        assert_eq!(disconnects.load(Ordering::Relaxed), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unreconnected_session_expires() {
        let app = Application::new(AppParams::new().with_session_retention(1), || {
            Box::new(build_root) as Box<dyn SessionContent>
        });
        let (_bridge, client, reader) = start(&app).await;
        drop(client);
        reader.await.unwrap();
        assert!(app.contains_session(1));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!app.contains_session(1));
        let (accepted, errors) =
            error::capture(|| app.dispatch(1, DataObject::new("click").with("id", "id1")));
        assert!(!accepted);
        assert_eq!(errors, vec![Error::SessionNotExists(1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn reconnect_cancels_expiry() {
        let app = Application::new(AppParams::new().with_session_retention(1), || {
            Box::new(build_root) as Box<dyn SessionContent>
        });
        let (_bridge, client, reader) = start(&app).await;
        drop(client);
        reader.await.unwrap();

        let (second, mut client) = local_bridge(8);
        let _reader = app.connect(second);
        assert!(client.send("reconnect { session = 1 }").await);
        assert!(client.next_script().await.is_some());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(app.contains_session(1));
    }

    #[tokio::test]
    async fn dispatch_queues_events() {
        let app = application();
        let (_bridge, mut client, _reader) = start(&app).await;
        assert!(app.dispatch(1, DataObject::new("click").with("id", "id1")));
        let script = client.next_script().await.unwrap();
        assert!(script.contains("element.style['width'] = '80px';"));
    }

    #[tokio::test]
    async fn shutdown_closes_every_session() {
        let app = application();
        let (bridge, _client, reader) = start(&app).await;
        app.shutdown().await;
        assert_eq!(app.session_count(), 0);
        assert!(bridge.is_closed());
        reader.await.unwrap();
    }

    #[test]
    fn start_page_and_routes() {
        let app = Application::new(AppParams::new().with_title("Demo"), || {
            Box::new(build_root) as Box<dyn SessionContent>
        });
        assert!(app.start_page().contains("<title>Demo</title>"));
        app.downloads().start_download("file1", "a.txt", b"a".to_vec());
        assert!(matches!(app.route("/file1"), Route::Download(_)));
        assert_eq!(app.route("/ws"), Route::Socket);
    }
}
