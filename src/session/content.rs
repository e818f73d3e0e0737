//! [`SessionContent`]: what an application shows in a session.

use crate::session::Session;
use crate::view::ViewId;

/// The application side of a session.
///
/// `create_root_view` builds the view tree through the session (view
/// updates are suppressed while it runs) and returns the root. The
/// lifecycle hooks default to no-ops.
pub trait SessionContent: Send {
    fn create_root_view(&mut self, session: &mut Session) -> Option<ViewId>;

    /// The client received the first page.
    fn on_start(&mut self, _session: &mut Session) {}

    /// The client closed the session.
    fn on_finish(&mut self, _session: &mut Session) {}

    /// The page went to the background.
    fn on_pause(&mut self, _session: &mut Session) {}

    fn on_resume(&mut self, _session: &mut Session) {}

    /// The bridge was lost; the session stays alive for a reconnect.
    fn on_disconnect(&mut self, _session: &mut Session) {}

    fn on_reconnect(&mut self, _session: &mut Session) {}
}

impl<F> SessionContent for F
where
    F: FnMut(&mut Session) -> Option<ViewId> + Send,
{
    fn create_root_view(&mut self, session: &mut Session) -> Option<ViewId> {
        self(session)
    }
}
