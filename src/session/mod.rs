//! Sessions: the view tree of one client, kept in sync with its page over a
//! [`Bridge`].

pub mod bridge;
pub mod client;
pub mod content;
#[allow(clippy::module_inception)]
pub mod session;
pub mod update;

pub use bridge::{getter_script, local_bridge, AnswerRouter, BoxFuture, Bridge, LocalBridge, LocalClient, ANSWER_ID};
pub use client::{ClientInfo, TextDirection};
pub use content::SessionContent;
pub use session::{ImageState, Session};
pub use update::{UpdateScripts, UpdateState, ROOT_ELEMENT_ID};
