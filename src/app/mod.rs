//! The application host: configuration, the start page, session dispatch and
//! downloads.

pub mod application;
pub mod browser;
pub mod download;
pub mod page;
pub mod params;

pub use application::{Application, ContentFactory, SESSION_QUEUE_CAPACITY, SHUTDOWN_TIMEOUT};
pub use browser::open_browser;
pub use download::{Download, Downloads, Route};
pub use page::start_page;
pub use params::AppParams;
