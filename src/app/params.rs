//! [`AppParams`]: how the application is served.

use crate::units::Color;

/// Default listen address.
pub const DEFAULT_ADDRESS: &str = "localhost:8000";

/// Default for [`AppParams::session_retention`], in seconds.
pub const DEFAULT_SESSION_RETENTION: u32 = 60;

/// Configuration for the application host.
#[derive(Debug, Clone, PartialEq)]
pub struct AppParams {
    /// `host:port` to listen on.
    pub address: String,
    /// `<title>` of the start page.
    pub title: String,
    /// `theme-color` meta for mobile browsers.
    pub title_color: Option<Color>,
    /// Favicon href.
    pub icon: Option<String>,
    pub cert_file: Option<String>,
    pub key_file: Option<String>,
    /// Reserved for ACME-style certificate provisioning.
    pub auto_cert_domain: Option<String>,
    /// Serve a 301 redirect from port 80 (HTTPS only).
    pub redirect80: bool,
    /// Use long polling instead of a WebSocket.
    pub no_socket: bool,
    /// Seconds to keep the socket after `session-pause` before closing it; 0 keeps it.
    pub socket_auto_close: u32,
    /// Seconds a disconnected session waits for `reconnect` before it is
    /// finished and forgotten; 0 keeps it until the application shuts down.
    pub session_retention: u32,
}

impl Default for AppParams {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_owned(),
            title: String::new(),
            title_color: None,
            icon: None,
            cert_file: None,
            key_file: None,
            auto_cert_domain: None,
            redirect80: false,
            no_socket: false,
            socket_auto_close: 0,
            session_retention: DEFAULT_SESSION_RETENTION,
        }
    }
}

impl AppParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_title_color(mut self, color: Color) -> Self {
        self.title_color = Some(color);
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Serve HTTPS with this certificate and key.
    pub fn with_tls(mut self, cert_file: impl Into<String>, key_file: impl Into<String>) -> Self {
        self.cert_file = Some(cert_file.into());
        self.key_file = Some(key_file.into());
        self
    }

    pub fn with_auto_cert_domain(mut self, domain: impl Into<String>) -> Self {
        self.auto_cert_domain = Some(domain.into());
        self
    }

    pub fn with_redirect80(mut self, redirect: bool) -> Self {
        self.redirect80 = redirect;
        self
    }

    pub fn with_no_socket(mut self, no_socket: bool) -> Self {
        self.no_socket = no_socket;
        self
    }

    pub fn with_socket_auto_close(mut self, seconds: u32) -> Self {
        self.socket_auto_close = seconds;
        self
    }

    pub fn with_session_retention(mut self, seconds: u32) -> Self {
        self.session_retention = seconds;
        self
    }

    /// HTTPS is on iff both the certificate and the key are set.
    pub fn is_https(&self) -> bool {
        self.cert_file.is_some() && self.key_file.is_some()
    }

    pub fn redirect80_enabled(&self) -> bool {
        self.redirect80 && self.is_https()
    }

    /// URL of the start page.
    pub fn url(&self) -> String {
        let scheme = if self.is_https() { "https" } else { "http" };
        format!("{scheme}://{}/", self.address)
    }
}
