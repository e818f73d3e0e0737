//! One-shot downloads and request routing for the HTTP host.

use std::collections::HashMap;

use parking_lot::Mutex;

/// Path of the start page.
pub const START_PAGE_PATH: &str = "/";
/// Path of the WebSocket upgrade.
pub const SOCKET_PATH: &str = "/ws";

/// A file waiting to be fetched by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Downloads registered with `start_download`, keyed by id.
#[derive(Debug, Default)]
pub struct Downloads {
    files: Mutex<HashMap<String, Download>>,
}

impl Downloads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `data` under `id`; an earlier file with the same id is replaced.
    pub fn start_download(&self, id: &str, filename: &str, data: Vec<u8>) {
        let download = Download {
            filename: filename.to_owned(),
            data,
        };
        if self.files.lock().insert(id.to_owned(), download).is_some() {
            log::debug!("download {id} replaced");
        }
    }

    /// Remove and return the file registered under `id`.
    pub fn take(&self, id: &str) -> Option<Download> {
        self.files.lock().remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.files.lock().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.files.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.lock().is_empty()
    }
}

/// What an HTTP `GET` path is served with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    StartPage,
    Socket,
    /// A registered download, already removed from the registry.
    Download(Download),
    /// A static resource path, without the leading `/`.
    Resource(String),
}

impl Route {
    /// Route `path`. A download is served once: resolving it removes it.
    pub fn resolve(path: &str, downloads: &Downloads) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        match path {
            "" | START_PAGE_PATH => Route::StartPage,
            SOCKET_PATH => Route::Socket,
            _ => {
                let name = path.trim_start_matches('/');
                match downloads.take(name) {
                    Some(download) => Route::Download(download),
                    None => Route::Resource(name.to_owned()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downloads_are_one_shot() {
        let downloads = Downloads::new();
        downloads.start_download("d1", "report.csv", b"a,b\n".to_vec());
        assert!(downloads.contains("d1"));

        let route = Route::resolve("/d1", &downloads);
        assert_eq!(
            route,
            Route::Download(Download {
                filename: "report.csv".into(),
                data: b"a,b\n".to_vec(),
            })
        );
        assert!(downloads.is_empty());
        assert_eq!(Route::resolve("/d1", &downloads), Route::Resource("d1".into()));
    }

    #[test]
    fn fixed_routes() {
        let downloads = Downloads::new();
        assert_eq!(Route::resolve("/", &downloads), Route::StartPage);
        assert_eq!(Route::resolve("/?lang=en", &downloads), Route::StartPage);
        assert_eq!(Route::resolve("/ws", &downloads), Route::Socket);
        assert_eq!(
            Route::resolve("/images/logo.png", &downloads),
            Route::Resource("images/logo.png".into())
        );
    }
}
