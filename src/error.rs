//! Error taxonomy, the pluggable error-log hook, and the last-error slot.
//!
//! Parsers return [`Result`]. Property mutations never surface an error to the
//! caller: they return `false` and route the error through [`report`], which
//! logs it, remembers it as the last error, and forwards it to the installed
//! hook (if any).

use std::cell::RefCell;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};

/// Every error the toolkit can produce.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    // ── Configuration ────────────────────────────────────────────────
    #[error("unknown property \"{0}\"")]
    UnknownProperty(String),
    #[error("\"{tag}\" property: a value of type {found} is not compatible")]
    NotCompatibleType { tag: String, found: &'static str },
    #[error("\"{tag}\" property: invalid value \"{value}\"")]
    InvalidPropertyValue { tag: String, value: String },
    #[error("invalid {kind} value \"{text}\"")]
    InvalidValue { kind: &'static str, text: String },
    #[error("color channel out of range in \"{0}\"")]
    ColorChannel(String),
    #[error("cyclic constant reference \"@{0}\"")]
    ConstantCycle(String),
    #[error("unknown constant \"@{0}\"")]
    UnknownConstant(String),
    #[error("{func}(): {message}")]
    SizeFunc { func: String, message: String },
    #[error("theme: {0}")]
    Theme(String),

    // ── Protocol ─────────────────────────────────────────────────────
    #[error("data text, line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error("unknown answer id {0}")]
    UnknownAnswer(u64),
    #[error("\"{tag}\" message: missing \"{key}\" key")]
    MissingKey { tag: String, key: String },
    #[error("session {0} not exists")]
    SessionNotExists(u32),
    #[error("view \"{0}\" not found")]
    ViewNotFound(String),

    // ── Transport ────────────────────────────────────────────────────
    #[error("bridge: {0}")]
    Transport(String),

    // ── Fatal ────────────────────────────────────────────────────────
    #[error("fatal: {0}")]
    Fatal(String),
}

/// Error classes from the error-handling design.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Protocol,
    Transport,
    Fatal,
}

impl Error {
    /// The class this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownProperty(_)
            | Error::NotCompatibleType { .. }
            | Error::InvalidPropertyValue { .. }
            | Error::InvalidValue { .. }
            | Error::ColorChannel(_)
            | Error::ConstantCycle(_)
            | Error::UnknownConstant(_)
            | Error::SizeFunc { .. }
            | Error::Theme(_) => ErrorKind::Configuration,
            Error::Syntax { .. }
            | Error::UnknownAnswer(_)
            | Error::MissingKey { .. }
            | Error::SessionNotExists(_)
            | Error::ViewNotFound(_) => ErrorKind::Protocol,
            Error::Transport(_) => ErrorKind::Transport,
            Error::Fatal(_) => ErrorKind::Fatal,
        }
    }

    /// Shorthand for [`Error::InvalidValue`].
    pub(crate) fn invalid(kind: &'static str, text: impl Into<String>) -> Self {
        Error::InvalidValue {
            kind,
            text: text.into(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ---------------------------------------------------------------------------
// Reporting
// ---------------------------------------------------------------------------

/// Callback invoked for every reported error.
pub type ErrorHook = Arc<dyn Fn(&Error) + Send + Sync>;

static HOOK: Lazy<RwLock<Option<ErrorHook>>> = Lazy::new(|| RwLock::new(None));
static LAST_ERROR: Lazy<Mutex<Option<Error>>> = Lazy::new(|| Mutex::new(None));

thread_local! {
    static CAPTURED: RefCell<Option<Vec<Error>>> = const { RefCell::new(None) };
}

/// Report an error: log it, store it as the last error, and call the hook.
pub fn report(error: Error) {
    log::error!("{error}");
    log::trace!("reported at:\n{}", std::backtrace::Backtrace::capture());

    *LAST_ERROR.lock() = Some(error.clone());

    CAPTURED.with(|captured| {
        if let Some(list) = captured.borrow_mut().as_mut() {
            list.push(error.clone());
        }
    });

    let hook = HOOK.read().clone();
    if let Some(hook) = hook {
        hook(&error);
    }
}

/// Install a process-wide error hook, replacing any previous one.
pub fn set_error_hook(hook: impl Fn(&Error) + Send + Sync + 'static) {
    *HOOK.write() = Some(Arc::new(hook));
}

/// Remove the process-wide error hook.
pub fn clear_error_hook() {
    *HOOK.write() = None;
}

/// The most recently reported error, process-wide.
pub fn last_error() -> Option<Error> {
    LAST_ERROR.lock().clone()
}

/// Run `f` and collect every error reported on this thread while it runs.
///
/// Captures nest: an inner capture sees only its own errors, and they are not
/// forwarded to the outer one.
pub fn capture<R>(f: impl FnOnce() -> R) -> (R, Vec<Error>) {
    let outer = CAPTURED.with(|captured| captured.borrow_mut().replace(Vec::new()));
    let result = f();
    let errors = CAPTURED.with(|captured| {
        let mut slot = captured.borrow_mut();
        let errors = slot.take().unwrap_or_default();
        *slot = outer;
        errors
    });
    (result, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_collects_reported_errors() {
        let ((), errors) = capture(|| {
            report(Error::UnknownProperty("foo".into()));
            report(Error::ConstantCycle("b".into()));
        });
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[1], Error::ConstantCycle("b".into()));
    }

    #[test]
    fn nested_capture_is_isolated() {
        let (inner, outer) = capture(|| {
            report(Error::UnknownProperty("a".into()));
            let ((), inner) = capture(|| report(Error::UnknownProperty("b".into())));
            inner
        });
        assert_eq!(inner, vec![Error::UnknownProperty("b".into())]);
        assert_eq!(outer, vec![Error::UnknownProperty("a".into())]);
    }

    #[test]
    fn report_updates_last_error() {
        report(Error::Theme("last error check".into()));
        assert!(last_error().is_some());
    }

    #[test]
    fn error_kinds() {
        assert_eq!(Error::UnknownAnswer(3).kind(), ErrorKind::Protocol);
        assert_eq!(Error::ColorChannel("x".into()).kind(), ErrorKind::Configuration);
        assert_eq!(Error::Transport("eof".into()).kind(), ErrorKind::Transport);
        assert_eq!(Error::Fatal("listen".into()).kind(), ErrorKind::Fatal);
    }

    #[test]
    fn messages() {
        assert_eq!(
            Error::SessionNotExists(7).to_string(),
            "session 7 not exists"
        );
        assert_eq!(
            Error::ConstantCycle("b".into()).to_string(),
            "cyclic constant reference \"@b\""
        );
    }
}
