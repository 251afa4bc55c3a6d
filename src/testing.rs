//! Test helpers: a scripted transport and a log capture.

use std::cell::RefCell;
use std::sync::{Mutex, Once};

use anyhow::{anyhow, Result};
use http::HeaderMap;
use log::{Level, LevelFilter, Metadata, Record};

use crate::net::{HttpRequest, Response, Transport};

#[derive(Clone)]
enum Scripted {
    Reply { status: u16, body: String },
    Fail(String),
}

/// Transport that records every request and answers each one with the same canned reply.
pub(crate) struct FakeTransport {
    reply: Scripted,
    seen: Mutex<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub(crate) fn replying(status: u16, body: &str) -> Self {
        Self::scripted(Scripted::Reply {
            status,
            body: body.to_string(),
        })
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self::scripted(Scripted::Fail(message.to_string()))
    }

    fn scripted(reply: Scripted) -> Self {
        Self {
            reply,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.seen.lock().unwrap().clone()
    }
}

impl Transport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<Response> {
        let url = request.url.clone();
        self.seen.lock().unwrap().push(request);

        let (status, body) = match self.reply.clone() {
            Scripted::Reply { status, body } => (status, body),
            Scripted::Fail(message) => return Err(anyhow!("{}", message)),
        };

        Ok(Response {
            url,
            status,
            status_text: http::StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("Unknown")
                .to_string(),
            headers: HeaderMap::new(),
            body: body.into_bytes(),
        })
    }
}

thread_local! {
    static CAPTURED: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if !record.target().starts_with(env!("CARGO_CRATE_NAME")) {
            return;
        }
        CAPTURED.with(|c| c.borrow_mut().push((record.level(), record.args().to_string())));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INIT: Once = Once::new();

/// Starts capturing log records emitted by this crate on the current thread.
///
/// Async tests must run on a current-thread runtime (the `#[tokio::test]`
/// default) for the records to land in the right buffer.
pub(crate) fn capture_logs() {
    INIT.call_once(|| {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(LevelFilter::Trace);
    });
    CAPTURED.with(|c| c.borrow_mut().clear());
}

/// Diagnostic entries (warnings and errors) captured since [`capture_logs`].
pub(crate) fn diagnostics() -> Vec<(Level, String)> {
    CAPTURED.with(|c| {
        c.borrow()
            .iter()
            .filter(|(level, _)| *level <= Level::Warn)
            .cloned()
            .collect()
    })
}
