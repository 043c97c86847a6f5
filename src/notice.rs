//! Transient user notices.
//!
//! The UI-facing replacement for toast popups: managers publish short-lived
//! messages here, consumers subscribe with a handler and tear down with the
//! returned token. Subscribers never block the publishing manager.

use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Notice { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice { level: NoticeLevel::Error, message: message.into() }
    }
}

/// Handle returned by [`NoticeHub::subscribe`]; pass back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoticeToken(u64);

type Handler = Box<dyn Fn(&Notice) + Send + Sync>;

/// Process-wide fan-out registry for notices.
///
/// Cheap to clone (Arc bump); one instance is shared by both managers.
#[derive(Clone, Default)]
pub struct NoticeHub {
    inner: Arc<HubInner>,
}

#[derive(Default)]
struct HubInner {
    handlers: DashMap<u64, Handler>,
    next_id: AtomicU64,
}

impl NoticeHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, handler: F) -> NoticeToken
    where
        F: Fn(&Notice) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.handlers.insert(id, Box::new(handler));
        NoticeToken(id)
    }

    pub fn unsubscribe(&self, token: NoticeToken) {
        self.inner.handlers.remove(&token.0);
    }

    pub fn publish(&self, notice: Notice) {
        debug!(level = ?notice.level, message = %notice.message, "notice");
        for entry in self.inner.handlers.iter() {
            entry.value()(&notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn subscribers_receive_published_notices() {
        let hub = NoticeHub::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        hub.subscribe(move |n| sink.lock().unwrap().push(n.message.clone()));

        hub.publish(Notice::success("connected"));
        hub.publish(Notice::error("rejected"));

        assert_eq!(*seen.lock().unwrap(), vec!["connected", "rejected"]);
    }

    #[test]
    fn unsubscribed_handler_stops_receiving() {
        let hub = NoticeHub::new();
        let seen = Arc::new(Mutex::new(0u32));

        let sink = seen.clone();
        let token = hub.subscribe(move |_| *sink.lock().unwrap() += 1);

        hub.publish(Notice::success("one"));
        hub.unsubscribe(token);
        hub.publish(Notice::success("two"));

        assert_eq!(*seen.lock().unwrap(), 1);
    }
}
