//! Single-threaded event queue with query debouncing.
//!
//! Time is passed in explicitly, so the queue can be driven by a real clock
//! in the CLI and by hand-built instants in tests.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use super::ViewerEvent;

/// Default quiet period before a changed query is applied.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(180);

/// Coalesces bursts of query changes and orders them with other events.
///
/// ## Examples
///
/// ```
/// use std::time::{Duration, Instant};
/// use lumen_lib::viewer::{EventQueue, ViewerEvent};
///
/// let mut queue = EventQueue::new();
/// let start = Instant::now();
/// queue.push(ViewerEvent::QueryChanged("c".into()), start);
/// queue.push(ViewerEvent::QueryChanged("cl".into()), start + Duration::from_millis(50));
///
/// assert!(queue.poll(start + Duration::from_millis(100)).is_empty());
/// let events = queue.poll(start + Duration::from_millis(300));
/// assert_eq!(events, vec![ViewerEvent::QueryChanged("cl".into())]);
/// ```
#[derive(Debug, Clone)]
pub struct EventQueue {
    debounce: Duration,
    /// Latest query and the time of the keystroke that produced it.
    pending: Option<(String, Instant)>,
    ready: VecDeque<ViewerEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::with_debounce(DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(debounce: Duration) -> Self {
        Self {
            debounce,
            pending: None,
            ready: VecDeque::new(),
        }
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Queues an event observed at `now`.
    ///
    /// A query change replaces any pending one. Cursor moves and theme
    /// toggles apply the pending query first; a clear discards it.
    pub fn push(&mut self, event: ViewerEvent, now: Instant) {
        tracing::trace!(?event, "Queueing viewer event");
        match event {
            ViewerEvent::QueryChanged(query) => self.pending = Some((query, now)),
            ViewerEvent::Clear => {
                self.pending = None;
                self.ready.push_back(ViewerEvent::Clear);
            }
            event @ (ViewerEvent::Advance(_) | ViewerEvent::ToggleTheme) => {
                self.promote_pending();
                self.ready.push_back(event);
            }
        }
    }

    /// Drains the events that are ready at `now`, in order.
    pub fn poll(&mut self, now: Instant) -> Vec<ViewerEvent> {
        if let Some(deadline) = self.next_deadline()
            && now >= deadline
        {
            self.promote_pending();
        }
        self.ready.drain(..).collect()
    }

    /// Drains every queued event, applying a pending query immediately.
    pub fn flush(&mut self) -> Vec<ViewerEvent> {
        self.promote_pending();
        self.ready.drain(..).collect()
    }

    /// When the pending query becomes due, if there is one.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at + self.debounce)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_none() && self.ready.is_empty()
    }

    fn promote_pending(&mut self) {
        if let Some((query, _)) = self.pending.take() {
            self.ready.push_back(ViewerEvent::QueryChanged(query));
        }
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Direction;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn query(s: &str) -> ViewerEvent {
        ViewerEvent::QueryChanged(s.to_string())
    }

    #[test]
    fn test_burst_is_coalesced_into_latest_query() {
        let mut queue = EventQueue::new();
        let t0 = Instant::now();
        queue.push(query("r"), t0);
        queue.push(query("ru"), t0 + ms(60));
        queue.push(query("rus"), t0 + ms(120));

        assert!(queue.poll(t0 + ms(250)).is_empty());
        assert_eq!(queue.poll(t0 + ms(300)), vec![query("rus")]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_deadline_tracks_last_keystroke() {
        let mut queue = EventQueue::with_debounce(ms(100));
        let t0 = Instant::now();
        assert_eq!(queue.next_deadline(), None);
        queue.push(query("a"), t0);
        queue.push(query("ab"), t0 + ms(40));
        assert_eq!(queue.next_deadline(), Some(t0 + ms(140)));
    }

    #[test]
    fn test_advance_applies_pending_query_first() {
        let mut queue = EventQueue::new();
        let t0 = Instant::now();
        queue.push(query("term"), t0);
        queue.push(ViewerEvent::Advance(Direction::Next), t0 + ms(10));

        assert_eq!(
            queue.poll(t0 + ms(10)),
            vec![query("term"), ViewerEvent::Advance(Direction::Next)]
        );
    }

    #[test]
    fn test_toggle_theme_is_immediate() {
        let mut queue = EventQueue::new();
        let t0 = Instant::now();
        queue.push(ViewerEvent::ToggleTheme, t0);
        assert_eq!(queue.poll(t0), vec![ViewerEvent::ToggleTheme]);
    }

    #[test]
    fn test_clear_discards_pending_query() {
        let mut queue = EventQueue::new();
        let t0 = Instant::now();
        queue.push(query("stale"), t0);
        queue.push(ViewerEvent::Clear, t0 + ms(5));

        assert_eq!(queue.poll(t0 + ms(500)), vec![ViewerEvent::Clear]);
    }

    #[test]
    fn test_flush_forces_pending_query() {
        let mut queue = EventQueue::new();
        let t0 = Instant::now();
        queue.push(ViewerEvent::Clear, t0);
        queue.push(query("now"), t0 + ms(1));

        assert_eq!(queue.flush(), vec![ViewerEvent::Clear, query("now")]);
        assert!(queue.is_empty());
    }
}
