use crate::crawler::render::ReadySignal;
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Network quiescence bookkeeping for the ready wait
///
/// Fed with request start/finish events, it reports the page ready once no
/// more than `max_inflight` requests have been outstanding for the whole idle
/// window. Events from separate streams may arrive out of order, so a finish
/// seen before its start cancels that start instead of underflowing.
#[derive(Debug, Clone)]
pub struct NetworkIdle {
    max_inflight: usize,
    idle_window: Duration,
    inflight: HashSet<String>,
    finished_early: HashSet<String>,
    quiet_since: Option<Instant>,
}

impl NetworkIdle {
    pub fn new(ready: &ReadySignal, now: Instant) -> Self {
        Self {
            max_inflight: ready.max_inflight,
            idle_window: ready.idle_window,
            inflight: HashSet::new(),
            finished_early: HashSet::new(),
            quiet_since: Some(now),
        }
    }

    pub fn request_started(&mut self, request_id: &str, now: Instant) {
        if self.finished_early.remove(request_id) {
            return;
        }
        self.inflight.insert(request_id.to_string());
        self.refresh(now);
    }

    pub fn request_finished(&mut self, request_id: &str, now: Instant) {
        if !self.inflight.remove(request_id) {
            self.finished_early.insert(request_id.to_string());
        }
        self.refresh(now);
    }

    pub fn inflight(&self) -> usize {
        self.inflight.len()
    }

    /// True once the network has been quiet for the full idle window
    pub fn is_idle(&self, now: Instant) -> bool {
        self.quiet_since
            .is_some_and(|since| now.saturating_duration_since(since) >= self.idle_window)
    }

    /// Time left until the page becomes idle if nothing else happens
    ///
    /// `None` while too many requests are in flight.
    pub fn time_until_idle(&self, now: Instant) -> Option<Duration> {
        self.quiet_since
            .map(|since| self.idle_window.saturating_sub(now.saturating_duration_since(since)))
    }

    fn refresh(&mut self, now: Instant) {
        let quiet = self.inflight.len() <= self.max_inflight;
        match (quiet, self.quiet_since) {
            (true, None) => self.quiet_since = Some(now),
            (false, Some(_)) => self.quiet_since = None,
            _ => {}
        }
    }
}
