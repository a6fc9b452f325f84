//! Bookkeeping for uploads that are still reading from disk.
//!
//! Every upload gets a ticket when it starts. A completion is only
//! committed if its ticket is still live, which is what makes
//! cancellation stick even when a read finishes after the user
//! pressed cancel.

use std::collections::HashMap;

/// What a finished upload should replace or extend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadTarget {
    Profile,
    Gallery,
}

/// Handle for one in-flight upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UploadTicket(u64);

#[derive(Debug, Default)]
pub struct UploadQueue {
    next: u64,
    in_flight: HashMap<UploadTicket, UploadTarget>,
}

impl UploadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new upload and return its ticket
    pub fn begin(&mut self, target: UploadTarget) -> UploadTicket {
        let ticket = UploadTicket(self.next);
        self.next += 1;
        self.in_flight.insert(ticket, target);
        ticket
    }

    /// Retire a ticket when its read completes.
    /// Returns the target if the upload should be committed, `None` if it
    /// was cancelled (or already finished).
    pub fn finish(&mut self, ticket: UploadTicket) -> Option<UploadTarget> {
        self.in_flight.remove(&ticket)
    }

    /// Retire every in-flight ticket, returning them so the caller can
    /// abort the underlying tasks.
    pub fn cancel_all(&mut self) -> Vec<UploadTicket> {
        self.in_flight.drain().map(|(ticket, _)| ticket).collect()
    }

    /// Number of uploads still reading
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_returns_target_once() {
        let mut queue = UploadQueue::new();
        let profile = queue.begin(UploadTarget::Profile);
        let gallery = queue.begin(UploadTarget::Gallery);
        assert_eq!(queue.in_flight(), 2);

        // Completion order does not have to match start order
        assert_eq!(queue.finish(gallery), Some(UploadTarget::Gallery));
        assert_eq!(queue.finish(profile), Some(UploadTarget::Profile));
        assert_eq!(queue.finish(profile), None);
        assert_eq!(queue.in_flight(), 0);
    }

    #[test]
    fn test_cancelled_tickets_never_commit() {
        let mut queue = UploadQueue::new();
        let first = queue.begin(UploadTarget::Gallery);
        let second = queue.begin(UploadTarget::Gallery);

        let mut cancelled = queue.cancel_all();
        cancelled.sort_by_key(|ticket| ticket.0);
        assert_eq!(cancelled, vec![first, second]);

        assert_eq!(queue.finish(first), None);
        assert_eq!(queue.finish(second), None);
    }

    #[test]
    fn test_tickets_are_unique() {
        let mut queue = UploadQueue::new();
        let a = queue.begin(UploadTarget::Gallery);
        queue.finish(a);
        let b = queue.begin(UploadTarget::Gallery);
        assert_ne!(a, b);
    }
}
