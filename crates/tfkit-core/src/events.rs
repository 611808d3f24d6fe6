//! Typed change notifications for curve consumers.
//!
//! Charts, previews, and histograms subscribe to a [`TransferFunction`]
//! and are told what changed. Only the editor mutates the function;
//! subscribers react by re-reading it.
//!
//! [`TransferFunction`]: crate::curve::TransferFunction

use std::fmt;

/// What changed on a transfer function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveEvent {
    /// Color control points were added, removed, or rewritten.
    PointsChanged,
    /// Opacity control points were added, removed, or rewritten.
    OpacityChanged,
    /// The lookup table was rebuilt by `finalize()`.
    Rebuilt,
    /// The interaction layer moved the current range.
    RangeChanged {
        /// New lower bound of the current range.
        min: f64,
        /// New upper bound of the current range.
        max: f64,
    },
    /// The selected control point changed.
    CurrentPointChanged(Option<usize>),
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&CurveEvent) + Send + Sync>;

/// Ordered list of subscriber callbacks.
#[derive(Default)]
pub struct Observers {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, Callback)>,
}

impl Observers {
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&CurveEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber. Returns `false` if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(cb_id, _)| *cb_id != id);
        self.callbacks.len() != before
    }

    /// Deliver `event` to every subscriber in subscription order.
    pub fn emit(&mut self, event: CurveEvent) {
        for (_, callback) in &mut self.callbacks {
            callback(&event);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("subscribers", &self.callbacks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_emit_reaches_all_subscribers() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut observers = Observers::default();
        for _ in 0..3 {
            let hits = Arc::clone(&hits);
            observers.subscribe(move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
            });
        }
        observers.emit(CurveEvent::PointsChanged);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut observers = Observers::default();
        let id = {
            let hits = Arc::clone(&hits);
            observers.subscribe(move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
            })
        };
        assert!(observers.unsubscribe(id));
        assert!(!observers.unsubscribe(id));
        observers.emit(CurveEvent::Rebuilt);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(observers.is_empty());
    }
}
