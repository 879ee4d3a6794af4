//! Watch targets: exact percentages reported once per monitoring session.

use std::collections::BTreeMap;

use crate::reading::Percentage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TargetState {
    Pending,
    Fired,
}

/// A set of watch-target percentages.
///
/// Each target notifies at most once per monitoring session: the first time
/// the live percentage equals it, [`Watchlist::check_and_consume`] returns
/// true and the target is consumed until [`Watchlist::rearm`].
#[derive(Debug, Clone, Default)]
pub struct Watchlist {
    targets: BTreeMap<Percentage, TargetState>,
}

impl Watchlist {
    /// Creates an empty watchlist.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a target. Idempotent: re-watching an already-registered
    /// target is a no-op and does not reset its fired flag.
    pub fn watch(&mut self, target: Percentage) {
        self.targets.entry(target).or_insert(TargetState::Pending);
    }

    /// Registers a raw target value, silently ignoring values outside 1..=100.
    pub fn watch_raw(&mut self, value: u8) {
        match Percentage::new(value) {
            Ok(target) => self.watch(target),
            Err(_) => {
                tracing::warn!(value, "ignoring watch target outside [1, 100]");
            }
        }
    }

    /// Registers every target in the iterator.
    pub fn watch_all<I>(&mut self, targets: I)
    where
        I: IntoIterator<Item = Percentage>,
    {
        for target in targets {
            self.watch(target);
        }
    }

    /// Removes every target.
    pub fn clear(&mut self) {
        self.targets.clear();
    }

    /// Resets all fired flags, making every target pending again.
    ///
    /// Called on monitor start so targets fire once per session.
    pub fn rearm(&mut self) {
        for state in self.targets.values_mut() {
            *state = TargetState::Pending;
        }
    }

    /// Returns true exactly once per target per session, the first time the
    /// live percentage equals a pending target.
    pub fn check_and_consume(&mut self, percentage: Percentage) -> bool {
        match self.targets.get_mut(&percentage) {
            Some(state @ TargetState::Pending) => {
                *state = TargetState::Fired;
                true
            }
            _ => false,
        }
    }

    /// Whether the percentage is registered, fired or not.
    #[must_use]
    pub fn is_watched(&self, percentage: Percentage) -> bool {
        self.targets.contains_key(&percentage)
    }

    /// Number of registered targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether no targets are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pct(value: u8) -> Percentage {
        Percentage::new(value).unwrap()
    }

    #[test]
    fn fires_once_per_session() {
        let mut watchlist = Watchlist::new();
        watchlist.watch(pct(50));

        assert!(watchlist.check_and_consume(pct(50)));
        assert!(!watchlist.check_and_consume(pct(50)));

        watchlist.rearm();
        assert!(watchlist.check_and_consume(pct(50)));
    }

    #[test]
    fn watch_is_idempotent_and_keeps_fired_flag() {
        let mut watchlist = Watchlist::new();
        watchlist.watch(pct(50));
        watchlist.watch(pct(50));
        assert_eq!(watchlist.len(), 1);

        assert!(watchlist.check_and_consume(pct(50)));
        // Re-watching after a hit must not re-arm the target.
        watchlist.watch(pct(50));
        assert!(!watchlist.check_and_consume(pct(50)));
    }

    #[test]
    fn unwatched_percentages_never_fire() {
        let mut watchlist = Watchlist::new();
        watchlist.watch(pct(30));
        assert!(!watchlist.check_and_consume(pct(31)));
    }

    #[test]
    fn out_of_range_raw_targets_are_rejected() {
        let mut watchlist = Watchlist::new();
        watchlist.watch_raw(0);
        watchlist.watch_raw(101);
        watchlist.watch_raw(255);
        assert!(watchlist.is_empty());

        watchlist.watch_raw(100);
        assert!(watchlist.is_watched(pct(100)));
    }

    #[test]
    fn clear_removes_all_targets() {
        let mut watchlist = Watchlist::new();
        watchlist.watch_all([pct(10), pct(20), pct(30)]);
        assert_eq!(watchlist.len(), 3);

        watchlist.clear();
        assert!(watchlist.is_empty());
        assert!(!watchlist.check_and_consume(pct(10)));
    }
}
