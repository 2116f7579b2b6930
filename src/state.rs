//! Per-device state cache and duplicate-notification suppression.

use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, HashSet};
use tokio::sync::broadcast;

use crate::catalog;
use crate::notification::Notification;
use crate::subscription::StateReceiver;
use crate::types::{Param, Zone};

const UPDATE_CHANNEL_CAPACITY: usize = 100;

/// Last-known value of every parameter a session has heard about
///
/// A key is present only after at least one notification for it was ingested;
/// `get` returning `None` means "unknown", never "off" or "zero".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceState {
    values: BTreeMap<(Zone, Param), String>,
}

impl DeviceState {
    /// Cached wire value for (zone, parameter)
    pub fn get(&self, zone: Zone, param: Param) -> Option<&str> {
        self.values.get(&(zone, param)).map(String::as_str)
    }

    /// Number of cached values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing has been cached
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `((zone, param), value)` entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&(Zone, Param), &str)> {
        self.values.iter().map(|(k, v)| (k, v.as_str()))
    }

    fn set(&mut self, zone: Zone, param: Param, value: String) {
        self.values.insert((zone, param), value);
    }
}

/// Last value seen for each duplicate-prone key
#[derive(Debug, Clone)]
pub struct DuplicateTracker {
    prone: HashSet<Param>,
    last: HashMap<(Zone, Param), String>,
}

impl Default for DuplicateTracker {
    fn default() -> Self {
        Self::new(catalog::DUPLICATE_PRONE.iter().copied())
    }
}

impl DuplicateTracker {
    /// Tracker that suppresses repeats of the given parameters
    pub fn new(prone: impl IntoIterator<Item = Param>) -> Self {
        Self {
            prone: prone.into_iter().collect(),
            last: HashMap::new(),
        }
    }

    /// Whether repeats of `param` are suppressed
    pub fn is_duplicate_prone(&self, param: Param) -> bool {
        self.prone.contains(&param)
    }

    /// Last tracked value, or the empty sentinel
    pub fn last(&self, zone: Zone, param: Param) -> &str {
        self.last
            .get(&(zone, param))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Decide whether a notification carries news, recording it if so
    ///
    /// Keys outside the duplicate-prone set always propagate and are not
    /// tracked.
    pub fn should_propagate(&mut self, notification: &Notification) -> bool {
        if !self.is_duplicate_prone(notification.param) {
            return true;
        }
        let key = (notification.zone, notification.param);
        if self.last.get(&key).map(String::as_str) == Some(notification.value.as_str()) {
            return false;
        }
        self.last.insert(key, notification.value.clone());
        true
    }
}

struct CacheInner {
    state: DeviceState,
    tracker: DuplicateTracker,
}

/// Shared state cache of one device session
///
/// Notifications from the Telnet reader and reads from dispatcher calls meet
/// here. Deduplication and the state write happen under one lock, so a
/// tracker check and its update are never split by another ingestion.
pub struct StateCache {
    inner: Mutex<CacheInner>,
    updates: broadcast::Sender<Notification>,
}

impl Default for StateCache {
    fn default() -> Self {
        Self::with_tracker(DuplicateTracker::default())
    }
}

impl StateCache {
    /// Cache with the default duplicate-prone parameter list
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache with a custom duplicate tracker
    pub fn with_tracker(tracker: DuplicateTracker) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            inner: Mutex::new(CacheInner {
                state: DeviceState::default(),
                tracker,
            }),
            updates,
        }
    }

    /// Parse and apply a `(zone, event, parameter)` notification
    ///
    /// Returns the notification if it changed the cache and was propagated.
    pub fn ingest(&self, zone: Zone, event: &str, parameter: &str) -> Option<Notification> {
        let Some(notification) = Notification::parse(zone, event, parameter) else {
            tracing::trace!("Ignoring notification {} {} for {}", event, parameter, zone);
            return None;
        };
        self.apply(notification)
    }

    /// Parse and apply a raw status line
    pub fn ingest_line(&self, line: &str) -> Option<Notification> {
        let Some(notification) = Notification::parse_line(line) else {
            tracing::trace!("Ignoring status line {:?}", line);
            return None;
        };
        self.apply(notification)
    }

    /// Apply an already parsed notification
    pub fn apply(&self, notification: Notification) -> Option<Notification> {
        {
            let mut inner = self.inner.lock();
            if !inner.tracker.should_propagate(&notification) {
                tracing::debug!(
                    "Suppressing duplicate {} {} = {}",
                    notification.zone,
                    notification.param,
                    notification.value
                );
                return None;
            }
            inner.state.set(
                notification.zone,
                notification.param,
                notification.value.clone(),
            );
        }

        // No receivers is fine
        let _ = self.updates.send(notification.clone());
        Some(notification)
    }

    /// Cached value, `None` while unknown
    pub fn get(&self, zone: Zone, param: Param) -> Option<String> {
        self.inner.lock().state.get(zone, param).map(str::to_string)
    }

    /// Copy of the whole device state
    pub fn snapshot(&self) -> DeviceState {
        self.inner.lock().state.clone()
    }

    /// Tracker value for a key, `""` until the key was first seen
    pub fn tracked(&self, zone: Zone, param: Param) -> String {
        self.inner.lock().tracker.last(zone, param).to_string()
    }

    /// Subscribe to changes that pass deduplication
    pub fn subscribe(&self) -> StateReceiver {
        StateReceiver::new(self.updates.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_unknown_is_distinct_from_off() {
        let cache = StateCache::new();
        assert_eq!(cache.get(Zone::Main, Param::Lfc), None);
        cache.ingest(Zone::Main, "PS", "LFC OFF");
        assert_eq!(cache.get(Zone::Main, Param::Lfc).as_deref(), Some("OFF"));
    }

    #[test]
    fn test_duplicate_prone_key_sequence() {
        let cache = StateCache::new();
        assert_eq!(cache.tracked(Zone::Main, Param::DynamicEq), "");

        assert!(cache.ingest(Zone::Main, "PS", "DYNEQ ON").is_some());
        assert_eq!(cache.tracked(Zone::Main, Param::DynamicEq), "ON");

        let mut rx = cache.subscribe();
        assert!(cache.ingest(Zone::Main, "PS", "DYNEQ ON").is_none());
        assert_eq!(cache.get(Zone::Main, Param::DynamicEq).as_deref(), Some("ON"));
        assert!(rx.try_recv().unwrap().is_none());

        assert!(cache.ingest(Zone::Main, "PS", "DYNEQ OFF").is_some());
        assert_eq!(cache.tracked(Zone::Main, Param::DynamicEq), "OFF");
        assert_eq!(cache.get(Zone::Main, Param::DynamicEq).as_deref(), Some("OFF"));
        assert_eq!(
            rx.try_recv().unwrap(),
            Some(Notification::new(Zone::Main, Param::DynamicEq, "OFF"))
        );
    }

    #[test]
    fn test_power_echo_across_channels_is_collapsed() {
        let cache = StateCache::new();
        assert!(cache.ingest_line("PWON").is_some());
        assert!(cache.ingest_line("ZMON").is_none());
        assert!(cache.ingest_line("ZMOFF").is_some());
        assert!(cache.ingest_line("PWSTANDBY").is_none());
    }

    #[test]
    fn test_non_prone_key_always_propagates_and_is_untracked() {
        let cache = StateCache::new();
        assert!(cache.ingest(Zone::Main, "PS", "CNTAMT 03").is_some());
        assert!(cache.ingest(Zone::Main, "PS", "CNTAMT 03").is_some());
        assert_eq!(cache.tracked(Zone::Main, Param::ContainmentAmount), "");
    }

    #[test]
    fn test_tracker_is_per_key() {
        let mut tracker = DuplicateTracker::new([Param::Mute, Param::Power]);
        assert!(tracker.should_propagate(&Notification::new(Zone::Main, Param::Mute, "ON")));
        assert!(tracker.should_propagate(&Notification::new(Zone::Main, Param::Power, "ON")));
        assert!(tracker.should_propagate(&Notification::new(Zone::Zone2, Param::Mute, "ON")));
        assert!(!tracker.should_propagate(&Notification::new(Zone::Main, Param::Mute, "ON")));
        assert_eq!(tracker.last(Zone::Main, Param::Power), "ON");
        assert_eq!(tracker.last(Zone::Zone3, Param::Power), "");
    }

    #[test]
    fn test_unparsed_notification_leaves_state_untouched() {
        let cache = StateCache::new();
        assert!(cache.ingest(Zone::Main, "MV", "50").is_none());
        assert!(cache.snapshot().is_empty());
    }

    #[test]
    fn test_snapshot_iteration() {
        let cache = StateCache::new();
        cache.ingest(Zone::Zone2, "MU", "ON");
        cache.ingest(Zone::Main, "TR", "2 ON");
        let snapshot = cache.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get(Zone::Main, Param::Trigger(2)), Some("ON"));
        assert_eq!(snapshot.iter().count(), 2);
    }

    #[test]
    fn test_concurrent_ingestion() {
        let cache = Arc::new(StateCache::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        let parameter = if i % 2 == 0 { "DYNEQ ON" } else { "DYNEQ OFF" };
                        cache.ingest(Zone::Main, "PS", parameter);
                        let _ = cache.get(Zone::Main, Param::DynamicEq);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let value = cache.get(Zone::Main, Param::DynamicEq).unwrap();
        assert_eq!(cache.tracked(Zone::Main, Param::DynamicEq), value);
    }
}
