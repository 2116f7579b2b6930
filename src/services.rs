use parking_lot::Mutex;

use crate::types::{ServiceInfo, ServiceRecord};

/// Thread-safe collection of discovered service announcements
///
/// Mutated from the mDNS listener thread while discovery is running. Readers
/// take a [`snapshot`](ServiceStore::snapshot) and never see the live list.
#[derive(Debug, Default)]
pub struct ServiceStore {
    records: Mutex<Vec<ServiceRecord>>,
}

impl ServiceStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly announced service
    ///
    /// An existing record with the same identity keeps its place; its info is
    /// refreshed when the new announcement carries resolved info.
    pub fn add(&self, name: &str, service_type: &str, info: Option<ServiceInfo>) {
        let mut records = self.records.lock();
        match records.iter_mut().find(|r| r.is(name, service_type)) {
            Some(existing) => {
                if info.is_some() {
                    existing.info = info;
                }
            }
            None => records.push(ServiceRecord::new(name, service_type, info)),
        }
        tracing::debug!("Service {} added for type {}", name, service_type);
    }

    /// Replace a record's info, inserting the record if it is not known yet
    pub fn update(&self, name: &str, service_type: &str, info: Option<ServiceInfo>) {
        let mut records = self.records.lock();
        match records.iter_mut().find(|r| r.is(name, service_type)) {
            Some(existing) => existing.info = info,
            None => records.push(ServiceRecord::new(name, service_type, info)),
        }
        tracing::debug!("Service {} updated for type {}", name, service_type);
    }

    /// Delete the record with the given identity, returning whether one existed
    pub fn remove(&self, name: &str, service_type: &str) -> bool {
        let mut records = self.records.lock();
        let before = records.len();
        records.retain(|r| !r.is(name, service_type));
        let removed = records.len() != before;
        tracing::debug!("Service {} removed for type {}", name, service_type);
        removed
    }

    /// Drop every record before a fresh scan
    pub fn clear(&self) {
        self.records.lock().clear();
    }

    /// Copy of the current records
    pub fn snapshot(&self) -> Vec<ServiceRecord> {
        self.records.lock().clone()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}
