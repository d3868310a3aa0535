//! Coordination notifier
//!
//! Observer list with pluggable change detection. Each subscription
//! carries its own equality function and the snapshot it last saw; a
//! listener fires exactly when its comparator reports a difference, and
//! only then.

use std::collections::HashMap;

use tracing::debug;

use crate::state::CoordinationSnapshot;

/// Callback invoked with the changed snapshot
pub type Listener = Box<dyn Fn(&CoordinationSnapshot) + Send + Sync>;

/// Equality function; returns true when the two snapshots are equivalent
/// for this subscriber's purposes
pub type Comparator = Box<dyn Fn(&CoordinationSnapshot, &CoordinationSnapshot) -> bool + Send + Sync>;

struct Subscription {
    listener: Listener,
    comparator: Comparator,
    last_delivered: Option<CoordinationSnapshot>,
}

/// Observer list over coordination snapshots
pub struct Notifier {
    subscriptions: HashMap<String, Subscription>,
}

impl Notifier {
    pub fn new() -> Self {
        Self {
            subscriptions: HashMap::new(),
        }
    }

    /// Register a listener with its comparator. Returns the subscription id.
    pub fn subscribe(&mut self, listener: Listener, comparator: Comparator) -> String {
        let id = crate::utils::generate_uuid();
        self.subscriptions.insert(
            id.clone(),
            Subscription {
                listener,
                comparator,
                last_delivered: None,
            },
        );
        id
    }

    /// Remove a subscription. Returns false for unknown ids.
    pub fn unsubscribe(&mut self, subscription_id: &str) -> bool {
        self.subscriptions.remove(subscription_id).is_some()
    }

    /// Deliver a snapshot to every subscription whose comparator detects a
    /// change since its last delivery. First delivery always fires.
    pub fn publish(&mut self, snapshot: &CoordinationSnapshot) {
        for (id, sub) in self.subscriptions.iter_mut() {
            let changed = match &sub.last_delivered {
                Some(prev) => !(sub.comparator)(prev, snapshot),
                None => true,
            };
            if changed {
                debug!("Notifying subscription {}", id);
                (sub.listener)(snapshot);
                sub.last_delivered = Some(snapshot.clone());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
