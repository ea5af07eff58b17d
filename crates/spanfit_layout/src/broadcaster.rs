//! Bridges a child's allocated geometry to the ancestor holding its box

use std::sync::Arc;

use slotmap::{new_key_type, SlotMap};
use spanfit_text::MeasurementProvider;

use crate::observation::{reduce, SizeObservation};

new_key_type! {
    /// Handle returned by [`MeasurementBroadcaster::subscribe`]
    pub struct SubscriptionId;
}

/// Callback invoked with each new merged observation
pub type Subscriber = Box<dyn FnMut(&SizeObservation)>;

/// Latest-value-wins channel of [`SizeObservation`]s
///
/// Every publication is merged through [`reduce`]; subscribers only hear
/// about values that differ from the previous one.
pub struct MeasurementBroadcaster {
    provider: Arc<dyn MeasurementProvider>,
    value: Option<SizeObservation>,
    subscribers: SlotMap<SubscriptionId, Subscriber>,
    publications: u64,
}

impl MeasurementBroadcaster {
    pub fn new(provider: Arc<dyn MeasurementProvider>) -> Self {
        Self {
            provider,
            value: None,
            subscribers: SlotMap::with_key(),
            publications: 0,
        }
    }

    /// The current merged observation
    pub fn value(&self) -> Option<&SizeObservation> {
        self.value.as_ref()
    }

    pub fn provider(&self) -> &Arc<dyn MeasurementProvider> {
        &self.provider
    }

    /// Number of observations published so far
    pub fn publications(&self) -> u64 {
        self.publications
    }

    /// Publish an observation, returning whether the merged value changed
    pub fn publish(&mut self, next: SizeObservation) -> bool {
        self.publications += 1;
        let reduced = reduce(self.value.as_ref(), next, self.provider.as_ref());
        if self.value.as_ref() == Some(&reduced) {
            return false;
        }

        tracing::trace!(
            width = reduced.size.width,
            height = reduced.size.height,
            "size observation changed"
        );
        for subscriber in self.subscribers.values_mut() {
            subscriber(&reduced);
        }
        self.value = Some(reduced);
        true
    }

    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&SizeObservation) + 'static,
    {
        self.subscribers.insert(Box::new(subscriber))
    }

    /// Remove a subscriber, returning whether it was registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id).is_some()
    }
}
