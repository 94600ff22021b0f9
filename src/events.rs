//! State-change notifications and the observer registry.
//!
//! Observers are passive: they receive every event in publish order and
//! never get a handle back into the engine. Subscriptions outlive rounds;
//! nothing is re-registered on reset.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use crate::round::Judgment;
use crate::{Card, Seat};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEvent {
    RoundStarted,
    CardDrawn { seat: Seat, card: Card, face_up: bool },
    PlayerTotalChanged(u8),
    /// Visible dealer total. Fires again with the hole card folded in on reveal.
    DealerTotalChanged(u8),
    AceCorrected { seat: Seat, aces: usize, total: u8 },
    UpCardRevealed,
    HoleCardRevealed,
    RoundJudged(Judgment),
    RoundReset,
}

pub trait RoundObserver {
    fn on_event(&mut self, event: &RoundEvent);
}

impl<F> RoundObserver for F
where
    F: FnMut(&RoundEvent),
{
    fn on_event(&mut self, event: &RoundEvent) {
        self(event)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub struct EventBus {
    observers: Vec<(SubscriptionId, Box<dyn RoundObserver>)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Box<dyn RoundObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn publish(&mut self, event: &RoundEvent) {
        log::trace!("publish {event:?}");
        for (_, observer) in self.observers.iter_mut() {
            observer.on_event(event);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("observers", &self.observers.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

/// Observer that records every event into a shared buffer.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<RoundEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RoundEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(_) => Vec::new(),
        }
    }

    /// Drains the buffer.
    pub fn take(&self) -> Vec<RoundEvent> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(_) => Vec::new(),
        }
    }

    pub fn judgments(&self) -> Vec<Judgment> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                RoundEvent::RoundJudged(judgment) => Some(judgment),
                _ => None,
            })
            .collect()
    }
}

impl RoundObserver for EventLog {
    fn on_event(&mut self, event: &RoundEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_reaches_every_subscriber() {
        let mut bus = EventBus::new();
        let first = EventLog::new();
        let second = EventLog::new();
        bus.subscribe(Box::new(first.clone()));
        bus.subscribe(Box::new(second.clone()));

        bus.publish(&RoundEvent::RoundStarted);
        bus.publish(&RoundEvent::PlayerTotalChanged(12));

        let expected = vec![RoundEvent::RoundStarted, RoundEvent::PlayerTotalChanged(12)];
        assert_eq!(first.events(), expected);
        assert_eq!(second.events(), expected);
    }

    #[test]
    fn test_unsubscribe() {
        let mut bus = EventBus::new();
        let log = EventLog::new();
        let id = bus.subscribe(Box::new(log.clone()));
        bus.publish(&RoundEvent::RoundStarted);

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert!(bus.is_empty());

        bus.publish(&RoundEvent::RoundReset);
        assert_eq!(log.events(), vec![RoundEvent::RoundStarted]);
    }

    #[test]
    fn test_subscription_ids_are_unique() {
        let mut bus = EventBus::new();
        let a = bus.subscribe(Box::new(|_: &RoundEvent| {}));
        let b = bus.subscribe(Box::new(|_: &RoundEvent| {}));
        assert_ne!(a, b);
        assert_eq!(bus.len(), 2);
    }

    #[test]
    fn test_closure_observer() {
        let mut bus = EventBus::new();
        let seen = Arc::new(Mutex::new(0usize));
        let counter = seen.clone();
        bus.subscribe(Box::new(move |_: &RoundEvent| {
            *counter.lock().unwrap() += 1;
        }));

        bus.publish(&RoundEvent::UpCardRevealed);
        bus.publish(&RoundEvent::HoleCardRevealed);
        assert_eq!(*seen.lock().unwrap(), 2);
    }

    #[test]
    fn test_event_log_take_drains() {
        let mut log = EventLog::new();
        log.on_event(&RoundEvent::RoundReset);
        assert_eq!(log.take(), vec![RoundEvent::RoundReset]);
        assert!(log.events().is_empty());
    }
}
