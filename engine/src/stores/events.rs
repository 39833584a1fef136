//! Store change notification
//!
//! Mutations publish `StoreEvent`s over a broadcast channel so a host
//! (UI refresh, persistence sync) can react without the stores knowing
//! who is listening. Publishing with no subscribers is a no-op.

use tokio::sync::broadcast;
use uuid::Uuid;

use trainhub_shared::models::{AppointmentStatus, MissionStatus};

/// A change that happened inside one of the stores
#[derive(Debug, Clone)]
pub enum StoreEvent {
    AppointmentBooked {
        id: Uuid,
        trainer_id: Uuid,
    },
    AppointmentStatusChanged {
        id: Uuid,
        status: AppointmentStatus,
    },
    MissionChanged {
        id: Uuid,
        status: MissionStatus,
    },
    PointsApplied {
        client_id: Uuid,
        total_points: i64,
    },
    RewardClaimed {
        client_id: Uuid,
        reward_id: Uuid,
    },
}

/// Broadcast channel for store change events
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to future store events
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.tx.subscribe()
    }

    /// Publish an event; dropped silently when nobody is subscribed
    pub fn publish(&self, event: StoreEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers_is_noop() {
        let bus = EventBus::default();
        bus.publish(StoreEvent::PointsApplied {
            client_id: Uuid::new_v4(),
            total_points: 100,
        });
    }

    #[test]
    fn test_subscriber_receives_event() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();
        let id = Uuid::new_v4();
        bus.publish(StoreEvent::MissionChanged {
            id,
            status: MissionStatus::Completed,
        });
        match rx.try_recv().unwrap() {
            StoreEvent::MissionChanged { id: got, status } => {
                assert_eq!(got, id);
                assert_eq!(status, MissionStatus::Completed);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
