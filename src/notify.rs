use dashmap::DashMap;
use tokio::sync::broadcast;

use crate::model::{Event, GroupId};

const CHANNEL_CAPACITY: usize = 256;

/// Broadcast hub for committed changes, one channel per lane.
pub struct NotifyHub {
    channels: DashMap<GroupId, broadcast::Sender<Event>>,
}

impl Default for NotifyHub {
    fn default() -> Self {
        Self::new()
    }
}

impl NotifyHub {
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    /// Subscribe to changes of a lane. Creates the channel if needed.
    pub fn subscribe(&self, group: GroupId) -> broadcast::Receiver<Event> {
        let sender = self
            .channels
            .entry(group)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);
        sender.subscribe()
    }

    /// Send a notification. No-op if nobody is listening.
    ///
    /// A channel whose receivers have all been dropped is discarded here, so
    /// lanes nobody watches anymore do not keep one alive.
    pub fn send(&self, group: GroupId, event: &Event) {
        let idle = match self.channels.get(&group) {
            Some(sender) => sender.send(event.clone()).is_err(),
            None => return,
        };
        if idle {
            self.channels
                .remove_if(&group, |_, sender| sender.receiver_count() == 0);
        }
    }

    /// Lanes with an open channel.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}

#[cfg(test)]
mod tests {
    use ulid::Ulid;

    use super::*;

    #[tokio::test]
    async fn subscribe_and_receive() {
        let hub = NotifyHub::new();
        let group = Ulid::new();
        let mut rx = hub.subscribe(group);

        let event = Event::ItemRemoved { id: Ulid::new(), group };
        hub.send(group, &event);

        let received = rx.recv().await.unwrap();
        assert_eq!(received, event);
    }

    #[tokio::test]
    async fn other_lanes_are_not_delivered() {
        let hub = NotifyHub::new();
        let (mine, other) = (Ulid::new(), Ulid::new());
        let mut rx = hub.subscribe(mine);
        let _other_rx = hub.subscribe(other);

        hub.send(other, &Event::ItemRemoved { id: Ulid::new(), group: other });
        assert!(matches!(rx.try_recv(), Err(broadcast::error::TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn send_without_subscribers_is_noop() {
        let hub = NotifyHub::new();
        let group = Ulid::new();
        // No subscriber, should not panic
        hub.send(group, &Event::ItemRemoved { id: Ulid::new(), group });
    }

    #[tokio::test]
    async fn abandoned_channel_is_pruned_on_send() {
        let hub = NotifyHub::new();
        let group = Ulid::new();
        let rx = hub.subscribe(group);
        assert_eq!(hub.channel_count(), 1);
        drop(rx);

        hub.send(group, &Event::ItemRemoved { id: Ulid::new(), group });
        assert_eq!(hub.channel_count(), 0);

        // A later subscriber gets a fresh channel.
        let mut rx = hub.subscribe(group);
        let event = Event::ItemRemoved { id: Ulid::new(), group };
        hub.send(group, &event);
        assert_eq!(rx.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn watched_channel_survives_send() {
        let hub = NotifyHub::new();
        let group = Ulid::new();
        let _rx = hub.subscribe(group);
        hub.send(group, &Event::ItemRemoved { id: Ulid::new(), group });
        assert_eq!(hub.channel_count(), 1);
    }
}
