//! In-process event bus: a `tokio::sync::broadcast` channel generalized
//! from the teacher's websocket diff broadcaster (one message type) into
//! the typed lifecycle events of [`crate::event::Event`].

use tokio::sync::broadcast;

use crate::event::Event;

const CHANNEL_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Publish an event: logs it through `tracing` unconditionally, then
    /// hands it to the broadcast channel. A channel with no subscribers
    /// returns `Err` from `send` — that's expected, not an error here.
    pub fn publish(&self, event: Event) {
        event.log();
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Spawn a task that drives `handler` for every event received.
    /// A handler that panics only takes down its own task — the
    /// broadcast channel is unaffected, so every other subscriber still
    /// sees every event, in the order this bus received them.
    pub fn spawn_subscriber<F>(&self, mut handler: F) -> tokio::task::JoinHandle<()>
    where
        F: FnMut(Event) + Send + 'static,
    {
        let mut rx = self.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => handler(event),
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_in_registration_order() {
        let bus = EventBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(Event::TaskReceived { task_id: "t1".into(), intent: "do thing".into() });

        let e1 = rx1.recv().await.unwrap();
        let e2 = rx2.recv().await.unwrap();
        assert!(matches!(e1, Event::TaskReceived { .. }));
        assert!(matches!(e2, Event::TaskReceived { .. }));
    }

    #[tokio::test]
    async fn a_dropped_subscriber_does_not_affect_others() {
        let bus = EventBus::new();
        {
            let _rx_dropped = bus.subscribe();
        }
        let mut rx = bus.subscribe();
        bus.publish(Event::BootstrapStarted { workspace: "/tmp/ws".into() });
        assert!(rx.recv().await.is_ok());
    }
}
