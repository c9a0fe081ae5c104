use crate::registry::PlayerId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

// Bounded channels so a stalled subscriber cannot exhaust memory; events for
// a full channel are dropped and the subscriber pruned.
const EVENT_CHANNEL_BUFFER: usize = 256;

pub type EventSender = mpsc::Sender<GameEvent>;
pub type EventReceiver = mpsc::Receiver<GameEvent>;

pub struct EventSubscription {
    bus: EventBus,
    player: PlayerId,
    subscriber_id: usize,
    pub receiver: EventReceiver,
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(&self.player, self.subscriber_id);
    }
}

/// Per-player broadcast of game events. Subscribers follow a single player's
/// game; other players' events never reach them.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    inner: Arc<EventBusInner>,
}

#[derive(Debug, Default)]
struct EventBusInner {
    subscribers: RwLock<HashMap<PlayerId, Vec<(usize, EventSender)>>>,
    next_id: AtomicUsize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, player: PlayerId) -> EventSubscription {
        let (subscriber_id, receiver) = self.subscribe_raw(player.clone());
        EventSubscription {
            bus: self.clone(),
            player,
            subscriber_id,
            receiver,
        }
    }

    fn subscribe_raw(&self, player: PlayerId) -> (usize, EventReceiver) {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_BUFFER);
        let id = self.inner.next_id.fetch_add(1, Ordering::AcqRel);
        let mut guard = self
            .inner
            .subscribers
            .write()
            .expect("subscriber lock poisoned");
        guard.entry(player.clone()).or_default().push((id, tx));
        drop(guard);

        tracing::info!(
            player = %player,
            subscriber_id = id,
            "subscribed to player game events"
        );

        (id, rx)
    }

    pub fn broadcast(&self, player: &str, event: GameEvent) {
        tracing::debug!(player = %player, event = ?event, "broadcasting game event");

        let subscribers = {
            let guard = self
                .inner
                .subscribers
                .read()
                .expect("subscriber lock poisoned");
            guard.get(player).cloned()
        };

        let Some(list) = subscribers else {
            return;
        };

        let mut stale = Vec::new();
        for (id, sender) in list {
            if let Err(err) = sender.try_send(event.clone()) {
                tracing::warn!(
                    player = %player,
                    subscriber_id = id,
                    error = ?err,
                    "dropping event for unreachable subscriber"
                );
                stale.push(id);
            }
        }
        if !stale.is_empty() {
            self.remove_subscribers(player, &stale);
        }
    }

    pub fn unsubscribe(&self, player: &str, subscriber_id: usize) {
        self.remove_subscribers(player, &[subscriber_id]);
    }

    pub fn subscriber_count(&self) -> usize {
        let guard = self
            .inner
            .subscribers
            .read()
            .expect("subscriber lock poisoned");
        guard.values().map(|list| list.len()).sum()
    }

    fn remove_subscribers(&self, player: &str, ids: &[usize]) {
        let mut guard = self
            .inner
            .subscribers
            .write()
            .expect("subscriber lock poisoned");
        if let Some(list) = guard.get_mut(player) {
            list.retain(|(id, _)| !ids.contains(id));
            if list.is_empty() {
                guard.remove(player);
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    Rolled {
        player: PlayerId,
        die: u8,
        turn_score: u32,
        round: u32,
    },
    Busted {
        player: PlayerId,
        round: u32,
        turn: u32,
    },
    Held {
        player: PlayerId,
        total_score: u32,
        turn: u32,
    },
    GameWon {
        player: PlayerId,
        total_score: u32,
    },
    GameCompleted {
        player: PlayerId,
        total_score: u32,
        round: u32,
        turn: u32,
        games_played: u64,
    },
    GameReset {
        player: PlayerId,
    },
}
