// src/common/events.rs

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::RecvError};
use utoipa::ToSchema;
use uuid::Uuid;

/// Tópicos aos quais um assinante pode se registrar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Banks,
    Parties,
    Accounts,
    Settlements,
    Ledger,
    Settings,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Banks => "banks",
            Topic::Parties => "parties",
            Topic::Accounts => "accounts",
            Topic::Settlements => "settlements",
            Topic::Ledger => "ledger",
            Topic::Settings => "settings",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "banks" => Some(Topic::Banks),
            "parties" => Some(Topic::Parties),
            "accounts" => Some(Topic::Accounts),
            "settlements" => Some(Topic::Settlements),
            "ledger" => Some(Topic::Ledger),
            "settings" => Some(Topic::Settings),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EventAction {
    Created,
    Updated,
    Deleted,
    Settled,
    Reversed,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppEvent {
    pub topic: Topic,
    pub action: EventAction,
    pub entity_id: Uuid,
    pub occurred_at: DateTime<Utc>,
}

impl AppEvent {
    pub fn new(topic: Topic, action: EventAction, entity_id: Uuid) -> Self {
        Self {
            topic,
            action,
            entity_id,
            occurred_at: Utc::now(),
        }
    }
}

/// Registro publish/subscribe em processo.
///
/// Os serviços publicam depois que a escrita no banco foi confirmada. Cada
/// assinante recebe, na ordem de publicação, apenas os tópicos que pediu.
/// Soltar a `Subscription` cancela o registro.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publica um evento e devolve quantos assinantes estavam registrados.
    /// Publicar sem assinantes não é erro.
    pub fn publish(&self, event: AppEvent) -> usize {
        tracing::debug!(
            topic = event.topic.as_str(),
            action = ?event.action,
            entity_id = %event.entity_id,
            "📣 Evento publicado"
        );
        self.sender.send(event).unwrap_or(0)
    }

    pub fn emit(&self, topic: Topic, action: EventAction, entity_id: Uuid) -> usize {
        self.publish(AppEvent::new(topic, action, entity_id))
    }

    /// Registra interesse em `topics`. Lista vazia significa todos os tópicos.
    pub fn subscribe(&self, topics: &[Topic]) -> Subscription {
        Subscription {
            topics: topics.iter().copied().collect(),
            receiver: self.sender.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

pub struct Subscription {
    topics: HashSet<Topic>,
    receiver: broadcast::Receiver<AppEvent>,
}

impl Subscription {
    fn accepts(&self, event: &AppEvent) -> bool {
        self.topics.is_empty() || self.topics.contains(&event.topic)
    }

    /// Próximo evento dos tópicos assinados. `None` quando o barramento fecha.
    pub async fn recv(&mut self) -> Option<AppEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.accepts(&event) => return Some(event),
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Assinante atrasado, {} eventos descartados", skipped);
                    continue;
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

/// Loga todos os eventos; roda em background enquanto o servidor estiver de pé.
pub async fn log_events(mut subscription: Subscription) {
    while let Some(event) = subscription.recv().await {
        tracing::debug!(
            topic = event.topic.as_str(),
            action = ?event.action,
            entity_id = %event.entity_id,
            "Evento entregue"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_only_receive_their_topics() {
        let bus = EventBus::new(16);
        let mut banks = bus.subscribe(&[Topic::Banks]);
        let mut everything = bus.subscribe(&[]);

        let account_id = Uuid::new_v4();
        let bank_id = Uuid::new_v4();
        bus.emit(Topic::Accounts, EventAction::Settled, account_id);
        bus.emit(Topic::Banks, EventAction::Updated, bank_id);

        let first = banks.recv().await.unwrap();
        assert_eq!(first.entity_id, bank_id);

        assert_eq!(everything.recv().await.unwrap().entity_id, account_id);
        assert_eq!(everything.recv().await.unwrap().entity_id, bank_id);
    }

    #[tokio::test]
    async fn events_arrive_in_publish_order() {
        let bus = EventBus::new(16);
        let mut sub = bus.subscribe(&[Topic::Ledger]);

        let ids: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
        for id in &ids {
            bus.emit(Topic::Ledger, EventAction::Created, *id);
        }

        for id in &ids {
            assert_eq!(sub.recv().await.unwrap().entity_id, *id);
        }
    }

    #[test]
    fn dropping_a_subscription_unregisters_it() {
        let bus = EventBus::new(4);
        let sub = bus.subscribe(&[Topic::Banks]);
        assert_eq!(bus.subscriber_count(), 1);

        drop(sub);
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.emit(Topic::Banks, EventAction::Created, Uuid::new_v4()), 0);
    }

    #[tokio::test]
    async fn lagging_subscriber_skips_and_keeps_going() {
        let bus = EventBus::new(2);
        let mut sub = bus.subscribe(&[]);

        let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        for id in &ids {
            bus.emit(Topic::Accounts, EventAction::Updated, *id);
        }

        // Capacidade 2: sobram apenas os dois últimos
        assert_eq!(sub.recv().await.unwrap().entity_id, ids[2]);
        assert_eq!(sub.recv().await.unwrap().entity_id, ids[3]);
    }

    #[test]
    fn topics_round_trip_through_their_names() {
        for topic in [
            Topic::Banks,
            Topic::Parties,
            Topic::Accounts,
            Topic::Settlements,
            Topic::Ledger,
            Topic::Settings,
        ] {
            assert_eq!(Topic::parse(topic.as_str()), Some(topic));
        }
        assert_eq!(Topic::parse("nope"), None);
    }
}
