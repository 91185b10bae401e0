// src/handlers/events.rs

use std::time::Duration;

use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::{stream, Stream};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::{
        error::{ApiError, AppError},
        events::{AppEvent, Topic},
    },
    config::AppState,
    middleware::i18n::Locale,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventsQuery {
    /// Lista separada por vírgula (banks,accounts,...). Vazio assina tudo.
    pub topics: Option<String>,
}

// GET /api/events
#[utoipa::path(
    get,
    path = "/api/events",
    tag = "Events",
    params(EventsQuery),
    responses(
        (status = 200, description = "Fluxo SSE de eventos", body = AppEvent, content_type = "text/event-stream"),
        (status = 400, description = "Tópico desconhecido")
    ),
    security(("api_jwt" = []))
)]
pub async fn stream_events(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<EventsQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ApiError> {
    let topics = parse_topics(query.topics.as_deref())
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let subscription = app_state.event_bus.subscribe(&topics);
    tracing::debug!("🔌 Novo assinante SSE ({} tópicos)", topics.len());

    // Quando o cliente desconecta o stream é solto junto com a assinatura
    let events = stream::unfold(subscription, |mut subscription| async move {
        let event = subscription.recv().await?;
        let sse = Event::default().event(event.topic.as_str()).json_data(&event);
        Some((sse, subscription))
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::new().interval(Duration::from_secs(15))))
}

fn parse_topics(raw: Option<&str>) -> Result<Vec<Topic>, AppError> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| Topic::parse(t).ok_or(AppError::InvalidInput("invalid_topic")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_topics() {
        let topics = parse_topics(Some("banks, accounts,,ledger")).unwrap();

        assert_eq!(topics, vec![Topic::Banks, Topic::Accounts, Topic::Ledger]);
    }

    #[test]
    fn missing_topics_means_everything() {
        assert!(parse_topics(None).unwrap().is_empty());
    }

    #[test]
    fn unknown_topic_is_rejected() {
        assert!(matches!(
            parse_topics(Some("banks,invoices")),
            Err(AppError::InvalidInput("invalid_topic"))
        ));
    }
}
