use actix_web::{HttpResponse, Responder, web};
use futures_util::stream;
use tokio::sync::broadcast::error::RecvError;

use crate::notify::Notifier;

/// Server-sent event stream of admin notifications.
///
/// Each connection gets its own broadcast receiver; a slow consumer that
/// falls behind the channel buffer skips the lagged events and keeps
/// receiving, it is never disconnected for lagging.
#[utoipa::path(
    get,
    path = "/api/events",
    responses(
        (status = 200, description = "text/event-stream of notification events")
    ),
    tag = "Events"
)]
pub async fn event_stream(notifier: web::Data<Notifier>) -> impl Responder {
    let rx = notifier.subscribe();
    tracing::debug!(subscribers = notifier.subscriber_count(), "SSE client connected");

    let body = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let json = match serde_json::to_string(&event) {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to serialize notification event");
                            continue;
                        }
                    };
                    let chunk = web::Bytes::from(format!("data: {json}\n\n"));
                    return Some((Ok::<_, actix_web::Error>(chunk), rx));
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "SSE subscriber lagged, dropping events");
                    continue;
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    HttpResponse::Ok()
        .insert_header(("Content-Type", "text/event-stream"))
        .insert_header(("Cache-Control", "no-cache"))
        .insert_header(("Connection", "keep-alive"))
        .streaming(body)
}
