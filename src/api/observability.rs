use axum::{
    extract::{MatchedPath, Query, Request, State},
    http::Uri,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use crate::api::AppState;
use crate::constants::metrics::{HTTP_REQUESTS, HTTP_REQUEST_DURATION};

/// `GET /api/metrics`
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.prometheus_handle.as_ref().map_or_else(
        || "Metrics not enabled or failed to initialize".to_string(),
        metrics_exporter_prometheus::PrometheusHandle::render,
    )
}

fn outcome(status: u16) -> &'static str {
    match status {
        500.. => "error",
        400..=499 => "client_error",
        _ => "success",
    }
}

/// `userId`/`seriesId` from the query string, so watching-state requests
/// can be correlated per pair in the logs. Kept as raw strings: a malformed
/// id is still worth logging.
#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PairQuery {
    user_id: Option<String>,
    series_id: Option<String>,
}

fn pair_from_uri(uri: &Uri) -> PairQuery {
    Query::<PairQuery>::try_from_uri(uri)
        .map(|Query(pair)| pair)
        .unwrap_or_default()
}

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4();

    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string());
    let pair = pair_from_uri(req.uri());

    let span = info_span!(
        "request",
        %request_id,
        method = %method,
        path = %path,
        route = route.clone(),
        user_id = pair.user_id,
        series_id = pair.series_id,
    );

    async move {
        let response = next.run(req).await;
        let status = response.status().as_u16();
        let elapsed = start.elapsed();

        // Unmatched paths collapse into one label.
        let labels = [
            ("method", method),
            ("path", route.unwrap_or_else(|| "unmatched".to_string())),
            ("status", status.to_string()),
        ];
        metrics::counter!(HTTP_REQUESTS, &labels).increment(1);
        metrics::histogram!(HTTP_REQUEST_DURATION, &labels).record(elapsed.as_secs_f64());

        info!(
            event = "http_request_finished",
            duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            status_code = status,
            outcome = outcome(status),
            "Request finished"
        );

        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_status_codes() {
        assert_eq!(outcome(200), "success");
        assert_eq!(outcome(304), "success");
        assert_eq!(outcome(400), "client_error");
        assert_eq!(outcome(503), "error");
    }

    #[test]
    fn extracts_pair_from_query() {
        let uri: Uri = "/api/watching-state/status?userId=3&seriesId=14".parse().unwrap();
        assert_eq!(
            pair_from_uri(&uri),
            PairQuery {
                user_id: Some("3".to_string()),
                series_id: Some("14".to_string()),
            }
        );

        let uri: Uri = "/api/reviews?seriesId=%32&other=x".parse().unwrap();
        assert_eq!(pair_from_uri(&uri).series_id.as_deref(), Some("2"));
        assert_eq!(pair_from_uri(&uri).user_id, None);

        let uri: Uri = "/api/system/health/live".parse().unwrap();
        assert_eq!(pair_from_uri(&uri), PairQuery::default());
    }
}
