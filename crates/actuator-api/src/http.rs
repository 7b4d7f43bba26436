use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::{Uri, header},
    response::IntoResponse,
    routing::{get, post},
};
use tracing::debug;

use actuator_prometheus::PrometheusSink;

use crate::{
    error::ApiError,
    receiver::{Receiver, receive},
};

/// HTTP API service builder.
#[derive(Default)]
pub struct WebhookApi {
    receivers: Vec<(String, Receiver)>,
    metrics: Option<PrometheusSink>,
}

impl WebhookApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount `receiver` as `POST <path>`.
    pub fn receiver(mut self, path: impl Into<String>, receiver: Receiver) -> Self {
        self.receivers.push((path.into(), receiver));
        self
    }

    /// Expose `metrics` on `GET /metrics`.
    pub fn with_metrics(mut self, metrics: PrometheusSink) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Build axum router with mounted endpoints.
    ///
    /// Routes:
    /// - POST <path> - one per receiver
    /// - GET /healthz - liveness
    /// - GET /metrics - Prometheus exposition, when metrics are attached
    ///
    /// Anything else answers 404.
    pub fn router(self) -> Router {
        let mut router = Router::new().route("/healthz", get(healthz));

        for (path, receiver) in self.receivers {
            debug!(path = %path, "mounting webhook receiver");
            router = router.merge(
                Router::new()
                    .route(&path, post(receive))
                    .with_state(Arc::new(receiver)),
            );
        }
        if let Some(metrics) = self.metrics {
            router = router.merge(
                Router::new()
                    .route("/metrics", get(metrics_text))
                    .with_state(metrics),
            );
        }
        router.fallback(not_found)
    }
}

/// GET /healthz
async fn healthz() -> &'static str {
    "ok"
}

/// GET /metrics
async fn metrics_text(State(metrics): State<PrometheusSink>) -> Result<impl IntoResponse, ApiError> {
    let body = metrics
        .encode_text()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, metrics.content_type())], body))
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
        response::Response,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use actuator_core::{Dispatcher, Plan, Reaction, ReactionError, ReactionRef, Rule};
    use actuator_model::Alert;

    use super::*;
    use crate::ReceiveResponse;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<String>>,
        fail: bool,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl Reaction for Recorder {
        async fn act_on(&self, alert: &Alert) -> Result<(), ReactionError> {
            if let Some(d) = self.delay {
                tokio::time::sleep(d).await;
            }
            self.seen.lock().unwrap().push(alert.fingerprint.clone());
            if self.fail {
                return Err(ReactionError::Failed("nope".into()));
            }
            Ok(())
        }

        fn name(&self) -> &str {
            "recorder"
        }
    }

    fn receiver_for(reaction: Arc<Recorder>) -> Receiver {
        let plan = Plan::from_rules([Rule::new(
            [("severity", "critical")],
            vec![reaction as ReactionRef],
        )
        .unwrap()]);
        Receiver::new(Dispatcher::new(Arc::new(plan)))
    }

    fn app(receiver: Receiver) -> Router {
        WebhookApi::new().receiver("/hooks/web", receiver).router()
    }

    const PAYLOAD: &str = r#"{
        "version": "4",
        "groupKey": "{}:{severity=\"critical\"}",
        "status": "firing",
        "receiver": "web",
        "groupLabels": {"severity": "critical"},
        "commonLabels": {"severity": "critical"},
        "alerts": [
            {"status": "firing", "labels": {"team": "web"}, "fingerprint": "f1"},
            {"status": "firing", "labels": {"severity": "info"}, "fingerprint": "f2"}
        ]
    }"#;

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/hooks/web")
            .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn text(resp: Response) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn dispatches_matching_alerts() {
        let reaction = Arc::new(Recorder::default());
        let resp = app(receiver_for(reaction.clone()))
            .oneshot(post_json(PAYLOAD))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body: ReceiveResponse = serde_json::from_str(&text(resp).await).unwrap();
        assert_eq!(body, ReceiveResponse { alerts: 2, failures: 0 });
        // Common labels win over the second alert's own "severity".
        assert_eq!(*reaction.seen.lock().unwrap(), ["f1", "f2"]);
    }

    #[tokio::test]
    async fn reaction_failures_still_answer_ok() {
        let reaction = Arc::new(Recorder {
            fail: true,
            ..Default::default()
        });
        let resp = app(receiver_for(reaction)).oneshot(post_json(PAYLOAD)).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body: ReceiveResponse = serde_json::from_str(&text(resp).await).unwrap();
        assert_eq!(body.failures, 2);
    }

    #[tokio::test]
    async fn rejects_wrong_content_type() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/hooks/web")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from(PAYLOAD))
            .unwrap();
        let resp = app(receiver_for(Arc::default())).oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(text(resp).await.contains("Content-Type \"text/plain\""));
    }

    #[tokio::test]
    async fn rejects_undecodable_payload() {
        let resp = app(receiver_for(Arc::default()))
            .oneshot(post_json("{not json"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(text(resp).await.starts_with("Something unexpected happened"));
    }

    #[tokio::test]
    async fn rejects_unsupported_version() {
        let reaction = Arc::new(Recorder::default());
        let body = PAYLOAD.replace(r#""version": "4""#, r#""version": "3""#);
        let resp = app(receiver_for(reaction.clone()))
            .oneshot(post_json(&body))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(text(resp).await.contains("\"3\""));
        assert!(reaction.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn token_is_enforced() {
        let receiver = receiver_for(Arc::default()).with_token(Some("s3cret".into()));
        let app = app(receiver);

        let resp = app.clone().oneshot(post_json(PAYLOAD)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let mut req = post_json(PAYLOAD);
        req.headers_mut()
            .insert(header::AUTHORIZATION, "Bearer wrong".parse().unwrap());
        assert_eq!(app.clone().oneshot(req).await.unwrap().status(), StatusCode::UNAUTHORIZED);

        let mut req = post_json(PAYLOAD);
        req.headers_mut()
            .insert(header::AUTHORIZATION, "Bearer s3cret".parse().unwrap());
        assert_eq!(app.oneshot(req).await.unwrap().status(), StatusCode::OK);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_cancels_dispatch() {
        let reaction = Arc::new(Recorder {
            delay: Some(Duration::from_secs(60)),
            ..Default::default()
        });
        let receiver = receiver_for(reaction.clone()).with_timeout(Some(Duration::from_secs(1)));
        let resp = app(receiver).oneshot(post_json(PAYLOAD)).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body: ReceiveResponse = serde_json::from_str(&text(resp).await).unwrap();
        assert_eq!(body, ReceiveResponse { alerts: 2, failures: 1 });
        assert!(reaction.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_on_webhook_path_is_not_allowed() {
        let req = Request::builder()
            .uri("/hooks/web")
            .body(Body::empty())
            .unwrap();
        let resp = app(receiver_for(Arc::default())).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn healthz_and_unknown_paths() {
        let app = app(receiver_for(Arc::default()));

        let req = Request::builder().uri("/healthz").body(Body::empty()).unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(text(resp).await, "ok");

        let req = Request::builder().uri("/nope").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(text(resp).await, "no handler for /nope");
    }

    #[tokio::test]
    async fn metrics_are_exposed_when_attached() {
        let metrics = PrometheusSink::new().unwrap();
        let plan = Arc::new(Plan::new());
        let receiver = Receiver::new(Dispatcher::new(plan).with_sink(Arc::new(metrics.clone())));
        let app = WebhookApi::new()
            .receiver("/hooks/web", receiver)
            .with_metrics(metrics)
            .router();

        let resp = app.clone().oneshot(post_json(PAYLOAD)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let req = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = text(resp).await;
        assert!(body.contains("actuator_payloads_received_total 1"));
        assert!(body.contains(r#"actuator_alerts_total{outcome="unmatched"} 2"#));
    }

    #[tokio::test]
    async fn metrics_route_absent_without_sink() {
        let req = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
        let resp = app(receiver_for(Arc::default())).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
