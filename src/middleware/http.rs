//! HTTP-level middleware (cross-cutting concerns).
//!
//! Applied to the whole app, outside the auth pipeline, so that rejected
//! logins and bearer failures are also traced and carry a request id.
//!
//! - Request-Id generation + propagation (`x-request-id`)
//! - Access logging: one span per request, tagged with its request id
//! - Body size limit and global timeout from [`HttpLimits`]

use axum::Router;
use axum::body::Body;
use axum::error_handling::HandleErrorLayer;
use axum::http::{Request, StatusCode, header::HeaderName};
use tower::timeout::TimeoutLayer;
use tower::{BoxError, ServiceBuilder};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::config::HttpLimits;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn apply(router: Router, limits: &HttpLimits) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    let layers = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(|err: BoxError| async move {
            if err.is::<tower::timeout::error::Elapsed>() {
                tracing::warn!("request timed out");
                StatusCode::REQUEST_TIMEOUT
            } else {
                tracing::error!(error = %err, "unhandled middleware error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }))
        .layer(SetRequestIdLayer::new(
            request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header))
        // Inside the request-id layers so the span can carry the id; outside the
        // limits so timed-out and oversized requests are still logged.
        .layer(TraceLayer::new_for_http().make_span_with(request_span::<Body>))
        .layer(RequestBodyLimitLayer::new(limits.body_limit_bytes))
        .layer(TimeoutLayer::new(limits.request_timeout));

    router.layer(layers)
}

fn request_span<B>(req: &Request<B>) -> Span {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %req.method(),
        path = %req.uri().path(),
        request_id,
    )
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::routing::{get, post};
    use tower::ServiceExt;

    use super::*;

    fn app(limits: HttpLimits) -> Router {
        let router = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_millis(500)).await;
                    "done"
                }),
            )
            .route("/echo", post(|body: String| async move { body }));
        apply(router, &limits)
    }

    #[tokio::test]
    async fn slow_handlers_time_out_with_408() {
        let app = app(HttpLimits {
            request_timeout: Duration::from_millis(20),
            ..HttpLimits::default()
        });

        let response = app
            .oneshot(Request::builder().uri("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[tokio::test]
    async fn oversized_bodies_are_refused() {
        let app = app(HttpLimits {
            body_limit_bytes: 8,
            ..HttpLimits::default()
        });

        let small = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/echo")
                    .body(Body::from("tiny"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(small.status(), StatusCode::OK);

        let large = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/echo")
                    .body(Body::from("far more than eight bytes"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(large.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn request_id_is_generated_or_propagated() {
        let app = app(HttpLimits::default());

        let generated = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/echo")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(generated.headers().get(REQUEST_ID_HEADER).is_some());

        let propagated = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/echo")
                    .header(REQUEST_ID_HEADER, "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(propagated.headers()[REQUEST_ID_HEADER], "req-42");
    }
}
