//! HTTP frontend for symbolicating reported exceptions.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use stackmap::{Exception, MapSet};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Symbolicates an exception posted as JSON.
///
/// Responds with the exception rendered as text, or 400 with the error
/// message if the body cannot be parsed or a frame cannot be resolved.
async fn exception(State(maps): State<Arc<MapSet>>, body: Bytes) -> Response {
    match Exception::from_json(&body).and_then(|exc| exc.symbolicate(&maps)) {
        Ok(symbolicated) => {
            info!(
                name = %symbolicated.name,
                frames = symbolicated.trace.len(),
                "symbolicated exception"
            );
            (StatusCode::OK, symbolicated.to_string()).into_response()
        }
        Err(err) => {
            warn!(error = %err, "failed to symbolicate exception");
            (StatusCode::BAD_REQUEST, err.to_string()).into_response()
        }
    }
}

/// Build the axum router
pub fn build_router(maps: Arc<MapSet>) -> Router {
    Router::new()
        .route("/exception", post(exception))
        .layer(TraceLayer::new_for_http())
        .with_state(maps)
}

/// Run the server until it is shut down.
pub async fn run_server(maps: MapSet, listen: &str) -> anyhow::Result<()> {
    let router = build_router(Arc::new(maps));

    let listener = TcpListener::bind(listen).await?;
    info!(addr = %listen, "symbolication server listening");

    axum::serve(listener, router).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use stackmap::SourceMap;
    use tower::ServiceExt;

    fn router() -> Router {
        let sm = SourceMap::from_slice(
            br#"{
                "version": 3,
                "sources": ["app.ts"],
                "names": ["render"],
                "mappings": "AAAAA;;AACA"
            }"#,
        )
        .unwrap();
        let mut maps = MapSet::new();
        maps.insert_map_file("dist/app.js.map", sm);
        build_router(Arc::new(maps))
    }

    async fn post_exception(body: &'static str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri("/exception")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_symbolicates_exception() {
        let (status, body) = post_exception(
            r#"{"name": "Error", "message": "boom", "trace": [
                {"file": "http://localhost/dist/app.js", "methodName": "a",
                 "arguments": [], "lineNumber": 1, "column": 10},
                {"file": "native", "methodName": "run",
                 "arguments": [], "lineNumber": 3, "column": 1}
            ]}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            "Error: boom\n    at render (app.ts:1:0)\n    at run (native:3:1)"
        );
    }

    #[tokio::test]
    async fn test_unresolvable_frame_is_bad_request() {
        let (status, body) = post_exception(
            r#"{"name": "Error", "message": "boom", "trace": [
                {"file": "dist/app.js", "methodName": "a",
                 "arguments": [], "lineNumber": 2, "column": 0}
            ]}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            "cannot resolve frame dist/app.js:2:0: could not find a mapping for column 0 in line 2"
        );
    }

    #[tokio::test]
    async fn test_invalid_body_is_bad_request() {
        let (status, body) = post_exception(r#"{"name": "Error"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.starts_with("bad json"));
    }
}
