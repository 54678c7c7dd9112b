use std::net::SocketAddr;
use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use crate::state::AppState;
use crate::{prompts, sessions, ui};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(ui::router())
        .nest("/api/v1",
              Router::new()
                  .merge(prompts::router())
                  .merge(sessions::router())
                  .route("/health", get(|| async { "ok" }))
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, ?latency, "response");
                        } else {
                            tracing::info!(%status, ?latency, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, host: &str, port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::{FailingCompleter, ScriptedCompleter};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(b) => builder
                .header("content-type", "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        app.clone().oneshot(req).await.unwrap()
    }

    async fn body_json(res: Response) -> Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn new_session(app: &Router) -> String {
        let res = send(app, "POST", "/api/v1/sessions", None).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        body_json(res).await["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_and_index() {
        let app = build_app(AppState::fake(Arc::new(ScriptedCompleter::new(""))));

        let res = send(&app, "GET", "/api/v1/health", None).await;
        assert_eq!(res.status(), StatusCode::OK);

        let res = send(&app, "GET", "/", None).await;
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("<title>NutriGen - AI Nutrition Assistant</title>"));
    }

    #[tokio::test]
    async fn catalog_lists_three_modes_and_four_levels() {
        let app = build_app(AppState::fake(Arc::new(ScriptedCompleter::new(""))));

        let modes = body_json(send(&app, "GET", "/api/v1/modes", None).await).await;
        let modes = modes.as_array().unwrap();
        assert_eq!(modes.len(), 3);
        assert_eq!(modes[0]["mode"], "meal_plan");
        assert_eq!(modes[1]["label"], "Scenario 2: Dynamic Nutritional Insights");
        assert_eq!(modes[2]["button"], "Ask Coach");

        let levels = body_json(send(&app, "GET", "/api/v1/activity-levels", None).await).await;
        assert_eq!(
            levels,
            json!(["Sedentary", "Lightly Active", "Moderately Active", "Very Active"])
        );
    }

    #[tokio::test]
    async fn preview_builds_without_calling_out() {
        let completer = Arc::new(ScriptedCompleter::new("unused"));
        let app = build_app(AppState::fake(completer.clone()));

        let res = send(
            &app,
            "POST",
            "/api/v1/prompts/preview",
            Some(json!({"mode": "nutrition", "fields": {}})),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["item"], "Product with barcode ");
        assert!(completer.calls().is_empty());
    }

    #[tokio::test]
    async fn nutrition_ask_updates_session_log() {
        let app = build_app(AppState::fake(Arc::new(ScriptedCompleter::new("~105 kcal"))));
        let id = new_session(&app).await;
        let uri = format!("/api/v1/sessions/{}/ask", id);

        for item in ["banana", "greek yogurt"] {
            let res = send(
                &app,
                "POST",
                &uri,
                Some(json!({"mode": "nutrition", "fields": {"food_item": item, "barcode": ""}})),
            )
            .await;
            assert_eq!(res.status(), StatusCode::OK);
            let body = body_json(res).await;
            assert_eq!(body["result"], "~105 kcal");
            assert_eq!(body["heading"], "Detailed Nutritional Report:");
            assert_eq!(body["item"], item);
        }

        let session = body_json(send(&app, "GET", &format!("/api/v1/sessions/{}", id), None).await).await;
        let log = session["nutrition_log"].as_array().unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0]["item"], "banana");
        assert_eq!(log[1]["item"], "greek yogurt");
    }

    #[tokio::test]
    async fn meal_plan_ask_has_no_log() {
        let app = build_app(AppState::fake(Arc::new(ScriptedCompleter::new("Day 1..."))));
        let id = new_session(&app).await;

        let res = send(
            &app,
            "POST",
            &format!("/api/v1/sessions/{}/ask", id),
            Some(json!({"mode": "meal_plan", "fields": {"activity": "Very Active"}})),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["heading"], "Your Customized Plan:");
        assert!(body.get("nutrition_log").is_none());
    }

    #[tokio::test]
    async fn failure_surfaces_as_bad_gateway() {
        let app = build_app(AppState::fake(Arc::new(FailingCompleter)));
        let id = new_session(&app).await;

        let res = send(
            &app,
            "POST",
            &format!("/api/v1/sessions/{}/ask", id),
            Some(json!({"mode": "nutrition", "fields": {"food_item": "apple"}})),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

        let session = body_json(send(&app, "GET", &format!("/api/v1/sessions/{}", id), None).await).await;
        assert!(session["nutrition_log"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn ended_session_is_gone() {
        let app = build_app(AppState::fake(Arc::new(ScriptedCompleter::new("ok"))));
        let id = new_session(&app).await;
        let uri = format!("/api/v1/sessions/{}", id);

        assert_eq!(send(&app, "DELETE", &uri, None).await.status(), StatusCode::NO_CONTENT);
        assert_eq!(send(&app, "GET", &uri, None).await.status(), StatusCode::NOT_FOUND);
        assert_eq!(send(&app, "DELETE", &uri, None).await.status(), StatusCode::NOT_FOUND);

        let res = send(
            &app,
            "POST",
            &format!("{}/ask", uri),
            Some(json!({"mode": "coaching", "fields": {"question": "Is rice ok?"}})),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
