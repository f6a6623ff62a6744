pub mod meal;
pub mod restaurant;

pub use meal::router as meal_router;
pub use restaurant::router as restaurant_router;

use axum::{Json, Router, routing::get};
use diesel::PgConnection;
use favameal_service::{DbPool, ServiceError};
use jsonwebtoken::DecodingKey;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

use crate::error::ApiError;
use crate::models::HealthResponse;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub decoding_key: DecodingKey,
}

impl AppState {
    pub fn new(pool: DbPool, secret_key: &str) -> Self {
        Self {
            pool,
            decoding_key: DecodingKey::from_secret(secret_key.as_bytes()),
        }
    }

    /// Runs blocking diesel work on a pooled connection.
    pub async fn run<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut PgConnection) -> Result<T, ServiceError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            f(&mut *conn).map_err(ApiError::from)
        })
        .await
        .map_err(|e| ApiError::InternalError(format!("blocking task failed: {e}")))?
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(restaurant_router())
        .merge(meal_router())
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
    ),
    tag = "health"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        restaurant::create_restaurant,
        restaurant::list_restaurants,
        restaurant::get_restaurant,
        restaurant::delete_restaurant,
        restaurant::star_restaurant,
        meal::create_meal,
        meal::list_meals,
        meal::get_meal,
        meal::delete_meal,
        meal::rate_meal,
        meal::star_meal,
    ),
    components(
        schemas(
            crate::models::CreateRestaurantRequest,
            crate::models::Restaurant,
            crate::models::CreateMealRequest,
            crate::models::Meal,
            crate::models::RateMealRequest,
            crate::models::RatingResponse,
            crate::models::FavoriteResponse,
            crate::models::HealthResponse,
            crate::models::ApiErrorResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "restaurants", description = "Restaurant endpoints"),
        (name = "meals", description = "Meal endpoints"),
        (name = "health", description = "Liveness probe")
    ),
    info(
        title = "Favameal API",
        description = "Meals and restaurants with per-user ratings and favorites",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            use utoipa::openapi::security::*;
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use axum::response::Response;
    use diesel::r2d2::{ConnectionManager, Pool};
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::auth::tests::{SECRET, issue_token};

    // 연결하지 않는 풀: 데이터베이스에 닿기 전에 끝나는 요청만 검증한다
    pub fn offline_app() -> Router {
        let pool = Pool::builder()
            .connection_timeout(Duration::from_millis(100))
            .build_unchecked(ConnectionManager::new("postgres://127.0.0.1:1/offline"));
        app(AppState {
            pool,
            decoding_key: DecodingKey::from_secret(SECRET),
        })
    }

    pub fn bearer() -> String {
        format!("Bearer {}", issue_token(&Uuid::new_v4().to_string(), 3600))
    }

    pub async fn send(
        app: Router,
        method: Method,
        uri: &str,
        auth: Option<&str>,
        body: Option<&str>,
    ) -> Response {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            request = request.header(header::AUTHORIZATION, auth);
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        };
        app.oneshot(request.unwrap()).await.unwrap()
    }

    pub async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = send(offline_app(), Method::GET, "/health", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_openapi_document_lists_routes() {
        let response = send(offline_app(), Method::GET, "/api-docs/openapi.json", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let doc = json_body(response).await;
        assert!(doc["paths"]["/meals/{id}/rate"].is_object());
        assert!(doc["paths"]["/restaurants/{id}/star"].is_object());
        assert!(doc["components"]["securitySchemes"]["bearer"].is_object());
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        for uri in ["/meals", "/restaurants"] {
            let response = send(offline_app(), Method::GET, uri, None, None).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(json_body(response).await["reason"], "Authentication failed");
        }
    }

    #[tokio::test]
    async fn test_invalid_token_is_unauthorized() {
        let response = send(
            offline_app(),
            Method::GET,
            "/meals",
            Some("Bearer not-a-jwt"),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["reason"], "Invalid token");
    }
}
