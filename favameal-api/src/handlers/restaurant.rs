use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use favameal_service::{Toggled, restaurants, restaurants::NewRestaurant};
use tracing::instrument;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::models::*;

use super::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/restaurants", post(create_restaurant).get(list_restaurants))
        .route(
            "/restaurants/{id}",
            get(get_restaurant).delete(delete_restaurant),
        )
        .route(
            "/restaurants/{id}/star",
            post(star_restaurant).delete(star_restaurant),
        )
}

#[utoipa::path(
    post,
    path = "/restaurants",
    request_body = CreateRestaurantRequest,
    responses(
        (status = 201, description = "Restaurant created", body = Restaurant),
        (status = 400, description = "Invalid payload", body = ApiErrorResponse),
        (status = 401, description = "Unauthorized", body = ApiErrorResponse),
    ),
    security(
        ("bearer" = []),
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn create_restaurant(
    State(state): State<AppState>,
    _user: CurrentUser,
    payload: Result<Json<CreateRestaurantRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Restaurant>), ApiError> {
    let Json(payload) = payload?;
    let new_restaurant = NewRestaurant {
        name: payload.name,
        address: payload.address,
    };
    new_restaurant.validate()?;

    let created = state
        .run(move |conn| restaurants::create(conn, new_restaurant))
        .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(
    get,
    path = "/restaurants",
    responses(
        (status = 200, description = "All restaurants", body = [Restaurant]),
        (status = 401, description = "Unauthorized", body = ApiErrorResponse),
    ),
    security(
        ("bearer" = []),
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn list_restaurants(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<Restaurant>>, ApiError> {
    let results = state
        .run(move |conn| restaurants::list(conn, user_id))
        .await?;

    Ok(Json(results.into_iter().map(Restaurant::from).collect()))
}

#[utoipa::path(
    get,
    path = "/restaurants/{id}",
    responses(
        (status = 200, description = "Restaurant details", body = Restaurant),
        (status = 401, description = "Unauthorized", body = ApiErrorResponse),
        (status = 404, description = "Restaurant not found", body = ApiErrorResponse),
    ),
    params(
        ("id" = Uuid, Path, description = "Restaurant ID")
    ),
    security(
        ("bearer" = []),
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn get_restaurant(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Restaurant>, ApiError> {
    let Path(id) = id?;
    let restaurant = state
        .run(move |conn| restaurants::get(conn, id, user_id))
        .await?;

    Ok(Json(restaurant.into()))
}

#[utoipa::path(
    delete,
    path = "/restaurants/{id}",
    responses(
        (status = 204, description = "Restaurant and its meals deleted"),
        (status = 401, description = "Unauthorized", body = ApiErrorResponse),
        (status = 404, description = "Restaurant not found", body = ApiErrorResponse),
    ),
    params(
        ("id" = Uuid, Path, description = "Restaurant ID")
    ),
    security(
        ("bearer" = []),
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn delete_restaurant(
    State(state): State<AppState>,
    _user: CurrentUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.run(move |conn| restaurants::delete(conn, id)).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    method(post, delete),
    path = "/restaurants/{id}/star",
    responses(
        (status = 201, description = "Restaurant starred", body = FavoriteResponse),
        (status = 204, description = "Restaurant unstarred"),
        (status = 401, description = "Unauthorized", body = ApiErrorResponse),
        (status = 404, description = "Restaurant not found", body = ApiErrorResponse),
    ),
    params(
        ("id" = Uuid, Path, description = "Restaurant ID")
    ),
    security(
        ("bearer" = []),
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn star_restaurant(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(id) = id?;
    let toggled = state
        .run(move |conn| restaurants::toggle_favorite(conn, id, user_id))
        .await?;

    Ok(match toggled {
        Toggled::Created(favorite) => (
            StatusCode::CREATED,
            Json(FavoriteResponse { id: favorite.id }),
        )
            .into_response(),
        Toggled::Removed => StatusCode::NO_CONTENT.into_response(),
    })
}
