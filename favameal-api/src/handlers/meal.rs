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
use favameal_service::{
    Toggled,
    meals::{self, NewMeal, Rated},
};
use tracing::instrument;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::models::*;

use super::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/meals", post(create_meal).get(list_meals))
        .route("/meals/{id}", get(get_meal).delete(delete_meal))
        .route("/meals/{id}/rate", post(rate_meal).put(rate_meal))
        .route("/meals/{id}/star", post(star_meal).delete(star_meal))
}

#[utoipa::path(
    post,
    path = "/meals",
    request_body = CreateMealRequest,
    responses(
        (status = 201, description = "Meal created", body = Meal),
        (status = 400, description = "Invalid payload or unknown restaurant", body = ApiErrorResponse),
        (status = 401, description = "Unauthorized", body = ApiErrorResponse),
    ),
    security(
        ("bearer" = []),
    ),
    tag = "meals"
)]
#[instrument(skip(state))]
pub async fn create_meal(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    payload: Result<Json<CreateMealRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Meal>), ApiError> {
    let Json(payload) = payload?;
    let new_meal = NewMeal {
        name: payload.name,
        restaurant_id: payload.restaurant,
    };
    new_meal.validate()?;

    let created = state
        .run(move |conn| meals::create(conn, new_meal, user_id))
        .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(
    get,
    path = "/meals",
    responses(
        (status = 200, description = "All meals, enriched for the current user", body = [Meal]),
        (status = 401, description = "Unauthorized", body = ApiErrorResponse),
    ),
    security(
        ("bearer" = []),
    ),
    tag = "meals"
)]
#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<Meal>>, ApiError> {
    let results = state.run(move |conn| meals::list(conn, user_id)).await?;

    Ok(Json(results.into_iter().map(Meal::from).collect()))
}

#[utoipa::path(
    get,
    path = "/meals/{id}",
    responses(
        (status = 200, description = "Meal details", body = Meal),
        (status = 401, description = "Unauthorized", body = ApiErrorResponse),
        (status = 404, description = "Meal not found", body = ApiErrorResponse),
    ),
    params(
        ("id" = Uuid, Path, description = "Meal ID")
    ),
    security(
        ("bearer" = []),
    ),
    tag = "meals"
)]
#[instrument(skip(state))]
pub async fn get_meal(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Meal>, ApiError> {
    let Path(id) = id?;
    let meal = state.run(move |conn| meals::get(conn, id, user_id)).await?;

    Ok(Json(meal.into()))
}

#[utoipa::path(
    delete,
    path = "/meals/{id}",
    responses(
        (status = 204, description = "Meal deleted"),
        (status = 401, description = "Unauthorized", body = ApiErrorResponse),
        (status = 404, description = "Meal not found", body = ApiErrorResponse),
    ),
    params(
        ("id" = Uuid, Path, description = "Meal ID")
    ),
    security(
        ("bearer" = []),
    ),
    tag = "meals"
)]
#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    _user: CurrentUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.run(move |conn| meals::delete(conn, id)).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    method(post, put),
    path = "/meals/{id}/rate",
    request_body = RateMealRequest,
    responses(
        (status = 201, description = "First rating recorded", body = RatingResponse),
        (status = 204, description = "Existing rating updated"),
        (status = 400, description = "Invalid payload", body = ApiErrorResponse),
        (status = 401, description = "Unauthorized", body = ApiErrorResponse),
        (status = 404, description = "Meal not found", body = ApiErrorResponse),
    ),
    params(
        ("id" = Uuid, Path, description = "Meal ID")
    ),
    security(
        ("bearer" = []),
    ),
    tag = "meals"
)]
#[instrument(skip(state))]
pub async fn rate_meal(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<RateMealRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let rated = state
        .run(move |conn| meals::rate(conn, id, user_id, payload.rating))
        .await?;

    Ok(match rated {
        Rated::Created(rating) => (
            StatusCode::CREATED,
            Json(RatingResponse {
                rating: rating.rating,
            }),
        )
            .into_response(),
        Rated::Updated(_) => StatusCode::NO_CONTENT.into_response(),
    })
}

#[utoipa::path(
    method(post, delete),
    path = "/meals/{id}/star",
    responses(
        (status = 201, description = "Meal starred", body = FavoriteResponse),
        (status = 204, description = "Meal unstarred"),
        (status = 401, description = "Unauthorized", body = ApiErrorResponse),
        (status = 404, description = "Meal not found", body = ApiErrorResponse),
    ),
    params(
        ("id" = Uuid, Path, description = "Meal ID")
    ),
    security(
        ("bearer" = []),
    ),
    tag = "meals"
)]
#[instrument(skip(state))]
pub async fn star_meal(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(id) = id?;
    let toggled = state
        .run(move |conn| meals::toggle_favorite(conn, id, user_id))
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
