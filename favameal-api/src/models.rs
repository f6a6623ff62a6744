use favameal_service::views::{MealView, RestaurantView};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateRestaurantRequest {
    /// Name of the restaurant
    pub name: String,
    /// Street address of the restaurant
    pub address: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Restaurant {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    /// Whether the current user has starred this restaurant
    pub favorite: bool,
}

impl From<RestaurantView> for Restaurant {
    fn from(view: RestaurantView) -> Self {
        Self {
            id: view.restaurant.id,
            name: view.restaurant.name,
            address: view.restaurant.address,
            favorite: view.favorite,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateMealRequest {
    /// Name of the meal
    pub name: String,
    /// Restaurant serving the meal
    pub restaurant: Uuid,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Meal {
    pub id: Uuid,
    pub name: String,
    pub restaurant: Restaurant,
    /// The current user's rating, 0 if unrated
    pub user_rating: i32,
    /// Mean of all users' ratings, 0 if unrated
    pub avg_rating: f64,
    /// Whether the current user has starred this meal
    pub is_favorite: bool,
}

impl From<MealView> for Meal {
    fn from(view: MealView) -> Self {
        Self {
            id: view.meal.id,
            name: view.meal.name,
            restaurant: view.restaurant.into(),
            user_rating: view.user_rating,
            avg_rating: view.avg_rating,
            is_favorite: view.is_favorite,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RateMealRequest {
    pub rating: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RatingResponse {
    pub rating: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FavoriteResponse {
    /// Identifier of the favorite marker
    pub id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Why the request was rejected
    pub reason: String,
}
