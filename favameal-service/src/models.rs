use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::{favorite_meals, favorite_restaurants, meal_ratings, meals, restaurants};

#[derive(Queryable, Selectable, Identifiable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = restaurants)]
pub struct Restaurant {
    pub id: Uuid,
    pub name: String,
    pub address: String,
}

#[derive(Queryable, Selectable, Identifiable, Associations, Insertable, Debug, Clone, PartialEq)]
#[diesel(belongs_to(Restaurant))]
#[diesel(table_name = meals)]
pub struct Meal {
    pub id: Uuid,
    pub name: String,
    pub restaurant_id: Uuid,
}

#[derive(Queryable, Selectable, Identifiable, Associations, Insertable, Debug, Clone, PartialEq)]
#[diesel(belongs_to(Meal))]
#[diesel(table_name = meal_ratings)]
pub struct MealRating {
    pub id: Uuid,
    pub meal_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
}

#[derive(Queryable, Selectable, Identifiable, Associations, Insertable, Debug, Clone, PartialEq)]
#[diesel(belongs_to(Meal))]
#[diesel(table_name = favorite_meals)]
pub struct FavoriteMeal {
    pub id: Uuid,
    pub meal_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Queryable, Selectable, Identifiable, Associations, Insertable, Debug, Clone, PartialEq)]
#[diesel(belongs_to(Restaurant))]
#[diesel(table_name = favorite_restaurants)]
pub struct FavoriteRestaurant {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub user_id: Uuid,
}
