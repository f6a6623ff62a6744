use std::collections::HashMap;

use diesel::{insert_into, prelude::*};
use tracing::debug;
use uuid::Uuid;

use crate::error::{require_text, OrNotFound};
use crate::models::{FavoriteMeal, FavoriteRestaurant, Meal, MealRating, Restaurant};
use crate::schema::{favorite_meals, favorite_restaurants, meal_ratings, meals, restaurants};
use crate::views::{MealView, RestaurantView};
use crate::{ServiceError, Toggled};

pub const NAME_MAX_LEN: usize = 55;

#[derive(Debug, Clone)]
pub struct NewMeal {
    pub name: String,
    pub restaurant_id: Uuid,
}

impl NewMeal {
    /// Checks field contents only; the restaurant reference is checked on create.
    pub fn validate(&self) -> Result<(), ServiceError> {
        require_text("name", &self.name, NAME_MAX_LEN)
    }
}

/// Outcome of rating a meal.
#[derive(Debug, Clone, PartialEq)]
pub enum Rated {
    Created(MealRating),
    Updated(MealRating),
}

pub fn create(
    conn: &mut PgConnection,
    payload: NewMeal,
    user_id: Uuid,
) -> Result<MealView, ServiceError> {
    payload.validate()?;

    let restaurant = match crate::restaurants::find(conn, payload.restaurant_id) {
        Err(ServiceError::NotFound(_)) => {
            return Err(ServiceError::Validation(format!(
                "restaurant {} does not exist",
                payload.restaurant_id
            )));
        }
        result => result?,
    };

    let meal = Meal {
        id: Uuid::new_v4(),
        name: payload.name,
        restaurant_id: restaurant.id,
    };
    insert_into(meals::table).values(&meal).execute(conn)?;
    debug!(meal_id = %meal.id, restaurant_id = %restaurant.id, "meal created");

    let restaurant = crate::restaurants::enrich(conn, restaurant, user_id)?;
    Ok(MealView::new(meal, restaurant, &[], &[], user_id))
}

fn find(conn: &mut PgConnection, id: Uuid) -> Result<Meal, ServiceError> {
    meals::table
        .find(id)
        .select(Meal::as_select())
        .first(conn)
        .or_not_found("meal")
}

pub fn get(conn: &mut PgConnection, id: Uuid, user_id: Uuid) -> Result<MealView, ServiceError> {
    let meal = find(conn, id)?;
    let restaurant = crate::restaurants::find(conn, meal.restaurant_id)?;
    let restaurant = crate::restaurants::enrich(conn, restaurant, user_id)?;

    let ratings = MealRating::belonging_to(&meal)
        .select(MealRating::as_select())
        .load(conn)?;
    let favorites = FavoriteMeal::belonging_to(&meal)
        .filter(favorite_meals::user_id.eq(user_id))
        .select(FavoriteMeal::as_select())
        .load(conn)?;

    Ok(MealView::new(meal, restaurant, &ratings, &favorites, user_id))
}

pub fn list(conn: &mut PgConnection, user_id: Uuid) -> Result<Vec<MealView>, ServiceError> {
    let results = meals::table.select(Meal::as_select()).load(conn)?;

    let mut restaurant_ids: Vec<Uuid> = results.iter().map(|m| m.restaurant_id).collect();
    restaurant_ids.sort_unstable();
    restaurant_ids.dedup();

    let restaurant_favorites = favorite_restaurants::table
        .filter(favorite_restaurants::user_id.eq(user_id))
        .filter(favorite_restaurants::restaurant_id.eq_any(restaurant_ids.clone()))
        .select(FavoriteRestaurant::as_select())
        .load(conn)?;
    let owners: HashMap<Uuid, RestaurantView> = restaurants::table
        .filter(restaurants::id.eq_any(restaurant_ids))
        .select(Restaurant::as_select())
        .load(conn)?
        .into_iter()
        .map(|r| (r.id, RestaurantView::new(r, &restaurant_favorites, user_id)))
        .collect();

    let ratings = MealRating::belonging_to(&results)
        .select(MealRating::as_select())
        .load(conn)?
        .grouped_by(&results);
    let favorites = FavoriteMeal::belonging_to(&results)
        .filter(favorite_meals::user_id.eq(user_id))
        .select(FavoriteMeal::as_select())
        .load(conn)?
        .grouped_by(&results);

    results
        .into_iter()
        .zip(ratings)
        .zip(favorites)
        .map(|((meal, ratings), favorites)| {
            let restaurant = owners
                .get(&meal.restaurant_id)
                .cloned()
                .ok_or(ServiceError::NotFound("restaurant"))?;
            Ok(MealView::new(meal, restaurant, &ratings, &favorites, user_id))
        })
        .collect()
}

/// Updates the user's existing rating in place, or records a new one.
pub fn rate(
    conn: &mut PgConnection,
    id: Uuid,
    user_id: Uuid,
    rating: i32,
) -> Result<Rated, ServiceError> {
    conn.transaction::<_, ServiceError, _>(|conn| {
        find(conn, id)?;

        let existing = meal_ratings::table
            .filter(meal_ratings::meal_id.eq(id))
            .filter(meal_ratings::user_id.eq(user_id))
            .select(MealRating::as_select())
            .first(conn)
            .optional()?;

        match existing {
            Some(existing) => {
                diesel::update(meal_ratings::table.find(existing.id))
                    .set(meal_ratings::rating.eq(rating))
                    .execute(conn)?;
                debug!(meal_id = %id, %user_id, rating, "meal rating updated");
                Ok(Rated::Updated(MealRating { rating, ..existing }))
            }
            None => {
                let created = MealRating {
                    id: Uuid::new_v4(),
                    meal_id: id,
                    user_id,
                    rating,
                };
                insert_into(meal_ratings::table)
                    .values(&created)
                    .execute(conn)?;
                debug!(meal_id = %id, %user_id, rating, "meal rated");
                Ok(Rated::Created(created))
            }
        }
    })
}

/// Removes the user's favorite marker if there is one, otherwise adds it.
pub fn toggle_favorite(
    conn: &mut PgConnection,
    id: Uuid,
    user_id: Uuid,
) -> Result<Toggled<FavoriteMeal>, ServiceError> {
    conn.transaction::<_, ServiceError, _>(|conn| {
        find(conn, id)?;

        let existing = favorite_meals::table
            .filter(favorite_meals::meal_id.eq(id))
            .filter(favorite_meals::user_id.eq(user_id))
            .select(FavoriteMeal::as_select())
            .first(conn)
            .optional()?;

        match existing {
            Some(favorite) => {
                diesel::delete(favorite_meals::table.find(favorite.id)).execute(conn)?;
                debug!(meal_id = %id, %user_id, "meal unstarred");
                Ok(Toggled::Removed)
            }
            None => {
                let favorite = FavoriteMeal {
                    id: Uuid::new_v4(),
                    meal_id: id,
                    user_id,
                };
                insert_into(favorite_meals::table)
                    .values(&favorite)
                    .execute(conn)?;
                debug!(meal_id = %id, %user_id, "meal starred");
                Ok(Toggled::Created(favorite))
            }
        }
    })
}

/// Deletes the meal together with its ratings and favorite markers.
pub fn delete(conn: &mut PgConnection, id: Uuid) -> Result<(), ServiceError> {
    let deleted = diesel::delete(meals::table.find(id)).execute(conn)?;
    if deleted == 0 {
        return Err(ServiceError::NotFound("meal"));
    }
    debug!(meal_id = %id, "meal deleted");
    Ok(())
}
