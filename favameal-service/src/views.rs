//! Per-user enrichment of loaded rows.
//!
//! Nothing here touches the database: callers load the rows, these types
//! attach the flags the current user sees.

use uuid::Uuid;

use crate::models::{FavoriteMeal, FavoriteRestaurant, Meal, MealRating, Restaurant};

#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantView {
    pub restaurant: Restaurant,
    pub favorite: bool,
}

impl RestaurantView {
    pub fn new(restaurant: Restaurant, favorites: &[FavoriteRestaurant], user_id: Uuid) -> Self {
        let favorite = favorites
            .iter()
            .any(|f| f.restaurant_id == restaurant.id && f.user_id == user_id);
        Self {
            restaurant,
            favorite,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MealView {
    pub meal: Meal,
    pub restaurant: RestaurantView,
    /// The current user's rating, 0 when they have not rated the meal.
    pub user_rating: i32,
    /// Mean over every user's rating, 0 when the meal is unrated.
    pub avg_rating: f64,
    pub is_favorite: bool,
}

impl MealView {
    /// `ratings` should hold every rating of the meal; `favorites` may be
    /// pre-filtered to the current user.
    pub fn new(
        meal: Meal,
        restaurant: RestaurantView,
        ratings: &[MealRating],
        favorites: &[FavoriteMeal],
        user_id: Uuid,
    ) -> Self {
        let ratings: Vec<&MealRating> = ratings.iter().filter(|r| r.meal_id == meal.id).collect();
        let user_rating = ratings
            .iter()
            .find(|r| r.user_id == user_id)
            .map(|r| r.rating)
            .unwrap_or(0);
        let is_favorite = favorites
            .iter()
            .any(|f| f.meal_id == meal.id && f.user_id == user_id);

        Self {
            avg_rating: average_rating(ratings.iter().map(|r| r.rating)),
            meal,
            restaurant,
            user_rating,
            is_favorite,
        }
    }
}

pub fn average_rating(ratings: impl IntoIterator<Item = i32>) -> f64 {
    let (total, count) = ratings
        .into_iter()
        .fold((0i64, 0u32), |(total, count), r| (total + i64::from(r), count + 1));
    if count == 0 {
        0.0
    } else {
        total as f64 / f64::from(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restaurant() -> Restaurant {
        Restaurant {
            id: Uuid::new_v4(),
            name: "Test Restaurant".to_string(),
            address: "Test Address".to_string(),
        }
    }

    fn meal(restaurant: &Restaurant) -> Meal {
        Meal {
            id: Uuid::new_v4(),
            name: "Test Meal".to_string(),
            restaurant_id: restaurant.id,
        }
    }

    fn rating(meal: &Meal, user_id: Uuid, rating: i32) -> MealRating {
        MealRating {
            id: Uuid::new_v4(),
            meal_id: meal.id,
            user_id,
            rating,
        }
    }

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating([3, 5]), 4.0);
        assert_eq!(average_rating([1, 2]), 1.5);
        assert_eq!(average_rating(std::iter::empty()), 0.0);
    }

    #[test]
    fn test_restaurant_view_favorite_is_per_user() {
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();
        let r = restaurant();
        let favorites = vec![FavoriteRestaurant {
            id: Uuid::new_v4(),
            restaurant_id: r.id,
            user_id: user,
        }];

        assert!(RestaurantView::new(r.clone(), &favorites, user).favorite);
        assert!(!RestaurantView::new(r.clone(), &favorites, other).favorite);
        assert!(!RestaurantView::new(r, &[], user).favorite);
    }

    #[test]
    fn test_meal_view_flags_differ_between_users() {
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();
        let r = restaurant();
        let m = meal(&r);
        let ratings = vec![rating(&m, user, 4), rating(&m, Uuid::new_v4(), 2)];
        let favorites = vec![FavoriteMeal {
            id: Uuid::new_v4(),
            meal_id: m.id,
            user_id: user,
        }];

        let mine = MealView::new(
            m.clone(),
            RestaurantView::new(r.clone(), &[], user),
            &ratings,
            &favorites,
            user,
        );
        assert_eq!(mine.user_rating, 4);
        assert!(mine.is_favorite);
        assert_eq!(mine.avg_rating, 3.0);

        let theirs = MealView::new(
            m,
            RestaurantView::new(r, &[], other),
            &ratings,
            &favorites,
            other,
        );
        assert_eq!(theirs.user_rating, 0);
        assert!(!theirs.is_favorite);
        assert_eq!(theirs.avg_rating, 3.0);
    }

    #[test]
    fn test_meal_view_ignores_rows_of_other_meals() {
        let user = Uuid::new_v4();
        let r = restaurant();
        let m = meal(&r);
        let elsewhere = meal(&r);
        let ratings = vec![rating(&elsewhere, user, 5)];
        let favorites = vec![FavoriteMeal {
            id: Uuid::new_v4(),
            meal_id: elsewhere.id,
            user_id: user,
        }];

        let view = MealView::new(m, RestaurantView::new(r, &[], user), &ratings, &favorites, user);
        assert_eq!(view.user_rating, 0);
        assert_eq!(view.avg_rating, 0.0);
        assert!(!view.is_favorite);
    }
}
