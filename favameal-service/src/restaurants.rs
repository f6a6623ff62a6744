use diesel::{insert_into, prelude::*};
use tracing::debug;
use uuid::Uuid;

use crate::error::{require_text, OrNotFound};
use crate::models::{FavoriteRestaurant, Restaurant};
use crate::schema::{favorite_restaurants, restaurants};
use crate::views::RestaurantView;
use crate::{ServiceError, Toggled};

pub const NAME_MAX_LEN: usize = 55;
pub const ADDRESS_MAX_LEN: usize = 255;

#[derive(Debug, Clone)]
pub struct NewRestaurant {
    pub name: String,
    pub address: String,
}

impl NewRestaurant {
    pub fn validate(&self) -> Result<(), ServiceError> {
        require_text("name", &self.name, NAME_MAX_LEN)?;
        require_text("address", &self.address, ADDRESS_MAX_LEN)
    }
}

pub fn create(conn: &mut PgConnection, payload: NewRestaurant) -> Result<RestaurantView, ServiceError> {
    payload.validate()?;

    let restaurant = Restaurant {
        id: Uuid::new_v4(),
        name: payload.name,
        address: payload.address,
    };
    insert_into(restaurants::table)
        .values(&restaurant)
        .execute(conn)?;
    debug!(restaurant_id = %restaurant.id, "restaurant created");

    Ok(RestaurantView {
        restaurant,
        favorite: false,
    })
}

pub(crate) fn find(conn: &mut PgConnection, id: Uuid) -> Result<Restaurant, ServiceError> {
    restaurants::table
        .find(id)
        .select(Restaurant::as_select())
        .first(conn)
        .or_not_found("restaurant")
}

/// Attaches the current user's favorite flag to an already loaded row.
pub(crate) fn enrich(
    conn: &mut PgConnection,
    restaurant: Restaurant,
    user_id: Uuid,
) -> Result<RestaurantView, ServiceError> {
    let favorites = FavoriteRestaurant::belonging_to(&restaurant)
        .filter(favorite_restaurants::user_id.eq(user_id))
        .select(FavoriteRestaurant::as_select())
        .load(conn)?;

    Ok(RestaurantView::new(restaurant, &favorites, user_id))
}

pub fn get(conn: &mut PgConnection, id: Uuid, user_id: Uuid) -> Result<RestaurantView, ServiceError> {
    let restaurant = find(conn, id)?;
    enrich(conn, restaurant, user_id)
}

pub fn list(conn: &mut PgConnection, user_id: Uuid) -> Result<Vec<RestaurantView>, ServiceError> {
    let results = restaurants::table
        .select(Restaurant::as_select())
        .load(conn)?;

    let favorites = FavoriteRestaurant::belonging_to(&results)
        .filter(favorite_restaurants::user_id.eq(user_id))
        .select(FavoriteRestaurant::as_select())
        .load(conn)?
        .grouped_by(&results);

    Ok(results
        .into_iter()
        .zip(favorites)
        .map(|(restaurant, favorites)| RestaurantView::new(restaurant, &favorites, user_id))
        .collect())
}

/// Removes the user's favorite marker if there is one, otherwise adds it.
pub fn toggle_favorite(
    conn: &mut PgConnection,
    id: Uuid,
    user_id: Uuid,
) -> Result<Toggled<FavoriteRestaurant>, ServiceError> {
    conn.transaction::<_, ServiceError, _>(|conn| {
        find(conn, id)?;

        let existing = favorite_restaurants::table
            .filter(favorite_restaurants::restaurant_id.eq(id))
            .filter(favorite_restaurants::user_id.eq(user_id))
            .select(FavoriteRestaurant::as_select())
            .first(conn)
            .optional()?;

        match existing {
            Some(favorite) => {
                diesel::delete(favorite_restaurants::table.find(favorite.id)).execute(conn)?;
                debug!(restaurant_id = %id, %user_id, "restaurant unstarred");
                Ok(Toggled::Removed)
            }
            None => {
                let favorite = FavoriteRestaurant {
                    id: Uuid::new_v4(),
                    restaurant_id: id,
                    user_id,
                };
                insert_into(favorite_restaurants::table)
                    .values(&favorite)
                    .execute(conn)?;
                debug!(restaurant_id = %id, %user_id, "restaurant starred");
                Ok(Toggled::Created(favorite))
            }
        }
    })
}

/// Deletes the restaurant; its meals and favorite markers cascade.
pub fn delete(conn: &mut PgConnection, id: Uuid) -> Result<(), ServiceError> {
    let deleted = diesel::delete(restaurants::table.find(id)).execute(conn)?;
    if deleted == 0 {
        return Err(ServiceError::NotFound("restaurant"));
    }
    debug!(restaurant_id = %id, "restaurant deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::connection;

    fn new_restaurant(name: &str) -> NewRestaurant {
        NewRestaurant {
            name: name.to_string(),
            address: "Test Address".to_string(),
        }
    }

    #[test]
    fn test_validate_restaurant() {
        assert!(new_restaurant("Test Restaurant").validate().is_ok());
        assert!(new_restaurant("").validate().is_err());
        assert!(new_restaurant(&"a".repeat(NAME_MAX_LEN + 1)).validate().is_err());

        let blank_address = NewRestaurant {
            name: "Test Restaurant".to_string(),
            address: " ".to_string(),
        };
        assert!(matches!(
            blank_address.validate(),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    fn test_create_and_get_restaurant() {
        let conn = &mut connection();
        let user_id = Uuid::new_v4();

        let created = create(conn, new_restaurant("Test Restaurant")).unwrap();
        assert!(!created.favorite);

        let fetched = get(conn, created.restaurant.id, user_id).unwrap();
        assert_eq!(fetched.restaurant.name, "Test Restaurant");
        assert_eq!(fetched.restaurant.address, "Test Address");
        assert!(!fetched.favorite);
    }

    #[test]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    fn test_get_missing_restaurant() {
        let conn = &mut connection();
        let result = get(conn, Uuid::new_v4(), Uuid::new_v4());
        assert!(matches!(result, Err(ServiceError::NotFound("restaurant"))));
    }

    #[test]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    fn test_toggle_favorite_pair_restores_state() {
        let conn = &mut connection();
        let user_id = Uuid::new_v4();
        let id = create(conn, new_restaurant("Test Restaurant"))
            .unwrap()
            .restaurant
            .id;

        let starred = toggle_favorite(conn, id, user_id).unwrap();
        assert!(matches!(starred, Toggled::Created(ref f) if f.restaurant_id == id));
        assert!(get(conn, id, user_id).unwrap().favorite);
        assert!(!get(conn, id, Uuid::new_v4()).unwrap().favorite);

        assert_eq!(toggle_favorite(conn, id, user_id).unwrap(), Toggled::Removed);
        assert!(!get(conn, id, user_id).unwrap().favorite);
    }

    #[test]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    fn test_list_restaurants_marks_favorites() {
        let conn = &mut connection();
        let user_id = Uuid::new_v4();
        let first = create(conn, new_restaurant("Test Restaurant 1")).unwrap();
        let second = create(conn, new_restaurant("Test Restaurant 2")).unwrap();
        toggle_favorite(conn, first.restaurant.id, user_id).unwrap();

        let results = list(conn, user_id).unwrap();
        assert!(results
            .iter()
            .any(|r| r.restaurant.id == first.restaurant.id && r.favorite));
        assert!(results
            .iter()
            .any(|r| r.restaurant.id == second.restaurant.id && !r.favorite));
    }

    #[test]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    fn test_delete_restaurant() {
        let conn = &mut connection();
        let id = create(conn, new_restaurant("Test Restaurant"))
            .unwrap()
            .restaurant
            .id;

        delete(conn, id).unwrap();
        assert!(matches!(
            get(conn, id, Uuid::new_v4()),
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(delete(conn, id), Err(ServiceError::NotFound(_))));
    }
}
