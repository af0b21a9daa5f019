//! Saved Ingredient MCP Tools
//!
//! Tools for managing the saved ingredient price list that recipe rows can
//! reference by name.

use serde::Serialize;

use crate::db::Database;
use crate::models::{SavedIngredient, SavedIngredientCreate, SavedIngredientUpdate};

/// Response for add_saved_ingredient
#[derive(Debug, Serialize)]
pub struct AddSavedIngredientResponse {
    pub id: i64,
    pub name: String,
    pub unit: String,
    pub price_per_unit: f64,
    pub created_at: String,
}

/// Response for list_saved_ingredients
#[derive(Debug, Serialize)]
pub struct ListSavedIngredientsResponse {
    pub items: Vec<SavedIngredient>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Response for update_saved_ingredient
#[derive(Debug, Serialize)]
pub struct UpdateSavedIngredientResponse {
    pub success: bool,
    pub item: SavedIngredient,
}

/// Response for delete_saved_ingredient
#[derive(Debug, Serialize)]
pub struct DeleteSavedIngredientResponse {
    pub success: bool,
    pub deleted_id: i64,
}

fn check_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Ingredient name cannot be empty".to_string());
    }
    Ok(())
}

fn check_unit(unit: &str) -> Result<(), String> {
    if unit.trim().is_empty() {
        return Err("unit cannot be empty".to_string());
    }
    Ok(())
}

fn check_price(price: f64) -> Result<(), String> {
    if !price.is_finite() || price < 0.0 {
        return Err("price_per_unit must be a finite, non-negative number".to_string());
    }
    Ok(())
}

/// Save a new ingredient price
pub fn add_saved_ingredient(
    db: &Database,
    data: SavedIngredientCreate,
) -> Result<AddSavedIngredientResponse, String> {
    check_name(&data.name)?;
    check_unit(&data.unit)?;
    check_price(data.price_per_unit)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    if SavedIngredient::find_by_name(&conn, &data.name)
        .map_err(|e| format!("Lookup failed: {}", e))?
        .is_some()
    {
        return Err(format!("An ingredient named '{}' is already saved", data.name.trim()));
    }

    let item = SavedIngredient::create(&conn, &data)
        .map_err(|e| format!("Failed to save ingredient: {}", e))?;

    tracing::info!(id = item.id, name = %item.name, "Saved ingredient");

    Ok(AddSavedIngredientResponse {
        id: item.id,
        name: item.name,
        unit: item.unit,
        price_per_unit: item.price_per_unit,
        created_at: item.created_at,
    })
}

/// Get a saved ingredient by id or, failing that, by name
pub fn get_saved_ingredient(
    db: &Database,
    id: Option<i64>,
    name: Option<&str>,
) -> Result<Option<SavedIngredient>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let found = match (id, name) {
        (Some(id), _) => SavedIngredient::get_by_id(&conn, id),
        (None, Some(name)) => SavedIngredient::find_by_name(&conn, name),
        (None, None) => return Err("Provide either id or name".to_string()),
    };

    found.map_err(|e| format!("Failed to get saved ingredient: {}", e))
}

/// List saved ingredients, optionally filtered by name
pub fn list_saved_ingredients(
    db: &Database,
    query: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<ListSavedIngredientsResponse, String> {
    let limit = limit.clamp(1, 200);
    let offset = offset.max(0);
    let query = query.map(str::trim).filter(|q| !q.is_empty());

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let items = SavedIngredient::list(&conn, query, limit, offset)
        .map_err(|e| format!("Failed to list saved ingredients: {}", e))?;
    let total = SavedIngredient::count(&conn)
        .map_err(|e| format!("Failed to count saved ingredients: {}", e))?;

    Ok(ListSavedIngredientsResponse {
        items,
        total,
        limit,
        offset,
    })
}

/// Update a saved ingredient; only the given fields change
pub fn update_saved_ingredient(
    db: &Database,
    id: i64,
    data: SavedIngredientUpdate,
) -> Result<UpdateSavedIngredientResponse, String> {
    if let Some(ref name) = data.name {
        check_name(name)?;
    }
    if let Some(ref unit) = data.unit {
        check_unit(unit)?;
    }
    if let Some(price) = data.price_per_unit {
        check_price(price)?;
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    if let Some(ref name) = data.name {
        let clash = SavedIngredient::find_by_name(&conn, name)
            .map_err(|e| format!("Lookup failed: {}", e))?;
        if clash.is_some_and(|other| other.id != id) {
            return Err(format!("An ingredient named '{}' is already saved", name.trim()));
        }
    }

    let updated = SavedIngredient::update(&conn, id, &data)
        .map_err(|e| format!("Failed to update saved ingredient: {}", e))?;

    match updated {
        Some(item) => Ok(UpdateSavedIngredientResponse { success: true, item }),
        None => Err(format!("Saved ingredient not found with id: {}", id)),
    }
}

/// Delete a saved ingredient
pub fn delete_saved_ingredient(db: &Database, id: i64) -> Result<DeleteSavedIngredientResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = SavedIngredient::delete(&conn, id)
        .map_err(|e| format!("Failed to delete saved ingredient: {}", e))?;

    if !deleted {
        return Err(format!("Saved ingredient not found with id: {}", id));
    }

    Ok(DeleteSavedIngredientResponse {
        success: true,
        deleted_id: id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_and_migrate(dir.path().join("catalog.db")).unwrap();
        (dir, db)
    }

    fn create(name: &str, unit: &str, price: f64) -> SavedIngredientCreate {
        SavedIngredientCreate {
            name: name.to_string(),
            unit: unit.to_string(),
            price_per_unit: price,
            notes: None,
        }
    }

    #[test]
    fn test_add_validates_input() {
        let (_dir, db) = test_db();

        assert!(add_saved_ingredient(&db, create("  ", "kg", 1.0)).is_err());
        assert!(add_saved_ingredient(&db, create("Rice", "", 1.0)).is_err());
        assert!(add_saved_ingredient(&db, create("Rice", "kg", -1.0)).is_err());
        assert!(add_saved_ingredient(&db, create("Rice", "kg", f64::NAN)).is_err());
        assert!(add_saved_ingredient(&db, create("milk", "L", 58.0)).is_err());

        let rice = add_saved_ingredient(&db, create("Rice", "kg", 72.0)).unwrap();
        assert_eq!(rice.name, "Rice");
    }

    #[test]
    fn test_get_by_id_or_name() {
        let (_dir, db) = test_db();

        let butter = get_saved_ingredient(&db, None, Some("BUTTER")).unwrap().unwrap();
        assert_eq!(butter.unit, "gram");

        let same = get_saved_ingredient(&db, Some(butter.id), None).unwrap();
        assert_eq!(same, Some(butter));

        assert!(get_saved_ingredient(&db, None, Some("Saffron")).unwrap().is_none());
        assert!(get_saved_ingredient(&db, None, None).is_err());
    }

    #[test]
    fn test_list_clamps_paging() {
        let (_dir, db) = test_db();

        let response = list_saved_ingredients(&db, Some(" "), 0, -5).unwrap();
        assert_eq!(response.limit, 1);
        assert_eq!(response.offset, 0);
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.total, 4);
    }

    #[test]
    fn test_update_and_delete() {
        let (_dir, db) = test_db();
        let flour = get_saved_ingredient(&db, None, Some("Flour")).unwrap().unwrap();

        let rename_clash = SavedIngredientUpdate {
            name: Some("sugar".to_string()),
            ..Default::default()
        };
        assert!(update_saved_ingredient(&db, flour.id, rename_clash).is_err());

        let reprice = SavedIngredientUpdate {
            price_per_unit: Some(42.5),
            ..Default::default()
        };
        let updated = update_saved_ingredient(&db, flour.id, reprice).unwrap();
        assert_eq!(updated.item.price_per_unit, 42.5);

        assert!(delete_saved_ingredient(&db, flour.id).unwrap().success);
        assert!(delete_saved_ingredient(&db, flour.id).is_err());
    }
}
