//! Saved ingredient model
//!
//! A reusable ingredient price: name, the unit it is sold by, and the price per
//! that unit.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use super::ingredient::IngredientInput;

/// A saved ingredient price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedIngredient {
    pub id: i64,
    pub name: String,
    pub unit: String,
    pub price_per_unit: f64,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for saving a new ingredient price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedIngredientCreate {
    pub name: String,
    pub unit: String,
    pub price_per_unit: f64,
    pub notes: Option<String>,
}

/// Data for updating a saved ingredient
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavedIngredientUpdate {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub price_per_unit: Option<f64>,
    pub notes: Option<String>,
}

impl SavedIngredient {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            unit: row.get("unit")?,
            price_per_unit: row.get("price_per_unit")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Build an ingredient row priced from this entry
    ///
    /// `unit` is the unit the quantity was measured in; it defaults to the
    /// saved unit.
    pub fn to_input(&self, quantity: f64, unit: Option<&str>) -> IngredientInput {
        let unit = unit
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(self.unit.as_str());

        IngredientInput {
            name: self.name.clone(),
            quantity,
            unit: unit.to_string(),
            unit_price: self.price_per_unit,
            price_basis_unit: Some(self.unit.clone()),
        }
    }

    /// Insert a new saved ingredient
    pub fn create(conn: &Connection, data: &SavedIngredientCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO saved_ingredients (name, unit, price_per_unit, notes)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![data.name.trim(), data.unit.trim(), data.price_per_unit, data.notes],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM saved_ingredients WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Case-insensitive exact name lookup
    pub fn find_by_name(conn: &Connection, name: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM saved_ingredients WHERE name = ?1 COLLATE NOCASE")?;

        match stmt.query_row([name.trim()], Self::from_row) {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List saved ingredients by name, optionally filtered by a substring
    pub fn list(conn: &Connection, query: Option<&str>, limit: i64, offset: i64) -> DbResult<Vec<Self>> {
        let items = match query {
            Some(q) => {
                let mut stmt = conn.prepare(
                    "SELECT * FROM saved_ingredients WHERE name LIKE ?1 ORDER BY name LIMIT ?2 OFFSET ?3",
                )?;
                let pattern = format!("%{}%", q.trim());
                let rows = stmt.query_map(params![pattern, limit, offset], Self::from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt =
                    conn.prepare("SELECT * FROM saved_ingredients ORDER BY name LIMIT ?1 OFFSET ?2")?;
                let rows = stmt.query_map(params![limit, offset], Self::from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };

        Ok(items)
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM saved_ingredients", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Update fields that are set; returns None if the id does not exist
    pub fn update(conn: &Connection, id: i64, data: &SavedIngredientUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref name) = data.name {
            updates.push(format!("name = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(name.trim().to_string()));
        }
        if let Some(ref unit) = data.unit {
            updates.push(format!("unit = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(unit.trim().to_string()));
        }
        if let Some(price) = data.price_per_unit {
            updates.push(format!("price_per_unit = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(price));
        }
        if let Some(ref notes) = data.notes {
            updates.push(format!("notes = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(notes.clone()));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE saved_ingredients SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );
        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Returns Ok(true) if a row was deleted
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM saved_ingredients WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_default_price_list_seeded() {
        let conn = conn();
        let names: Vec<String> = SavedIngredient::list(&conn, None, 50, 0)
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Butter", "Flour", "Milk", "Sugar"]);

        let milk = SavedIngredient::find_by_name(&conn, "milk").unwrap().unwrap();
        assert_eq!(milk.unit, "litre");
        assert_eq!(milk.price_per_unit, 60.0);
    }

    #[test]
    fn test_create_and_get() {
        let conn = conn();
        let ghee = SavedIngredient::create(
            &conn,
            &SavedIngredientCreate {
                name: " Ghee ".to_string(),
                unit: "kg".to_string(),
                price_per_unit: 650.0,
                notes: Some("Amul".to_string()),
            },
        )
        .unwrap();

        assert_eq!(ghee.name, "Ghee");
        assert_eq!(SavedIngredient::get_by_id(&conn, ghee.id).unwrap(), Some(ghee));
        assert_eq!(SavedIngredient::count(&conn).unwrap(), 5);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let conn = conn();
        let result = SavedIngredient::create(
            &conn,
            &SavedIngredientCreate {
                name: "FLOUR".to_string(),
                unit: "kg".to_string(),
                price_per_unit: 45.0,
                notes: None,
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_search_and_paging() {
        let conn = conn();
        let found = SavedIngredient::list(&conn, Some("u"), 50, 0).unwrap();
        let names: Vec<&str> = found.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Butter", "Flour", "Sugar"]);

        let page = SavedIngredient::list(&conn, None, 2, 2).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].name, "Milk");
    }

    #[test]
    fn test_update_and_delete() {
        let conn = conn();
        let sugar = SavedIngredient::find_by_name(&conn, "Sugar").unwrap().unwrap();

        let updated = SavedIngredient::update(
            &conn,
            sugar.id,
            &SavedIngredientUpdate {
                price_per_unit: Some(55.0),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(updated.price_per_unit, 55.0);
        assert_eq!(updated.unit, "kg");

        assert!(SavedIngredient::update(&conn, 9999, &SavedIngredientUpdate::default())
            .unwrap()
            .is_none());

        assert!(SavedIngredient::delete(&conn, sugar.id).unwrap());
        assert!(!SavedIngredient::delete(&conn, sugar.id).unwrap());
    }

    #[test]
    fn test_to_input_uses_saved_price_basis() {
        let conn = conn();
        let flour = SavedIngredient::find_by_name(&conn, "Flour").unwrap().unwrap();

        let input = flour.to_input(500.0, Some("g"));
        assert_eq!(input.unit, "g");
        assert_eq!(input.price_basis(), "kg");
        assert_eq!(input.unit_price, 40.0);

        let input = flour.to_input(2.0, None);
        assert_eq!(input.unit, "kg");
    }
}
