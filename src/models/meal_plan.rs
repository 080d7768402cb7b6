//! Meal plan model
//!
//! One recipe cooked for a number of people on a date, in a meal category slot.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

const SELECT_MEAL_PLAN: &str = r#"
    SELECT mp.*, c.name AS meal_category_name, r.name AS recipe_name
    FROM meal_plans mp
    LEFT JOIN categories c ON c.id = mp.meal_category_id
    LEFT JOIN recipes r ON r.id = mp.recipe_id
"#;

/// A meal plan with its category and recipe names resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPlan {
    pub id: i64,
    pub name: String,
    pub date: String, // ISO date: "2025-01-09"
    pub meal_category_id: i64,
    pub meal_category_name: Option<String>,
    pub recipe_id: i64,
    pub recipe_name: Option<String>,
    pub people_count: i64,
    pub created_at: String,
}

/// Data for creating a meal plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPlanCreate {
    pub name: String,
    pub date: String,
    pub meal_category_id: i64,
    pub recipe_id: i64,
    pub people_count: i64,
}

/// Data for updating a meal plan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MealPlanUpdate {
    pub name: Option<String>,
    pub date: Option<String>,
    pub meal_category_id: Option<i64>,
    pub recipe_id: Option<i64>,
    pub people_count: Option<i64>,
}

impl MealPlan {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            date: row.get("date")?,
            meal_category_id: row.get("meal_category_id")?,
            meal_category_name: row.get("meal_category_name")?,
            recipe_id: row.get("recipe_id")?,
            recipe_name: row.get("recipe_name")?,
            people_count: row.get("people_count")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Insert a new meal plan
    pub fn create(conn: &Connection, data: &MealPlanCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO meal_plans (name, date, meal_category_id, recipe_id, people_count)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                data.name,
                data.date,
                data.meal_category_id,
                data.recipe_id,
                data.people_count,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::MissingRow { table: "meal_plans", id })
    }

    /// Get a meal plan by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let sql = format!("{} WHERE mp.id = ?1", SELECT_MEAL_PLAN);
        let mut stmt = conn.prepare(&sql)?;

        match stmt.query_row([id], Self::from_row) {
            Ok(plan) => Ok(Some(plan)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch several meal plans; ids that don't exist are simply absent from the result
    pub fn get_by_ids(conn: &Connection, ids: &[i64]) -> DbResult<Vec<Self>> {
        let mut plans = Vec::with_capacity(ids.len());
        for &id in ids {
            if let Some(plan) = Self::get_by_id(conn, id)? {
                plans.push(plan);
            }
        }
        Ok(plans)
    }

    /// The plan occupying a date + meal category slot, if any
    pub fn find_by_slot(
        conn: &Connection,
        date: &str,
        meal_category_id: i64,
    ) -> DbResult<Option<Self>> {
        let sql = format!(
            "{} WHERE mp.date = ?1 AND mp.meal_category_id = ?2",
            SELECT_MEAL_PLAN
        );
        let mut stmt = conn.prepare(&sql)?;

        match stmt.query_row(params![date, meal_category_id], Self::from_row) {
            Ok(plan) => Ok(Some(plan)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List meal plans within an optional inclusive date range
    pub fn list(conn: &Connection, start_date: Option<&str>, end_date: Option<&str>) -> DbResult<Vec<Self>> {
        let mut sql = format!("{} WHERE 1=1", SELECT_MEAL_PLAN);
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(start) = start_date {
            params_vec.push(Box::new(start.to_string()));
            sql.push_str(&format!(" AND mp.date >= ?{}", params_vec.len()));
        }

        if let Some(end) = end_date {
            params_vec.push(Box::new(end.to_string()));
            sql.push_str(&format!(" AND mp.date <= ?{}", params_vec.len()));
        }

        sql.push_str(" ORDER BY mp.date, mp.meal_category_id");

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();

        let plans = stmt
            .query_map(params_refs.as_slice(), Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(plans)
    }

    /// Update a meal plan's fields
    pub fn update(conn: &Connection, id: i64, data: &MealPlanUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref name) = data.name {
            updates.push(format!("name = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(name.clone()));
        }
        if let Some(ref date) = data.date {
            updates.push(format!("date = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(date.clone()));
        }
        if let Some(meal_category_id) = data.meal_category_id {
            updates.push(format!("meal_category_id = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(meal_category_id));
        }
        if let Some(recipe_id) = data.recipe_id {
            updates.push(format!("recipe_id = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(recipe_id));
        }
        if let Some(people_count) = data.people_count {
            updates.push(format!("people_count = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(people_count));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        let sql = format!(
            "UPDATE meal_plans SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );

        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Delete a meal plan
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM meal_plans WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::{Category, CategoryCreate, CategoryType, Recipe, RecipeCreate};

    struct Fixture {
        conn: Connection,
        dinner: i64,
        lunch: i64,
        recipe: i64,
    }

    fn setup() -> Fixture {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();

        let dinner = Category::create(&conn, &CategoryCreate { name: "Dinner".into(), category_type: CategoryType::Meal }).unwrap();
        let lunch = Category::create(&conn, &CategoryCreate { name: "Lunch".into(), category_type: CategoryType::Meal }).unwrap();
        let recipe = Recipe::create(&conn, &RecipeCreate {
            name: "Chili".into(),
            description: None,
            instructions: None,
            prep_time: None,
            cook_time: None,
            servings: 4,
            category_id: None,
        })
        .unwrap();

        Fixture { conn, dinner: dinner.id, lunch: lunch.id, recipe: recipe.id }
    }

    fn plan(f: &Fixture, date: &str, category: i64) -> MealPlanCreate {
        MealPlanCreate {
            name: format!("Chili {}", date),
            date: date.to_string(),
            meal_category_id: category,
            recipe_id: f.recipe,
            people_count: 4,
        }
    }

    #[test]
    fn test_create_resolves_names() {
        let f = setup();
        let created = MealPlan::create(&f.conn, &plan(&f, "2025-03-03", f.dinner)).unwrap();
        assert_eq!(created.recipe_name.as_deref(), Some("Chili"));
        assert_eq!(created.meal_category_name.as_deref(), Some("Dinner"));
    }

    #[test]
    fn test_slot_is_unique() {
        let f = setup();
        MealPlan::create(&f.conn, &plan(&f, "2025-03-03", f.dinner)).unwrap();
        assert!(MealPlan::create(&f.conn, &plan(&f, "2025-03-03", f.dinner)).is_err());
        assert!(MealPlan::find_by_slot(&f.conn, "2025-03-03", f.dinner).unwrap().is_some());
        assert!(MealPlan::find_by_slot(&f.conn, "2025-03-03", f.lunch).unwrap().is_none());
    }

    #[test]
    fn test_list_date_range_ordering() {
        let f = setup();
        MealPlan::create(&f.conn, &plan(&f, "2025-03-05", f.dinner)).unwrap();
        MealPlan::create(&f.conn, &plan(&f, "2025-03-03", f.lunch)).unwrap();
        MealPlan::create(&f.conn, &plan(&f, "2025-03-03", f.dinner)).unwrap();
        MealPlan::create(&f.conn, &plan(&f, "2025-03-10", f.dinner)).unwrap();

        let plans = MealPlan::list(&f.conn, Some("2025-03-03"), Some("2025-03-05")).unwrap();
        let slots: Vec<_> = plans.iter().map(|p| (p.date.as_str(), p.meal_category_id)).collect();
        assert_eq!(slots, vec![("2025-03-03", f.dinner), ("2025-03-03", f.lunch), ("2025-03-05", f.dinner)]);
    }

    #[test]
    fn test_get_by_ids_skips_missing() {
        let f = setup();
        let a = MealPlan::create(&f.conn, &plan(&f, "2025-03-03", f.dinner)).unwrap();
        let plans = MealPlan::get_by_ids(&f.conn, &[a.id, a.id + 50]).unwrap();
        assert_eq!(plans.len(), 1);
    }

    #[test]
    fn test_recipe_delete_cascades() {
        let f = setup();
        let a = MealPlan::create(&f.conn, &plan(&f, "2025-03-03", f.dinner)).unwrap();
        Recipe::delete(&f.conn, f.recipe).unwrap();
        assert!(MealPlan::get_by_id(&f.conn, a.id).unwrap().is_none());
    }

    #[test]
    fn test_update_people_count() {
        let f = setup();
        let a = MealPlan::create(&f.conn, &plan(&f, "2025-03-03", f.dinner)).unwrap();
        let updated = MealPlan::update(&f.conn, a.id, &MealPlanUpdate { people_count: Some(6), ..Default::default() })
            .unwrap()
            .unwrap();
        assert_eq!(updated.people_count, 6);
        assert_eq!(updated.date, "2025-03-03");
    }
}
