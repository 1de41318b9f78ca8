use sqlx::Row;
use uuid::Uuid;

use crate::app::access::{can_view_recipe, visibility_filter, Access, Caller};
use crate::app::error::{ServiceError, ServiceResult};
use crate::app::query::SUMMARY_COLUMNS;
use crate::app::recipes::{summary_from_row, RecipeService};
use crate::domain::recipe::{Category, RecipeSummary, Timed};
use crate::domain::user::FavoriteRef;
use crate::infra::db::Db;

#[derive(Clone)]
pub struct FavoriteService {
    db: Db,
}

impl FavoriteService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Adds a recipe to the caller's favorites. The recipe must be visible to
    /// the caller; a repeat add is a conflict and leaves one entry.
    pub async fn add(&self, caller: &Caller, recipe_id: Uuid) -> ServiceResult<FavoriteRef> {
        let user_id = member_id(caller)?;
        let recipe = RecipeService::new(self.db.clone())
            .find_summary(recipe_id)
            .await?
            .filter(|recipe| recipe.is_active)
            .ok_or_else(|| ServiceError::not_found("Recipe not found"))?;

        if let Access::Deny { required } = can_view_recipe(caller, &recipe) {
            return Err(ServiceError::Forbidden {
                message: "Premium subscription required to favorite this recipe".to_string(),
                current: caller.tier(),
                required,
            });
        }

        let result = sqlx::query(
            "INSERT INTO user_favorites (user_id, recipe_id) \
             VALUES ($1, $2) \
             ON CONFLICT (user_id, recipe_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(recipe_id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::conflict("Recipe already in favorites"));
        }

        tracing::debug!(user_id = %user_id, recipe_id = %recipe_id, "favorite added");
        Ok(FavoriteRef {
            id: recipe.id,
            title: recipe.title,
            image_url: recipe.image_url,
            category: recipe.category,
        })
    }

    pub async fn remove(&self, caller: &Caller, recipe_id: Uuid) -> ServiceResult<()> {
        let user_id = member_id(caller)?;
        let result = sqlx::query(
            "DELETE FROM user_favorites \
             WHERE user_id = $1 AND recipe_id = $2",
        )
        .bind(user_id)
        .bind(recipe_id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::not_found("Recipe not found in favorites"));
        }
        Ok(())
    }

    /// Favorited recipes in the order they were added, restricted to what the
    /// caller's current tier can see.
    pub async fn list(&self, caller: &Caller) -> ServiceResult<Vec<Timed<RecipeSummary>>> {
        let user_id = member_id(caller)?;
        let visibility = visibility_filter(caller);
        let columns = SUMMARY_COLUMNS
            .split(", ")
            .map(|column| format!("r.{}", column.trim()))
            .collect::<Vec<_>>()
            .join(", ");

        let rows = sqlx::query(&format!(
            "SELECT {} \
             FROM user_favorites f \
             JOIN recipes r ON r.id = f.recipe_id \
             WHERE f.user_id = $1 \
             ORDER BY f.seq ASC",
            columns
        ))
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        let mut recipes = Vec::with_capacity(rows.len());
        for row in &rows {
            let recipe = summary_from_row(row)?;
            if visibility.permits(&recipe) {
                recipes.push(recipe.timed());
            }
        }
        Ok(recipes)
    }

    /// Minimal favorite references for the profile view.
    pub async fn list_refs(&self, user_id: Uuid) -> ServiceResult<Vec<FavoriteRef>> {
        let rows = sqlx::query(
            "SELECT r.id, r.title, r.image_url, r.category \
             FROM user_favorites f \
             JOIN recipes r ON r.id = f.recipe_id \
             WHERE f.user_id = $1 \
             ORDER BY f.seq ASC",
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        let mut favorites = Vec::with_capacity(rows.len());
        for row in rows {
            let category: String = row.try_get("category")?;
            let Some(category) = Category::parse(&category) else {
                tracing::warn!(category = %category, "skipping favorite with unknown category");
                continue;
            };
            favorites.push(FavoriteRef {
                id: row.try_get("id")?,
                title: row.try_get("title")?,
                image_url: row.try_get("image_url")?,
                category,
            });
        }
        Ok(favorites)
    }
}

fn member_id(caller: &Caller) -> ServiceResult<Uuid> {
    caller
        .user_id()
        .ok_or_else(|| ServiceError::Unauthenticated("Access token required".to_string()))
}
