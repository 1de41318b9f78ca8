use anyhow::anyhow;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::Row;
use uuid::Uuid;

use crate::app::access::{can_upload, can_view_recipe, visibility_filter, Access, Caller};
use crate::app::error::{ServiceError, ServiceResult};
use crate::app::notifications::NotificationService;
use crate::app::query::{featured_query, ListingQuery, PageInfo, SUMMARY_COLUMNS};
use crate::app::validation::RecipeDraft;
use crate::domain::recipe::{
    Category, Difficulty, Ingredient, Instruction, NewRecipe, Nutrition, Rating, Recipe,
    RecipeSummary, Timed,
};
use crate::infra::db::Db;

#[derive(Debug, Clone, Serialize)]
pub struct RecipePage {
    pub recipes: Vec<Timed<RecipeSummary>>,
    pub pagination: PageInfo,
}

/// Acknowledgement for an uploaded recipe awaiting review.
#[derive(Debug, Clone, Serialize)]
pub struct UploadedRecipe {
    pub id: Uuid,
    pub title: String,
    pub status: &'static str,
}

#[derive(Clone)]
pub struct RecipeService {
    db: Db,
}

impl RecipeService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn list(&self, query: &ListingQuery) -> ServiceResult<RecipePage> {
        let mut select = query.select_query();
        let mut count = query.count_query();
        let (rows, total) = tokio::try_join!(
            select.build().fetch_all(self.db.pool()),
            count.build_query_scalar::<i64>().fetch_one(self.db.pool()),
        )?;

        let recipes = rows
            .iter()
            .map(|row| summary_from_row(row).map(RecipeSummary::timed))
            .collect::<ServiceResult<Vec<_>>>()?;

        Ok(RecipePage {
            recipes,
            pagination: PageInfo::new(query.page, total),
        })
    }

    pub async fn featured(&self, caller: &Caller) -> ServiceResult<Vec<Timed<RecipeSummary>>> {
        let query = featured_query(visibility_filter(caller));
        let rows = query.select_query().build().fetch_all(self.db.pool()).await?;
        rows.iter()
            .map(|row| summary_from_row(row).map(RecipeSummary::timed))
            .collect()
    }

    /// Full recipe for a caller. Missing and inactive recipes are both
    /// `NotFound`; a premium recipe behind the caller's tier is `Forbidden`
    /// and its view counter is left untouched.
    pub async fn get(&self, caller: &Caller, recipe_id: Uuid) -> ServiceResult<Timed<Recipe>> {
        let summary = self
            .find_summary(recipe_id)
            .await?
            .filter(|summary| summary.is_active)
            .ok_or_else(|| ServiceError::not_found("Recipe not found"))?;

        if let Access::Deny { required } = can_view_recipe(caller, &summary) {
            return Err(ServiceError::Forbidden {
                message: "Premium subscription required to view this recipe".to_string(),
                current: caller.tier(),
                required,
            });
        }

        let row = sqlx::query(&format!(
            "UPDATE recipes SET views = views + 1 \
             WHERE id = $1 AND is_active = TRUE \
             RETURNING {}, instructions",
            SUMMARY_COLUMNS
        ))
        .bind(recipe_id)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(row) => Ok(recipe_from_row(&row)?.timed()),
            None => Err(ServiceError::not_found("Recipe not found")),
        }
    }

    pub async fn find_summary(&self, recipe_id: Uuid) -> ServiceResult<Option<RecipeSummary>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM recipes WHERE id = $1",
            SUMMARY_COLUMNS
        ))
        .bind(recipe_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(summary_from_row).transpose()
    }

    /// Stores a premium member's recipe as premium and inactive, pending
    /// review. The tier gate is checked before the content is validated.
    pub async fn upload(&self, caller: &Caller, draft: RecipeDraft) -> ServiceResult<UploadedRecipe> {
        if let Access::Deny { required } = can_upload(caller) {
            return Err(ServiceError::Forbidden {
                message: "Premium subscription required to upload recipes".to_string(),
                current: caller.tier(),
                required,
            });
        }
        let user_id = caller
            .user_id()
            .ok_or_else(|| ServiceError::Unauthenticated("Access token required".to_string()))?;
        let recipe: NewRecipe = draft.validate()?;

        let mut tx = self.db.pool().begin().await?;
        let recipe_id: Uuid = sqlx::query_scalar(
            "INSERT INTO recipes \
             (title, description, category, ingredients, instructions, prep_time, cook_time, \
              servings, difficulty, image_url, youtube_url, tags, nutrition, is_premium, \
              is_active, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, TRUE, FALSE, $14) \
             RETURNING id",
        )
        .bind(&recipe.title)
        .bind(&recipe.description)
        .bind(recipe.category.as_db())
        .bind(Json(&recipe.ingredients))
        .bind(Json(&recipe.instructions))
        .bind(recipe.prep_time)
        .bind(recipe.cook_time)
        .bind(recipe.servings)
        .bind(recipe.difficulty.as_db())
        .bind(&recipe.image_url)
        .bind(&recipe.youtube_url)
        .bind(&recipe.tags)
        .bind(recipe.nutrition.as_ref().map(Json))
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        NotificationService::notify_with_tx(
            &mut tx,
            user_id,
            "Recipe submitted",
            &format!(
                "\"{}\" was uploaded and will be reviewed before being published.",
                recipe.title
            ),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(recipe_id = %recipe_id, user_id = %user_id, "recipe uploaded for review");
        Ok(UploadedRecipe {
            id: recipe_id,
            title: recipe.title,
            status: "pending_review",
        })
    }
}

pub(crate) fn summary_from_row(row: &PgRow) -> ServiceResult<RecipeSummary> {
    let category: String = row.try_get("category")?;
    let difficulty: String = row.try_get("difficulty")?;
    let ingredients: Json<Vec<Ingredient>> = row.try_get("ingredients")?;
    let nutrition: Option<Json<Nutrition>> = row.try_get("nutrition")?;

    Ok(RecipeSummary {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        category: Category::parse(&category)
            .ok_or_else(|| anyhow!("unknown stored category: {}", category))?,
        ingredients: ingredients.0,
        prep_time: row.try_get("prep_time")?,
        cook_time: row.try_get("cook_time")?,
        servings: row.try_get("servings")?,
        difficulty: Difficulty::parse(&difficulty)
            .ok_or_else(|| anyhow!("unknown stored difficulty: {}", difficulty))?,
        image_url: row.try_get("image_url")?,
        youtube_url: row.try_get("youtube_url")?,
        is_premium: row.try_get("is_premium")?,
        is_active: row.try_get("is_active")?,
        tags: row.try_get("tags")?,
        nutrition: nutrition.map(|nutrition| nutrition.0),
        rating: Rating {
            average: row.try_get("rating_average")?,
            count: row.try_get("rating_count")?,
        },
        views: row.try_get("views")?,
        created_by: row.try_get("created_by")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn recipe_from_row(row: &PgRow) -> ServiceResult<Recipe> {
    let instructions: Json<Vec<Instruction>> = row.try_get("instructions")?;
    Ok(Recipe {
        summary: summary_from_row(row)?,
        instructions: instructions.0,
    })
}
