use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use crate::app::auth::{hash_password, verify_password};
use crate::app::error::{ServiceError, ServiceResult};
use crate::app::favorites::FavoriteService;
use crate::domain::user::{DietaryPreference, Tier, User, UserProfile};
use crate::infra::db::Db;

pub(crate) const USER_COLUMNS: &str =
    "id, name, email, subscription, dietary_preferences, is_active, created_at";

pub(crate) fn user_from_row(row: &PgRow) -> ServiceResult<User> {
    let subscription: Option<String> = row.try_get("subscription")?;
    let preferences: Vec<String> = row.try_get("dietary_preferences")?;
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        subscription: Tier::from_db(subscription.as_deref()),
        dietary_preferences: preferences
            .iter()
            .filter_map(|value| DietaryPreference::parse(value))
            .collect(),
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
    })
}

#[derive(Clone)]
pub struct UserService {
    db: Db,
}

impl UserService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn get_user(&self, user_id: Uuid) -> ServiceResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(user_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    pub async fn get_profile(&self, user_id: Uuid) -> ServiceResult<UserProfile> {
        let user = self
            .get_user(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User not found"))?;
        let favorites = FavoriteService::new(self.db.clone())
            .list_refs(user_id)
            .await?;
        Ok(UserProfile { user, favorites })
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        name: Option<String>,
        dietary_preferences: Option<Vec<DietaryPreference>>,
    ) -> ServiceResult<User> {
        let preferences: Option<Vec<String>> = dietary_preferences.map(|preferences| {
            preferences
                .iter()
                .map(|preference| preference.as_db().to_string())
                .collect()
        });

        let row = sqlx::query(&format!(
            "UPDATE users \
             SET name = COALESCE($2, name), \
                 dietary_preferences = COALESCE($3, dietary_preferences) \
             WHERE id = $1 \
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(user_id)
        .bind(name)
        .bind(preferences)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(row) => user_from_row(&row),
            None => Err(ServiceError::not_found("User not found")),
        }
    }

    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> ServiceResult<()> {
        let stored: Option<String> =
            sqlx::query_scalar("SELECT password_hash FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(self.db.pool())
                .await?;
        let stored = stored.ok_or_else(|| ServiceError::not_found("User not found"))?;

        if !verify_password(current_password, &stored)? {
            return Err(ServiceError::invalid(
                "currentPassword",
                "Current password is incorrect",
            ));
        }

        let password_hash = hash_password(new_password)?;
        sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(user_id)
            .bind(password_hash)
            .execute(self.db.pool())
            .await?;

        tracing::info!(user_id = %user_id, "password changed");
        Ok(())
    }
}
