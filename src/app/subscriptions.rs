use serde::Serialize;
use uuid::Uuid;

use crate::app::access::{can_change_tier, coupon_tier, TierChange, TierDecision};
use crate::app::error::{ServiceError, ServiceResult};
use crate::app::notifications::NotificationService;
use crate::app::users::{user_from_row, USER_COLUMNS};
use crate::domain::subscription::plan_for;
use crate::domain::user::{Tier, User};
use crate::infra::db::Db;

/// Stored tier as the service reads it: anything unrecognised counts as free.
const NORMALIZED_TIER_SQL: &str =
    "CASE WHEN subscription IN ('standard', 'premium') THEN subscription ELSE 'free' END";

#[derive(Debug, Clone, Serialize)]
pub struct TierChanged {
    pub message: String,
    pub user: User,
}

#[derive(Clone)]
pub struct SubscriptionService {
    db: Db,
}

impl SubscriptionService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Applies an upgrade or downgrade. The write only lands if the stored
    /// tier still equals `current`; a concurrent change is a conflict.
    pub async fn change_tier(
        &self,
        user_id: Uuid,
        current: Tier,
        requested: Tier,
        change: TierChange,
    ) -> ServiceResult<TierChanged> {
        if let TierDecision::Deny { current, requested } =
            can_change_tier(current, requested, change)
        {
            return Err(ServiceError::conflict(denied_message(
                current, requested, change,
            )));
        }

        let message = match change {
            TierChange::Upgrade => format!("Successfully upgraded to {} plan!", requested),
            TierChange::Downgrade => format!("Successfully downgraded to {} plan", requested),
            TierChange::Coupon => format!("Coupon applied. Upgraded to {} plan!", requested),
        };

        let mut tx = self.db.pool().begin().await?;
        let row = sqlx::query(&format!(
            "UPDATE users SET subscription = $3 \
             WHERE id = $1 AND {} = $2 \
             RETURNING {}",
            NORMALIZED_TIER_SQL, USER_COLUMNS
        ))
        .bind(user_id)
        .bind(current.as_db())
        .bind(requested.as_db())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Err(ServiceError::conflict(
                "Subscription changed by another request, please retry",
            ));
        };
        let user = user_from_row(&row)?;

        NotificationService::notify_with_tx(
            &mut tx,
            user_id,
            "Subscription updated",
            &format!("You are now on the {} plan.", plan_for(requested).name),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(
            user_id = %user_id,
            from = %current,
            to = %requested,
            "subscription changed"
        );
        Ok(TierChanged { message, user })
    }

    pub async fn redeem(&self, user_id: Uuid, current: Tier, code: &str) -> ServiceResult<TierChanged> {
        let requested =
            coupon_tier(code).ok_or_else(|| ServiceError::invalid("code", "Invalid coupon code"))?;
        self.change_tier(user_id, current, requested, TierChange::Coupon)
            .await
    }
}

fn denied_message(current: Tier, requested: Tier, change: TierChange) -> String {
    let (bound, verb) = match change {
        TierChange::Downgrade => ("lower", "downgrade"),
        TierChange::Upgrade | TierChange::Coupon => ("higher", "upgrade"),
    };
    format!(
        "You are already on {} plan or {}, cannot {} to {} plan",
        current, bound, verb, requested
    )
}
