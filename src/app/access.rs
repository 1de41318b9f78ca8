//! Subscription-gated access policy.
//!
//! Every function here is pure: it takes the caller explicitly and returns
//! an allow/deny value. Nothing is cached on the user record, so a tier
//! change takes effect on the very next request.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::recipe::RecipeSummary;
use crate::domain::user::Tier;

/// Identity resolved for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    Member { user_id: Uuid, tier: Tier },
}

impl Caller {
    pub fn tier(&self) -> Option<Tier> {
        match self {
            Self::Anonymous => None,
            Self::Member { tier, .. } => Some(*tier),
        }
    }

    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Self::Anonymous => None,
            Self::Member { user_id, .. } => Some(*user_id),
        }
    }

    fn sees_premium(&self) -> bool {
        matches!(self.tier(), Some(Tier::Standard | Tier::Premium))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny { required: Tier },
}

impl Access {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Predicate over recipes a caller may see: active, and non-premium unless
/// the caller is standard or above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityFilter {
    include_premium: bool,
}

impl VisibilityFilter {
    pub fn include_premium(&self) -> bool {
        self.include_premium
    }

    pub fn permits(&self, recipe: &RecipeSummary) -> bool {
        recipe.is_active && (self.include_premium || !recipe.is_premium)
    }
}

pub fn visibility_filter(caller: &Caller) -> VisibilityFilter {
    VisibilityFilter {
        include_premium: caller.sees_premium(),
    }
}

/// Gate for single-recipe reads and favoriting.
pub fn can_view_recipe(caller: &Caller, recipe: &RecipeSummary) -> Access {
    if recipe.is_premium && !caller.sees_premium() {
        Access::Deny {
            required: Tier::Standard,
        }
    } else {
        Access::Allow
    }
}

pub fn can_upload(caller: &Caller) -> Access {
    match caller.tier() {
        Some(Tier::Premium) => Access::Allow,
        _ => Access::Deny {
            required: Tier::Premium,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierChange {
    Upgrade,
    Downgrade,
    Coupon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierDecision {
    Allow,
    Deny { current: Tier, requested: Tier },
}

pub fn can_change_tier(current: Tier, requested: Tier, change: TierChange) -> TierDecision {
    let allowed = match change {
        TierChange::Upgrade | TierChange::Coupon => requested.rank() > current.rank(),
        TierChange::Downgrade => {
            requested.rank() < current.rank() && requested != Tier::Premium
        }
    };

    if allowed {
        TierDecision::Allow
    } else {
        TierDecision::Deny { current, requested }
    }
}

/// Fixed coupon table. Codes are matched case-insensitively after trimming.
pub fn coupon_tier(code: &str) -> Option<Tier> {
    match code.trim().to_ascii_uppercase().as_str() {
        "STAN100" => Some(Tier::Standard),
        "PRUM100" => Some(Tier::Premium),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureMatrix {
    pub can_access_premium_recipes: bool,
    pub can_save_favorites: bool,
    pub can_download_recipes: bool,
    pub can_access_live_classes: bool,
}

pub fn feature_matrix(tier: Tier) -> FeatureMatrix {
    let paid = tier != Tier::Free;
    let premium = tier == Tier::Premium;
    FeatureMatrix {
        can_access_premium_recipes: paid,
        can_save_favorites: paid,
        can_download_recipes: premium,
        can_access_live_classes: premium,
    }
}
