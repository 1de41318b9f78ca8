use serde::Serialize;

use crate::domain::user::Tier;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub tier: Tier,
    pub name: &'static str,
    /// Monthly price in the catalogue currency.
    pub price: f64,
    pub features: &'static [&'static str],
    pub limitations: &'static [&'static str],
}

const FREE: Plan = Plan {
    tier: Tier::Free,
    name: "Free",
    price: 0.0,
    features: &[
        "Browse all categories",
        "View basic recipes (ingredients + steps)",
        "Access YouTube tutorial links",
    ],
    limitations: &[
        "View-only: cannot save, comment, or rate",
        "No access to premium recipes",
    ],
};

const STANDARD: Plan = Plan {
    tier: Tier::Standard,
    name: "Standard",
    price: 9.99,
    features: &[
        "Unlimited access to all recipes",
        "Create personal collections (save/favorite recipes)",
        "Comment, rate, and review recipes",
    ],
    limitations: &[
        "No exclusive premium-only recipes",
        "No advanced/long-form video tutorials",
    ],
};

const PREMIUM: Plan = Plan {
    tier: Tier::Premium,
    name: "Premium",
    price: 19.99,
    features: &[
        "All Standard features",
        "Access to exclusive premium recipes",
        "Advanced video tutorials or exclusive content",
        "Upload your own recipes to get featured",
        "Early access to new features or recipe drops",
    ],
    limitations: &[],
};

pub fn plan_for(tier: Tier) -> &'static Plan {
    match tier {
        Tier::Free => &FREE,
        Tier::Standard => &STANDARD,
        Tier::Premium => &PREMIUM,
    }
}

pub fn all_plans() -> [&'static Plan; 3] {
    Tier::ALL.map(plan_for)
}
