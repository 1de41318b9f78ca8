use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::recipe::Category;

/// Subscription level. Ordered by rank: free < standard < premium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Free,
    Standard,
    Premium,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Free, Tier::Standard, Tier::Premium];

    pub fn rank(self) -> u8 {
        match self {
            Self::Free => 0,
            Self::Standard => 1,
            Self::Premium => 2,
        }
    }

    /// Strict parse for client input. Unknown values are rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "free" => Some(Self::Free),
            "standard" => Some(Self::Standard),
            "premium" => Some(Self::Premium),
            _ => None,
        }
    }

    /// Normalization for stored records: a missing or unrecognised tier is `free`.
    pub fn from_db(value: Option<&str>) -> Self {
        value.and_then(Self::parse).unwrap_or(Self::Free)
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Standard => "standard",
            Self::Premium => "premium",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_db())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DietaryPreference {
    #[serde(rename = "vegetarian")]
    Vegetarian,
    #[serde(rename = "vegan")]
    Vegan,
    #[serde(rename = "gluten-free")]
    GlutenFree,
    #[serde(rename = "dairy-free")]
    DairyFree,
    #[serde(rename = "keto")]
    Keto,
    #[serde(rename = "paleo")]
    Paleo,
    #[serde(rename = "none")]
    None,
}

impl DietaryPreference {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "vegetarian" => Some(Self::Vegetarian),
            "vegan" => Some(Self::Vegan),
            "gluten-free" => Some(Self::GlutenFree),
            "dairy-free" => Some(Self::DairyFree),
            "keto" => Some(Self::Keto),
            "paleo" => Some(Self::Paleo),
            "none" => Some(Self::None),
            _ => None,
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Vegetarian => "vegetarian",
            Self::Vegan => "vegan",
            Self::GlutenFree => "gluten-free",
            Self::DairyFree => "dairy-free",
            Self::Keto => "keto",
            Self::Paleo => "paleo",
            Self::None => "none",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subscription: Tier,
    pub dietary_preferences: Vec<DietaryPreference>,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Minimal recipe reference shown on a profile.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRef {
    pub id: Uuid,
    pub title: String,
    pub image_url: String,
    pub category: Category,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub favorites: Vec<FavoriteRef>,
}
