use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Indian,
    Italian,
    Healthy,
    Desserts,
    FastFood,
    Japanese,
    Mexican,
    Chinese,
    Mediterranean,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Indian,
        Category::Italian,
        Category::Healthy,
        Category::Desserts,
        Category::FastFood,
        Category::Japanese,
        Category::Mexican,
        Category::Chinese,
        Category::Mediterranean,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.as_db() == value)
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Indian => "indian",
            Self::Italian => "italian",
            Self::Healthy => "healthy",
            Self::Desserts => "desserts",
            Self::FastFood => "fastfood",
            Self::Japanese => "japanese",
            Self::Mexican => "mexican",
            Self::Chinese => "chinese",
            Self::Mediterranean => "mediterranean",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub amount: String,
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub step: i32,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub average: f64,
    pub count: i32,
}

/// List-view projection of a recipe. Carries everything except the
/// instructions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub ingredients: Vec<Ingredient>,
    pub prep_time: i32,
    pub cook_time: i32,
    pub servings: i32,
    pub difficulty: Difficulty,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<String>,
    pub is_premium: bool,
    pub is_active: bool,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<Nutrition>,
    pub rating: Rating,
    pub views: i64,
    pub created_by: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl RecipeSummary {
    pub fn total_time(&self) -> i64 {
        i64::from(self.prep_time) + i64::from(self.cook_time)
    }

    pub fn timed(self) -> Timed<Self> {
        let total_time = self.total_time();
        Timed {
            inner: self,
            total_time,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Recipe {
    #[serde(flatten)]
    pub summary: RecipeSummary,
    pub instructions: Vec<Instruction>,
}

impl Recipe {
    pub fn timed(self) -> Timed<Self> {
        let total_time = self.summary.total_time();
        Timed {
            inner: self,
            total_time,
        }
    }
}

/// Response shape that adds the derived `totalTime` next to a recipe.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timed<T> {
    #[serde(flatten)]
    pub inner: T,
    pub total_time: i64,
}

/// Validated recipe content submitted by a user. Premium and active flags
/// are not part of it: the store sets them.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<Instruction>,
    pub prep_time: i32,
    pub cook_time: i32,
    pub servings: i32,
    pub difficulty: Difficulty,
    pub image_url: String,
    pub youtube_url: Option<String>,
    pub tags: Vec<String>,
    pub nutrition: Option<Nutrition>,
}
