//! Boundary validation. Checks run before any store call and report all
//! failing fields at once.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::app::error::{ServiceError, ServiceResult};
use crate::domain::recipe::{Category, Difficulty, Ingredient, Instruction, NewRecipe, Nutrition};

pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;
pub const MAX_MINUTES: i64 = 10_080;
pub const MAX_SERVINGS: i64 = 1_000;
const TAG_MAX_CHARS: usize = 30;
const MAX_TAGS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Trimmed, non-empty text of at most `max_chars` characters.
    pub fn required_text(
        &mut self,
        field: &str,
        value: Option<&str>,
        max_chars: usize,
        missing: &str,
    ) -> Option<String> {
        let value = value.map(str::trim).unwrap_or_default();
        if value.is_empty() {
            self.error(field, missing);
            return None;
        }
        if value.chars().count() > max_chars {
            self.error(field, format!("{} cannot exceed {} characters", field, max_chars));
            return None;
        }
        Some(value.to_string())
    }

    pub fn text_length(&mut self, field: &str, value: &str, min: usize, max: usize) -> bool {
        let len = value.chars().count();
        if len < min || len > max {
            self.error(
                field,
                format!("{} must be between {} and {} characters", field, min, max),
            );
            return false;
        }
        true
    }

    /// Integer that must be present and within `1..=max`.
    pub fn in_range(
        &mut self,
        field: &str,
        value: Option<i64>,
        max: i64,
        message: &str,
    ) -> Option<i32> {
        match value.filter(|value| (1..=max).contains(value)) {
            Some(value) => i32::try_from(value).ok(),
            None => {
                self.error(field, message);
                None
            }
        }
    }

    /// Closed-set value; unknown values are rejected rather than coerced.
    pub fn one_of<T>(
        &mut self,
        field: &str,
        value: Option<&str>,
        parse: impl Fn(&str) -> Option<T>,
        message: &str,
    ) -> Option<T> {
        match value.and_then(parse) {
            Some(parsed) => Some(parsed),
            None => {
                self.error(field, message);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish(self) -> ServiceResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(self.errors))
        }
    }
}

pub fn is_http_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

pub fn is_youtube_url(value: &str) -> bool {
    let Ok(url) = Url::parse(value) else {
        return false;
    };
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    let host_ok = matches!(
        url.host_str(),
        Some("youtube.com" | "www.youtube.com" | "youtu.be" | "www.youtu.be")
    );
    host_ok && (url.path().len() > 1 || url.query().is_some())
}

pub fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.contains(char::is_whitespace)
}

#[derive(Debug, Default, Deserialize)]
pub struct IngredientDraft {
    pub name: Option<String>,
    pub amount: Option<String>,
    pub unit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InstructionDraft {
    pub step: Option<i64>,
    pub description: Option<String>,
}

/// Client-submitted recipe. Any premium or active flag in the body is not
/// part of this shape and is dropped on deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub ingredients: Option<Vec<IngredientDraft>>,
    pub instructions: Option<Vec<InstructionDraft>>,
    pub prep_time: Option<i64>,
    pub cook_time: Option<i64>,
    pub servings: Option<i64>,
    pub difficulty: Option<String>,
    pub image_url: Option<String>,
    pub youtube_url: Option<String>,
    pub tags: Option<Vec<String>>,
    pub nutrition: Option<Nutrition>,
}

impl RecipeDraft {
    pub fn validate(self) -> ServiceResult<NewRecipe> {
        let mut v = Validator::new();

        let title = v.required_text(
            "title",
            self.title.as_deref(),
            TITLE_MAX_CHARS,
            "Recipe title is required",
        );
        let description = v.required_text(
            "description",
            self.description.as_deref(),
            DESCRIPTION_MAX_CHARS,
            "Recipe description is required",
        );
        let category = v.one_of(
            "category",
            self.category.as_deref(),
            Category::parse,
            "Invalid category",
        );
        let difficulty = v.one_of(
            "difficulty",
            self.difficulty.as_deref(),
            Difficulty::parse,
            "Invalid difficulty level",
        );
        let prep_time = v.in_range(
            "prepTime",
            self.prep_time,
            MAX_MINUTES,
            "Prep time must be between 1 and 10080 minutes",
        );
        let cook_time = v.in_range(
            "cookTime",
            self.cook_time,
            MAX_MINUTES,
            "Cook time must be between 1 and 10080 minutes",
        );
        let servings = v.in_range(
            "servings",
            self.servings,
            MAX_SERVINGS,
            "Servings must be between 1 and 1000",
        );

        let ingredients = validate_ingredients(&mut v, self.ingredients.unwrap_or_default());
        let instructions = validate_instructions(&mut v, self.instructions.unwrap_or_default());

        let image_url = self.image_url.map(|url| url.trim().to_string());
        match image_url.as_deref() {
            Some(url) if is_http_url(url) => {}
            _ => v.error("imageUrl", "Valid image URL is required"),
        }

        let youtube_url = self
            .youtube_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        if let Some(url) = youtube_url.as_deref() {
            if !is_youtube_url(url) {
                v.error("youtubeUrl", "Please provide a valid YouTube URL");
            }
        }

        let tags: Vec<String> = self
            .tags
            .unwrap_or_default()
            .into_iter()
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect();
        if tags.len() > MAX_TAGS {
            v.error("tags", format!("At most {} tags are allowed", MAX_TAGS));
        }
        if tags.iter().any(|tag| tag.chars().count() > TAG_MAX_CHARS) {
            v.error(
                "tags",
                format!("Tags cannot exceed {} characters", TAG_MAX_CHARS),
            );
        }

        if let Some(nutrition) = &self.nutrition {
            let values = [
                nutrition.calories,
                nutrition.protein,
                nutrition.carbs,
                nutrition.fat,
                nutrition.fiber,
            ];
            if values
                .into_iter()
                .flatten()
                .any(|value| !value.is_finite() || value < 0.0)
            {
                v.error("nutrition", "Nutrition values must be non-negative numbers");
            }
        }

        v.finish()?;

        match (
            title,
            description,
            category,
            difficulty,
            prep_time,
            cook_time,
            servings,
            image_url,
        ) {
            (
                Some(title),
                Some(description),
                Some(category),
                Some(difficulty),
                Some(prep_time),
                Some(cook_time),
                Some(servings),
                Some(image_url),
            ) => Ok(NewRecipe {
                title,
                description,
                category,
                ingredients,
                instructions,
                prep_time,
                cook_time,
                servings,
                difficulty,
                image_url,
                youtube_url,
                tags,
                nutrition: self.nutrition,
            }),
            _ => Err(ServiceError::invalid("body", "Validation failed")),
        }
    }
}

fn validate_ingredients(v: &mut Validator, drafts: Vec<IngredientDraft>) -> Vec<Ingredient> {
    if drafts.is_empty() {
        v.error("ingredients", "At least one ingredient is required");
        return Vec::new();
    }

    let mut ingredients = Vec::with_capacity(drafts.len());
    for (index, draft) in drafts.into_iter().enumerate() {
        let name = draft.name.map(|s| s.trim().to_string()).unwrap_or_default();
        let amount = draft.amount.map(|s| s.trim().to_string()).unwrap_or_default();
        if name.is_empty() {
            v.error(format!("ingredients[{}].name", index), "Ingredient name is required");
        }
        if amount.is_empty() {
            v.error(
                format!("ingredients[{}].amount", index),
                "Ingredient amount is required",
            );
        }
        ingredients.push(Ingredient {
            name,
            amount,
            unit: draft.unit.map(|s| s.trim().to_string()).unwrap_or_default(),
        });
    }
    ingredients
}

fn validate_instructions(v: &mut Validator, drafts: Vec<InstructionDraft>) -> Vec<Instruction> {
    if drafts.is_empty() {
        v.error("instructions", "At least one instruction is required");
        return Vec::new();
    }

    let mut instructions = Vec::with_capacity(drafts.len());
    for (index, draft) in drafts.into_iter().enumerate() {
        let step = match draft.step.and_then(|step| i32::try_from(step).ok()) {
            Some(step) if step >= 1 => step,
            _ => {
                v.error(
                    format!("instructions[{}].step", index),
                    "Step number must be a positive integer",
                );
                0
            }
        };
        let description = draft
            .description
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        if description.is_empty() {
            v.error(
                format!("instructions[{}].description", index),
                "Step description is required",
            );
        }
        instructions.push(Instruction { step, description });
    }
    instructions
}
