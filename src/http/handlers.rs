use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::app::access::{feature_matrix, visibility_filter, FeatureMatrix, TierChange};
use crate::app::auth::TokenPair;
use crate::app::error::ServiceError;
use crate::app::favorites::FavoriteService;
use crate::app::notifications::{NotificationPage, NotificationService};
use crate::app::query::{
    build_listing_query, normalize_search, PageRequest, RecipeFilters, DEFAULT_NOTIFICATION_LIMIT,
    DEFAULT_RECIPE_LIMIT,
};
use crate::app::recipes::{RecipePage, RecipeService, UploadedRecipe};
use crate::app::subscriptions::{SubscriptionService, TierChanged};
use crate::app::users::UserService;
use crate::app::validation::{looks_like_email, RecipeDraft, Validator};
use crate::domain::notification::Notification;
use crate::domain::recipe::{Category, Recipe, RecipeSummary, Timed};
use crate::domain::subscription::{all_plans, plan_for, Plan};
use crate::domain::user::{DietaryPreference, FavoriteRef, Tier, User, UserProfile};
use crate::http::auth::MaybeAuthUser;
use crate::http::{AppError, AuthUser};
use crate::AppState;

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 50;
const PASSWORD_MIN_CHARS: usize = 6;
const PASSWORD_MAX_CHARS: usize = 128;

fn fail(context: &'static str) -> impl Fn(ServiceError) -> AppError {
    move |err| AppError::from_service(err, context)
}

/// Path ids that do not parse are reported the same way as unknown ids.
fn parse_id(raw: &str, not_found: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found(not_found))
}

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
}

pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let db = state.db.ping().await.is_ok();
    let redis = state.cache.ping().await.is_ok();
    let status = if db && redis { "ok" } else { "degraded" };

    Json(HealthResponse { status })
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// Accounts

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(with = "time::serde::rfc3339")]
    pub access_expires_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub refresh_expires_at: OffsetDateTime,
}

impl From<TokenPair> for AuthTokenResponse {
    fn from(tokens: TokenPair) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            access_expires_at: tokens.access_expires_at,
            refresh_expires_at: tokens.refresh_expires_at,
        }
    }
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user: User,
    #[serde(flatten)]
    pub tokens: AuthTokenResponse,
}

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let Json(payload) = payload?;
    let mut v = Validator::new();

    let name = payload.name.unwrap_or_default().trim().to_string();
    v.text_length("name", &name, NAME_MIN_CHARS, NAME_MAX_CHARS);
    let email = payload.email.unwrap_or_default().trim().to_string();
    if !looks_like_email(&email) {
        v.error("email", "Please provide a valid email");
    }
    let password = payload.password.unwrap_or_default();
    v.text_length("password", &password, PASSWORD_MIN_CHARS, PASSWORD_MAX_CHARS);
    v.finish().map_err(fail("registering user"))?;

    let (user, tokens) = state
        .auth_service()
        .register(name, email, &password)
        .await
        .map_err(fail("registering user"))?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully",
            user,
            tokens: tokens.into(),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthTokenResponse>, AppError> {
    let Json(payload) = payload?;
    let email = payload.email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    let mut v = Validator::new();
    if email.trim().is_empty() {
        v.error("email", "Email is required");
    }
    if password.is_empty() {
        v.error("password", "Password is required");
    } else if password.chars().count() > PASSWORD_MAX_CHARS {
        v.error("password", "Password must be at most 128 characters");
    }
    v.finish().map_err(fail("logging in"))?;

    let tokens = state
        .auth_service()
        .login(&email, &password)
        .await
        .map_err(fail("logging in"))?;

    match tokens {
        Some(tokens) => Ok(Json(tokens.into())),
        None => Err(AppError::unauthorized("Invalid credentials")),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

fn required_refresh_token(payload: RefreshRequest) -> Result<String, AppError> {
    payload
        .refresh_token
        .filter(|token| !token.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("refreshToken", "Refresh token is required"))
}

pub async fn refresh_token(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<AuthTokenResponse>, AppError> {
    let Json(payload) = payload?;
    let refresh_token = required_refresh_token(payload)?;

    let tokens = state
        .auth_service()
        .refresh(&refresh_token)
        .await
        .map_err(fail("refreshing token"))?;

    match tokens {
        Some(tokens) => Ok(Json(tokens.into())),
        None => Err(AppError::unauthorized("Invalid refresh token")),
    }
}

pub async fn logout(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(payload) = payload?;
    let refresh_token = required_refresh_token(payload)?;

    let revoked = state
        .auth_service()
        .revoke_refresh_token(&refresh_token)
        .await
        .map_err(fail("logging out"))?;

    if revoked {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::unauthorized("Invalid refresh token"))
    }
}

#[derive(Serialize)]
pub struct UserResponse {
    pub user: User,
}

pub async fn get_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserService::new(state.db.clone())
        .get_user(auth.user_id)
        .await
        .map_err(fail("fetching current user"))?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(UserResponse { user }))
}

// Profile

#[derive(Serialize)]
pub struct ProfileResponse {
    pub user: UserProfile,
}

pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = UserService::new(state.db.clone())
        .get_profile(auth.user_id)
        .await
        .map_err(fail("fetching profile"))?;

    Ok(Json(ProfileResponse { user }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub dietary_preferences: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct UpdatedProfileResponse {
    pub message: &'static str,
    pub user: User,
}

pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<UpdatedProfileResponse>, AppError> {
    let Json(payload) = payload?;
    let mut v = Validator::new();

    let name = payload.name.map(|name| name.trim().to_string());
    if let Some(name) = name.as_deref() {
        v.text_length("name", name, NAME_MIN_CHARS, NAME_MAX_CHARS);
    }
    let dietary_preferences = payload.dietary_preferences.map(|values| {
        values
            .iter()
            .enumerate()
            .filter_map(|(index, value)| {
                v.one_of(
                    &format!("dietaryPreferences[{}]", index),
                    Some(value.as_str()),
                    DietaryPreference::parse,
                    "Invalid dietary preference",
                )
            })
            .collect::<Vec<_>>()
    });
    v.finish().map_err(fail("updating profile"))?;

    let user = UserService::new(state.db.clone())
        .update_profile(auth.user_id, name, dietary_preferences)
        .await
        .map_err(fail("updating profile"))?;

    Ok(Json(UpdatedProfileResponse {
        message: "Profile updated successfully",
        user,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(payload) = payload?;
    let mut v = Validator::new();

    let current_password = payload.current_password.unwrap_or_default();
    if current_password.is_empty() {
        v.error("currentPassword", "Current password is required");
    }
    let new_password = payload.new_password.unwrap_or_default();
    v.text_length(
        "newPassword",
        &new_password,
        PASSWORD_MIN_CHARS,
        PASSWORD_MAX_CHARS,
    );
    v.finish().map_err(fail("changing password"))?;

    UserService::new(state.db.clone())
        .change_password(auth.user_id, &current_password, &new_password)
        .await
        .map_err(fail("changing password"))?;

    Ok(Json(MessageResponse {
        message: "Password updated successfully",
    }))
}

// Favorites

#[derive(Serialize)]
pub struct FavoritesResponse {
    pub favorites: Vec<Timed<RecipeSummary>>,
}

pub async fn list_favorites(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<FavoritesResponse>, AppError> {
    let favorites = FavoriteService::new(state.db.clone())
        .list(&auth.caller())
        .await
        .map_err(fail("fetching favorites"))?;

    Ok(Json(FavoritesResponse { favorites }))
}

#[derive(Serialize)]
pub struct FavoriteAddedResponse {
    pub message: &'static str,
    pub recipe: FavoriteRef,
}

pub async fn add_favorite(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(recipe_id): Path<String>,
) -> Result<Json<FavoriteAddedResponse>, AppError> {
    let recipe_id = parse_id(&recipe_id, "Recipe not found")?;
    let recipe = FavoriteService::new(state.db.clone())
        .add(&auth.caller(), recipe_id)
        .await
        .map_err(fail("adding favorite"))?;

    Ok(Json(FavoriteAddedResponse {
        message: "Recipe added to favorites",
        recipe,
    }))
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(recipe_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let recipe_id = parse_id(&recipe_id, "Recipe not found in favorites")?;
    FavoriteService::new(state.db.clone())
        .remove(&auth.caller(), recipe_id)
        .await
        .map_err(fail("removing favorite"))?;

    Ok(Json(MessageResponse {
        message: "Recipe removed from favorites",
    }))
}

// Recipes

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub search: Option<String>,
    pub is_premium: Option<String>,
}

pub async fn list_recipes(
    State(state): State<AppState>,
    auth: MaybeAuthUser,
    Query(params): Query<RecipeListQuery>,
) -> Result<Json<RecipePage>, AppError> {
    let caller = auth.caller();
    let mut v = Validator::new();
    let page = PageRequest::from_query(
        params.page.as_deref(),
        params.limit.as_deref(),
        DEFAULT_RECIPE_LIMIT,
        &mut v,
    );
    let filters = RecipeFilters::from_query(
        params.category.as_deref(),
        params.difficulty.as_deref(),
        params.is_premium.as_deref(),
        params.search.as_deref(),
        &mut v,
    );
    v.finish().map_err(fail("fetching recipes"))?;

    let query = build_listing_query(page, filters, visibility_filter(&caller));
    let recipes = RecipeService::new(state.db.clone())
        .list(&query)
        .await
        .map_err(fail("fetching recipes"))?;

    Ok(Json(recipes))
}

#[derive(Serialize)]
pub struct FeaturedResponse {
    pub recipes: Vec<Timed<RecipeSummary>>,
}

pub async fn featured_recipes(
    State(state): State<AppState>,
    auth: MaybeAuthUser,
) -> Result<Json<FeaturedResponse>, AppError> {
    let recipes = RecipeService::new(state.db.clone())
        .featured(&auth.caller())
        .await
        .map_err(fail("fetching featured recipes"))?;

    Ok(Json(FeaturedResponse { recipes }))
}

#[derive(Deserialize)]
pub struct CategoryQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Serialize)]
pub struct CategoryResponse {
    #[serde(flatten)]
    pub page: RecipePage,
    pub category: Category,
}

pub async fn recipes_by_category(
    State(state): State<AppState>,
    auth: MaybeAuthUser,
    Path(category): Path<String>,
    Query(params): Query<CategoryQuery>,
) -> Result<Json<CategoryResponse>, AppError> {
    let caller = auth.caller();
    let mut v = Validator::new();
    let category = v.one_of(
        "category",
        Some(category.as_str()),
        Category::parse,
        "Invalid category",
    );
    let page = PageRequest::from_query(
        params.page.as_deref(),
        params.limit.as_deref(),
        DEFAULT_RECIPE_LIMIT,
        &mut v,
    );
    v.finish().map_err(fail("fetching recipes by category"))?;
    let Some(category) = category else {
        return Err(AppError::bad_request("category", "Invalid category"));
    };

    let filters = RecipeFilters {
        category: Some(category),
        ..RecipeFilters::default()
    };
    let query = build_listing_query(page, filters, visibility_filter(&caller));
    let page = RecipeService::new(state.db.clone())
        .list(&query)
        .await
        .map_err(fail("fetching recipes by category"))?;

    Ok(Json(CategoryResponse { page, category }))
}

#[derive(Serialize)]
pub struct RecipeResponse {
    pub recipe: Timed<Recipe>,
}

pub async fn get_recipe(
    State(state): State<AppState>,
    auth: MaybeAuthUser,
    Path(recipe_id): Path<String>,
) -> Result<Json<RecipeResponse>, AppError> {
    let recipe_id = parse_id(&recipe_id, "Recipe not found")?;
    let recipe = RecipeService::new(state.db.clone())
        .get(&auth.caller(), recipe_id)
        .await
        .map_err(fail("fetching recipe"))?;

    Ok(Json(RecipeResponse { recipe }))
}

#[derive(Default, Deserialize)]
pub struct SearchFilters {
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub page: Option<Value>,
    pub limit: Option<Value>,
}

#[derive(Deserialize)]
pub struct SearchRequest {
    pub query: Option<String>,
    #[serde(default)]
    pub filters: Option<SearchFilters>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    #[serde(flatten)]
    pub page: RecipePage,
    pub query: String,
}

/// Accepts page numbers sent either as JSON numbers or as strings.
fn number_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Number(number) => Some(number.to_string()),
        Value::String(text) => Some(text.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

pub async fn search_recipes(
    State(state): State<AppState>,
    auth: MaybeAuthUser,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, AppError> {
    let Json(payload) = payload?;
    let caller = auth.caller();
    let filters = payload.filters.unwrap_or_default();
    let mut v = Validator::new();

    let search = normalize_search(payload.query.as_deref(), &mut v);
    if search.is_none() && v.is_empty() {
        v.error("query", "Search query is required");
    }
    let page_text = number_text(filters.page.as_ref());
    let limit_text = number_text(filters.limit.as_ref());
    let page = PageRequest::from_query(
        page_text.as_deref(),
        limit_text.as_deref(),
        DEFAULT_RECIPE_LIMIT,
        &mut v,
    );
    let mut recipe_filters = RecipeFilters::from_query(
        filters.category.as_deref(),
        filters.difficulty.as_deref(),
        None,
        None,
        &mut v,
    );
    v.finish().map_err(fail("searching recipes"))?;
    recipe_filters.search = search.clone();

    let query = build_listing_query(page, recipe_filters, visibility_filter(&caller));
    let page = RecipeService::new(state.db.clone())
        .list(&query)
        .await
        .map_err(fail("searching recipes"))?;

    Ok(Json(SearchResponse {
        page,
        query: search.unwrap_or_default(),
    }))
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub recipe: UploadedRecipe,
}

pub async fn upload_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<RecipeDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let Json(draft) = payload?;
    let recipe = RecipeService::new(state.db.clone())
        .upload(&auth.caller(), draft)
        .await
        .map_err(fail("uploading recipe"))?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: "Recipe uploaded successfully! It will be reviewed before being published.",
            recipe,
        }),
    ))
}

// Subscriptions

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlansResponse {
    pub plans: [&'static Plan; 3],
    pub current_user_plan: Tier,
}

pub async fn list_plans(auth: MaybeAuthUser) -> Json<PlansResponse> {
    Json(PlansResponse {
        plans: all_plans(),
        current_user_plan: auth.tier(),
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatusResponse {
    pub current_plan: Tier,
    pub plan_details: &'static Plan,
    pub is_active: bool,
    pub features: &'static [&'static str],
    pub limitations: &'static [&'static str],
}

pub async fn subscription_status(auth: AuthUser) -> Json<SubscriptionStatusResponse> {
    let plan = plan_for(auth.tier);
    Json(SubscriptionStatusResponse {
        current_plan: auth.tier,
        plan_details: plan,
        is_active: true,
        features: plan.features,
        limitations: plan.limitations,
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturesResponse {
    pub available_features: &'static [&'static str],
    pub limitations: &'static [&'static str],
    #[serde(flatten)]
    pub matrix: FeatureMatrix,
}

pub async fn subscription_features(auth: AuthUser) -> Json<FeaturesResponse> {
    let plan = plan_for(auth.tier);
    Json(FeaturesResponse {
        available_features: plan.features,
        limitations: plan.limitations,
        matrix: feature_matrix(auth.tier),
    })
}

#[derive(Deserialize)]
pub struct ChangePlanRequest {
    pub plan: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierChangedResponse {
    pub message: String,
    pub new_plan: Tier,
    pub plan_details: &'static Plan,
    pub user: User,
}

impl From<TierChanged> for TierChangedResponse {
    fn from(changed: TierChanged) -> Self {
        let tier = changed.user.subscription;
        Self {
            message: changed.message,
            new_plan: tier,
            plan_details: plan_for(tier),
            user: changed.user,
        }
    }
}

async fn change_plan(
    state: AppState,
    auth: AuthUser,
    payload: Result<Json<ChangePlanRequest>, JsonRejection>,
    change: TierChange,
    context: &'static str,
) -> Result<Json<TierChangedResponse>, AppError> {
    let Json(payload) = payload?;
    let requested = payload
        .plan
        .as_deref()
        .map(str::trim)
        .and_then(Tier::parse)
        .ok_or_else(|| AppError::bad_request("plan", "Invalid subscription plan"))?;

    let changed = SubscriptionService::new(state.db.clone())
        .change_tier(auth.user_id, auth.tier, requested, change)
        .await
        .map_err(fail(context))?;

    Ok(Json(changed.into()))
}

pub async fn upgrade_subscription(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<ChangePlanRequest>, JsonRejection>,
) -> Result<Json<TierChangedResponse>, AppError> {
    change_plan(
        state,
        auth,
        payload,
        TierChange::Upgrade,
        "upgrading subscription",
    )
    .await
}

pub async fn downgrade_subscription(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<ChangePlanRequest>, JsonRejection>,
) -> Result<Json<TierChangedResponse>, AppError> {
    change_plan(
        state,
        auth,
        payload,
        TierChange::Downgrade,
        "downgrading subscription",
    )
    .await
}

#[derive(Deserialize)]
pub struct RedeemRequest {
    pub code: Option<String>,
}

pub async fn redeem_coupon(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<RedeemRequest>, JsonRejection>,
) -> Result<Json<TierChangedResponse>, AppError> {
    let Json(payload) = payload?;
    let code = payload
        .code
        .filter(|code| !code.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("code", "Coupon code is required"))?;

    let changed = SubscriptionService::new(state.db.clone())
        .redeem(auth.user_id, auth.tier, &code)
        .await
        .map_err(fail("redeeming coupon"))?;

    Ok(Json(changed.into()))
}

// Notifications

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub unread_only: Option<String>,
}

pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<NotificationQuery>,
) -> Result<Json<NotificationPage>, AppError> {
    let mut v = Validator::new();
    let page = PageRequest::from_query(
        params.page.as_deref(),
        params.limit.as_deref(),
        DEFAULT_NOTIFICATION_LIMIT,
        &mut v,
    );
    let unread_only = match params.unread_only.as_deref().map(str::trim) {
        None | Some("") | Some("false") => false,
        Some("true") => true,
        Some(_) => {
            v.error("unreadOnly", "unreadOnly must be a boolean");
            false
        }
    };
    v.finish().map_err(fail("fetching notifications"))?;

    let notifications = NotificationService::new(state.db.clone())
        .list(auth.user_id, page, unread_only)
        .await
        .map_err(fail("fetching notifications"))?;

    Ok(Json(notifications))
}

#[derive(Serialize)]
pub struct NotificationReadResponse {
    pub message: &'static str,
    pub notification: Notification,
}

pub async fn mark_notification_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(notification_id): Path<String>,
) -> Result<Json<NotificationReadResponse>, AppError> {
    let notification_id = parse_id(&notification_id, "Notification not found")?;
    let notification = NotificationService::new(state.db.clone())
        .mark_read(notification_id, auth.user_id)
        .await
        .map_err(fail("updating notification"))?;

    Ok(Json(NotificationReadResponse {
        message: "Notification marked as read",
        notification,
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAllReadResponse {
    pub message: &'static str,
    pub updated_count: u64,
}

pub async fn mark_all_notifications_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MarkAllReadResponse>, AppError> {
    let updated_count = NotificationService::new(state.db.clone())
        .mark_all_read(auth.user_id)
        .await
        .map_err(fail("updating notifications"))?;

    Ok(Json(MarkAllReadResponse {
        message: "All notifications marked as read",
        updated_count,
    }))
}

pub async fn delete_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(notification_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let notification_id = parse_id(&notification_id, "Notification not found")?;
    NotificationService::new(state.db.clone())
        .delete(notification_id, auth.user_id)
        .await
        .map_err(fail("deleting notification"))?;

    Ok(Json(MessageResponse {
        message: "Notification deleted successfully",
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountResponse {
    pub unread_count: i64,
}

pub async fn unread_notification_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UnreadCountResponse>, AppError> {
    let unread_count = NotificationService::new(state.db.clone())
        .unread_count(auth.user_id)
        .await
        .map_err(fail("fetching unread count"))?;

    Ok(Json(UnreadCountResponse { unread_count }))
}
