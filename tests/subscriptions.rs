//! Subscription Tests
//!
//! Covers the plan catalogue, tier changes, coupons and how a tier change
//! affects access on the next request.

mod common;

use axum::http::StatusCode;
use common::{app, RecipeSeed};
use serde_json::json;

#[tokio::test]
async fn plans_are_public() {
    let app = app().await;

    let resp = app.get("/api/subscriptions/plans", None).await;

    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["currentUserPlan"], "free");
    let tiers: Vec<&str> = body["plans"]
        .as_array()
        .unwrap()
        .iter()
        .map(|plan| plan["tier"].as_str().unwrap())
        .collect();
    assert_eq!(tiers, vec!["free", "standard", "premium"]);
}

#[tokio::test]
async fn plans_show_member_tier() {
    let app = app().await;
    let user = app.create_user("plans_member", "premium").await;

    let resp = app.get("/api/subscriptions/plans", user.token()).await;

    assert_eq!(resp.json()["currentUserPlan"], "premium");
}

#[tokio::test]
async fn status_and_features_follow_tier() {
    let app = app().await;
    let user = app.create_user("status", "standard").await;

    let status = app.get("/api/subscriptions/status", user.token()).await;
    assert_eq!(status.status, StatusCode::OK);
    assert_eq!(status.json()["currentPlan"], "standard");
    assert_eq!(status.json()["planDetails"]["name"], "Standard");
    assert_eq!(status.json()["isActive"], true);

    let features = app.get("/api/subscriptions/features", user.token()).await;
    assert_eq!(features.status, StatusCode::OK);
    let body = features.json();
    assert_eq!(body["canAccessPremiumRecipes"], true);
    assert_eq!(body["canSaveFavorites"], true);
    assert_eq!(body["canDownloadRecipes"], false);
    assert_eq!(body["canAccessLiveClasses"], false);
    assert!(body["availableFeatures"].is_array());
}

#[tokio::test]
async fn status_requires_authentication() {
    let app = app().await;

    let resp = app.get("/api/subscriptions/status", None).await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn upgrade_changes_tier_and_notifies() {
    let app = app().await;
    let user = app.create_user("upgrade", "free").await;

    let resp = app
        .post_json(
            "/api/subscriptions/upgrade",
            json!({ "plan": "standard" }),
            user.token(),
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["message"], "Successfully upgraded to standard plan!");
    assert_eq!(body["newPlan"], "standard");
    assert_eq!(body["user"]["subscription"], "standard");
    assert_eq!(app.user_tier(user.id).await.as_deref(), Some("standard"));

    let unread = app
        .get("/api/notifications/unread-count", user.token())
        .await;
    assert_eq!(unread.json()["unreadCount"], 1);
}

#[tokio::test]
async fn upgrade_to_same_or_lower_conflicts() {
    let app = app().await;
    let user = app.create_user("upgrade_same", "standard").await;

    for plan in ["standard", "free"] {
        let resp = app
            .post_json(
                "/api/subscriptions/upgrade",
                json!({ "plan": plan }),
                user.token(),
            )
            .await;
        assert_eq!(resp.status, StatusCode::CONFLICT, "{}", plan);
        assert_eq!(
            resp.message(),
            format!(
                "You are already on standard plan or higher, cannot upgrade to {} plan",
                plan
            )
        );
    }
    assert_eq!(app.user_tier(user.id).await.as_deref(), Some("standard"));
}

#[tokio::test]
async fn unknown_plan_is_rejected() {
    let app = app().await;
    let user = app.create_user("upgrade_unknown", "free").await;

    let resp = app
        .post_json(
            "/api/subscriptions/upgrade",
            json!({ "plan": "platinum" }),
            user.token(),
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json()["errors"][0]["field"], "plan");
}

#[tokio::test]
async fn downgrade_premium_to_standard() {
    let app = app().await;
    let user = app.create_user("downgrade", "premium").await;

    let resp = app
        .post_json(
            "/api/subscriptions/downgrade",
            json!({ "plan": "standard" }),
            user.token(),
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["message"], "Successfully downgraded to standard plan");
    assert_eq!(app.user_tier(user.id).await.as_deref(), Some("standard"));
}

#[tokio::test]
async fn downgrade_must_go_lower() {
    let app = app().await;
    let free = app.create_user("downgrade_free", "free").await;
    let standard = app.create_user("downgrade_up", "standard").await;

    let from_free = app
        .post_json(
            "/api/subscriptions/downgrade",
            json!({ "plan": "free" }),
            free.token(),
        )
        .await;
    assert_eq!(from_free.status, StatusCode::CONFLICT);
    assert_eq!(
        from_free.message(),
        "You are already on free plan or lower, cannot downgrade to free plan"
    );

    let to_premium = app
        .post_json(
            "/api/subscriptions/downgrade",
            json!({ "plan": "premium" }),
            standard.token(),
        )
        .await;
    assert_eq!(to_premium.status, StatusCode::CONFLICT);
    assert!(to_premium.message().contains("premium"));
}

#[tokio::test]
async fn coupons_upgrade_tier() {
    let app = app().await;
    let user = app.create_user("coupon", "free").await;

    let standard = app
        .post_json(
            "/api/subscriptions/redeem",
            json!({ "code": " stan100 " }),
            user.token(),
        )
        .await;
    assert_eq!(standard.status, StatusCode::OK);
    assert_eq!(standard.json()["message"], "Coupon applied. Upgraded to standard plan!");

    // The token still carries the caller; the tier is read from the store
    let premium = app
        .post_json(
            "/api/subscriptions/redeem",
            json!({ "code": "PRUM100" }),
            user.token(),
        )
        .await;
    assert_eq!(premium.status, StatusCode::OK);
    assert_eq!(premium.json()["newPlan"], "premium");
    assert_eq!(app.user_tier(user.id).await.as_deref(), Some("premium"));
}

#[tokio::test]
async fn invalid_coupon_is_rejected() {
    let app = app().await;
    let user = app.create_user("coupon_bad", "free").await;

    let resp = app
        .post_json(
            "/api/subscriptions/redeem",
            json!({ "code": "FREEFOOD" }),
            user.token(),
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json()["errors"][0]["field"], "code");
    assert_eq!(resp.json()["errors"][0]["message"], "Invalid coupon code");
}

#[tokio::test]
async fn coupon_below_current_tier_conflicts() {
    let app = app().await;
    let user = app.create_user("coupon_low", "premium").await;

    let resp = app
        .post_json(
            "/api/subscriptions/redeem",
            json!({ "code": "STAN100" }),
            user.token(),
        )
        .await;

    assert_eq!(resp.status, StatusCode::CONFLICT);
    assert!(resp.message().ends_with("cannot upgrade to standard plan"));
    assert_eq!(app.user_tier(user.id).await.as_deref(), Some("premium"));
}

#[tokio::test]
async fn upgrade_unlocks_premium_recipe_with_same_token() {
    let app = app().await;
    let user = app.create_user("upgrade_unlock", "free").await;
    let recipe_id = app
        .create_recipe(RecipeSeed::new("Reward dish").premium())
        .await;
    let path = format!("/api/recipes/{}", recipe_id);

    assert_eq!(
        app.get(&path, user.token()).await.status,
        StatusCode::FORBIDDEN
    );

    let upgrade = app
        .post_json(
            "/api/subscriptions/upgrade",
            json!({ "plan": "standard" }),
            user.token(),
        )
        .await;
    assert_eq!(upgrade.status, StatusCode::OK);

    assert_eq!(app.get(&path, user.token()).await.status, StatusCode::OK);
}
