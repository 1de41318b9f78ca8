use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use crate::app::access::Caller;
use crate::domain::user::Tier;
use crate::http::AppError;
use crate::AppState;

/// Authenticated member. The tier is read from the store on every request,
/// so a subscription change is visible immediately.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: uuid::Uuid,
    pub tier: Tier,
}

impl AuthUser {
    pub fn caller(&self) -> Caller {
        Caller::Member {
            user_id: self.user_id,
            tier: self.tier,
        }
    }
}

/// Caller for routes that also serve anonymous requests. A missing or
/// unusable token means anonymous; store failures are still errors.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl MaybeAuthUser {
    pub fn caller(&self) -> Caller {
        self.0
            .as_ref()
            .map(AuthUser::caller)
            .unwrap_or(Caller::Anonymous)
    }

    pub fn tier(&self) -> Tier {
        self.0.as_ref().map(|auth| auth.tier).unwrap_or(Tier::Free)
    }
}

enum Bearer<'a> {
    Missing,
    Malformed,
    Token(&'a str),
}

fn bearer(parts: &Parts) -> Bearer<'_> {
    let Some(value) = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
    else {
        return Bearer::Missing;
    };
    match value.strip_prefix("Bearer ") {
        Some(token) => Bearer::Token(token),
        None => Bearer::Malformed,
    }
}

async fn member_for(state: &AppState, token: &str) -> Result<Option<AuthUser>, AppError> {
    let session = state
        .auth_service()
        .authenticate_access_token(token)
        .await
        .map_err(|err| AppError::from_service(err, "authenticating request"))?;

    Ok(session.map(|session| AuthUser {
        user_id: session.user_id,
        tier: session.tier,
    }))
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = match bearer(parts) {
            Bearer::Missing => return Err(AppError::unauthorized("Access token required")),
            Bearer::Malformed => {
                return Err(AppError::unauthorized("Invalid Authorization header"))
            }
            Bearer::Token(token) => token,
        };

        member_for(state, token)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid or expired token"))
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match bearer(parts) {
            Bearer::Missing | Bearer::Malformed => Ok(MaybeAuthUser(None)),
            Bearer::Token(token) => Ok(MaybeAuthUser(member_for(state, token).await?)),
        }
    }
}
