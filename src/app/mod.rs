pub mod access;
pub mod auth;
pub mod error;
pub mod favorites;
pub mod notifications;
pub mod query;
pub mod rate_limiter;
pub mod recipes;
pub mod subscriptions;
pub mod users;
pub mod validation;
