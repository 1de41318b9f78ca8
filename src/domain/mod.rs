pub mod notification;
pub mod recipe;
pub mod subscription;
pub mod user;
