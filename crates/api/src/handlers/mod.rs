pub mod auth;
pub mod comments;
pub mod contact;
pub mod favorites;
pub mod media;
pub mod newsletter;
pub mod recipes;
pub mod users;
