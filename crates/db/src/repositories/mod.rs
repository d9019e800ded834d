//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Recipe-reading methods also take
//! the startup [`SchemaCapabilities`](crate::SchemaCapabilities).

pub mod comment_repo;
pub mod contact_repo;
pub mod favorite_repo;
pub mod ingredient_repo;
pub mod rating_repo;
pub mod recipe_repo;
pub mod subscriber_repo;
pub mod user_repo;

pub use comment_repo::CommentRepo;
pub use contact_repo::ContactRepo;
pub use favorite_repo::FavoriteRepo;
pub use ingredient_repo::IngredientRepo;
pub use rating_repo::RatingRepo;
pub use recipe_repo::RecipeRepo;
pub use subscriber_repo::SubscriberRepo;
pub use user_repo::UserRepo;
