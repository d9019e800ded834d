//! Row structs and DTOs.
//!
//! Entity structs derive `FromRow` + `Serialize` and match the column lists
//! of their repository. Password hashes never leave [`user::User`].

pub mod comment;
pub mod contact;
pub mod recipe;
pub mod user;
