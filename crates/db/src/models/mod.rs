//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create/upsert DTO
//! - An update DTO (all `Option` fields) where the entity supports patches

pub mod biography;
pub mod category;
pub mod contact;
pub mod project;
pub mod role;
pub mod session;
pub mod user;
pub mod video_upload;
