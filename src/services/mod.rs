//! Thin per-resource services.
//!
//! Each service method supplies a path, parameters, a cache key and a
//! resource-family tag to the request pipeline, then maps the raw JSON
//! payload onto a typed model. All resilience concerns live in the
//! pipeline.

pub mod articles;
pub mod categories;
pub mod identity;
pub mod types;
pub mod worlds;

#[cfg(test)]
pub(crate) mod testing;

pub use articles::{ArticlesService, ArticlesServiceImpl};
pub use categories::{CategoriesService, CategoriesServiceImpl};
pub use identity::{IdentityService, IdentityServiceImpl};
pub use types::{Article, Category, Granularity, Identity, ResourceRef, World};
pub use worlds::{WorldsService, WorldsServiceImpl};
