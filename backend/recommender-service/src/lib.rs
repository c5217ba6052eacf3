pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use config::Config;
pub use error::{RecommendError, Result};
pub use services::{ItemCfEngine, Recommender, UserCfEngine};
pub use store::{CatalogStore, InMemoryCatalog};
