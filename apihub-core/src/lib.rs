//! Core library for the `apihub` service.
//!
//! This crate defines:
//! - Configuration (TOML file plus environment overrides)
//! - The upstream HTTP client for the weather, quotes and countries APIs
//! - Normalization of upstream JSON into stable entities
//! - Offset pagination
//! - Use cases shared by `apihub-server` and `apihub-cli`

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod pagination;
pub mod upstream;
pub mod usecase;
pub mod validate;

pub use config::{AppSettings, Config, ServiceConfig};
pub use error::{ServiceError, ServiceResult};
pub use model::{Country, Currency, Language, Page, Quote, WeatherReport};
pub use pagination::PageRequest;
pub use upstream::{ServiceKind, Upstream};
pub use usecase::Services;
