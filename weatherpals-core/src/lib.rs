//! Core library for the `weatherpals` CLI.
//!
//! This crate defines:
//! - The normalized weather snapshot and condition codes
//! - Event suitability scoring and activity recommendations (pure functions)
//! - Report export to JSON and CSV
//! - Request validation and location resolution
//! - Configuration & credentials handling
//! - Abstraction over weather providers
//!
//! It is used by `weatherpals-cli`, but can also be reused by other binaries or services.

pub mod activities;
pub mod condition;
pub mod config;
pub mod describe;
pub mod error;
pub mod event;
pub mod export;
pub mod location;
pub mod model;
pub mod provider;
pub mod request;
pub mod scorer;

pub use activities::{Activity, Recommendations, recommend};
pub use condition::{ConditionFlags, WeatherCondition};
pub use config::{Config, ProviderConfig};
pub use error::RequestError;
pub use event::EventKind;
pub use export::AnalysisReport;
pub use location::{Geocoder, Location, resolve_location};
pub use model::{PrecipitationBreakdown, WeatherRequest, WeatherResponse, WeatherSnapshot};
pub use provider::{ProviderId, WeatherProvider};
pub use request::AnalysisRequest;
pub use scorer::{AdviceItem, Assessment, Level, score};
