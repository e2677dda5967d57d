//! Core library for the `weather-mcp` server.
//!
//! This crate defines:
//! - The static city table and its resolver
//! - The upstream provider client and its wire types
//! - Normalization and text formatting of the three report kinds
//! - The dispatcher that turns a `(report kind, city)` call into a response
//!
//! It is used by `weather-mcp`, but can also be reused by other binaries or services.

pub mod city;
pub mod config;
pub mod error;
pub mod format;
pub mod icon;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod provider;

pub use city::{CityEntry, CityTable, UnsupportedCity};
pub use config::{Config, ProviderConfig};
pub use error::WeatherError;
pub use model::{WeatherBlock, WeatherEnvelope};
pub use pipeline::{Dispatcher, ReportKind, ToolOutcome};
pub use provider::{MeizuProvider, WeatherProvider};
