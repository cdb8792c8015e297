//! Core library for the `weatherboard` CLI.
//!
//! This crate defines:
//! - Configuration handling
//! - The weather provider abstraction and its OpenWeatherMap client
//! - The per-city fetch loop, table building and dashboard rendering
//!
//! It is used by `weatherboard-cli`, but can also be reused by other binaries or services.

pub mod chart;
pub mod config;
pub mod error;
pub mod fetch;
pub mod input;
pub mod model;
pub mod provider;
pub mod table;

pub use chart::{RenderOutcome, RenderSummary, render_dashboard};
pub use config::Config;
pub use error::{FetchError, InputError};
pub use fetch::fetch_all;
pub use model::{FetchFailure, FetchReport, WeatherRecord};
pub use provider::{WeatherProvider, provider_from_config};
pub use table::WeatherTable;
