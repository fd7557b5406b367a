//! Backend core for the Global Market Trend Visualizer dashboard.
//!
//! The dashboard's only real computation lives here: fetching country time
//! series from the World Bank, aligning them on their common years, and
//! fitting an OLS trendline per country. The remaining views (currency
//! conversion, news headlines, the world map) are thin wrappers over their
//! providers.

pub mod analysis;
pub mod catalog;
pub mod config;
pub mod core;
pub mod error;
pub mod fetcher;
pub mod models;

pub use error::{PipelineError, PipelineResult};
