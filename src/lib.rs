pub mod config;
pub mod geojson;
pub mod loader;
pub mod metrics;
pub mod output;
pub mod pipeline;
pub mod web;
