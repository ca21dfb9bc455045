pub mod api;
pub mod config;
pub mod enrich;
pub mod output;
