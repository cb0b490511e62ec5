pub mod astro;
pub mod config;
pub mod error;
pub mod manglik;
pub mod matching;
pub mod service;
pub mod telemetry;
