pub mod config;
pub mod engine;
pub mod error;
pub mod io;
pub mod item;
pub mod notify;
pub mod orchestrator;
pub mod provider;
pub mod schedule;
pub mod store;

pub use error::{Result, TrackError};
