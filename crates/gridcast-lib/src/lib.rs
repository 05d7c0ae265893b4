//! Core library for the race outcome prediction service
//!
//! This crate provides:
//! - Data models for laps, classifications and derived features
//! - Per-driver feature derivation (tyre strategy, pace, consistency)
//! - Ranking of regressor outputs into a finishing order
//! - ONNX regressor inference
//! - Upstream session data access with synthetic stand-in data
//! - Health checks and metrics

pub mod error;
pub mod features;
pub mod health;
pub mod models;
pub mod observability;
pub mod predictor;
pub mod provider;

pub use error::Error;
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::ServiceMetrics;
