//! Lead Scoring API Library
//!
//! This library scores sales leads on a 0-100 scale with a fixed,
//! multi-factor rule table, and serves the scored leads over HTTP with
//! basic filtering.
//!
//! # Modules
//!
//! - `api`: API definitions.
//! - `core`: Core business logic.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `loader`: CSV reading and writing of lead tables.
//! - `models`: Lead records, tables, filters and response models.
//! - `routes`: HTTP router and middleware.
//! - `scoring`: The lead scoring engine.
//! - `services`: The lead service (load, score, filter).

pub mod api;
pub mod core;

pub mod config;
pub mod errors;
pub mod handlers;
pub mod loader;
pub mod models;
pub mod routes;
pub mod scoring;
pub mod services;
