//! # YoursAI API Server Library
//!
//! This library provides the core functionality for the YoursAI backend.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers
//! - `services`: Outbound service clients (mail, payment gateway, Google)

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
pub mod services;
