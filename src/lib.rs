//! Reading Atlas Library
//!
//! Loads institutional-economics course readings and their axis definitions,
//! builds 3D scatter figures from a per-session selection, and (with the
//! `web` feature) serves the interactive page over HTTP.

// Module declarations
pub mod config;
pub mod constants;
pub mod controller;
pub mod models;
pub mod services;
#[cfg(feature = "web")]
pub mod web;
