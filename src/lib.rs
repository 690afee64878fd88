//! Test run server library.
//!
//! This library provides the core functionality for the test run server:
//! result ingestion, persistence, repository aggregate views, and the typed
//! client for the read API.

pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod mapper;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
