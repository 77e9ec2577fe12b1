// lib.rs - Library exports for the scripts in src/bin and integration tests

pub mod bootstrap;
pub mod chain;
pub mod config;
pub mod engine;
pub mod error;
pub mod math;
pub mod models;
