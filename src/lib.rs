//! macrotrack Library
//!
//! Serving-unit parsing and normalization, unit conversion, and nutrition
//! aggregation across ingredients, recipes and daily logs.

pub mod build_info;
pub mod config;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod tools;
