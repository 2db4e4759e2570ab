//! Test fixtures for relief-planner.
//!
//! Provides:
//! - Named NGO and shelter locations in two cities about 120 km apart
//! - Builders for donors, recipients and volunteers

#![allow(dead_code, unused_imports)]

pub mod builders;
pub mod city_locations;

pub use builders::*;
pub use city_locations::*;
