//! relief-planner
//!
//! Matches food donors to recipients and routes volunteers between them:
//! need normalization, geographic clustering, cluster rebalancing and
//! greedy pickup/drop-off routes.

pub mod traits;
pub mod records;
pub mod error;
pub mod haversine;
pub mod normalize;
pub mod cluster;
pub mod rebalance;
pub mod route;
pub mod planner;
pub mod polyline;
pub mod osrm;
pub mod presentation;

pub use error::{GeometryError, PlannerError};
pub use planner::{optimize, plan, PlanOptions, PlanResult};
