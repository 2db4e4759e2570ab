//! Error types for planning runs and the presentation boundary.

use thiserror::Error;

/// Which input collection a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Donor,
    Recipient,
    Volunteer,
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Entity::Donor => "donor",
            Entity::Recipient => "recipient",
            Entity::Volunteer => "volunteer",
        };
        f.write_str(name)
    }
}

/// A planning run failed. No partial result is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlannerError {
    #[error("no volunteers available to serve clusters")]
    NoVolunteers,

    #[error("total people in need is zero, nothing to distribute")]
    ZeroTotalNeed,

    #[error("{entity} {id} has invalid coordinate ({latitude}, {longitude})")]
    InvalidCoordinate {
        entity: Entity,
        id: String,
        latitude: f64,
        longitude: f64,
    },

    #[error("donor {id} has invalid food availability {value}")]
    InvalidQuantity { id: String, value: f64 },

    #[error("duplicate {entity} id {id}")]
    DuplicateId { entity: Entity, id: String },

    #[error("partitioner returned {labels} labels and {centroids} centroids for {points} points in {clusters} clusters")]
    PartitionShape {
        points: usize,
        clusters: usize,
        labels: usize,
        centroids: usize,
    },

    #[error("partitioner assigned point {point} to cluster {label}, only {clusters} clusters exist")]
    PartitionLabel { point: usize, label: usize, clusters: usize },
}

impl PlannerError {
    /// True when the caller's records were rejected. A malformed partition from
    /// an injected `Partitioner` is not an input error.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            PlannerError::NoVolunteers
                | PlannerError::ZeroTotalNeed
                | PlannerError::InvalidCoordinate { .. }
                | PlannerError::InvalidQuantity { .. }
                | PlannerError::DuplicateId { .. }
        )
    }
}

/// The external routing service could not produce geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("routing service returned {code}: {message}")]
    Service { code: String, message: String },

    #[error("routing service returned no result")]
    EmptyResponse,
}
