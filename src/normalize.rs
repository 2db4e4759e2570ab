//! Supply/demand normalization.
//!
//! When donors cannot cover total need, every recipient's need is scaled by
//! `total_supply / total_need` and rounded. Each term rounds independently, so
//! the adjusted total may exceed supply by at most one unit per recipient.

use tracing::debug;

use crate::error::PlannerError;
use crate::traits::{Donor, Recipient};

/// Totals and per-recipient adjusted need for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedNeed {
    pub total_supply: f64,
    pub total_need: u64,
    /// Applied scale factor, `None` when supply already covers need.
    pub scale: Option<f64>,
    /// Adjusted need per recipient, in input order.
    pub adjusted: Vec<u32>,
}

impl NormalizedNeed {
    /// Sum of adjusted need across recipients.
    pub fn adjusted_total(&self) -> u64 {
        self.adjusted.iter().map(|&need| need as u64).sum()
    }
}

/// Scales recipient need down to total donor supply when supply falls short.
///
/// Fails with `PlannerError::ZeroTotalNeed` when no recipient needs anything.
pub fn normalize_need<D, R>(donors: &[D], recipients: &[R]) -> Result<NormalizedNeed, PlannerError>
where
    D: Donor,
    R: Recipient,
{
    let total_supply: f64 = donors.iter().map(|donor| donor.food_availability()).sum();
    let total_need: u64 = recipients
        .iter()
        .map(|recipient| recipient.people_in_need() as u64)
        .sum();

    if total_need == 0 {
        return Err(PlannerError::ZeroTotalNeed);
    }

    if total_supply >= total_need as f64 {
        return Ok(NormalizedNeed {
            total_supply,
            total_need,
            scale: None,
            adjusted: recipients.iter().map(|r| r.people_in_need()).collect(),
        });
    }

    let scale = total_supply / total_need as f64;
    let adjusted = recipients
        .iter()
        .map(|recipient| (recipient.people_in_need() as f64 * scale).round_ties_even() as u32)
        .collect();

    debug!(total_supply, total_need, scale, "scaled recipient need to supply");

    Ok(NormalizedNeed {
        total_supply,
        total_need,
        scale: Some(scale),
        adjusted,
    })
}
