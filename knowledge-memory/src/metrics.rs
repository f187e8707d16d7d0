//! Flow metrics
//!
//! Synthetic display aggregates projected from the number of documentation
//! nodes. The formulas are fixed; consumers render these exact numbers.

use serde::{Deserialize, Serialize};

/// Aggregates derived from the documentation node count
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowMetrics {
    /// `min(65 + n * 4, 99)`
    pub efficiency: u64,
    /// `12 + floor(n / 2)`
    pub lead_ingestion: u64,
    /// `64 + n * 1.2`
    pub conversion_rate: f64,
    /// `42 + n * 0.8`
    pub close_rate: f64,
    /// `124500 + n * 3200`
    pub profitability: u64,
}

const EFFICIENCY_BASE: u64 = 65;
const EFFICIENCY_STEP: u64 = 4;
const EFFICIENCY_CAP: u64 = 99;

impl FlowMetrics {
    pub fn from_document_count(document_count: usize) -> Self {
        let n = document_count as u64;
        let nf = document_count as f64;

        Self {
            efficiency: n
                .saturating_mul(EFFICIENCY_STEP)
                .saturating_add(EFFICIENCY_BASE)
                .min(EFFICIENCY_CAP),
            lead_ingestion: 12 + n / 2,
            conversion_rate: 64.0 + nf * 1.2,
            close_rate: 42.0 + nf * 0.8,
            profitability: n.saturating_mul(3200).saturating_add(124_500),
        }
    }
}
