//! Impact module
//!
//! Keyword lookup of per-portion value, carbon footprint and shelf life, and
//! the estimates built on top of it.

pub mod estimate;
pub mod lookup;
pub mod table;

pub use estimate::{
    days_until_expiry, estimate_impact, impact_for_base_quantity, predict_expiry, summarize,
    ImpactSummary, ImpactTotals, ItemImpact,
};
pub use lookup::{find_impact, lookup_impact};
pub use table::{ImpactRecord, DEFAULT_IMPACT, IMPACT_TABLE};
