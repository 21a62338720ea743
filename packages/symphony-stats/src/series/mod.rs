//! Valuation series preparation.
//!
//! Normalization of upstream data, daily returns, date alignment,
//! benchmark rebasing and value-weighted portfolio returns. Everything
//! downstream consumes the output of this module.

mod align;
pub(crate) mod normalize;
mod returns;
mod weighted;

pub use align::{align_by_date, rebase_to, AlignedSeries};
pub use normalize::normalize;
pub use returns::{daily_returns, returns_from_values};
pub use weighted::{value_weighted_returns, WeightedReturns};
