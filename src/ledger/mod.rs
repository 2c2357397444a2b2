//! Aggregation logic over a month document: the totals recalculator and
//! the read-side display projection.

pub mod projection;
pub mod totals;

pub use projection::group_for_display;
pub use totals::recalculate;
