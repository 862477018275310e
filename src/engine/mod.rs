//! Derived state for the activity programme: eligibility, time conflicts, display status and
//! the filter/grouping pipeline. Everything here is a pure function of the participant and the
//! catalogue it is given.

mod conflict;
mod eligibility;
mod pipeline;
mod status;
#[cfg(test)]
mod tests;

pub use conflict::{find_conflicts, overlaps, ConflictSet};
pub use eligibility::{evaluate, matches_labels};
pub use pipeline::{apply, day_label, DayGroup, Entry, FilterConfig, Grouped};
pub use status::{resolve_all, resolve_status};
