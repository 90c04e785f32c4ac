//! Concurrency sizing for the quality search
//!
//! Every probe runs one external comparator process, so the default fan-out
//! is one probe per logical CPU.

use crate::kary_search::MIN_CONCURRENCY;
use std::sync::OnceLock;

/// Cached logical CPU count
static CPU_COUNT: OnceLock<usize> = OnceLock::new();

/// Logical CPUs available to this process.
pub fn cpu_count() -> usize {
    *CPU_COUNT.get_or_init(num_cpus::get)
}

/// Default concurrency factor for the search: one probe per CPU, at least
/// [`MIN_CONCURRENCY`].
pub fn default_concurrency() -> usize {
    cpu_count().max(MIN_CONCURRENCY)
}

/// Clamp a user-supplied concurrency factor to the usable range.
pub fn effective_concurrency(requested: usize) -> usize {
    requested.max(MIN_CONCURRENCY)
}
