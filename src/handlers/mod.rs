// Three-tier handler layout mirroring the guard chain:
// public (no auth) -> protected (auth) -> elevated (auth + admin)

pub mod elevated;
pub mod protected;
pub mod public;

/// Treat a missing field and a supplied empty string the same way
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
