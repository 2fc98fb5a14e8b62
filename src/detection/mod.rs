//! Incomplete-article detection.
//!
//! Classified ads and legal notices end with a reference code. A head-role
//! segment whose last lines carry no such code was cut by the layout detector
//! and becomes a head awaiting its continuation.

pub mod incomplete;
pub mod reference;
