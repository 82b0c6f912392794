//! Pipeline orchestration: SEC and Reddit sync runs plus the verifier.
//!
//! Both runs follow the same shape: fetch candidates from one feed, parse
//! and normalize them, drop already-seen filing ids, insert the rest, and
//! report stage counts in a [`insiderdb_core::RunSummary`]. The two feeds
//! are independent — a failure in one never blocks the other.

mod error;
mod reddit;
mod sec;
mod verify;

pub use error::SyncError;
pub use reddit::run_reddit_sync;
pub use sec::{collect_sec_candidates, run_sec_sync, CollectedCandidates};
pub use verify::{collect_form4_refs, verify, verify_and_record, VerifyRequest};
