//! Canonical test report model
//!
//! Every report, whatever framework produced it, is normalized into the
//! `Report` → `TestResults` → `Suite` → `Test` tree defined here. Entity IDs
//! are content-derived so independently produced shards of the same run can
//! be merged without coordination.

mod env;
mod id;
mod report;
mod suite;
mod summary;
mod test;


pub use env::SemEnv;
pub use id::{ROOT_NAMESPACE, derive_id};
pub use report::{Report, TestResults};
pub use suite::Suite;
pub use summary::{State, Status, Summary};
pub use test::{Fault, Test};

pub(crate) use summary::nanos;

/// Truncate `text` to at most `max_chars` characters (0 disables trimming)
pub(crate) fn trim_text(text: &mut String, max_chars: usize) {
    if max_chars == 0 {
        return;
    }
    if let Some((byte_idx, _)) = text.char_indices().nth(max_chars) {
        text.truncate(byte_idx);
    }
}
