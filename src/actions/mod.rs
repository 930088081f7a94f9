//! Durable, deduplicated log of every tool call an agent makes.
//!
//! - `record`: [`ActionRecord`], fingerprints, and the in-memory [`ActionLog`]
//! - `store`: the injectable [`ActionStore`] backends
//! - `recorder`: the shared [`ActionRecorder`] handle used by message history

mod record;
mod recorder;
mod store;

pub use record::{ActionLog, ActionRecord, Fingerprint, UNASSIGNED_TASK};
pub use recorder::ActionRecorder;
pub use store::{ActionStore, JsonFileStore, MemoryStore};
