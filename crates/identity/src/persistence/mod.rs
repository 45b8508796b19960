//! Persistence of discovered avatars back to the primary store.

mod writer;

pub use writer::{PersistHandle, PersistOutcome, PersistenceWriter};
