//! View-local replicas of server collections.
//!
//! A [`Replica`] is seeded from a server payload, mutated locally (add,
//! edit, delete, reorder) and only sent back as a whole on an explicit save.
//! Locally created records get [`RecordId::Local`] keys so they can never
//! collide with server-assigned ids.

pub mod errors;
pub mod id;
pub mod replica;

pub use errors::DraftError;
pub use id::RecordId;
pub use replica::{ListAction, ListChange, Record, Replica};
