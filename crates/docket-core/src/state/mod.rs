//! Single state-update contract for one console page.
//!
//! Front ends describe what the user did as a [`Command`]; a [`Store`]
//! executes it against the components and answers with the [`Event`]s
//! that describe what changed.

pub mod dispatch;
pub mod errors;
pub mod events;
pub mod store;
pub mod types;

pub use dispatch::ConsoleStore;
pub use errors::DispatchError;
pub use events::Event;
pub use store::Store;
pub use types::Command;
