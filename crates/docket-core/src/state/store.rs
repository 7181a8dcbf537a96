use async_trait::async_trait;

use super::events::Event;
use super::types::Command;

/// Dispatches page commands.
///
/// # Semantics
///
/// - **Ordering**: commands run one at a time in the order received.
/// - **Events**: on success, a list of events describing what changed, in
///   order. A command that had nothing to do (polling while live mode is
///   off) returns an empty list.
/// - **Errors**: a failed command leaves the previously displayed state in
///   place. Implementations pick their own error type.
#[async_trait]
pub trait Store {
    type Error;
    async fn dispatch(&mut self, cmd: Command) -> Result<Vec<Event>, Self::Error>;
}
