//! Directory client abstraction.
//!
//! The wire protocol lives behind [`DirectoryClient`]; the orchestrator only
//! ever sees [`RawEntry`](crate::RawEntry) values and a [`Completion`]. A
//! client decides itself whether an early stop means truncation or failure.

use crate::error::ClientError;
use crate::types::{Completion, SearchEvent, SearchRequest};
use async_trait::async_trait;

/// One connection's worth of directory access.
///
/// A client is used for exactly one search call: `connect`, `search`,
/// `next_event` until [`SearchEvent::Done`], then `disconnect`.
#[async_trait]
pub trait DirectoryClient: Send {
    async fn connect(&mut self, host: &str, port: u16) -> Result<(), ClientError>;

    /// Start a search. Entries are pulled with [`next_event`](Self::next_event).
    async fn search(&mut self, request: &SearchRequest) -> Result<(), ClientError>;

    /// Next entry of the running search, or how it ended. After `Done` has
    /// been returned the client is not polled again.
    async fn next_event(&mut self) -> SearchEvent;

    async fn disconnect(&mut self) -> Result<(), ClientError>;
}

/// Produces a fresh, unconnected client for each search call.
pub trait ClientFactory: Send + Sync + 'static {
    fn create(&self) -> Box<dyn DirectoryClient>;
}

impl<F> ClientFactory for F
where
    F: Fn() -> Box<dyn DirectoryClient> + Send + Sync + 'static,
{
    fn create(&self) -> Box<dyn DirectoryClient> {
        self()
    }
}

impl From<ClientError> for Completion {
    fn from(err: ClientError) -> Self {
        Completion::Failed(err)
    }
}
