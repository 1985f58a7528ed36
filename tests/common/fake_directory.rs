//! FakeDirectory — an in-memory [`DirectoryClient`] factory.
//!
//! Every client it hands out replays the same scripted event sequence and
//! records what happened to it (connections, requests, disconnects) in state
//! shared with the test. Scripts are plain [`SearchEvent`] lists, so a test
//! decides exactly where a search completes, truncates or fails.
//!
//! # Example
//!
//! ```rust,no_run
//! let directory = FakeDirectory::ending_with(sample_directory(), Completion::Truncated)
//!     .fail_disconnects(ClientError::NotConnected);
//! let searcher = DirectorySearch::new(test_config(), directory.clone())?;
//! let people = searcher.search(None, 2).await?;
//! assert_eq!(directory.disconnects(), 1);
//! ```

use async_trait::async_trait;
use dirsearch_core::{
    ClientError, ClientFactory, Completion, DirectoryClient, RawEntry, SearchEvent, SearchRequest,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct FakeState {
    script: Vec<SearchEvent>,
    connect_error: Option<ClientError>,
    search_error: Option<ClientError>,
    disconnect_error: Option<ClientError>,
    panic_message: Option<String>,
    connections: Vec<(String, u16)>,
    requests: Vec<SearchRequest>,
    disconnects: usize,
}

/// Handle shared between the test and every client created from it.
#[derive(Clone, Default)]
pub struct FakeDirectory {
    state: Arc<Mutex<FakeState>>,
}

impl FakeDirectory {
    /// Clients replay `script` verbatim. A script without a `Done` event
    /// ends with `Done(Complete)`.
    pub fn scripted(script: Vec<SearchEvent>) -> Self {
        let directory = Self::default();
        directory.state.lock().unwrap().script = script;
        directory
    }

    /// All `entries`, then a complete search.
    pub fn returning(entries: Vec<RawEntry>) -> Self {
        Self::ending_with(entries, Completion::Complete)
    }

    /// All `entries`, then `completion`.
    pub fn ending_with(entries: Vec<RawEntry>, completion: Completion) -> Self {
        let mut script: Vec<SearchEvent> = entries.into_iter().map(SearchEvent::Entry).collect();
        script.push(SearchEvent::Done(completion));
        Self::scripted(script)
    }

    /// Make `connect` fail.
    pub fn refuse_connections(self, err: ClientError) -> Self {
        self.state.lock().unwrap().connect_error = Some(err);
        self
    }

    /// Make starting the search fail.
    pub fn reject_searches(self, err: ClientError) -> Self {
        self.state.lock().unwrap().search_error = Some(err);
        self
    }

    /// Make `disconnect` fail. The disconnect is still counted.
    pub fn fail_disconnects(self, err: ClientError) -> Self {
        self.state.lock().unwrap().disconnect_error = Some(err);
        self
    }

    /// Make the client panic with `message` when the first event is pulled.
    pub fn panic_on_next_event(self, message: &str) -> Self {
        self.state.lock().unwrap().panic_message = Some(message.to_string());
        self
    }

    pub fn connections(&self) -> Vec<(String, u16)> {
        self.state.lock().unwrap().connections.clone()
    }

    pub fn requests(&self) -> Vec<SearchRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// The single request made so far. Panics otherwise.
    pub fn only_request(&self) -> SearchRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one search request");
        requests.into_iter().next().unwrap()
    }

    pub fn disconnects(&self) -> usize {
        self.state.lock().unwrap().disconnects
    }
}

impl ClientFactory for FakeDirectory {
    fn create(&self) -> Box<dyn DirectoryClient> {
        Box::new(FakeClient {
            state: Arc::clone(&self.state),
            pending: VecDeque::new(),
            connected: false,
        })
    }
}

struct FakeClient {
    state: Arc<Mutex<FakeState>>,
    pending: VecDeque<SearchEvent>,
    connected: bool,
}

#[async_trait]
impl DirectoryClient for FakeClient {
    async fn connect(&mut self, host: &str, port: u16) -> Result<(), ClientError> {
        let mut state = self.state.lock().unwrap();
        if let Some(err) = state.connect_error.clone() {
            return Err(err);
        }
        state.connections.push((host.to_string(), port));
        self.connected = true;
        Ok(())
    }

    async fn search(&mut self, request: &SearchRequest) -> Result<(), ClientError> {
        if !self.connected {
            return Err(ClientError::NotConnected);
        }
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());
        if let Some(err) = state.search_error.clone() {
            return Err(err);
        }
        self.pending = state.script.iter().cloned().collect();
        Ok(())
    }

    async fn next_event(&mut self) -> SearchEvent {
        // Release the lock first so a panic does not poison the shared state.
        let panic_message = self.state.lock().unwrap().panic_message.clone();
        if let Some(message) = panic_message {
            panic!("{message}");
        }
        self.pending
            .pop_front()
            .unwrap_or(SearchEvent::Done(Completion::Complete))
    }

    async fn disconnect(&mut self) -> Result<(), ClientError> {
        let mut state = self.state.lock().unwrap();
        if self.connected {
            self.connected = false;
            state.disconnects += 1;
        }
        match state.disconnect_error.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
