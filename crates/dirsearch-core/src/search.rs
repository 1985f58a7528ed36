//! Search orchestrator — the façade callers use to look people up.
//!
//! A call moves through
//!
//! ```text
//! Idle ──► Validated ──► Compiled ──► Connected ──► Iterating ──┬─► Completed ─┐
//!                                                               ├─► Truncated ─┼─► Closed
//!                                                               └─► Failed ────┘
//! ```
//!
//! Configuration is checked and the filter compiled before any client is
//! created. Once `connect` succeeds, `disconnect` is awaited on every way
//! out, including failure. `Completed` and `Truncated` both return the
//! people collected so far, in server order.
//!
//! Each call runs on its own tokio task with its own client; the only state
//! shared between calls is the read-only [`SchemaRegistry`].

use crate::client::{ClientFactory, DirectoryClient};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::filter::{FilterCompiler, QueryExpression, MATCH_ANY};
use crate::materialize::materialize;
use crate::schema::SchemaRegistry;
use crate::types::{Completion, Person, Scope, SearchEvent, SearchRequest};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Cheap to clone; clones share configuration, registry and client factory.
#[derive(Clone)]
pub struct DirectorySearch {
    inner: Arc<Inner>,
}

struct Inner {
    config: Config,
    registry: Arc<SchemaRegistry>,
    factory: Box<dyn ClientFactory>,
}

impl std::fmt::Debug for DirectorySearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectorySearch")
            .field("config", &self.inner.config)
            .field("registry", &self.inner.registry)
            .finish_non_exhaustive()
    }
}

impl DirectorySearch {
    /// Build a searcher using the person schema with any `[schema]`
    /// overrides from `config` applied.
    pub fn new(config: Config, factory: impl ClientFactory) -> Result<Self> {
        let registry = SchemaRegistry::person_with_overrides(&config.schema)?;
        Ok(Self::with_registry(config, Arc::new(registry), factory))
    }

    /// Build a searcher around an existing registry.
    pub fn with_registry(
        config: Config,
        registry: Arc<SchemaRegistry>,
        factory: impl ClientFactory,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                registry,
                factory: Box::new(factory),
            }),
        }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.inner.registry
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// The filter text a search for `expr` would send.
    pub fn compile(&self, expr: Option<&QueryExpression>) -> String {
        self.inner.compile(expr)
    }

    /// Run a search on a worker task and hand back its handle.
    pub fn spawn(
        &self,
        expr: Option<QueryExpression>,
        size_limit: u32,
    ) -> JoinHandle<Result<Vec<Person>>> {
        let inner = Arc::clone(&self.inner);
        let span = tracing::info_span!("search", size_limit);
        tokio::spawn(async move { inner.run(expr, size_limit).await }.instrument(span))
    }

    /// Run a search and wait for its result.
    pub async fn search(
        &self,
        expr: Option<QueryExpression>,
        size_limit: u32,
    ) -> Result<Vec<Person>> {
        self.spawn(expr, size_limit)
            .await
            .map_err(|e| Error::Task(e.to_string()))?
    }
}

impl Inner {
    fn compile(&self, expr: Option<&QueryExpression>) -> String {
        let filter = FilterCompiler::new(&self.registry)
            .with_escaping(self.config.search.escaping())
            .compile(expr);
        if filter.is_empty() {
            MATCH_ANY.to_string()
        } else {
            filter
        }
    }

    async fn run(&self, expr: Option<QueryExpression>, size_limit: u32) -> Result<Vec<Person>> {
        self.config.validate()?;
        let directory = &self.config.directory;

        let request = SearchRequest {
            base: directory.search_base.clone(),
            scope: Scope::Subtree,
            filter: self.compile(expr.as_ref()),
            attributes: self.registry.attribute_names(),
            constraints: self.config.search.constraints(size_limit),
        };

        let mut client = self.factory.create();
        client.connect(&directory.host, directory.port).await?;
        tracing::debug!(host = %directory.host, port = directory.port, "search: connected");

        let outcome = collect(client.as_mut(), &self.registry, &request).await;

        if let Err(e) = client.disconnect().await {
            tracing::warn!(error = %e, "search: disconnect failed");
        }
        outcome
    }
}

/// Drain the client's search stream into accepted people.
async fn collect(
    client: &mut dyn DirectoryClient,
    registry: &SchemaRegistry,
    request: &SearchRequest,
) -> Result<Vec<Person>> {
    tracing::info!(base = %request.base, filter = %request.filter, "search: started");
    client.search(request).await?;

    let mut people = Vec::new();
    loop {
        match client.next_event().await {
            SearchEvent::Entry(entry) => {
                let person = materialize(registry, entry);
                if person.has_surname() {
                    people.push(person);
                } else {
                    tracing::warn!(dn = %person.dn, "search: entry without surname dropped");
                }
            }
            SearchEvent::Done(Completion::Complete) => {
                tracing::info!(count = people.len(), "search: completed");
                return Ok(people);
            }
            SearchEvent::Done(Completion::Truncated) => {
                tracing::warn!(count = people.len(), "search: truncated by size limit");
                return Ok(people);
            }
            SearchEvent::Done(Completion::Failed(err)) => {
                tracing::warn!(error = %err, "search: failed");
                return Err(err.into());
            }
        }
    }
}
