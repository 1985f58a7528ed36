use crate::convert::{
    clamp_limit, client_error, completion_for_error, deref_aliases, ldap_url, raw_entry, scope,
};
use async_trait::async_trait;
use dirsearch_core::{
    ClientError, ClientFactory, Completion, DirectoryClient, SearchEvent, SearchRequest,
};
use ldap3::adapters::{Adapter, EntriesOnly, PagedResults};
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, SearchEntry, SearchOptions, SearchStream};
use std::time::Duration;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

type EntryStream = SearchStream<'static, String, Vec<String>>;

/// A single-use `ldap3` session.
pub struct LdapClient {
    connect_timeout: Duration,
    ldap: Option<Ldap>,
    stream: Option<EntryStream>,
}

impl LdapClient {
    pub fn new(connect_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            ldap: None,
            stream: None,
        }
    }
}

impl Default for LdapClient {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECT_TIMEOUT)
    }
}

#[async_trait]
impl DirectoryClient for LdapClient {
    async fn connect(&mut self, host: &str, port: u16) -> Result<(), ClientError> {
        let url = ldap_url(host, port);
        let settings = LdapConnSettings::new().set_conn_timeout(self.connect_timeout);
        let (conn, ldap) = LdapConnAsync::with_settings(settings, &url)
            .await
            .map_err(|e| ClientError::Connect {
                host: host.to_string(),
                port,
                reason: e.to_string(),
            })?;

        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                tracing::warn!(error = %e, "ldap: connection driver stopped");
            }
        });

        tracing::debug!(%url, "ldap: connected");
        self.ldap = Some(ldap);
        Ok(())
    }

    async fn search(&mut self, request: &SearchRequest) -> Result<(), ClientError> {
        let ldap = self.ldap.as_mut().ok_or(ClientError::NotConnected)?;
        let constraints = &request.constraints;

        ldap.with_search_options(
            SearchOptions::new()
                .deref(deref_aliases(constraints.deref))
                .sizelimit(clamp_limit(constraints.size_limit.into()))
                .timelimit(clamp_limit(constraints.time_limit.as_secs())),
        );

        let mut adapters: Vec<Box<dyn Adapter<'static, String, Vec<String>>>> =
            vec![Box::new(EntriesOnly::new())];
        if constraints.batch_size > 0 {
            adapters.push(Box::new(PagedResults::new(clamp_limit(
                constraints.batch_size.into(),
            ))));
        }

        let stream = ldap
            .streaming_search_with(
                adapters,
                &request.base,
                scope(request.scope),
                &request.filter,
                request.attributes.clone(),
            )
            .await
            .map_err(client_error)?;

        self.stream = Some(stream);
        Ok(())
    }

    async fn next_event(&mut self) -> SearchEvent {
        let Some(stream) = self.stream.as_mut() else {
            return SearchEvent::Done(Completion::Failed(ClientError::NotConnected));
        };

        match stream.next().await {
            Ok(Some(entry)) => SearchEvent::Entry(raw_entry(SearchEntry::construct(entry))),
            Ok(None) => {
                let result = stream.finish().await;
                self.stream = None;
                tracing::debug!(rc = result.rc, "ldap: search finished");
                SearchEvent::Done(crate::classify(result.rc, &result.text))
            }
            Err(e) => {
                self.stream = None;
                SearchEvent::Done(completion_for_error(e))
            }
        }
    }

    async fn disconnect(&mut self) -> Result<(), ClientError> {
        self.stream = None;
        match self.ldap.take() {
            Some(mut ldap) => ldap.unbind().await.map_err(client_error),
            None => Ok(()),
        }
    }
}

/// Hands out a fresh [`LdapClient`] per search.
#[derive(Debug, Clone, Copy)]
pub struct LdapClientFactory {
    pub connect_timeout: Duration,
}

impl Default for LdapClientFactory {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl ClientFactory for LdapClientFactory {
    fn create(&self) -> Box<dyn DirectoryClient> {
        Box::new(LdapClient::new(self.connect_timeout))
    }
}
