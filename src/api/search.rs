use futures::StreamExt;
use futures::stream::FuturesUnordered;
use std::time::Duration;
use tracing::{debug, warn};

use crate::api::params::{Query, SearchParams};
use crate::api::response::parse_search_response;
use crate::config::ClientConfig;
use crate::domain::Location;
use crate::error::{ConfigError, SearchError};
use crate::geometry;

/// Async client for the Nominatim `/search` endpoint
///
/// Holds the endpoint, the identity sent with every request and a pooled
/// HTTP client. Nothing is mutated after construction, so one instance can
/// serve any number of concurrent searches (and clones share the pool).
#[derive(Debug, Clone)]
pub struct NominatimSearch {
    client: reqwest::Client,
    base_url: String,
    user_agent: String,
    email: Option<String>,
}

impl NominatimSearch {
    /// Client for the public endpoint identifying itself as `user_agent`
    pub fn new(user_agent: impl Into<String>) -> Result<Self, ConfigError> {
        Self::from_config(&ClientConfig::default().with_user_agent(user_agent))
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(ConfigError::Client)?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            user_agent: config.user_agent.clone(),
            email: config
                .email
                .as_deref()
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_string),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Run one search and return the matches in the server's order
    ///
    /// Accepts a free-form string, a mapping of Nominatim parameter names, or
    /// [`SearchParams`]. Degenerate queries fail with a validation error
    /// before any request is made. No matches is `Ok(vec![])`.
    pub async fn search(&self, query: impl Into<Query>) -> Result<Vec<Location>, SearchError> {
        let params = SearchParams::try_from(query.into())?;

        let mut pairs = params.to_query_pairs();
        if let Some(email) = &self.email {
            pairs.push(("email", email.clone()));
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&pairs)
            .send()
            .await
            .map_err(|e| SearchError::from_transport(&self.base_url, e))?;

        let url = response.url().to_string();
        debug!(url = %url, "Request made to Nominatim");

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Nominatim request failed");
            return Err(SearchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SearchError::from_transport(&url, e))?;
        let locations = parse_search_response(&url, &body)?;

        debug!(url = %url, results = locations.len(), "Parsed Nominatim response");
        Ok(locations)
    }

    /// Run several searches concurrently
    ///
    /// The output has one slot per query, in input order, whatever order the
    /// requests complete in. A failing query only fails its own slot.
    pub async fn search_multiple<I, Q>(&self, queries: I) -> Vec<Result<Vec<Location>, SearchError>>
    where
        I: IntoIterator<Item = Q>,
        Q: Into<Query>,
    {
        let mut pending: FuturesUnordered<_> = queries
            .into_iter()
            .enumerate()
            .map(|(index, query)| {
                let query: Query = query.into();
                async move { (index, self.search(query).await) }
            })
            .collect();

        let mut slots: Vec<Option<Result<Vec<Location>, SearchError>>> =
            (0..pending.len()).map(|_| None).collect();

        while let Some((index, result)) = pending.next().await {
            if let Err(e) = &result {
                warn!(query = index, error = %e, "Search failed");
            }
            slots[index] = Some(result);
        }

        // Every index was yielded exactly once, so no slot is left empty
        slots.into_iter().flatten().collect()
    }

    /// See [`geometry::reduce_locations`]
    pub fn reduce_locations(locations: &[Location], min_distance_m: f64) -> Vec<Location> {
        geometry::reduce_locations(locations, min_distance_m)
    }

    /// See [`geometry::sort_by_importance`]
    pub fn sort_by_importance(locations: &[Location]) -> Vec<Location> {
        geometry::sort_by_importance(locations)
    }

    /// See [`geometry::sort_by_distance`]
    pub fn sort_by_distance(locations: &[Location], origin: &Location) -> Vec<Location> {
        geometry::sort_by_distance(locations, origin)
    }
}
