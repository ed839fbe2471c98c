use crate::error::RelayError;
use serde::de::DeserializeOwned;

/// A GraphQL client bound to one bearer token.
///
/// The relay holds one instance built around the server-side token for the
/// search and review queries, and builds a fresh one per request around the
/// caller's token for viewer queries. Both paths go through the same factory
/// so they stay symmetric and testable. Nothing in here retries or caches;
/// every call is one outbound POST.
#[derive(Clone)]
pub struct QueryClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: serde_json::Value,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize, Debug)]
struct GraphQlError {
    message: String,
}

impl QueryClient {
    pub fn new(http: reqwest::Client, endpoint: String, token: &str) -> Self {
        QueryClient {
            http,
            endpoint,
            token: token.to_string(),
        }
    }

    /// Issue a fixed query document with the given variables and decode the
    /// `data` field of the response envelope.
    ///
    /// Any entry in `errors`, or a response with no `data`, surfaces as
    /// `UpstreamError` — authentication failures, rate limits and missing
    /// resources are all flattened into that one kind. The GraphQL messages
    /// are logged here; callers replace the client-facing message.
    pub async fn query<T: DeserializeOwned>(
        &self,
        document: &str,
        variables: serde_json::Value,
    ) -> Result<T, RelayError> {
        let res = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&GraphQlRequest {
                query: document,
                variables,
            })
            .send()
            .await?;

        let envelope = res.json::<GraphQlResponse<T>>().await.map_err(|e| {
            log::error!("could not decode GitHub GraphQL response: {:?}", e);
            RelayError::UpstreamError("unexpected response from GitHub".to_string())
        })?;

        if let Some(errors) = envelope.errors {
            log::error!("GitHub GraphQL returned errors: {:?}", errors);
            return Err(RelayError::UpstreamError(
                "GitHub rejected the query".to_string(),
            ));
        }

        envelope.data.ok_or_else(|| {
            log::error!("GitHub GraphQL response had neither data nor errors");
            RelayError::UpstreamError("unexpected response from GitHub".to_string())
        })
    }
}
