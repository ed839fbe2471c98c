use crate::config::Config;
use crate::github::QueryClient;

#[derive(Clone)]
pub struct State {
    pub config: Config,
    /// Shared outbound client; cloning is cheap and keeps one connection pool.
    pub http: reqwest::Client,
    /// GraphQL client bound to the server-held token.
    pub github: QueryClient,
}

pub type AppStateRaw = std::sync::Arc<State>;
pub type AppState = actix_web::web::Data<AppStateRaw>;

/// State wired to a stub upstream, for handler tests.
#[cfg(test)]
pub(crate) fn test_state(upstream: &str) -> AppStateRaw {
    use crate::config::Config;

    Config {
        port: 0,
        gh_client_id: "test-client-id".to_string(),
        gh_client_secret: "test-client-secret".to_string(),
        gh_token: "test-server-token".to_string(),
        gh_user_agent: "pr-insight-tests".to_string(),
        gh_authorize_url: format!("{}/login/oauth/authorize", upstream),
        gh_oauth_token_url: format!("{}/login/oauth/access_token", upstream),
        gh_graphql_url: format!("{}/graphql", upstream),
    }
    .into_state()
}
