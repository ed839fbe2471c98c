//! Relay for the pull-request search. Authenticates with the server-held
//! token, not the caller's.

use crate::error::RelayError;
use crate::github::queries;
use crate::github::types::PullRequestSummary;
use crate::state::AppState;
use actix_web::{post, web, Result};

#[derive(Deserialize, Debug)]
struct SearchRequest {
    username: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    user: String,
    pull_requests: Vec<PullRequestSummary>,
}

#[post("/getpr")]
async fn get_pull_requests(
    form: web::Json<SearchRequest>,
    state: AppState,
) -> Result<web::Json<SearchResponse>, RelayError> {
    let SearchRequest { username } = form.into_inner();

    let pull_requests = queries::search_pull_requests(&state.github, &username)
        .await
        .map_err(|e| {
            log::error!("pull-request search failed for {:?}: {}", username, e);
            e.with_message("Failed to fetch pull requests")
        })?;

    Ok(web::Json(SearchResponse {
        user: username,
        pull_requests,
    }))
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(get_pull_requests);
}
