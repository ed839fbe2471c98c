//! Relay for the review-thread detail of one pull request.

use crate::error::RelayError;
use crate::github::queries;
use crate::github::types::ReviewThread;
use crate::state::AppState;
use actix_web::{post, web, Result};

#[derive(Deserialize, Debug)]
struct ReviewRequest {
    owner: String,
    repo: String,
    prnum: PrNumber,
}

/// Clients send the pull-request number either as a JSON number or as a
/// string. Anything non-numeric is rejected up front instead of being passed
/// through to GitHub.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum PrNumber {
    Int(i64),
    Text(String),
}

impl PrNumber {
    fn parse(&self) -> Result<i64, RelayError> {
        match self {
            PrNumber::Int(n) => Ok(*n),
            PrNumber::Text(s) => s.trim().parse::<i64>().map_err(|_| {
                RelayError::InvalidRequest("Invalid pull request number".to_string())
            }),
        }
    }
}

#[post("/getreview")]
async fn get_review(
    form: web::Json<ReviewRequest>,
    state: AppState,
) -> Result<web::Json<ReviewThread>, RelayError> {
    let form = form.into_inner();
    let pr_number = form.prnum.parse()?;

    let thread = queries::pull_request_reviews(&state.github, &form.owner, &form.repo, pr_number)
        .await
        .map_err(|e| {
            log::error!(
                "review fetch failed for {}/{}#{}: {}",
                form.owner,
                form.repo,
                pr_number,
                e
            );
            e.with_message("Failed to fetch pull request reviews")
        })?;

    Ok(web::Json(thread))
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(get_review);
}
