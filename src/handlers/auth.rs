//! The OAuth half of the relay: the authorize redirect and the code-for-token
//! exchange. No token is ever stored; a failed exchange means the client has
//! to restart the redirect flow, since codes are single-use upstream.

use crate::error::RelayError;
use crate::state::AppState;
use actix_web::http::header;
use actix_web::{get, post, web, HttpResponse, Result};
use serde_json::json;

#[derive(Deserialize, Debug)]
struct ExchangeRequest {
    code: Option<String>,
}

#[derive(Serialize)]
struct TokenGrant {
    access_token: String,
    #[serde(rename = "type")]
    token_type: &'static str,
    /// Echo of the submitted code, for client-side correlation.
    code: String,
}

#[derive(Serialize)]
struct ExchangeResponse {
    data: TokenGrant,
}

#[get("/github")]
async fn github_redirect(state: AppState) -> HttpResponse {
    let location = format!(
        "{}?client_id={}&scope=repo",
        state.config.gh_authorize_url, state.config.gh_client_id
    );
    HttpResponse::Found()
        .append_header((header::LOCATION, location))
        .finish()
}

#[post("/get-accessToken")]
async fn get_access_token(
    form: web::Json<ExchangeRequest>,
    state: AppState,
) -> Result<web::Json<ExchangeResponse>, RelayError> {
    let code = form
        .into_inner()
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| RelayError::InvalidRequest("No or Invalid code".to_string()))?;

    let access_token = exchange_code(&state, &code).await?;

    Ok(web::Json(ExchangeResponse {
        data: TokenGrant {
            access_token,
            token_type: "bearer",
            code,
        },
    }))
}

#[derive(Deserialize, Debug)]
struct GithubAccessTokenResponse {
    access_token: Option<String>,
}

async fn exchange_code(state: &AppState, code: &str) -> Result<String, RelayError> {
    let res = state
        .http
        .post(&state.config.gh_oauth_token_url)
        .header(reqwest::header::ACCEPT, "application/json")
        .json(&json!({
            "client_id": state.config.gh_client_id,
            "client_secret": state.config.gh_client_secret,
            "code": code,
        }))
        .send()
        .await
        .map_err(|e| {
            log::error!("error reaching GitHub OAuth endpoint: {:?}", e);
            RelayError::UpstreamUnavailable("Failed to exchange code for access token.".to_string())
        })?;

    let body = res.json::<GithubAccessTokenResponse>().await.map_err(|e| {
        log::error!("could not decode GitHub token response: {:?}", e);
        RelayError::UpstreamUnavailable("Failed to exchange code for access token.".to_string())
    })?;

    // GitHub answers 200 with an error body when the code is spent, expired
    // or the client secret does not match.
    body.access_token.ok_or_else(|| {
        log::error!("GitHub declined the token exchange for a submitted code");
        RelayError::UpstreamRejected("Failed to get access token.".to_string())
    })
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(github_redirect);
    cfg.service(get_access_token);
}
