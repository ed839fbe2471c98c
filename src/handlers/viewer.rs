//! Relay for the signed-in user's profile. Unlike the search and review
//! relays this one authenticates with the token the client supplies, so a
//! fresh query client is built around it on every call.

use crate::error::RelayError;
use crate::github::types::ViewerProfile;
use crate::github::{queries, QueryClient};
use crate::state::AppState;
use actix_web::{post, web, Result};

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ViewerRequest {
    access_token: Option<String>,
}

#[derive(Serialize)]
struct ViewerResponse {
    user: ViewerProfile,
}

#[post("/get-user-details")]
async fn get_user_details(
    form: web::Json<ViewerRequest>,
    state: AppState,
) -> Result<web::Json<ViewerResponse>, RelayError> {
    let token = form
        .into_inner()
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| RelayError::InvalidRequest("Missing accessToken".to_string()))?;

    let client = QueryClient::new(
        state.http.clone(),
        state.config.gh_graphql_url.clone(),
        &token,
    );

    let user = queries::viewer_profile(&client).await.map_err(|e| {
        log::error!("viewer profile fetch failed: {}", e);
        e.with_message("Failed to fetch user info")
    })?;

    Ok(web::Json(ViewerResponse { user }))
}

pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(get_user_details);
}
