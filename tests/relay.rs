//! End-to-end pass over the relay: the full route table mounted the way the
//! server binary mounts it, against a stubbed GitHub.

use actix_web::{http::StatusCode, test, web, App};
use pr_insight_api::config::Config;
use pr_insight_api::handlers;
use pr_insight_api::state::AppStateRaw;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn stub_state(upstream: &str) -> AppStateRaw {
    Config {
        port: 0,
        gh_client_id: "it-client-id".to_string(),
        gh_client_secret: "it-client-secret".to_string(),
        gh_token: "it-server-token".to_string(),
        gh_user_agent: "pr-insight-it".to_string(),
        gh_authorize_url: format!("{}/login/oauth/authorize", upstream),
        gh_oauth_token_url: format!("{}/login/oauth/access_token", upstream),
        gh_graphql_url: format!("{}/graphql", upstream),
    }
    .into_state()
}

async fn spawn_app(
    upstream: &MockServer,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = actix_web::dev::ServiceResponse,
    Error = actix_web::Error,
> {
    let state = stub_state(&upstream.uri());
    test::init_service(
        App::new().app_data(web::Data::new(state)).service(
            web::scope("/api/auth")
                .configure(handlers::auth::init)
                .configure(handlers::pulls::init)
                .configure(handlers::reviews::init)
                .configure(handlers::viewer::init),
        ),
    )
    .await
}

#[actix_rt::test]
async fn exchange_then_profile_round_trip() {
    let upstream = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "gho_fresh",
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {
                "viewer": {
                    "login": "octocat",
                    "name": null,
                    "bio": null,
                    "avatarUrl": "https://avatars.githubusercontent.com/u/583231",
                    "company": null,
                    "location": null,
                    "createdAt": "2011-01-25T18:44:36Z",
                    "followers": { "totalCount": 1 },
                    "following": { "totalCount": 2 }
                }
            }
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = spawn_app(&upstream).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/get-accessToken")
        .set_json(serde_json::json!({ "code": "fresh-code" }))
        .to_request();
    let grant: serde_json::Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(grant["data"]["code"], "fresh-code");
    let token = grant["data"]["access_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/auth/get-user-details")
        .set_json(serde_json::json!({ "accessToken": token }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["user"]["login"], "octocat");
}

#[actix_rt::test]
async fn upstream_outage_maps_to_500_without_internals() {
    // no mock mounted for /graphql: connection succeeds but 404s with an
    // empty body, which the relay cannot decode
    let upstream = MockServer::start().await;
    let app = spawn_app(&upstream).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/getpr")
        .set_json(serde_json::json!({ "username": "octocat" }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(
        body,
        serde_json::json!({ "error": "Failed to fetch pull requests" })
    );
}

#[actix_rt::test]
async fn unknown_routes_fall_through() {
    let upstream = MockServer::start().await;
    let app = spawn_app(&upstream).await;

    let req = test::TestRequest::get()
        .uri("/api/auth/does-not-exist")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
