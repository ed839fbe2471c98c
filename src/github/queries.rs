//! The three fixed query documents the relay sends to GitHub, with typed
//! wrappers that reshape the wire responses into the projections in
//! [`types`](super::types).

use super::types::*;
use super::QueryClient;
use crate::error::RelayError;
use chrono::{DateTime, Utc};
use serde_json::json;

/// Results fetched from the pull-request search. One page only; authors with
/// more open activity than this are silently truncated.
pub const SEARCH_PAGE_SIZE: u32 = 100;

/// Cap on reviews, comments per review, top-level comments and review
/// requests fetched for one pull request. Fixed upstream of any
/// configuration; busier PRs are silently truncated to the first page.
pub const REVIEW_PAGE_SIZE: u32 = 10;

const SEARCH_PULL_REQUESTS: &str = r#"
query ($searchQuery: String!, $pageSize: Int!) {
  search(query: $searchQuery, type: ISSUE, first: $pageSize) {
    nodes {
      ... on PullRequest {
        title
        url
        state
        createdAt
        mergedAt
        repository {
          nameWithOwner
        }
      }
    }
  }
}
"#;

const PULL_REQUEST_REVIEWS: &str = r#"
query ($owner: String!, $repo: String!, $prNumber: Int!, $pageSize: Int!) {
  repository(owner: $owner, name: $repo) {
    pullRequest(number: $prNumber) {
      title
      reviews(first: $pageSize) {
        nodes {
          author { login }
          body
          state
          submittedAt
          comments(first: $pageSize) {
            nodes {
              body
              path
              position
              createdAt
              author { login }
            }
          }
        }
      }
      reviewRequests(first: $pageSize) {
        nodes {
          requestedReviewer {
            ... on User {
              login
            }
          }
        }
      }
      comments(first: $pageSize) {
        nodes {
          author { login }
          body
          createdAt
        }
      }
    }
  }
}
"#;

const VIEWER_PROFILE: &str = r#"
query {
  viewer {
    login
    name
    bio
    avatarUrl
    company
    location
    createdAt
    followers {
      totalCount
    }
    following {
      totalCount
    }
  }
}
"#;

#[derive(Deserialize)]
struct Actor {
    login: String,
}

#[derive(Deserialize)]
struct Nodes<T> {
    nodes: Vec<T>,
}

#[derive(Deserialize)]
struct TotalCount {
    #[serde(rename = "totalCount")]
    total_count: i64,
}

#[derive(Deserialize)]
struct SearchData {
    search: Nodes<SearchNode>,
}

/// Search nodes come back through an inline fragment, so non-PR results are
/// empty objects; every field is optional and incomplete nodes are dropped.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchNode {
    title: Option<String>,
    url: Option<String>,
    state: Option<String>,
    created_at: Option<DateTime<Utc>>,
    merged_at: Option<DateTime<Utc>>,
    repository: Option<RepositoryRef>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryRef {
    name_with_owner: String,
}

impl SearchNode {
    fn into_summary(self) -> Option<PullRequestSummary> {
        Some(PullRequestSummary {
            title: self.title?,
            url: self.url?,
            state: self.state?,
            created_at: self.created_at?,
            merged_at: self.merged_at,
            repository_name_with_owner: self.repository?.name_with_owner,
        })
    }
}

/// Search GitHub for pull requests authored by `username`. First
/// [`SEARCH_PAGE_SIZE`] results only.
pub async fn search_pull_requests(
    client: &QueryClient,
    username: &str,
) -> Result<Vec<PullRequestSummary>, RelayError> {
    let data: SearchData = client
        .query(
            SEARCH_PULL_REQUESTS,
            json!({
                "searchQuery": format!("type:pr author:{}", username),
                "pageSize": SEARCH_PAGE_SIZE,
            }),
        )
        .await?;

    Ok(data
        .search
        .nodes
        .into_iter()
        .filter_map(SearchNode::into_summary)
        .collect())
}

#[derive(Deserialize)]
struct ReviewData {
    repository: ReviewRepository,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewRepository {
    pull_request: PullRequestNode,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestNode {
    title: String,
    reviews: Nodes<ReviewNode>,
    review_requests: Nodes<ReviewRequestNode>,
    comments: Nodes<IssueCommentNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewNode {
    author: Option<Actor>,
    body: String,
    state: String,
    submitted_at: Option<DateTime<Utc>>,
    comments: Nodes<ReviewCommentNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewCommentNode {
    author: Option<Actor>,
    body: String,
    path: String,
    position: Option<i64>,
    created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewRequestNode {
    requested_reviewer: Option<RequestedReviewer>,
}

/// Only the User fragment carries a login; team reviewers deserialize as an
/// empty object.
#[derive(Deserialize)]
struct RequestedReviewer {
    login: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueCommentNode {
    author: Option<Actor>,
    body: String,
    created_at: DateTime<Utc>,
}

/// Fetch the review activity for one pull request, truncated to the first
/// [`REVIEW_PAGE_SIZE`] items per list.
pub async fn pull_request_reviews(
    client: &QueryClient,
    owner: &str,
    repo: &str,
    pr_number: i64,
) -> Result<ReviewThread, RelayError> {
    let data: ReviewData = client
        .query(
            PULL_REQUEST_REVIEWS,
            json!({
                "owner": owner,
                "repo": repo,
                "prNumber": pr_number,
                "pageSize": REVIEW_PAGE_SIZE,
            }),
        )
        .await?;

    let pr = data.repository.pull_request;

    Ok(ReviewThread {
        title: pr.title,
        reviews: pr
            .reviews
            .nodes
            .into_iter()
            .map(|r| Review {
                author: r.author.map(|a| a.login),
                body: r.body,
                state: r.state,
                submitted_at: r.submitted_at,
                comments: r
                    .comments
                    .nodes
                    .into_iter()
                    .map(|c| ReviewComment {
                        author: c.author.map(|a| a.login),
                        body: c.body,
                        path: c.path,
                        position: c.position,
                        created_at: c.created_at,
                    })
                    .collect(),
            })
            .collect(),
        comments: pr
            .comments
            .nodes
            .into_iter()
            .map(|c| IssueComment {
                author: c.author.map(|a| a.login),
                body: c.body,
                created_at: c.created_at,
            })
            .collect(),
        review_requests: pr
            .review_requests
            .nodes
            .into_iter()
            .map(|r| r.requested_reviewer.and_then(|u| u.login))
            .collect(),
    })
}

#[derive(Deserialize)]
struct ViewerData {
    viewer: ViewerNode,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ViewerNode {
    login: String,
    name: Option<String>,
    bio: Option<String>,
    avatar_url: String,
    company: Option<String>,
    location: Option<String>,
    created_at: DateTime<Utc>,
    followers: TotalCount,
    following: TotalCount,
}

/// Fetch the profile of the user the client's token identifies.
pub async fn viewer_profile(client: &QueryClient) -> Result<ViewerProfile, RelayError> {
    let data: ViewerData = client.query(VIEWER_PROFILE, json!({})).await?;
    let v = data.viewer;

    Ok(ViewerProfile {
        login: v.login,
        name: v.name,
        bio: v.bio,
        avatar_url: v.avatar_url,
        company: v.company,
        location: v.location,
        created_at: v.created_at,
        followers_count: v.followers.total_count,
        following_count: v.following.total_count,
    })
}
