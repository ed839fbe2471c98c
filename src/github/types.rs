//! Client-facing projections of GitHub's GraphQL responses.
//!
//! Every shape here is rebuilt from a single upstream response inside one
//! request lifecycle and serialized straight back out; nothing is persisted.

use chrono::{DateTime, Utc};

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestSummary {
    pub title: String,
    pub url: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
    pub repository_name_with_owner: String,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReviewThread {
    pub title: String,
    pub reviews: Vec<Review>,
    pub comments: Vec<IssueComment>,
    /// Logins of the requested reviewers. Non-User reviewers (teams) come
    /// back as null from the query's inline fragment and are kept as such.
    pub review_requests: Vec<Option<String>>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Login of the review author; null when the account was deleted.
    pub author: Option<String>,
    pub body: String,
    pub state: String,
    pub submitted_at: Option<DateTime<Utc>>,
    pub comments: Vec<ReviewComment>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReviewComment {
    pub author: Option<String>,
    pub body: String,
    pub path: String,
    pub position: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct IssueComment {
    pub author: Option<String>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ViewerProfile {
    pub login: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub followers_count: i64,
    pub following_count: i64,
}
