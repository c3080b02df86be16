//! GitHub repository-listing client.
//!
//! One endpoint only: the public listing of a user's repositories. The
//! listing itself needs no credentials; authentication for the actual git
//! work (clone, force push) happens over SSH via the locally running agent.
//! Organizations and enterprise instances are out of scope.

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;

use crate::error::RunError;

const API_URL: &str = "https://api.github.com";

/// One repository as returned by the listing endpoint.
///
/// Only the fields this tool consumes are deserialized: the name (local
/// clone directory) and the SSH URL (clone/push target through the agent).
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteRepo {
    pub name: String,
    pub ssh_url: String,
}

/// Lists the repositories owned by `user`, in the API's listing order.
///
/// Calls `GET /users/{user}/repos?per_page=100`. Every failure mode
/// (transport error, non-success status, undecodable body) maps to
/// [`RunError::AccountListingFailed`]: without the list there is no work to
/// do, so the caller treats any of them as fatal.
///
/// An account with zero repositories yields `Ok` with an empty vector.
pub fn list_user_repos(user: &str) -> Result<Vec<RemoteRepo>, RunError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github+json"),
    );
    headers.insert(USER_AGENT, HeaderValue::from_static("git-identity-rewrite"));
    headers.insert(
        "X-GitHub-Api-Version",
        HeaderValue::from_static("2022-11-28"),
    );

    let http = Client::builder()
        .default_headers(headers)
        .build()
        .map_err(|e| RunError::AccountListingFailed(e.to_string()))?;

    let url = format!("{}/users/{}/repos", API_URL, user);
    let resp = http
        .get(&url)
        .query(&[("per_page", "100")])
        .send()
        .map_err(|e| RunError::AccountListingFailed(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().unwrap_or_default();
        return Err(RunError::AccountListingFailed(format!(
            "HTTP {}: {}",
            status.as_u16(),
            body.trim()
        )));
    }

    resp.json::<Vec<RemoteRepo>>()
        .map_err(|e| RunError::AccountListingFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::RemoteRepo;

    #[test]
    fn listing_payload_deserializes_name_and_ssh_url() {
        let body = r#"[
            {"name": "dotfiles", "ssh_url": "git@github.com:me/dotfiles.git", "fork": false},
            {"name": "notes", "ssh_url": "git@github.com:me/notes.git", "private": false}
        ]"#;
        let repos: Vec<RemoteRepo> = serde_json::from_str(body).expect("deserialize failed");

        assert_eq!(repos.len(), 2);
        assert_eq!(repos[0].name, "dotfiles");
        assert_eq!(repos[0].ssh_url, "git@github.com:me/dotfiles.git");
        assert_eq!(repos[1].name, "notes");
    }

    #[test]
    fn empty_listing_deserializes_to_empty_vec() {
        let repos: Vec<RemoteRepo> = serde_json::from_str("[]").expect("deserialize failed");
        assert!(repos.is_empty());
    }
}
