//! GitHub REST client for the all-repositories mode.

use crate::error::{LangstatError, Result};
use crate::model::RepositoryDescriptor;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use tracing::{debug, info};

const PER_PAGE: usize = 100;

/// Source of the repositories a run should cover.
pub trait RepositoryHost {
    /// Login of the identity the credential belongs to.
    fn authenticated_login(&self) -> Result<String>;

    /// Repositories owned by that identity, private ones included.
    fn owned_repositories(&self) -> Result<Vec<RepositoryDescriptor>>;
}

pub struct GitHubClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct GitHubUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct GitHubRepository {
    name: String,
    full_name: String,
    clone_url: String,
    fork: bool,
    owner: GitHubUser,
}

impl From<GitHubRepository> for RepositoryDescriptor {
    fn from(repo: GitHubRepository) -> Self {
        Self {
            full_name: repo.full_name,
            name: repo.name,
            clone_url: repo.clone_url,
            fork: repo.fork,
            owner: repo.owner.login,
        }
    }
}

impl GitHubClient {
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("token {token}"))
            .map_err(|e| LangstatError::Config(format!("Token is not a valid header value: {e}")))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );

        let client = Client::builder()
            .user_agent(concat!("langstat/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));
        debug!("GitHub API request to {url}");

        let response = self.client.get(&url).send()?.error_for_status()?;
        Ok(response.json()?)
    }
}

impl RepositoryHost for GitHubClient {
    fn authenticated_login(&self) -> Result<String> {
        let user: GitHubUser = self.get("user")?;
        Ok(user.login)
    }

    fn owned_repositories(&self) -> Result<Vec<RepositoryDescriptor>> {
        let mut repositories = Vec::new();
        for page in 1.. {
            let batch: Vec<GitHubRepository> = self.get(&format!(
                "user/repos?affiliation=owner&per_page={PER_PAGE}&page={page}"
            ))?;
            let last = batch.len() < PER_PAGE;
            repositories.extend(batch.into_iter().map(RepositoryDescriptor::from));
            if last {
                break;
            }
        }
        info!("Found {} repositories", repositories.len());
        Ok(repositories)
    }
}
