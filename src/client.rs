//! Typed HTTP client for the repository read API.
//!
//! Mirrors what a dashboard consumes: each call builds a URL from a
//! repository name and optional project name, issues one read-only request,
//! and returns the decoded payload. No retries, no caching.

use crate::models::{
    RepositoryCoverageTimeline, RepositoryFlakyTests, RepositoryPerformanceTimeline,
    RepositoryTimeline,
};

/// Client for repository-level aggregate views.
#[derive(Debug, Clone)]
pub struct RepositoryClient {
    base_url: String,
    http: reqwest::Client,
}

/// Build the endpoint URL, inserting the optional project segment.
fn repository_url(
    base_url: &str,
    repo_name: &str,
    project_name: Option<&str>,
    suffix: &str,
) -> String {
    match project_name {
        Some(project) => format!(
            "{}/repo/{}/project/{}/{}",
            base_url.trim_end_matches('/'),
            repo_name,
            project,
            suffix
        ),
        None => format!(
            "{}/repo/{}/{}",
            base_url.trim_end_matches('/'),
            repo_name,
            suffix
        ),
    }
}

impl RepositoryClient {
    /// Create a client for a server base URL (e.g. "http://localhost:8080/api/v1").
    pub fn new(base_url: impl Into<String>) -> Self {
        RepositoryClient {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, repo_name: &str, project_name: Option<&str>, suffix: &str) -> String {
        repository_url(&self.base_url, repo_name, project_name, suffix)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: String) -> reqwest::Result<T> {
        self.http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await
    }

    /// Fetch the run timeline for a repository.
    pub async fn fetch_repository_timeline(
        &self,
        repo_name: &str,
        project_name: Option<&str>,
    ) -> reqwest::Result<RepositoryTimeline> {
        self.get_json(self.url(repo_name, project_name, "timeline"))
            .await
    }

    /// Fetch the coverage timeline for a repository.
    pub async fn fetch_repository_coverage_timeline(
        &self,
        repo_name: &str,
        project_name: Option<&str>,
    ) -> reqwest::Result<RepositoryCoverageTimeline> {
        self.get_json(self.url(repo_name, project_name, "coverage/timeline"))
            .await
    }

    /// Fetch the SVG coverage badge for a repository.
    pub async fn fetch_repository_coverage_badge(
        &self,
        repo_name: &str,
        project_name: Option<&str>,
    ) -> reqwest::Result<String> {
        self.http
            .get(self.url(repo_name, project_name, "badge/coverage"))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }

    /// Fetch flaky tests for a repository.
    pub async fn fetch_repository_flaky_tests(
        &self,
        repo_name: &str,
        project_name: Option<&str>,
    ) -> reqwest::Result<RepositoryFlakyTests> {
        self.get_json(self.url(repo_name, project_name, "tests/flaky"))
            .await
    }

    /// Fetch the performance timeline for a repository.
    pub async fn fetch_repository_performance_timeline(
        &self,
        repo_name: &str,
        project_name: Option<&str>,
    ) -> reqwest::Result<RepositoryPerformanceTimeline> {
        self.get_json(self.url(repo_name, project_name, "performance/timeline"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_url_without_project() {
        assert_eq!(
            repository_url("http://localhost:8080/api/v1", "my-org/my-repo", None, "timeline"),
            "http://localhost:8080/api/v1/repo/my-org/my-repo/timeline"
        );
    }

    #[test]
    fn builds_url_with_project() {
        assert_eq!(
            repository_url(
                "http://localhost:8080/api/v1/",
                "my-org/my-repo",
                Some("backend"),
                "coverage/timeline"
            ),
            "http://localhost:8080/api/v1/repo/my-org/my-repo/project/backend/coverage/timeline"
        );
    }

    #[test]
    fn builds_badge_and_flaky_urls() {
        assert_eq!(
            repository_url("http://x", "o/r", None, "badge/coverage"),
            "http://x/repo/o/r/badge/coverage"
        );
        assert_eq!(
            repository_url("http://x", "o/r", Some("p"), "tests/flaky"),
            "http://x/repo/o/r/project/p/tests/flaky"
        );
    }
}
