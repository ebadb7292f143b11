use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::api::client::{endpoint, ApiError, ApiRequest};

/// A Pages project as reported by the platform.
///
/// Only `name` is required; everything else is informational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub subdomain: Option<String>,
    #[serde(default)]
    pub production_branch: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GetProjectRequest {
    pub name: String,
}

impl ApiRequest for GetProjectRequest {
    type Response = Project;

    fn build_request(self, projects_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = endpoint(projects_url, &[self.name.as_str()])?;
        Ok(client.get(url))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListProjectsRequest;

impl ApiRequest for ListProjectsRequest {
    type Response = Vec<Project>;

    fn build_request(self, projects_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.get(projects_url.clone()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub production_branch: String,
}

impl ApiRequest for CreateProjectRequest {
    type Response = Project;

    fn build_request(self, projects_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        Ok(client.post(projects_url.clone()).json(&self))
    }
}
