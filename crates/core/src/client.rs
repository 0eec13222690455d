//! REST client for the analytics server

use crate::error::{Error, Result};
use crate::model::{AdminMode, Credentials, Datasource, Project, Site, Workbook};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;
use std::path::Path;

/// REST API version the client speaks
const API_VERSION: &str = "3.4";

/// Page size requested on list calls; only the first page is read
const PAGE_SIZE: usize = 1000;

/// Authenticated session state returned by sign-in
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub site_id: String,
}

/// Client for the analytics server REST API
///
/// All calls after [`ServerClient::sign_in`] carry the session token in the
/// `X-Auth-Token` header and are scoped to the signed-in site.
pub struct ServerClient {
    http_client: Client,
    base_url: String,
    session: Option<Session>,
}

impl ServerClient {
    /// Create a new client for a server address such as `https://analytics.example.com`
    pub fn new(server: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: format!("{}/api/{}", server.trim_end_matches('/'), API_VERSION),
            session: None,
        }
    }

    /// The current session, if signed in
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    fn require_session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or(Error::SignInRequired)
    }

    /// Sign in and store the session token for subsequent calls
    pub async fn sign_in(&mut self, credentials: &Credentials) -> Result<Session> {
        tracing::debug!(
            username = %credentials.username,
            site = %credentials.site_content_url,
            "signing in"
        );

        let body = serde_json::json!({
            "credentials": {
                "name": credentials.username,
                "password": credentials.password,
                "site": {
                    "contentUrl": credentials.site_content_url
                }
            }
        });

        let response = self
            .http_client
            .post(format!("{}/auth/signin", self.base_url))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let envelope: SignInEnvelope = self.handle_response(response).await?;
        let session = Session {
            token: envelope.credentials.token,
            site_id: envelope.credentials.site.id,
        };
        self.session = Some(session.clone());

        Ok(session)
    }

    /// Sign out and invalidate the session token
    pub async fn sign_out(&mut self) -> Result<()> {
        let session = self.require_session()?;

        let response = self
            .http_client
            .post(format!("{}/auth/signout", self.base_url))
            .header("X-Auth-Token", &session.token)
            .send()
            .await?;

        self.handle_empty(response).await?;
        self.session = None;

        Ok(())
    }

    /// List sites on the server (first page only)
    pub async fn list_sites(&self) -> Result<Vec<Site>> {
        let session = self.require_session()?;

        let response = self
            .http_client
            .get(format!("{}/sites", self.base_url))
            .query(&[("pageSize", PAGE_SIZE.to_string())])
            .header("X-Auth-Token", &session.token)
            .send()
            .await?;

        let envelope: SitesEnvelope = self.handle_response(response).await?;
        Ok(envelope.sites.site)
    }

    /// Create a site
    pub async fn create_site(
        &self,
        name: &str,
        content_url: &str,
        admin_mode: AdminMode,
    ) -> Result<Site> {
        let session = self.require_session()?;

        tracing::debug!(site = %name, content_url = %content_url, "creating site");

        let body = serde_json::json!({
            "site": {
                "name": name,
                "contentUrl": content_url,
                "adminMode": admin_mode
            }
        });

        let response = self
            .http_client
            .post(format!("{}/sites", self.base_url))
            .header("X-Auth-Token", &session.token)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let envelope: SiteEnvelope = self.handle_response(response).await?;
        Ok(envelope.site)
    }

    /// List projects in the signed-in site (first page only)
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let session = self.require_session()?;

        let response = self
            .http_client
            .get(format!("{}/sites/{}/projects", self.base_url, session.site_id))
            .query(&[("pageSize", PAGE_SIZE.to_string())])
            .header("X-Auth-Token", &session.token)
            .send()
            .await?;

        let envelope: ProjectsEnvelope = self.handle_response(response).await?;
        Ok(envelope.projects.project)
    }

    /// Create a project in the signed-in site
    pub async fn create_project(&self, name: &str) -> Result<Project> {
        let session = self.require_session()?;

        tracing::debug!(project = %name, "creating project");

        let body = serde_json::json!({
            "project": {
                "name": name
            }
        });

        let response = self
            .http_client
            .post(format!("{}/sites/{}/projects", self.base_url, session.site_id))
            .header("X-Auth-Token", &session.token)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let envelope: ProjectEnvelope = self.handle_response(response).await?;
        Ok(envelope.project)
    }

    /// Publish a datasource file into a project, overwriting any existing
    /// datasource of the same name
    pub async fn publish_datasource(
        &self,
        project_id: &str,
        file_path: &Path,
    ) -> Result<Datasource> {
        let session = self.require_session()?;

        tracing::debug!(file = %file_path.display(), "publishing datasource");

        let payload = serde_json::json!({
            "datasource": {
                "project": {
                    "id": project_id
                }
            }
        });

        let form = publish_form(payload.to_string(), file_path).await?;

        let response = self
            .http_client
            .post(format!(
                "{}/sites/{}/datasources",
                self.base_url, session.site_id
            ))
            .query(&[("overwrite", "true")])
            .header("X-Auth-Token", &session.token)
            .multipart(form)
            .send()
            .await?;

        let envelope: DatasourceEnvelope = self.handle_response(response).await?;
        Ok(envelope.datasource)
    }

    /// Publish a workbook file into a project with tabs shown, overwriting
    /// any existing workbook of the same name
    pub async fn publish_workbook(
        &self,
        project_id: &str,
        file_path: &Path,
    ) -> Result<Workbook> {
        let session = self.require_session()?;

        tracing::debug!(file = %file_path.display(), "publishing workbook");

        let payload = serde_json::json!({
            "workbook": {
                "showTabs": true,
                "project": {
                    "id": project_id
                }
            }
        });

        let form = publish_form(payload.to_string(), file_path).await?;

        let response = self
            .http_client
            .post(format!(
                "{}/sites/{}/workbooks",
                self.base_url, session.site_id
            ))
            .query(&[("overwrite", "true")])
            .header("X-Auth-Token", &session.token)
            .multipart(form)
            .send()
            .await?;

        let envelope: WorkbookEnvelope = self.handle_response(response).await?;
        Ok(envelope.workbook)
    }

    /// Handle API response
    async fn handle_response<T: for<'de> Deserialize<'de>>(&self, response: Response) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            Ok(response.json().await?)
        } else {
            Err(self.api_error(response).await)
        }
    }

    /// Handle API response with no interesting body
    async fn handle_empty(&self, response: Response) -> Result<()> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.api_error(response).await)
        }
    }

    async fn api_error(&self, response: Response) -> Error {
        let status = response.status();

        if status.as_u16() == 401 {
            Error::Authentication("Invalid credentials or expired token".to_string())
        } else if status.as_u16() == 403 {
            Error::PermissionDenied("Insufficient permissions".to_string())
        } else if status.as_u16() == 404 {
            Error::NotFound("Resource not found".to_string())
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Error::Api(format!("HTTP {}: {}", status.as_u16(), error_text))
        }
    }
}

/// Build the two-part publish form: a JSON request payload naming the owning
/// project, and the file contents
async fn publish_form(payload: String, file_path: &Path) -> Result<Form> {
    let bytes = tokio::fs::read(file_path).await.map_err(Error::Io)?;

    let file_name = file_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let content_type = mime_guess::from_path(file_path)
        .first_or_octet_stream()
        .to_string();

    let payload_part = Part::text(payload).mime_str("application/json")?;
    let file_part = Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(&content_type)?;

    Ok(Form::new()
        .part("request_payload", payload_part)
        .part("file", file_part))
}

// === Wire envelopes ===

#[derive(Debug, Deserialize)]
struct SignInEnvelope {
    credentials: SignedInCredentials,
}

#[derive(Debug, Deserialize)]
struct SignedInCredentials {
    token: String,
    site: SiteRef,
}

#[derive(Debug, Deserialize)]
struct SiteRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SitesEnvelope {
    sites: SiteList,
}

#[derive(Debug, Deserialize)]
struct SiteList {
    #[serde(default)]
    site: Vec<Site>,
}

#[derive(Debug, Deserialize)]
struct SiteEnvelope {
    site: Site,
}

#[derive(Debug, Deserialize)]
struct ProjectsEnvelope {
    projects: ProjectList,
}

#[derive(Debug, Deserialize)]
struct ProjectList {
    #[serde(default)]
    project: Vec<Project>,
}

#[derive(Debug, Deserialize)]
struct ProjectEnvelope {
    project: Project,
}

#[derive(Debug, Deserialize)]
struct DatasourceEnvelope {
    datasource: Datasource,
}

#[derive(Debug, Deserialize)]
struct WorkbookEnvelope {
    workbook: Workbook,
}
