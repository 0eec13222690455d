//! Resource models for the analytics server REST API
//!
//! These mirror the JSON shapes the server sends and receives. Resources are
//! looked up by name and created when absent; this crate never updates or
//! deletes them.

use serde::{Deserialize, Serialize};

/// Site administration mode, fixed at creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AdminMode {
    /// Site administrators manage both content and users
    #[default]
    ContentAndUsers,
    /// Site administrators manage content only
    ContentOnly,
}

/// A site: top-level tenant container on the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    pub name: String,
    #[serde(rename = "contentUrl")]
    pub content_url: String,
    #[serde(rename = "adminMode", default)]
    pub admin_mode: AdminMode,
}

/// A project: folder-like grouping of content within a site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
}

/// A published datasource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Datasource {
    pub id: String,
    pub name: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
}

/// A published workbook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workbook {
    pub id: String,
    pub name: String,
    #[serde(rename = "showTabs", default)]
    pub show_tabs: bool,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
}

/// Sign-in credentials
///
/// An empty `site_content_url` addresses the server's default site.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub site_content_url: String,
}

impl Credentials {
    /// Credentials against the default site
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            site_content_url: String::new(),
        }
    }

    /// Re-target the credentials at a site by content URL
    pub fn on_site(mut self, content_url: impl Into<String>) -> Self {
        self.site_content_url = content_url.into();
        self
    }
}
