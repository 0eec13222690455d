//! Lookup-then-create helpers for the bootstrap flow
//!
//! Sites and projects are addressed by name. Re-running against an already
//! initialized server finds the existing resources and creates nothing.

use crate::client::ServerClient;
use crate::error::Result;
use crate::model::{AdminMode, Project, Site};
use std::fmt;
use std::path::PathBuf;

/// Name of the site every server starts with
pub const DEFAULT_SITE: &str = "Default";

/// Name of the project every site starts with
pub const DEFAULT_PROJECT: &str = "Default";

/// Content URL for a new site: the name with spaces removed
pub fn derive_content_url(site_name: &str) -> String {
    site_name.replace(' ', "")
}

/// Ensure a site with the given name exists, creating it with
/// content-and-users admin mode if absent. Returns the site and whether it
/// was created by this call.
///
/// The returned site carries the server's actual content URL; sign-ins
/// targeting the site must use it rather than re-deriving one from the name.
pub async fn ensure_site(client: &ServerClient, name: &str) -> Result<(Site, bool)> {
    let sites = client.list_sites().await?;

    if let Some(existing) = sites.into_iter().find(|s| s.name == name) {
        tracing::debug!(site = %name, id = %existing.id, "site already exists");
        return Ok((existing, false));
    }

    let site = client
        .create_site(name, &derive_content_url(name), AdminMode::ContentAndUsers)
        .await?;
    Ok((site, true))
}

/// Ensure a project with the given name exists in the signed-in site,
/// creating it if absent. Returns the project and whether it was created by
/// this call.
pub async fn ensure_project(client: &ServerClient, name: &str) -> Result<(Project, bool)> {
    let projects = client.list_projects().await?;

    if let Some(existing) = projects.into_iter().find(|p| p.name == name) {
        tracing::debug!(project = %name, id = %existing.id, "project already exists");
        return Ok((existing, false));
    }

    let project = client.create_project(name).await?;
    Ok((project, true))
}

/// Kind of published content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Datasource,
    Workbook,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Datasource => write!(f, "datasource"),
            ContentKind::Workbook => write!(f, "workbook"),
        }
    }
}

/// One file published during a bootstrap run
#[derive(Debug, Clone)]
pub struct PublishedItem {
    pub kind: ContentKind,
    pub file: PathBuf,
    pub id: String,
    pub name: String,
    pub created_at: Option<String>,
}

/// What a bootstrap run did: which resources were found or created, and
/// what got published, for the CLI to render
#[derive(Debug, Clone)]
pub struct BootstrapReport {
    pub site: Site,
    pub site_created: bool,
    pub project: Project,
    pub project_created: bool,
    pub published: Vec<PublishedItem>,
}

impl BootstrapReport {
    /// Number of files published during the run
    pub fn published_count(&self) -> usize {
        self.published.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_content_url_removes_spaces() {
        assert_eq!(derive_content_url("My Site Name"), "MySiteName");
        assert_eq!(derive_content_url("Marketing"), "Marketing");
    }

    #[test]
    fn test_content_kind_display() {
        assert_eq!(ContentKind::Datasource.to_string(), "datasource");
        assert_eq!(ContentKind::Workbook.to_string(), "workbook");
    }

    #[test]
    fn test_report_counts_published_items() {
        let report = BootstrapReport {
            site: Site {
                id: "s1".to_string(),
                name: "Default".to_string(),
                content_url: String::new(),
                admin_mode: Default::default(),
            },
            site_created: false,
            project: Project {
                id: "p1".to_string(),
                name: "Default".to_string(),
            },
            project_created: true,
            published: vec![PublishedItem {
                kind: ContentKind::Workbook,
                file: PathBuf::from("overview.twb"),
                id: "w1".to_string(),
                name: "overview".to_string(),
                created_at: None,
            }],
        };

        assert_eq!(report.published_count(), 1);
        assert!(report.project_created);
        assert!(!report.site_created);
    }
}
