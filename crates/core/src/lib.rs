//! vizboot-core - Core library for the vizboot CLI
//!
//! This library provides the pieces behind bootstrapping an analytics server
//! with content: a REST client for the server API, lookup-then-create helpers
//! for sites and projects, local content discovery, and configuration.

pub mod bootstrap;
pub mod client;
pub mod config;
pub mod content;
pub mod error;
pub mod model;

// Re-export commonly used types
pub use bootstrap::{
    derive_content_url, ensure_project, ensure_site, BootstrapReport, ContentKind, PublishedItem,
    DEFAULT_PROJECT, DEFAULT_SITE,
};
pub use client::{ServerClient, Session};
pub use config::{
    config_exists, get_config_path, load_config, load_config_from, resolve_targets,
    validate_config,
};
pub use config::{ConfigFile, ResolvedTargets};
pub use content::{
    find_datasources, find_workbooks, DATASOURCE_EXTENSIONS, WORKBOOK_EXTENSIONS,
};
pub use error::{Error, Result};
pub use model::{AdminMode, Credentials, Datasource, Project, Site, Workbook};
