//! Command handler for the vizboot CLI

use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Password};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tabled::{Table, Tabled};
use vizboot_core::{
    ensure_project, ensure_site, find_datasources, find_workbooks, load_config, resolve_targets,
    BootstrapReport, ContentKind, Credentials, PublishedItem, ServerClient,
};

#[derive(Tabled)]
struct PublishedRow {
    kind: String,
    name: String,
    id: String,
    published: String,
}

/// Run the full bootstrap flow: sign in, ensure site and project, publish
/// everything found in the two folders
pub async fn handle_run(
    server: Option<&str>,
    username: Option<&str>,
    site: Option<&str>,
    project: Option<&str>,
    datasources_folder: &Path,
    workbooks_folder: &Path,
) -> Result<()> {
    // CLI flags win over the optional config file
    let config = load_config()?;
    let targets = resolve_targets(&config, server, username, site, project)?;

    tracing::debug!(
        server = %targets.server,
        site = %targets.site,
        project = %targets.project,
        "resolved bootstrap targets"
    );

    // Password is prompted, never taken as an argument
    let password = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("Password")
        .interact()?;

    let credentials = Credentials::new(targets.username.clone(), password);

    // Step 1: sign in to the server's default site
    println!("Signing in to {}...", targets.server);
    let mut client = ServerClient::new(&targets.server);
    client.sign_in(&credentials).await?;

    // Step 2: create the site only if it doesn't exist
    println!(
        "Checking to see if site '{}' needs to be created...",
        targets.site
    );
    let (site, site_created) = ensure_site(&client, &targets.site).await?;
    if site_created {
        println!("  ✅ Site created: {}", site.name);
    } else {
        println!("  Site '{}' exists. Moving on...", site.name);
    }
    client.sign_out().await?;

    // Step 3: sign in to the target site, addressed by the content URL the
    // server reported for it (empty for the Default site)
    println!("Starting content upload...");
    let mut client = ServerClient::new(&targets.server);
    let credentials = credentials.on_site(site.content_url.clone());
    client.sign_in(&credentials).await?;

    // Step 4: create the project only if it doesn't exist
    let (project, project_created) = ensure_project(&client, &targets.project).await?;
    if project_created {
        println!("  ✅ Project created: {}", project.name);
    } else {
        println!("  Project '{}' exists. Moving on...", project.name);
    }

    let mut report = BootstrapReport {
        site,
        site_created,
        project,
        project_created,
        published: Vec::new(),
    };

    // Step 5: publish datasources and workbooks into the project
    let datasources = find_datasources(datasources_folder)
        .with_context(|| format!("Failed to scan {}", datasources_folder.display()))?;
    let workbooks = find_workbooks(workbooks_folder)
        .with_context(|| format!("Failed to scan {}", workbooks_folder.display()))?;

    println!(
        "Publishing {} datasource(s) and {} workbook(s)...",
        datasources.len(),
        workbooks.len()
    );

    let pb = ProgressBar::new((datasources.len() + workbooks.len()) as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30}] {pos}/{len} {msg}")?,
    );

    for file in &datasources {
        pb.set_message(file_label(file));
        let datasource = client.publish_datasource(&report.project.id, file).await?;
        pb.println(format!("  Datasource published. ID: {}", datasource.id));
        report.published.push(PublishedItem {
            kind: ContentKind::Datasource,
            file: file.clone(),
            id: datasource.id,
            name: datasource.name,
            created_at: datasource.created_at,
        });
        pb.inc(1);
    }

    for file in &workbooks {
        pb.set_message(file_label(file));
        let workbook = client.publish_workbook(&report.project.id, file).await?;
        pb.println(format!("  Workbook published. ID: {}", workbook.id));
        report.published.push(PublishedItem {
            kind: ContentKind::Workbook,
            file: file.clone(),
            id: workbook.id,
            name: workbook.name,
            created_at: workbook.created_at,
        });
        pb.inc(1);
    }

    pb.finish_and_clear();
    client.sign_out().await?;

    render_report(&report);

    Ok(())
}

/// Render the published-content summary from the run report
fn render_report(report: &BootstrapReport) {
    if report.published.is_empty() {
        println!("  No matching content found. Nothing published.");
        return;
    }

    let rows: Vec<PublishedRow> = report
        .published
        .iter()
        .map(|item| PublishedRow {
            kind: item.kind.to_string(),
            name: item.name.clone(),
            id: format_id(&item.id),
            published: item
                .created_at
                .as_deref()
                .map(format_date)
                .unwrap_or_default(),
        })
        .collect();

    println!();
    println!("{}", Table::new(rows));
    println!();
    println!(
        "✅ Server initialized! {} item(s) published.",
        report.published_count()
    );
}

/// File name for the progress message
fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Format ID to show only the first 8 characters
fn format_id(id: &str) -> String {
    if id.chars().count() > 8 {
        let prefix: String = id.chars().take(8).collect();
        format!("{}...", prefix)
    } else {
        id.to_string()
    }
}

/// Format ISO date string to readable format
fn format_date(iso_date: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(iso_date) {
        Ok(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => iso_date.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_id_truncates_long_ids() {
        assert_eq!(format_id("0123456789abcdef"), "01234567...");
        assert_eq!(format_id("short"), "short");
    }

    #[test]
    fn test_format_id_handles_multibyte_ids() {
        assert_eq!(format_id("αβγδεζηθικλ"), "αβγδεζηθ...");
        assert_eq!(format_id("été-id"), "été-id");
    }

    #[test]
    fn test_format_date_falls_back_to_raw_string() {
        assert_eq!(format_date("2026-08-30T12:34:00Z"), "2026-08-30 12:34");
        assert_eq!(format_date("not a date"), "not a date");
    }

    #[test]
    fn test_file_label_uses_file_name() {
        assert_eq!(file_label(Path::new("/tmp/data/sales.tds")), "sales.tds");
    }
}
