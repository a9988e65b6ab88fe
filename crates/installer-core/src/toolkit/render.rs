//! Placeholder substitution into scoped temporary files
//!
//! A [`RenderedTemplate`] owns its temporary file. Dropping it removes the
//! file, so however a run ends the rendered copies do not outlive it.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

pub const PROJECT_NAME_TOKEN: &str = "<project-name>";
pub const COLLECTION_TOKEN: &str = "your-collection-name";
pub const SEARCH_SERVER_TOKEN: &str = "project-search";

/// A template rendered into a temporary file
#[derive(Debug)]
pub struct RenderedTemplate {
    file: NamedTempFile,
}

impl RenderedTemplate {
    /// Write `content` to a new temporary file ending in `suffix`, carrying
    /// over the permission bits of `template`. The file is created in `dir`,
    /// or the system temp directory when `None`.
    pub fn write(
        template: &Path,
        content: &str,
        suffix: &str,
        dir: Option<&Path>,
    ) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("claude_init_").suffix(suffix);
        let mut file = match dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .context("Failed to create temporary file")?;
        let written = file.write_all(content.as_bytes()).and_then(|_| file.flush());
        written.with_context(|| format!("Failed to write {}", file.path().display()))?;

        let perms = fs::metadata(template)
            .with_context(|| format!("Failed to stat {}", template.display()))?
            .permissions();
        fs::set_permissions(file.path(), perms)
            .with_context(|| format!("Failed to set permissions on {}", file.path().display()))?;

        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

fn read_template(template: &Path) -> Result<String> {
    fs::read_to_string(template)
        .with_context(|| format!("Failed to read template {}", template.display()))
}

/// Fill in the project name
pub fn substitute_project_name(content: &str, project_name: &str) -> String {
    content.replace(PROJECT_NAME_TOKEN, project_name)
}

/// Fill in the vector-store collection and name the search server after the project
pub fn substitute_mcp(content: &str, collection: &str, project_name: &str) -> String {
    content
        .replace(COLLECTION_TOKEN, collection)
        .replace(SEARCH_SERVER_TOKEN, &format!("{}-search", project_name))
}

/// Render the project `CLAUDE.md` template
pub fn render_project_doc(
    template: &Path,
    project_name: &str,
    dir: Option<&Path>,
) -> Result<RenderedTemplate> {
    let content = substitute_project_name(&read_template(template)?, project_name);
    RenderedTemplate::write(template, &content, ".md", dir)
}

/// Render the `.mcp.json` template for a collection
pub fn render_mcp_config(
    template: &Path,
    collection: &str,
    project_name: &str,
    dir: Option<&Path>,
) -> Result<RenderedTemplate> {
    let content = substitute_mcp(&read_template(template)?, collection, project_name);
    RenderedTemplate::write(template, &content, ".json", dir)
}
