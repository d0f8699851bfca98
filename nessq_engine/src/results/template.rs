//! # Custom Templates
//!
//! User-supplied replacements for the built-in list and table output,
//! rendered with minijinja. A template sees the [`RenderInput`] fields:
//!
//! ```text
//! header.query, header.call_time
//! matched_plugins[].id, .name, .severity     severity as code, e.g. "hig"
//! all_same_ports                             "80/tcp, 443/tcp" in list mode, empty otherwise
//! finding_lines[].host, .affected_ports, .comment
//! ```
//!
//! Undefined fields are errors rather than empty strings.

use super::content::{resolve_render_mode, RenderMode};
use super::error::OutputError;
use super::matches::Matches;
use super::render::RenderInput;
use minijinja::{Environment, UndefinedBehavior};
use nessq_query::log_debug;
use std::fs;
use std::path::{Path, PathBuf};

/// A template file read into memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    pub path: PathBuf,
    pub source: String,
}

impl TemplateFile {
    pub fn load(path: &Path) -> Result<Self, OutputError> {
        if !path.is_file() {
            return Err(OutputError::TemplateNotFound {
                path: path.to_path_buf(),
            });
        }

        let source = fs::read_to_string(path).map_err(|source| OutputError::TemplateRead {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn render(&self, input: &RenderInput) -> Result<String, OutputError> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        env.render_str(&self.source, input)
            .map_err(|source| OutputError::Template {
                path: self.path.clone(),
                source,
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomTemplate {
    /// One template whatever the port layout
    Single(TemplateFile),
    /// Picked by content sensitivity, like the built-in list and table
    ByMode {
        list: TemplateFile,
        table: TemplateFile,
    },
}

impl CustomTemplate {
    pub fn single(path: &Path) -> Result<Self, OutputError> {
        Ok(Self::Single(TemplateFile::load(path)?))
    }

    pub fn by_mode(list: &Path, table: &Path) -> Result<Self, OutputError> {
        Ok(Self::ByMode {
            list: TemplateFile::load(list)?,
            table: TemplateFile::load(table)?,
        })
    }

    pub fn select(&self, mode: &RenderMode) -> &TemplateFile {
        match (self, mode) {
            (Self::Single(file), _) => file,
            (Self::ByMode { list, .. }, RenderMode::List { .. }) => list,
            (Self::ByMode { table, .. }, RenderMode::Table) => table,
        }
    }
}

/// Sort, decide the output shape and render through `template`
pub fn render_custom(matches: &mut Matches, template: &CustomTemplate) -> Result<String, OutputError> {
    matches.sort_matched_plugins();
    matches.sort_by_ip();
    let mode = resolve_render_mode(matches)?;

    let file = template.select(&mode);
    log_debug!("Rendering custom template",
        "path" => file.path.display(),
        "list" => mode.is_list()
    );

    file.render(&RenderInput::from_matches(matches))
}
