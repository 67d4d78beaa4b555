//! Repository List Generation
//!
//! Turns a CSV of repository metadata into a block of Maven `<repository>`
//! entries. Rows are `name,<unused>,url`; names lose every ampersand, urls
//! gain a trailing slash when missing, and rows whose name contains
//! "spring" (case-insensitive, checked after the ampersand strip) are
//! dropped. Input order is preserved.
//!
//! Known limitation: lines are split on raw commas with no quoting or
//! escaping support, so a quoted field containing a comma misparses.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

/// Default input filename, resolved against the working directory
pub const DEFAULT_INPUT: &str = "repo_stats.csv";

/// Default output filename, created or overwritten in the working directory
pub const DEFAULT_OUTPUT: &str = "newsettings-aar-jar.xml";

/// Rows whose (normalized) name contains this substring are skipped
const FILTER_SUBSTRING: &str = "spring";

/// Result type for generation operations
pub type RepolistResult<T> = Result<T, RepolistError>;

#[derive(Debug, Error)]
pub enum RepolistError {
    #[error("input file '{path}' not found: {source}")]
    MissingInput { path: PathBuf, source: io::Error },

    /// A CSV line with fewer than three fields, or an empty url field
    #[error("malformed row at line {line}: {reason}: '{content}'")]
    MalformedRow {
        line: usize,
        reason: &'static str,
        content: String,
    },

    #[error("failed to write '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Input and output paths for one generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepolistPaths {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Default for RepolistPaths {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

/// One decoded CSV row: name and url, middle field discarded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRow {
    pub name: String,
    pub url: String,
}

impl RepoRow {
    /// Decode one CSV line by naive comma split. `line` is 1-based and
    /// only used for diagnostics.
    pub fn parse(content: &str, line: usize) -> RepolistResult<Self> {
        let trimmed = content.trim();
        let fields: Vec<&str> = trimmed.split(',').collect();
        if fields.len() < 3 {
            return Err(RepolistError::MalformedRow {
                line,
                reason: "expected at least 3 comma-separated fields",
                content: trimmed.to_string(),
            });
        }
        if fields[2].is_empty() {
            return Err(RepolistError::MalformedRow {
                line,
                reason: "empty url field",
                content: trimmed.to_string(),
            });
        }
        Ok(Self {
            name: fields[0].to_string(),
            url: fields[2].to_string(),
        })
    }
}

/// A normalized output entry: id and name are the row's name with
/// ampersands removed, url is guaranteed to end with `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryEntry {
    pub id: String,
    pub name: String,
    pub url: String,
}

impl RepositoryEntry {
    pub fn from_row(row: &RepoRow) -> Self {
        let name = row.name.replace('&', "");
        let url = if row.url.ends_with('/') {
            row.url.clone()
        } else {
            format!("{}/", row.url)
        };
        Self {
            id: name.clone(),
            name,
            url,
        }
    }

    /// True when this entry must not be emitted
    pub fn is_filtered(&self) -> bool {
        self.name.to_lowercase().contains(FILTER_SUBSTRING)
    }

    /// Render the literal `<repository>` block for the settings file
    pub fn render(&self) -> String {
        format!(
            "\n    <repository>\n        <id>{}</id>\n        <name>{}</name>\n        <url>{}</url>\n    </repository>\n",
            self.id, self.name, self.url
        )
    }
}

/// Read `input`, filter and normalize its rows, and overwrite `output`
/// with the surviving `<repository>` blocks. Returns the number of
/// entries emitted. Any malformed row aborts the run before the output
/// file is touched.
pub fn generate(input: &Path, output: &Path) -> RepolistResult<usize> {
    let content = fs::read_to_string(input).map_err(|source| RepolistError::MissingInput {
        path: input.to_path_buf(),
        source,
    })?;

    let mut rows = Vec::new();
    for (index, line) in content.lines().enumerate() {
        rows.push(RepoRow::parse(line, index + 1)?);
    }
    debug!("Read {} rows from {}", rows.len(), input.display());

    let mut rendered = String::new();
    let mut emitted = 0;
    for row in &rows {
        let entry = RepositoryEntry::from_row(row);
        if entry.is_filtered() {
            debug!("Skipping filtered repository '{}'", entry.name);
            continue;
        }
        rendered.push_str(&entry.render());
        emitted += 1;
    }

    fs::write(output, rendered).map_err(|source| RepolistError::Write {
        path: output.to_path_buf(),
        source,
    })?;

    info!(
        "Wrote {} repository entries to {}",
        emitted,
        output.display()
    );
    Ok(emitted)
}
