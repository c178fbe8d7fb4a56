//! Deployment plan manifest (`stackform.toml`).
//!
//! The manifest declares what one deployment materializes: which settings
//! are required, which secrets land in which files, which templates render
//! into which artifacts, and how the generated bindings are named.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::secrets::SecretSpec;
use crate::core::template::TemplateMapping;
use crate::error::{PreconditionError, Result};

/// Default manifest file name, resolved against the working directory.
pub const MANIFEST_FILE: &str = "stackform.toml";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Environment definition file supplying every setting.
    #[serde(default = "default_env_file")]
    pub env_file: PathBuf,

    /// If set, the pipeline refuses to run as any other user.
    pub expect_user: Option<String>,

    /// Settings that must be present and non-placeholder.
    #[serde(default)]
    pub required: Vec<String>,

    /// Scrape-job fragment generation, if this deployment uses it.
    pub fragments: Option<FragmentsSection>,

    /// Credential payload reindentation, if this deployment uses it.
    pub credentials: Option<CredentialsSection>,

    /// Secret files to materialize.
    #[serde(default)]
    pub secrets: Vec<SecretSpec>,

    /// Templates to render, in declared order.
    #[serde(default)]
    pub templates: Vec<TemplateMapping>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FragmentsSection {
    /// Setting holding the comma-separated path pattern list.
    pub list_setting: String,

    /// Pattern used when the list is empty or absent.
    pub default_pattern: String,

    /// Variable name the generated blocks are bound to.
    #[serde(default = "default_fragments_bind")]
    pub bind_as: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialsSection {
    /// Base64 setting holding the multi-line credential document.
    pub setting: String,

    /// Variable name the reindented payload is bound to.
    #[serde(default = "default_credentials_bind")]
    pub bind_as: String,

    /// Indentation for interior lines.
    #[serde(default = "default_middle_indent")]
    pub middle_indent: usize,

    /// Indentation for the final line; shallower than interior lines so
    /// it aligns with the enclosing block's closing level.
    #[serde(default = "default_last_indent")]
    pub last_indent: usize,
}

fn default_env_file() -> PathBuf {
    PathBuf::from("stack.env")
}

fn default_fragments_bind() -> String {
    "SCRAPE_JOBS".to_string()
}

fn default_credentials_bind() -> String {
    "CREDENTIALS_BLOCK".to_string()
}

fn default_middle_indent() -> usize {
    8
}

fn default_last_indent() -> usize {
    6
}

impl Manifest {
    /// Load and parse the manifest.
    ///
    /// # Errors
    ///
    /// Returns `PreconditionError::ManifestNotFound` if the file is
    /// absent and a parse error for invalid TOML; both are fatal.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PreconditionError::ManifestNotFound(path.to_path_buf()).into());
        }
        let contents = std::fs::read_to_string(path)?;
        let manifest: Self = toml::from_str(&contents)?;
        Ok(manifest)
    }
}
