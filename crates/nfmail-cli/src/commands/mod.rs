//! Subcommand implementations.

pub mod batch;
pub mod classify;
pub mod extract;
pub mod process;

use std::path::Path;

use nfmail_core::{AttachmentRef, NfmailConfig};

/// Output format shared by the subcommands.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

/// Load the given config file, or fall back to defaults.
pub(crate) fn load_config(config_path: Option<&str>) -> anyhow::Result<NfmailConfig> {
    match config_path {
        Some(path) => Ok(NfmailConfig::from_file(Path::new(path))?),
        None => Ok(NfmailConfig::default()),
    }
}

/// Attachment references from `--attachment` filename flags.
pub(crate) fn attachment_refs(filenames: &[String]) -> Vec<AttachmentRef> {
    filenames
        .iter()
        .map(|name| AttachmentRef::new(name.as_str()))
        .collect()
}

/// Render a JSON value for the plain-text output without the JSON quoting.
pub(crate) fn display_value(value: &serde_json::Value) -> String {
    match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    }
}
