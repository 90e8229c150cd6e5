//! Extract command - run the field extractor with explicit labels.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;

use nfmail_core::{extract, DocumentCategory, DocumentSubcategory};

use super::{attachment_refs, display_value, OutputFormat};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file with the plain-text email body
    #[arg(required = true)]
    input: PathBuf,

    /// Document category (wire name, e.g. SUPPLIER_DOCUMENT)
    #[arg(short = 'C', long, default_value = "SUPPLIER_DOCUMENT")]
    category: String,

    /// Document subcategory (wire name, e.g. FREIGHT_NOTE)
    #[arg(short = 'S', long)]
    subcategory: Option<String>,

    /// Attachment filename (repeatable); content is never read
    #[arg(short, long = "attachment")]
    attachments: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

pub fn run(args: ExtractArgs) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    let text = fs::read_to_string(&args.input)?;
    let attachments = attachment_refs(&args.attachments);

    let category = DocumentCategory::from_str(&args.category)
        .ok_or_else(|| anyhow::anyhow!("unknown category: {}", args.category))?;
    let subcategory = args
        .subcategory
        .as_deref()
        .map(|s| {
            DocumentSubcategory::from_str(s)
                .ok_or_else(|| anyhow::anyhow!("unknown subcategory: {s}"))
        })
        .transpose()?;

    let fields = extract(&text, &attachments, category, subcategory);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&fields)?),
        OutputFormat::Text => {
            if fields.is_empty() {
                println!("{}", style("No fields matched").yellow());
            }
            for (key, value) in &fields {
                println!("{} {}", style(format!("{key}:")).bold(), display_value(value));
            }
        }
    }

    Ok(())
}
