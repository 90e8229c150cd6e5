//! Classify command - classify a single email body file.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use nfmail_core::Classifier;

use super::{attachment_refs, load_config, OutputFormat};

/// Arguments for the classify command.
#[derive(Args)]
pub struct ClassifyArgs {
    /// Input file with the plain-text email body
    #[arg(required = true)]
    input: PathBuf,

    /// Sender address
    #[arg(short, long)]
    sender: Option<String>,

    /// Attachment filename (repeatable); content is never read
    #[arg(short, long = "attachment")]
    attachments: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

pub fn run(args: ClassifyArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    let text = fs::read_to_string(&args.input)?;
    let attachments = attachment_refs(&args.attachments);

    info!("Classifying {}", args.input.display());

    let classifier = Classifier::new().with_internal_domain(&config.classify.internal_domain);
    let result = classifier.classify(&text, &attachments, args.sender.as_deref());

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&result)?),
        OutputFormat::Text => {
            println!("{} {}", style("Category:").bold(), result.category);
            if let Some(subcategory) = result.subcategory {
                println!("{} {}", style("Subcategory:").bold(), subcategory);
            }
            println!("{} {:.2}", style("Confidence:").bold(), result.confidence);
        }
    }

    Ok(())
}
