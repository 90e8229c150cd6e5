//! Process command - run the full pipeline on a single email body file.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use nfmail_core::{DocumentPipeline, EmailMessage, ProcessedDocument};

use super::{attachment_refs, display_value, load_config, OutputFormat};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file with the plain-text email body
    #[arg(required = true)]
    input: PathBuf,

    /// Sender address
    #[arg(short, long)]
    sender: Option<String>,

    /// Message id recorded in the audit history (default: the file stem)
    #[arg(short, long)]
    message_id: Option<String>,

    /// Attachment filename (repeatable); content is never read
    #[arg(short, long = "attachment")]
    attachments: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    let text = fs::read_to_string(&args.input)?;

    let message_id = args.message_id.clone().unwrap_or_else(|| {
        args.input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("email")
            .to_string()
    });

    info!("Processing {} as {}", args.input.display(), message_id);

    let mut email = EmailMessage::from_body(message_id, text);
    email.sender = args.sender.clone();
    email.attachments = attachment_refs(&args.attachments);

    let pipeline = DocumentPipeline::with_config(&config);
    let result = pipeline.process(&email);

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string(&result)?,
        OutputFormat::Text => format_processed(&result),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}

/// Plain-text rendering of a processed document.
pub(super) fn format_processed(result: &ProcessedDocument) -> String {
    let document = &result.document;
    let mut output = String::new();

    output.push_str(&format!(
        "Classification: {}\n",
        document.classification.label()
    ));
    output.push_str(&format!(
        "Confidence: {:.2}\n",
        document.classification.confidence
    ));
    output.push_str(&format!("Status: {}\n", document.status));

    if let Some(supplier) = &document.supplier {
        output.push_str(&format!("Supplier: {supplier}\n"));
    }
    if let Some(tax_id) = &document.tax_id {
        output.push_str(&format!("Tax id: {tax_id}\n"));
    }
    if let Some(number) = &document.document_number {
        output.push_str(&format!("Document number: {number}\n"));
    }
    if let Some(amount) = &document.amount {
        output.push_str(&format!("Amount: {amount}\n"));
    }

    if !document.metadata.is_empty() {
        output.push_str("Metadata:\n");
        for (key, value) in &document.metadata {
            output.push_str(&format!("  {key}: {}\n", display_value(value)));
        }
    }

    output.push_str("History:\n");
    for event in &result.history {
        output.push_str(&format!("  - {}\n", event.event));
    }

    output
}
