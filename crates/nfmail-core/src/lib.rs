//! Core library for financial email triage.
//!
//! This crate provides:
//! - Rule-based classification of financial emails into a document taxonomy
//! - Regex field extraction conditioned on the classified subcategory
//! - The ingestion workflow composing the two (status + audit history)
//!
//! Classification and extraction are pure, deterministic, total functions:
//! they never fail, never touch attachment content, and degrade to a
//! low-confidence guess or an empty field set on signal-free input. Mail
//! fetching, persistence, and the HTTP surface are external collaborators.

pub mod classify;
pub mod error;
pub mod extract;
pub mod models;
pub mod pipeline;

pub use classify::{classify, Classifier};
pub use error::{NfmailError, Result};
pub use extract::{extract, ExtractedFields};
pub use models::config::NfmailConfig;
pub use models::document::{
    Classification, DocumentCategory, DocumentStatus, DocumentSubcategory, FinancialDocument,
    HistoryEvent,
};
pub use models::email::{AttachmentRef, EmailMessage};
pub use pipeline::{DocumentPipeline, ProcessedDocument};
