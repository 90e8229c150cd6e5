//! Document taxonomy and workflow data models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::extract::ExtractedFields;

/// Top-level document classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentCategory {
    /// Document originated by an external supplier.
    SupplierDocument,
    /// Internally raised entry (e.g. a purchase request).
    InternalEntry,
    /// Unclassified.
    Other,
}

impl DocumentCategory {
    /// Wire name, as stored and exchanged with collaborators.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SupplierDocument => "SUPPLIER_DOCUMENT",
            Self::InternalEntry => "INTERNAL_ENTRY",
            Self::Other => "OTHER",
        }
    }

    /// Parse a wire name.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "SUPPLIER_DOCUMENT" => Some(Self::SupplierDocument),
            "INTERNAL_ENTRY" => Some(Self::InternalEntry),
            "OTHER" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finer classification within a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentSubcategory {
    /// Internal purchase request (requisição de compra).
    PurchaseRequest,
    /// Freight / transport note (CT-e).
    FreightNote,
    /// Service note (NFS-e).
    ServiceNote,
    /// Product note (NF-e).
    ProductNote,
    /// Internal consumable / maintenance material.
    InternalMaterial,
}

impl DocumentSubcategory {
    /// Wire name, as stored and exchanged with collaborators.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PurchaseRequest => "PURCHASE_REQUEST",
            Self::FreightNote => "FREIGHT_NOTE",
            Self::ServiceNote => "SERVICE_NOTE",
            Self::ProductNote => "PRODUCT_NOTE",
            Self::InternalMaterial => "INTERNAL_MATERIAL",
        }
    }

    /// Parse a wire name.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PURCHASE_REQUEST" => Some(Self::PurchaseRequest),
            "FREIGHT_NOTE" => Some(Self::FreightNote),
            "SERVICE_NOTE" => Some(Self::ServiceNote),
            "PRODUCT_NOTE" => Some(Self::ProductNote),
            "INTERNAL_MATERIAL" => Some(Self::InternalMaterial),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentSubcategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workflow state of a financial document.
///
/// Wire names stay in Portuguese: they are the values the document store
/// and its consumers already use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentStatus {
    /// Ingested, not yet classified.
    #[serde(rename = "RECEBIDO")]
    Received,
    /// Classified with enough confidence to proceed.
    #[serde(rename = "CLASSIFICADO")]
    Classified,
    /// Waiting for manual review of a low-confidence classification.
    #[serde(rename = "PENDENTE")]
    Pending,
    /// Processed and confirmed downstream.
    #[serde(rename = "FEITO")]
    Done,
    /// Sent back for revision.
    #[serde(rename = "REVISAO")]
    Review,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "RECEBIDO",
            Self::Classified => "CLASSIFICADO",
            Self::Pending => "PENDENTE",
            Self::Done => "FEITO",
            Self::Review => "REVISAO",
        }
    }
}

impl Default for DocumentStatus {
    fn default() -> Self {
        Self::Received
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier output for one email.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub category: DocumentCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<DocumentSubcategory>,
    /// Heuristic certainty in [0, 1], rounded to 2 decimals. Not a
    /// calibrated probability.
    pub confidence: f32,
}

impl Classification {
    /// Build a classification, rounding the confidence to 2 decimals.
    pub fn new(
        category: DocumentCategory,
        subcategory: DocumentSubcategory,
        confidence: f32,
    ) -> Self {
        Self {
            category,
            subcategory: Some(subcategory),
            confidence: round2(confidence),
        }
    }

    /// `CATEGORY/SUBCATEGORY` label for logs and audit events.
    pub fn label(&self) -> String {
        match self.subcategory {
            Some(sub) => format!("{}/{}", self.category, sub),
            None => self.category.to_string(),
        }
    }
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

/// A classified financial document with its extracted columns.
///
/// Extraction keys without a dedicated column are folded into `metadata`
/// by the pipeline; the persistence layer stores that blob opaquely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialDocument {
    pub classification: Classification,
    pub status: DocumentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "ExtractedFields::is_empty")]
    pub metadata: ExtractedFields,
}

/// A single audit-trail entry for a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEvent {
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    pub at: DateTime<Utc>,
}

impl HistoryEvent {
    /// Event recorded by the pipeline itself rather than a user.
    pub fn system(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            user: None,
            at: Utc::now(),
        }
    }
}
