//! Ingestion workflow: classification, extraction, and document state.
//!
//! Composes the classifier and extractor the way the external ingestion
//! workflow does, carrying the per-document status decision and the audit
//! history. Persistence stays with the caller: this module only builds the
//! values to store.

use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;
use tracing::info;

use crate::classify::Classifier;
use crate::extract::{self, ExtractedFields};
use crate::models::config::NfmailConfig;
use crate::models::document::{DocumentStatus, FinancialDocument, HistoryEvent};
use crate::models::email::EmailMessage;

/// Output of processing one email.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedDocument {
    pub document: FinancialDocument,
    /// Raw extractor output before column mapping.
    pub fields: ExtractedFields,
    pub history: Vec<HistoryEvent>,
}

/// The classify-then-extract workflow with the status decision on top.
#[derive(Debug, Clone)]
pub struct DocumentPipeline {
    classifier: Classifier,
    auto_classify_threshold: f32,
}

impl DocumentPipeline {
    /// Pipeline with the default configuration.
    pub fn new() -> Self {
        Self::with_config(&NfmailConfig::default())
    }

    pub fn with_config(config: &NfmailConfig) -> Self {
        Self {
            classifier: Classifier::new().with_internal_domain(&config.classify.internal_domain),
            auto_classify_threshold: config.workflow.auto_classify_threshold,
        }
    }

    /// Run the full workflow for one email.
    pub fn process(&self, email: &EmailMessage) -> ProcessedDocument {
        let mut history = vec![HistoryEvent::system(format!(
            "email ingested: {}",
            email.message_id
        ))];
        for attachment in &email.attachments {
            history.push(HistoryEvent::system(format!(
                "attachment recorded: {}",
                attachment.filename
            )));
        }

        let classification =
            self.classifier
                .classify(&email.body, &email.attachments, email.sender.as_deref());
        let status = if classification.confidence >= self.auto_classify_threshold {
            DocumentStatus::Classified
        } else {
            DocumentStatus::Pending
        };
        history.push(HistoryEvent::system(format!(
            "classified as {} (confidence {:.2})",
            classification.label(),
            classification.confidence
        )));

        let fields = extract::extract(
            &email.body,
            &email.attachments,
            classification.category,
            classification.subcategory,
        );

        let mut document = FinancialDocument {
            classification,
            status,
            supplier: None,
            tax_id: None,
            document_number: None,
            amount: None,
            metadata: ExtractedFields::new(),
        };
        for (key, value) in &fields {
            match key.as_str() {
                "supplier" => document.supplier = value.as_str().map(str::to_string),
                "tax_id" => document.tax_id = value.as_str().map(str::to_string),
                "document_number" => {
                    document.document_number = value.as_str().map(str::to_string)
                }
                // Unparseable amounts stay out of the column; the raw string
                // is still visible in `fields`.
                "amount" => {
                    document.amount = value.as_str().and_then(|s| Decimal::from_str(s).ok())
                }
                _ => {
                    document.metadata.insert(key.clone(), value.clone());
                }
            }
        }

        if !fields.is_empty() {
            history.push(HistoryEvent::system("financial fields extracted"));
        }

        info!(
            message_id = %email.message_id,
            status = %document.status,
            confidence = document.classification.confidence,
            "email processed"
        );

        ProcessedDocument {
            document,
            fields,
            history,
        }
    }
}

impl Default for DocumentPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{DocumentCategory, DocumentSubcategory};
    use crate::models::email::AttachmentRef;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_confident_document_is_classified_and_mapped() {
        let email = EmailMessage::from_body(
            "msg-1",
            "Fornecedor: Transp Ltda\n\
             CNPJ: 12.345.678/0001-99\n\
             Nota Fiscal: 778\n\
             Conhecimento de Transporte - CT-e referente ao frete\n\
             Transportadora: Transp Ltda\nOrigem: SP\nDestino: RJ\n\
             Valor: R$ 1.500,00",
        )
        .with_sender("contato@transp.com.br");

        let result = DocumentPipeline::new().process(&email);
        let document = &result.document;

        assert_eq!(
            document.classification.category,
            DocumentCategory::SupplierDocument
        );
        assert_eq!(
            document.classification.subcategory,
            Some(DocumentSubcategory::FreightNote)
        );
        assert_eq!(document.status, DocumentStatus::Classified);
        assert_eq!(document.supplier.as_deref(), Some("Transp Ltda"));
        assert_eq!(document.tax_id.as_deref(), Some("12.345.678/0001-99"));
        assert_eq!(document.document_number.as_deref(), Some("778"));
        assert_eq!(document.amount, Some(Decimal::new(150000, 2)));

        // Freight fields have no column of their own.
        assert_eq!(document.metadata["carrier"], "Transp Ltda");
        assert_eq!(document.metadata["origin"], "SP");
        assert_eq!(document.metadata["destination"], "RJ");
        assert!(!document.metadata.contains_key("supplier"));
    }

    #[test]
    fn test_low_confidence_document_is_pending() {
        let email = EmailMessage::from_body("msg-2", "Email curto sem rótulos");
        let result = DocumentPipeline::new().process(&email);

        assert_eq!(result.document.status, DocumentStatus::Pending);
        assert!(result.document.classification.confidence < 0.8);
        assert!(result.fields.is_empty());
    }

    #[test]
    fn test_history_events_in_order() {
        let email = EmailMessage::from_body(
            "msg-3",
            "Prestação de serviço - ISS: 50.00\nCNAE: 1234",
        )
        .with_attachment(AttachmentRef::new("nfse.pdf"));

        let result = DocumentPipeline::new().process(&email);
        let events: Vec<&str> = result.history.iter().map(|h| h.event.as_str()).collect();

        assert_eq!(events.len(), 4);
        assert_eq!(events[0], "email ingested: msg-3");
        assert_eq!(events[1], "attachment recorded: nfse.pdf");
        assert!(events[2].starts_with("classified as SUPPLIER_DOCUMENT/SERVICE_NOTE"));
        assert_eq!(events[3], "financial fields extracted");
    }

    #[test]
    fn test_no_extraction_event_without_fields() {
        let email = EmailMessage::from_body("msg-4", "nada para extrair");
        let result = DocumentPipeline::new().process(&email);

        assert!(result
            .history
            .iter()
            .all(|h| h.event != "financial fields extracted"));
    }

    #[test]
    fn test_threshold_comes_from_config() {
        let mut config = NfmailConfig::default();
        config.workflow.auto_classify_threshold = 0.5;
        let pipeline = DocumentPipeline::with_config(&config);

        // Service keywords alone score 0.75: pending at the default
        // threshold, classified at 0.5.
        let email = EmailMessage::from_body("msg-5", "Prestação de serviço com mão de obra");
        let result = pipeline.process(&email);
        assert_eq!(result.document.status, DocumentStatus::Classified);

        let default_result = DocumentPipeline::new().process(&email);
        assert_eq!(default_result.document.status, DocumentStatus::Pending);
    }
}
