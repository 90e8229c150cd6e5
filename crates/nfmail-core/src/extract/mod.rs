//! Field extraction conditioned on the classified subcategory.
//!
//! Pure, deterministic, total: a field whose pattern does not match is
//! simply absent from the result, never null. Patterns run over the raw
//! text (not lower-cased) so proper-noun casing in label values survives;
//! matching is case-insensitive at the regex level instead. Attachment
//! content is never opened.

mod patterns;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::models::document::{DocumentCategory, DocumentSubcategory};
use crate::models::email::AttachmentRef;

/// Extracted fields keyed by name.
///
/// There is no fixed schema: the key set depends on the subcategory branch
/// taken. The map is ordered, so identical inputs serialize byte-identically.
pub type ExtractedFields = Map<String, Value>;

/// Extract structured financial fields from email text.
///
/// Common fields are pulled for every document; the subcategory selects
/// which additional rule set runs. `category` and `attachments` are part of
/// the contract but unused by the current rules — an unrecognized
/// combination yields only the common fields.
pub fn extract(
    text: &str,
    _attachments: &[AttachmentRef],
    _category: DocumentCategory,
    subcategory: Option<DocumentSubcategory>,
) -> ExtractedFields {
    let mut fields = ExtractedFields::new();

    extract_common(text, &mut fields);

    match subcategory {
        Some(DocumentSubcategory::FreightNote) => extract_freight(text, &mut fields),
        Some(DocumentSubcategory::ServiceNote) => extract_service(text, &mut fields),
        Some(DocumentSubcategory::ProductNote) => extract_product(text, &mut fields),
        Some(DocumentSubcategory::InternalMaterial) => {
            // Marker only; there is nothing labeled to pull out of the body.
            fields.insert("is_internal_material".to_string(), Value::Bool(true));
        }
        Some(DocumentSubcategory::PurchaseRequest) => extract_purchase_request(text, &mut fields),
        None => {}
    }

    debug!(fields = fields.len(), "extraction finished");
    fields
}

/// First capture group of the first match, trimmed.
fn capture(regex: &Regex, text: &str) -> Option<String> {
    regex.captures(text).map(|caps| caps[1].trim().to_string())
}

fn insert_capture(fields: &mut ExtractedFields, key: &str, regex: &Regex, text: &str) {
    if let Some(value) = capture(regex, text) {
        fields.insert(key.to_string(), Value::String(value));
    }
}

/// Brazilian numeric format to machine decimal: thousands-separator dots
/// removed, decimal comma converted to a dot. Left as a string for the
/// caller to parse into a numeric type.
fn normalize_amount(raw: &str) -> String {
    raw.replace('.', "").replace(',', ".")
}

fn extract_common(text: &str, fields: &mut ExtractedFields) {
    insert_capture(fields, "supplier", &patterns::SUPPLIER, text);
    insert_capture(fields, "tax_id", &patterns::CNPJ, text);
    insert_capture(fields, "document_number", &patterns::DOCUMENT_NUMBER, text);
    if let Some(raw) = capture(&patterns::AMOUNT, text) {
        fields.insert("amount".to_string(), Value::String(normalize_amount(&raw)));
    }
}

fn extract_freight(text: &str, fields: &mut ExtractedFields) {
    insert_capture(fields, "carrier", &patterns::CARRIER, text);
    insert_capture(fields, "origin", &patterns::ORIGIN, text);
    insert_capture(fields, "destination", &patterns::DESTINATION, text);
}

fn extract_service(text: &str, fields: &mut ExtractedFields) {
    insert_capture(fields, "iss_amount", &patterns::ISS_AMOUNT, text);
    insert_capture(fields, "tax_activity_code", &patterns::CNAE, text);
}

fn extract_product(text: &str, fields: &mut ExtractedFields) {
    insert_capture(fields, "ncm_code", &patterns::NCM, text);

    let items: Vec<Value> = patterns::LINE_ITEM
        .captures_iter(text)
        .filter_map(|caps| {
            let quantity: i64 = caps[2].parse().ok()?;
            let mut item = Map::new();
            item.insert(
                "description".to_string(),
                Value::String(caps[1].trim().to_string()),
            );
            item.insert("quantity".to_string(), Value::Number(quantity.into()));
            Some(Value::Object(item))
        })
        .collect();

    if !items.is_empty() {
        fields.insert("line_items".to_string(), Value::Array(items));
    }
}

fn extract_purchase_request(text: &str, fields: &mut ExtractedFields) {
    insert_capture(
        fields,
        "document_number",
        &patterns::REQUISITION_NUMBER,
        text,
    );
    insert_capture(fields, "requester", &patterns::REQUESTER, text);
    if let Some(raw) = capture(&patterns::ESTIMATED_AMOUNT, text) {
        fields.insert(
            "estimated_amount".to_string(),
            Value::String(normalize_amount(&raw)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extract_for(text: &str, subcategory: Option<DocumentSubcategory>) -> ExtractedFields {
        extract(
            text,
            &[],
            DocumentCategory::SupplierDocument,
            subcategory,
        )
    }

    #[test]
    fn test_common_fields() {
        let text = "Fornecedor: ACME Ltda\n\
                    CNPJ: 12.345.678/0001-99\n\
                    Nota Fiscal: 4512-1\n\
                    Valor Total: R$ 3.500,00";
        let fields = extract_for(text, Some(DocumentSubcategory::ProductNote));
        assert_eq!(fields["supplier"], "ACME Ltda");
        assert_eq!(fields["tax_id"], "12.345.678/0001-99");
        assert_eq!(fields["document_number"], "4512-1");
        assert_eq!(fields["amount"], "3500.00");
    }

    #[test]
    fn test_cnpj_without_dots() {
        let text = "Empresa 12345678/0001-99 emitiu a nota";
        let fields = extract_for(text, None);
        assert_eq!(fields["tax_id"], "12345678/0001-99");
    }

    #[test]
    fn test_freight_fields() {
        let text = "Transportadora: Transp Ltda\nOrigem: SP\nDestino: RJ\nValor: R$ 500,00";
        let fields = extract_for(text, Some(DocumentSubcategory::FreightNote));
        assert_eq!(fields["carrier"], "Transp Ltda");
        assert_eq!(fields["origin"], "SP");
        assert_eq!(fields["destination"], "RJ");
        assert_eq!(fields["amount"], "500.00");
    }

    #[test]
    fn test_service_fields() {
        let text = "ISS: 50.00\nCNAE: 1234";
        let fields = extract_for(text, Some(DocumentSubcategory::ServiceNote));
        assert_eq!(fields["iss_amount"], "50.00");
        assert_eq!(fields["tax_activity_code"], "1234");
    }

    #[test]
    fn test_product_fields_with_line_items() {
        let text = "NCM: 01012100\nItem: Parafuso Quantidade: 10";
        let fields = extract_for(text, Some(DocumentSubcategory::ProductNote));
        assert_eq!(fields["ncm_code"], "01012100");

        let items = fields["line_items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["description"], "Parafuso");
        assert_eq!(items[0]["quantity"], 10);
    }

    #[test]
    fn test_line_items_collected_in_document_order() {
        let text = "Item: Parafuso Quantidade: 10\n\
                    Produto: Porca M8 Quantidade: 25\n\
                    Item: Arruela Quantidade: 100";
        let fields = extract_for(text, Some(DocumentSubcategory::ProductNote));
        let items = fields["line_items"].as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["description"], "Parafuso");
        assert_eq!(items[1]["description"], "Porca M8");
        assert_eq!(items[1]["quantity"], 25);
        assert_eq!(items[2]["description"], "Arruela");
        assert_eq!(items[2]["quantity"], 100);
    }

    #[test]
    fn test_internal_material_marker() {
        let text = "Material de consumo: álcool";
        let fields = extract_for(text, Some(DocumentSubcategory::InternalMaterial));
        assert_eq!(fields["is_internal_material"], true);
    }

    #[test]
    fn test_purchase_request_fields() {
        let text = "Requisição de Compra: 784\nSolicitante: Ana Souza\nValor Estimado: R$ 1.200,50";
        let fields = extract_for(text, Some(DocumentSubcategory::PurchaseRequest));
        assert_eq!(fields["document_number"], "784");
        assert_eq!(fields["requester"], "Ana Souza");
        assert_eq!(fields["estimated_amount"], "1200.50");
    }

    #[test]
    fn test_unmatched_fields_are_absent() {
        let fields = extract_for("sem rótulos aqui", Some(DocumentSubcategory::FreightNote));
        assert!(fields.is_empty());

        let fields = extract_for("", None);
        assert!(fields.is_empty());
    }

    #[test]
    fn test_no_subcategory_yields_only_common_fields() {
        let text = "Fornecedor: ACME\nTransportadora: Transp Ltda";
        let fields = extract_for(text, None);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["supplier"], "ACME");
    }

    #[test]
    fn test_deterministic_serialization() {
        let text = "Fornecedor: ACME\nNCM: 0101\nItem: Parafuso Quantidade: 10";
        let first = extract_for(text, Some(DocumentSubcategory::ProductNote));
        let second = extract_for(text, Some(DocumentSubcategory::ProductNote));
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
