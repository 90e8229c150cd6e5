//! Per-pair classification scorers.
//!
//! Each scorer is an independent function of the same normalized input and
//! yields a confidence in [0, 0.99] for exactly one (category, subcategory)
//! pair. Keyword matching is substring-based on the lower-cased text; there
//! is no tokenization or stemming.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::email::AttachmentRef;

use super::score::Score;

/// Normalized classifier input shared by all scorers.
pub(crate) struct SignalInput<'a> {
    /// Lower-cased body text.
    pub text: &'a str,
    /// Lower-cased sender address (empty when absent).
    pub sender: &'a str,
    pub attachments: &'a [AttachmentRef],
}

const PURCHASE_REQUEST_KEYWORDS: &[&str] = &[
    "requisição de compra",
    "requisicao de compra",
    "rc",
    "pedido interno",
    "pedido de compra",
    "solicitação de compra",
    "solicitacao de compra",
];

const FREIGHT_KEYWORDS: &[&str] = &[
    "frete",
    "transporte",
    "cte",
    "ct-e",
    "conhecimento de transporte",
    "carga",
];
const FREIGHT_DECISIVE: &[&str] = &["cte", "ct-e", "conhecimento de transporte"];
const FREIGHT_XML_HINTS: &[&str] = &["cte", "conhecimento", "ct-e"];

const SERVICE_KEYWORDS: &[&str] = &[
    "serviço",
    "prestação de serviço",
    "prestacao de servico",
    "mão de obra",
    "mao de obra",
];
const ISS_TERMS: &[&str] = &["iss", "issqn", "nfse", "nfs-e", "nfs"];

const PRODUCT_KEYWORDS: &[&str] = &["produto", "mercadoria", "item", "itens"];
const QUANTITY_TERMS: &[&str] = &["quantidade", "qtd", "valor unitario", "valor unitário"];
const PRODUCT_XML_HINTS: &[&str] = &["nfe", "nf-e", "nota fiscal"];

const MATERIAL_KEYWORDS: &[&str] = &[
    "material de consumo",
    "manutenção",
    "manutencao",
    "uso interno",
    "consumo",
];
const MATERIAL_HINTS: &[&str] = &["manutenção", "manutencao", "limpeza", "ti", "tecnico"];

lazy_static! {
    /// Bare 8-digit token, the shape of an NCM product code.
    static ref NCM_TOKEN: Regex = Regex::new(r"\b[0-9]{8}\b").unwrap();
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

fn has_xml_attachment(attachments: &[AttachmentRef]) -> bool {
    attachments
        .iter()
        .any(|a| a.filename.to_lowercase().ends_with(".xml"))
}

fn has_xml_attachment_named(attachments: &[AttachmentRef], hints: &[&str]) -> bool {
    attachments.iter().any(|a| {
        let name = a.filename.to_lowercase();
        name.ends_with(".xml") && hints.iter().any(|h| name.contains(h))
    })
}

/// INTERNAL_ENTRY / PURCHASE_REQUEST.
pub(crate) fn purchase_request(input: &SignalInput<'_>, internal_domain: &str) -> f32 {
    let mut score = Score::new();
    score.add_if(contains_any(input.text, PURCHASE_REQUEST_KEYWORDS), 0.8);
    let internal_sender =
        input.sender.contains('@') && input.sender.ends_with(&format!("@{internal_domain}"));
    score.add_if(internal_sender, 0.1);
    // A fiscal XML attachment points away from an internal request.
    score.add_if(!has_xml_attachment(input.attachments), 0.05);
    score.value()
}

/// SUPPLIER_DOCUMENT / FREIGHT_NOTE.
pub(crate) fn freight_note(input: &SignalInput<'_>) -> f32 {
    let mut score = Score::new();
    score.add_if(contains_any(input.text, FREIGHT_KEYWORDS), 0.6);
    // An explicit CT-e mention is decisive on its own.
    score.floor_if(contains_any(input.text, FREIGHT_DECISIVE), 0.9);
    score.floor_if(
        has_xml_attachment_named(input.attachments, FREIGHT_XML_HINTS),
        0.95,
    );
    let carrier_mentioned =
        input.text.contains("transportadora") || input.sender.contains("transportadora");
    score.add_if(carrier_mentioned, 0.2);
    score.value()
}

/// SUPPLIER_DOCUMENT / SERVICE_NOTE.
pub(crate) fn service_note(input: &SignalInput<'_>) -> f32 {
    let mut score = Score::new();
    score.add_if(contains_any(input.text, SERVICE_KEYWORDS), 0.7);
    score.floor_if(contains_any(input.text, ISS_TERMS), 0.9);
    // Product codes argue against a service note.
    score.add_if(!input.text.contains("ncm"), 0.05);
    score.value()
}

/// SUPPLIER_DOCUMENT / PRODUCT_NOTE.
pub(crate) fn product_note(input: &SignalInput<'_>) -> f32 {
    let mut score = Score::new();
    score.add_if(contains_any(input.text, PRODUCT_KEYWORDS), 0.4);
    score.add_if(
        NCM_TOKEN.is_match(input.text) || input.text.contains("ncm"),
        0.5,
    );
    score.add_if(contains_any(input.text, QUANTITY_TERMS), 0.2);
    score.floor_if(
        has_xml_attachment_named(input.attachments, PRODUCT_XML_HINTS),
        0.95,
    );
    score.value()
}

/// SUPPLIER_DOCUMENT / INTERNAL_MATERIAL.
///
/// Capped below the other scorers: the vocabulary is generic enough that it
/// must not outrank a decisive hit elsewhere.
pub(crate) fn internal_material(input: &SignalInput<'_>) -> f32 {
    let mut score = Score::capped(0.95);
    score.add_if(contains_any(input.text, MATERIAL_KEYWORDS), 0.7);
    score.add_if(contains_any(input.text, MATERIAL_HINTS), 0.15);
    score.value()
}
