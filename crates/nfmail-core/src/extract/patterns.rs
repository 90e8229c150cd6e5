//! Regex patterns for Brazilian fiscal field extraction.
//!
//! All patterns match case-insensitively over the raw text so proper-noun
//! casing in label values survives into the captures.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Common fields (any classified document)
    pub(crate) static ref SUPPLIER: Regex = Regex::new(
        r"(?i)Fornecedor: *(.+)"
    ).unwrap();

    // CNPJ-shaped token (NN.NNN.NNN/NNNN-NN, dots optional)
    pub(crate) static ref CNPJ: Regex = Regex::new(
        r"([0-9]{2}\.?[0-9]{3}\.?[0-9]{3}/[0-9]{4}-[0-9]{2})"
    ).unwrap();

    pub(crate) static ref DOCUMENT_NUMBER: Regex = Regex::new(
        r"(?i)Nota Fiscal\s*[:#]?\s*([0-9\-/]+)"
    ).unwrap();

    pub(crate) static ref AMOUNT: Regex = Regex::new(
        r"(?i)Valor(?: Total)?[:\s]*R?\$?\s*([0-9.,]+)"
    ).unwrap();

    // Freight notes
    pub(crate) static ref CARRIER: Regex = Regex::new(
        r"(?i)Transportadora: *(.+)"
    ).unwrap();

    pub(crate) static ref ORIGIN: Regex = Regex::new(
        r"(?i)Origem: *(.+)"
    ).unwrap();

    pub(crate) static ref DESTINATION: Regex = Regex::new(
        r"(?i)Destino: *(.+)"
    ).unwrap();

    // Service notes
    pub(crate) static ref ISS_AMOUNT: Regex = Regex::new(
        r"(?i)ISS[:\s]*R?\$?\s*([0-9.,]+)"
    ).unwrap();

    pub(crate) static ref CNAE: Regex = Regex::new(
        r"(?i)CNAE[:\s]*([0-9][0-9.\-/]*)"
    ).unwrap();

    // Product notes
    pub(crate) static ref NCM: Regex = Regex::new(
        r"(?i)NCM[:\s]*([0-9]{2,8})"
    ).unwrap();

    // One "Item/Produto ... Quantidade n" pair; iterated for line items
    pub(crate) static ref LINE_ITEM: Regex = Regex::new(
        r"(?i)(?:Item|Produto)\s*[:#]?\s*(.+?)\s+Quantidade\s*[:#]?\s*([0-9]+)"
    ).unwrap();

    // Purchase requests
    pub(crate) static ref REQUISITION_NUMBER: Regex = Regex::new(
        r"(?i)Requisi[cç][aã]o(?: de Compra)?\s*[:#]?\s*([0-9\-]+)"
    ).unwrap();

    pub(crate) static ref REQUESTER: Regex = Regex::new(
        r"(?i)Solicitante: *(.+)"
    ).unwrap();

    pub(crate) static ref ESTIMATED_AMOUNT: Regex = Regex::new(
        r"(?i)Valor Estimado[:\s]*R?\$?\s*([0-9.,]+)"
    ).unwrap();
}
