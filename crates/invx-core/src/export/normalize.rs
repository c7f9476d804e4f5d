//! Reshaping of loosely-typed invoice records into flat spreadsheet rows.
//!
//! Two flavours exist. [`Normalizer::normalize`] is used by the summary
//! export and fills every blank cell with a default. [`aggregate`] is used
//! by batch export and copies values through mostly untouched.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::models::config::ExportConfig;
use crate::models::invoice::{ExportInput, Invoice, LineItem, Scalar};

/// One row of the manufacturing item table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRow {
    pub part_no: String,
    pub description: String,
    pub hsn: String,
    pub quantity: String,
    pub rate: String,
    pub per: String,
    pub discount_percentage: String,
    pub amount: String,
}

impl ExportRow {
    /// Cells in column order (without the serial number).
    pub fn cells(&self) -> [&str; 8] {
        [
            &self.part_no,
            &self.description,
            &self.hsn,
            &self.quantity,
            &self.rate,
            &self.per,
            &self.discount_percentage,
            &self.amount,
        ]
    }
}

/// Header metadata plus rows, ready to be laid out as a sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedSheet {
    pub state_name: String,
    pub terms_of_delivery: String,
    pub items: Vec<ExportRow>,
}

/// First truthy value of a fallback chain, rendered as text.
pub(crate) fn first_truthy<'a>(values: impl IntoIterator<Item = Option<&'a Scalar>>) -> Option<String> {
    values
        .into_iter()
        .flatten()
        .find(|v| v.is_truthy())
        .map(Scalar::text)
}

/// `"<n> Nos."` for any truthy quantity, `"1 Nos."` otherwise.
fn quantity_cell(quantity: Option<&Scalar>) -> String {
    match first_truthy([quantity]) {
        Some(q) => format!("{} Nos.", q),
        None => "1 Nos.".to_string(),
    }
}

fn text_or_empty(value: Option<&Scalar>) -> String {
    value.map(Scalar::text).unwrap_or_default()
}

/// Summary-export normalizer.
///
/// Rows without an identifier receive a random placeholder such as
/// `ITEM-4821`; the generator is seedable so output can be reproduced.
#[derive(Debug, Clone)]
pub struct Normalizer {
    rng: StdRng,
    default_state_name: String,
    default_terms_of_delivery: String,
}

impl Normalizer {
    /// Normalizer seeded from the thread-local generator.
    #[cfg(feature = "native")]
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_rng(&mut rand::rng()))
    }

    /// Normalizer with a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        let defaults = ExportConfig::default();
        Self {
            rng,
            default_state_name: defaults.default_state_name,
            default_terms_of_delivery: defaults.default_terms_of_delivery,
        }
    }

    /// Use the header defaults from the export configuration.
    pub fn with_config(mut self, config: &ExportConfig) -> Self {
        self.default_state_name = config.default_state_name.clone();
        self.default_terms_of_delivery = config.default_terms_of_delivery.clone();
        self
    }

    fn placeholder(&mut self, prefix: &str) -> String {
        format!("{}-{}", prefix, self.rng.random_range(0..10000))
    }

    /// Flatten all entries into item rows.
    ///
    /// An empty array yields no rows and empty header fields.
    pub fn normalize(&mut self, input: &ExportInput) -> NormalizedSheet {
        if input.is_empty() {
            return NormalizedSheet::default();
        }

        let mut sheet = NormalizedSheet {
            state_name: self.default_state_name.clone(),
            terms_of_delivery: self.default_terms_of_delivery.clone(),
            items: Vec::new(),
        };

        for invoice in input.invoices() {
            match &invoice.items {
                Some(items) => {
                    for item in items.iter().flatten() {
                        let row = self.item_row(invoice, item);
                        sheet.items.push(row);
                    }
                }
                None => {
                    let row = self.invoice_row(invoice);
                    sheet.items.push(row);
                }
            }

            if let Some(state) = first_truthy([invoice.state_name.as_ref()]) {
                sheet.state_name = state;
            }
            if let Some(terms) = first_truthy([invoice.terms_of_delivery.as_ref()]) {
                sheet.terms_of_delivery = terms;
            }

            if let Some(file_name) = first_truthy([invoice.file_name.as_ref()]) {
                sheet.items.push(ExportRow {
                    part_no: self.placeholder("FILE"),
                    description: format!("Source: {}", file_name),
                    quantity: "1 Nos.".to_string(),
                    ..Default::default()
                });
            }
        }

        sheet
    }

    fn item_row(&mut self, invoice: &Invoice, item: &LineItem) -> ExportRow {
        let part_no = first_truthy([item.part_no.as_ref(), invoice.invoice_number.as_ref()])
            .unwrap_or_else(|| self.placeholder("ITEM"));

        ExportRow {
            part_no,
            description: first_truthy([item.description.as_ref()])
                .unwrap_or_else(|| "Item description".to_string()),
            hsn: first_truthy([item.hsn.as_ref()]).unwrap_or_default(),
            quantity: quantity_cell(item.quantity.as_ref()),
            rate: first_truthy([item.unit_price.as_ref(), item.rate.as_ref()])
                .unwrap_or_else(|| "0.00".to_string()),
            per: first_truthy([item.per.as_ref()]).unwrap_or_else(|| "Nos.".to_string()),
            discount_percentage: first_truthy([item.discount_percentage.as_ref()])
                .unwrap_or_default(),
            amount: first_truthy([item.total.as_ref(), item.amount.as_ref()])
                .unwrap_or_else(|| "0.00".to_string()),
        }
    }

    fn invoice_row(&mut self, invoice: &Invoice) -> ExportRow {
        let part_no = first_truthy([invoice.invoice_number.as_ref(), invoice.part_no.as_ref()])
            .unwrap_or_else(|| self.placeholder("INV"));

        ExportRow {
            part_no,
            description: first_truthy([invoice.description.as_ref()])
                .unwrap_or_else(|| "Invoice total".to_string()),
            hsn: first_truthy([invoice.hsn.as_ref()]).unwrap_or_default(),
            quantity: quantity_cell(invoice.quantity.as_ref()),
            rate: first_truthy([invoice.unit_price.as_ref(), invoice.rate.as_ref()])
                .unwrap_or_else(|| "0.00".to_string()),
            per: first_truthy([invoice.per.as_ref()]).unwrap_or_else(|| "Nos.".to_string()),
            discount_percentage: first_truthy([invoice.discount_percentage.as_ref()])
                .unwrap_or_default(),
            amount: first_truthy([invoice.total.as_ref(), invoice.amount.as_ref()])
                .unwrap_or_else(|| "0.00".to_string()),
        }
    }
}

#[cfg(feature = "native")]
impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Combine several extracted records into one sheet for batch export.
///
/// Items without a part number are keyed by their invoice number; items
/// that have one are copied. Invoices without an item table contribute a
/// single "Invoice Total" row.
pub fn aggregate<'a>(invoices: impl IntoIterator<Item = &'a Invoice>) -> NormalizedSheet {
    let mut items = Vec::new();

    for invoice in invoices {
        match &invoice.items {
            Some(entries) => {
                for item in entries.iter().flatten() {
                    let row = if item.part_no.is_none() {
                        ExportRow {
                            part_no: text_or_empty(invoice.invoice_number.as_ref()),
                            description: text_or_empty(item.description.as_ref()),
                            hsn: String::new(),
                            quantity: text_or_empty(item.quantity.as_ref()),
                            rate: text_or_empty(item.unit_price.as_ref()),
                            per: "Nos.".to_string(),
                            discount_percentage: String::new(),
                            amount: text_or_empty(item.total.as_ref()),
                        }
                    } else {
                        ExportRow {
                            part_no: text_or_empty(item.part_no.as_ref()),
                            description: text_or_empty(item.description.as_ref()),
                            hsn: text_or_empty(item.hsn.as_ref()),
                            quantity: text_or_empty(item.quantity.as_ref()),
                            rate: text_or_empty(item.rate.as_ref()),
                            per: text_or_empty(item.per.as_ref()),
                            discount_percentage: text_or_empty(item.discount_percentage.as_ref()),
                            amount: text_or_empty(item.amount.as_ref()),
                        }
                    };
                    items.push(row);
                }
            }
            None => items.push(ExportRow {
                part_no: text_or_empty(invoice.invoice_number.as_ref()),
                description: "Invoice Total".to_string(),
                amount: text_or_empty(invoice.total.as_ref()),
                ..Default::default()
            }),
        }
    }

    NormalizedSheet {
        state_name: "Aggregated Invoices".to_string(),
        terms_of_delivery: String::new(),
        items,
    }
}
