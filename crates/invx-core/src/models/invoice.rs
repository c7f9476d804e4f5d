//! Loosely-typed invoice records as produced by the extraction step.
//!
//! Every field is optional and may hold a string, a number, or a bool.
//! Nothing is validated here; the exporters decide what a missing or
//! falsy field turns into.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::Result;

/// A scalar field value with browser-style truthiness and rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(Number),
    Text(String),
    /// Arrays and objects stored in a scalar slot.
    Other(Value),
}

impl Scalar {
    /// `false` for `""`, `0`, `NaN` and `false`, `true` for everything else.
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::Bool(b) => *b,
            Scalar::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
            Scalar::Text(s) => !s.is_empty(),
            Scalar::Other(v) => !v.is_null(),
        }
    }

    /// Render the value as a cell string.
    pub fn text(&self) -> String {
        self.to_string()
    }

    /// Try to read the value as a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => n.as_f64(),
            Scalar::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => write!(f, "{}", format_number(n)),
            Scalar::Text(s) => f.write_str(s),
            Scalar::Other(Value::Array(values)) => {
                let parts: Vec<String> = values
                    .iter()
                    .map(|v| match v {
                        Value::Null => String::new(),
                        Value::String(s) => s.clone(),
                        other => Scalar::from(other.clone()).to_string(),
                    })
                    .collect();
                f.write_str(&parts.join(","))
            }
            Scalar::Other(Value::Object(_)) => f.write_str("[object Object]"),
            Scalar::Other(other) => write!(f, "{}", other),
        }
    }
}

/// Integral floats print without a fractional part (`2500.0` -> `2500`).
fn format_number(n: &Number) -> String {
    if n.is_f64() {
        if let Some(f) = n.as_f64() {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                return format!("{}", f as i64);
            }
            return format!("{}", f);
        }
    }
    n.to_string()
}

impl From<Value> for Scalar {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(b) => Scalar::Bool(b),
            Value::Number(n) => Scalar::Number(n),
            Value::String(s) => Scalar::Text(s),
            other => Scalar::Other(other),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(Number::from(n))
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Number::from_f64(f).map(Scalar::Number).unwrap_or(Scalar::Other(Value::Null))
    }
}

/// A single row of an invoice's item table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Scalar>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Scalar>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Scalar>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Scalar>,

    /// Manufacturing part number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_no: Option<Scalar>,

    /// HSN/SAC classification code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hsn: Option<Scalar>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<Scalar>,

    /// Unit the rate applies to ("Nos.").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per: Option<Scalar>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Scalar>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<Scalar>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Scalar>,

    /// Services-style unit price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Scalar>,

    /// Any other keys, kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One uploaded document's extracted fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<Scalar>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Scalar>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Scalar>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_id: Option<Scalar>,

    /// Name of the uploaded source file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<Scalar>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_name: Option<Scalar>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms_of_delivery: Option<Scalar>,

    /// Item table. `None` when the key is absent or not an array.
    #[serde(
        default,
        deserialize_with = "lenient_items",
        skip_serializing_if = "Option::is_none"
    )]
    pub items: Option<Vec<Option<LineItem>>>,

    // Invoice-level fallbacks used when there is no item table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Scalar>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_no: Option<Scalar>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hsn: Option<Scalar>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Scalar>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Scalar>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<Scalar>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per: Option<Scalar>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<Scalar>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Scalar>,

    // Template metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Scalar>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<Scalar>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax: Option<Scalar>,

    /// Any other keys (company/client blocks, etc.), kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Accept any JSON for `items`; only arrays produce an item table.
///
/// Falsy array entries are dropped, truthy non-object entries become
/// empty items so that they still produce a row of defaults.
fn lenient_items<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<Option<LineItem>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(entries) = value else {
        return Ok(None);
    };

    let items = entries
        .into_iter()
        .map(|entry| match entry {
            Value::Object(_) => serde_json::from_value::<LineItem>(entry).ok(),
            other => Scalar::from(other)
                .is_truthy()
                .then(LineItem::default),
        })
        .collect();

    Ok(Some(items))
}

impl Invoice {
    /// Number of entries in the item table (0 without one).
    pub fn item_count(&self) -> usize {
        self.items.as_ref().map_or(0, Vec::len)
    }

    /// Look up an unmodelled key as a scalar.
    pub fn extra_field(&self, key: &str) -> Option<Scalar> {
        self.extra.get(key).cloned().map(Scalar::from)
    }

    /// Look up a key inside an unmodelled nested object (`companyInfo.name`).
    pub fn nested_field(&self, object: &str, key: &str) -> Option<Scalar> {
        self.extra
            .get(object)
            .and_then(|v| v.get(key))
            .cloned()
            .map(Scalar::from)
    }
}

/// Data handed to the exporters: one invoice or a list of entries.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportInput {
    One(Invoice),
    /// `None` marks entries that are null or scalars.
    Many(Vec<Option<Invoice>>),
}

impl ExportInput {
    /// Build from arbitrary JSON. Falsy values (`null`, `false`, `0`, `""`)
    /// yield `None`.
    pub fn from_value(value: Value) -> Result<Option<Self>> {
        if !Scalar::from(value.clone()).is_truthy() {
            return Ok(None);
        }

        let input = match value {
            Value::Array(entries) => {
                let mut invoices = Vec::with_capacity(entries.len());
                for entry in entries {
                    invoices.push(match entry {
                        Value::Object(_) => Some(serde_json::from_value(entry)?),
                        // Nested arrays count as records without fields.
                        Value::Array(_) => Some(Invoice::default()),
                        _ => None,
                    });
                }
                ExportInput::Many(invoices)
            }
            Value::Object(_) => ExportInput::One(serde_json::from_value(value)?),
            _ => ExportInput::Many(vec![None]),
        };

        Ok(Some(input))
    }

    /// Parse from a JSON document.
    pub fn from_json(json: &str) -> Result<Option<Self>> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Only an empty array counts as empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, ExportInput::Many(v) if v.is_empty())
    }

    /// Iterate the invoice entries (skipped entries included as `None`).
    pub fn entries(&self) -> Vec<Option<&Invoice>> {
        match self {
            ExportInput::One(invoice) => vec![Some(invoice)],
            ExportInput::Many(invoices) => invoices.iter().map(Option::as_ref).collect(),
        }
    }

    /// Iterate only the present invoices.
    pub fn invoices(&self) -> impl Iterator<Item = &Invoice> {
        self.entries().into_iter().flatten()
    }
}

impl From<Invoice> for ExportInput {
    fn from(invoice: Invoice) -> Self {
        ExportInput::One(invoice)
    }
}

impl From<Vec<Invoice>> for ExportInput {
    fn from(invoices: Vec<Invoice>) -> Self {
        ExportInput::Many(invoices.into_iter().map(Some).collect())
    }
}
