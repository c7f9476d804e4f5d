//! Invoice templates: a fixed layout plus a sample invoice per style.
//!
//! Rendering an invoice through a template uses the invoice's own fields
//! and falls back to the sample's for anything missing. Totals that are
//! not given are summed from the line amounts.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::normalize::first_truthy;
use super::sheet::{Sheet, MANUFACTURING_HEADERS, MANUFACTURING_WIDTHS};
use crate::error::ExportError;
use crate::models::invoice::{Invoice, LineItem, Scalar};

lazy_static! {
    static ref CONSTRUCTION_SAMPLE: Invoice = serde_json::from_value(json!({
        "type": "construction",
        "logo": "YOUR LOGO",
        "title": "CONSTRUCTION BILLING INVOICE EXAMPLE TEMPLATE",
        "invoiceNumber": "INV-2023-001",
        "companyInfo": {
            "name": "Company Name",
            "address": "Street Address",
            "city": "City, State ZIP",
            "phone": "Phone",
            "email": "Email",
            "website": "Website"
        },
        "clientInfo": {
            "name": "Client Name",
            "address": "Client Address",
            "city": "Client City, State ZIP",
            "phone": "Client Phone",
            "email": "Client Email"
        },
        "items": [
            {"description": "Project Management", "quantity": 1, "rate": 2500, "total": 2500},
            {"description": "Architecture and Design", "quantity": 1, "rate": 5000, "total": 5000},
            {"description": "Construction Labor", "quantity": 120, "rate": 45, "total": 5400},
            {"description": "Materials", "quantity": 1, "rate": 12000, "total": 12000},
            {"description": "Equipment Rental", "quantity": 1, "rate": 3500, "total": 3500},
            {"description": "Permits and Inspections", "quantity": 1, "rate": 1200, "total": 1200}
        ],
        "subtotal": 29600,
        "tax": 2368,
        "total": 31968
    }))
    .unwrap();

    static ref MANUFACTURING_SAMPLE: Invoice = serde_json::from_value(json!({
        "type": "manufacturing",
        "title": "LASER CUTTING INVOICE",
        "stateInfo": "Karnataka, Code: 29",
        "termsOfDelivery": "30 days from invoice date",
        "items": [
            {
                "partNo": "Laser Cutting-MIT-EA012B014-04",
                "description": "SIZE:147.4X179.7X6MM-CUT LENGTH:1207MM-HR",
                "hsn": 73269070, "quantity": 116, "rate": 118.5, "unit": "Nos.", "amount": 13746
            },
            {
                "partNo": "Laser Cutting-MIT-EA015C294-02",
                "description": "SIZE:110X222.4X6MM-CUT LENGTH:949MM-HR",
                "hsn": 73269070, "quantity": 100, "rate": 103, "unit": "Nos.", "amount": 10300
            },
            {
                "partNo": "Laser Cutting-MIT-EA021C281-05",
                "description": "SIZE:110X125X6MM-CUT LENGTH:543MM-HR",
                "hsn": 73269070, "quantity": 10, "rate": 58.4, "unit": "Nos.", "amount": 584
            }
        ],
        "total": 24630
    }))
    .unwrap();

    static ref SERVICES_SAMPLE: Invoice = serde_json::from_value(json!({
        "type": "services",
        "logo": "T",
        "company": "Turnpike Designs Co.",
        "companyInfo": {
            "address": "156 University Ave, Toronto",
            "location": "ON, Canada, M5H 2H7",
            "phone": "416-555-1212"
        },
        "billTo": {
            "name": "Jiro Doi",
            "address": "1954 Bloor Street West",
            "location": "Toronto, ON, M6P 3K9",
            "country": "Canada",
            "email": "j_doi@example.com",
            "phone": "416-555-1212"
        },
        "invoiceDetails": {
            "number": "14",
            "poNumber": "AD29094",
            "date": "2018-09-25",
            "paymentDue": "Upon receipt"
        },
        "amountDue": "$2,608.20",
        "services": [
            {"description": "Platinum web hosting package\nDown 35mb, Up 100mb", "quantity": 1, "price": 65, "amount": 65},
            {"description": "2 page website design\nIncludes basic wireframes, and responsive templates", "quantity": 3, "price": 2100, "amount": 2100},
            {"description": "Mobile designs\nIncludes responsive navigation", "quantity": 1, "price": 250, "amount": 250}
        ],
        "subtotal": 2145,
        "tax": 193.2,
        "totalUSD": 2608.2,
        "totalCAD": 2608.2
    }))
    .unwrap();
}

/// Supported invoice styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceTemplate {
    Construction,
    Manufacturing,
    Services,
}

impl InvoiceTemplate {
    pub const ALL: [InvoiceTemplate; 3] = [
        InvoiceTemplate::Construction,
        InvoiceTemplate::Manufacturing,
        InvoiceTemplate::Services,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            InvoiceTemplate::Construction => "construction",
            InvoiceTemplate::Manufacturing => "manufacturing",
            InvoiceTemplate::Services => "services",
        }
    }

    /// Template by position (0 construction, 1 manufacturing, 2 services).
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn sheet_name(&self) -> &'static str {
        match self {
            InvoiceTemplate::Construction => "Construction Invoice",
            InvoiceTemplate::Manufacturing => "Manufacturing Invoice",
            InvoiceTemplate::Services => "Services Invoice",
        }
    }

    /// The built-in sample invoice.
    pub fn sample(&self) -> &'static Invoice {
        match self {
            InvoiceTemplate::Construction => &CONSTRUCTION_SAMPLE,
            InvoiceTemplate::Manufacturing => &MANUFACTURING_SAMPLE,
            InvoiceTemplate::Services => &SERVICES_SAMPLE,
        }
    }

    /// Lay out `invoice` (or the sample when `None`) as a sheet.
    pub fn render(&self, invoice: Option<&Invoice>) -> Sheet {
        let sample = self.sample();
        let fields = Fields {
            own: invoice.unwrap_or(sample),
            sample,
        };

        match self {
            InvoiceTemplate::Construction => render_construction(&fields),
            InvoiceTemplate::Manufacturing => render_manufacturing(&fields),
            InvoiceTemplate::Services => render_services(&fields),
        }
    }
}

impl fmt::Display for InvoiceTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InvoiceTemplate {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ExportError::UnknownTemplate(s.to_string()))
    }
}

/// First truthy of two lookups.
fn either(first: Option<Scalar>, second: impl FnOnce() -> Option<Scalar>) -> Option<Scalar> {
    first.filter(Scalar::is_truthy).or_else(second)
}

/// Field lookup with fallback from the rendered invoice to the sample.
struct Fields<'a> {
    own: &'a Invoice,
    sample: &'a Invoice,
}

impl Fields<'_> {
    fn get(&self, lookup: impl Fn(&Invoice) -> Option<Scalar>) -> String {
        either(lookup(self.own), || lookup(self.sample))
            .map(|v| v.text())
            .unwrap_or_default()
    }

    /// Line items of the invoice, or of the sample when it has none.
    /// The flag tells whether they came from the invoice itself.
    fn items(&self) -> (Vec<LineItem>, bool) {
        let own = line_items(self.own);
        if !own.is_empty() {
            return (own, true);
        }
        (line_items(self.sample), false)
    }

    fn totals(&self, items: &[LineItem], own_items: bool) -> Totals {
        let own = self.own;
        let sample = self.sample;
        let text = |v: &Option<Scalar>| first_truthy([v.as_ref()]);

        let computed = sum_amounts(items).map(format_decimal);

        let subtotal = text(&own.subtotal).or_else(|| {
            if own_items {
                computed.clone()
            } else {
                text(&sample.subtotal).or_else(|| computed.clone())
            }
        });

        let tax = text(&own.tax).or_else(|| if own_items { None } else { text(&sample.tax) });

        let stated_total = |i: &Invoice| {
            text(&i.total).or_else(|| first_truthy([i.extra_field("totalUSD").as_ref()]))
        };

        let total = stated_total(own)
            .or_else(|| if own_items { None } else { stated_total(sample) })
            .or_else(|| {
                let subtotal = subtotal.as_deref().and_then(parse_amount)?;
                let tax = tax.as_deref().and_then(parse_amount).unwrap_or_default();
                Some(format_decimal(subtotal + tax))
            });

        Totals {
            subtotal: subtotal.unwrap_or_default(),
            tax: tax.unwrap_or_default(),
            total: total.unwrap_or_default(),
        }
    }
}

struct Totals {
    subtotal: String,
    tax: String,
    total: String,
}

/// `items`, or a `services` array for services-style records.
fn line_items(invoice: &Invoice) -> Vec<LineItem> {
    if let Some(items) = &invoice.items {
        return items.iter().flatten().cloned().collect();
    }

    invoice
        .extra
        .get("services")
        .and_then(|v| v.as_array())
        .map(|entries| {
            entries
                .iter()
                .filter(|e| e.is_object())
                .filter_map(|e| serde_json::from_value(e.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// Parse the leading number of a money or quantity string such as
/// `"$1,234.56"`, `"13,746.000"` or `"116 Nos."`.
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let number: String = text
        .trim_start_matches(|c: char| c == '$' || c.is_whitespace())
        .chars()
        .filter(|c| *c != ',')
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    Decimal::from_str(&number).ok()
}

fn format_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Line amount: the given amount/total, else quantity times rate.
fn line_amount(item: &LineItem) -> Option<Decimal> {
    if let Some(amount) = first_truthy([item.amount.as_ref(), item.total.as_ref()]) {
        return parse_amount(&amount);
    }

    let quantity = first_truthy([item.quantity.as_ref()]).and_then(|q| parse_amount(&q))?;
    let rate = first_truthy([item.rate.as_ref(), item.price.as_ref(), item.unit_price.as_ref()])
        .and_then(|r| parse_amount(&r))?;
    Some(quantity * rate)
}

fn sum_amounts(items: &[LineItem]) -> Option<Decimal> {
    let amounts: Vec<Decimal> = items.iter().filter_map(line_amount).collect();
    if amounts.is_empty() {
        return None;
    }
    Some(amounts.into_iter().sum())
}

fn row<const N: usize>(cells: [&str; N]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

fn push_totals(rows: &mut Vec<Vec<String>>, totals: &Totals) {
    rows.push(Vec::new());
    rows.push(row(["", "", "Subtotal", &totals.subtotal]));
    rows.push(row(["", "", "Tax", &totals.tax]));
    rows.push(row(["", "", "Total", &totals.total]));
}

fn render_construction(fields: &Fields) -> Sheet {
    let company = |key: &'static str| fields.get(move |i| i.nested_field("companyInfo", key));
    let client = |key: &'static str| fields.get(move |i| i.nested_field("clientInfo", key));
    let company_name = fields.get(|i| {
        either(i.nested_field("companyInfo", "name"), || i.extra_field("company"))
    });
    let client_name = fields.get(|i| {
        either(i.nested_field("clientInfo", "name"), || i.extra_field("clientName"))
    });

    let mut rows = vec![
        vec![fields.get(|i| i.title.clone())],
        row(["Invoice #", &fields.get(|i| i.invoice_number.clone())]),
        row(["Date", &fields.get(|i| i.date.clone())]),
        Vec::new(),
        row(["From", &company_name, "", "Bill To", &client_name]),
        row(["", &company("address"), "", "", &client("address")]),
        row(["", &company("city"), "", "", &client("city")]),
        row(["", &company("phone"), "", "", &client("phone")]),
        row(["", &company("email"), "", "", &client("email")]),
        row(["", &company("website")]),
        Vec::new(),
    ];

    let header_row = rows.len();
    rows.push(row(["Description", "Quantity", "Rate", "Total"]));

    let (items, own_items) = fields.items();
    for item in &items {
        rows.push(vec![
            first_truthy([item.description.as_ref()]).unwrap_or_default(),
            first_truthy([item.quantity.as_ref()]).unwrap_or_default(),
            first_truthy([item.rate.as_ref(), item.unit_price.as_ref(), item.price.as_ref()])
                .unwrap_or_default(),
            first_truthy([item.total.as_ref(), item.amount.as_ref()])
                .or_else(|| line_amount(item).map(format_decimal))
                .unwrap_or_default(),
        ]);
    }

    push_totals(&mut rows, &fields.totals(&items, own_items));

    Sheet::new(InvoiceTemplate::Construction.sheet_name(), rows)
        .with_header_row(header_row)
        .with_column_widths(&[30.0, 25.0, 12.0, 25.0, 25.0])
}

fn render_manufacturing(fields: &Fields) -> Sheet {
    let state = fields.get(|i| either(i.state_name.clone(), || i.extra_field("stateInfo")));
    let terms = fields.get(|i| i.terms_of_delivery.clone());

    let mut rows = vec![
        vec![fields.get(|i| i.title.clone())],
        row(["State Name", ":", &state, "", "", "", "Terms of Delivery", &terms]),
        Vec::new(),
    ];

    let header_row = rows.len();
    rows.push(MANUFACTURING_HEADERS.iter().map(|h| h.to_string()).collect());

    let (items, own_items) = fields.items();
    for (index, item) in items.iter().enumerate() {
        rows.push(vec![
            (index + 1).to_string(),
            first_truthy([item.part_no.as_ref()]).unwrap_or_default(),
            first_truthy([item.description.as_ref()]).unwrap_or_default(),
            first_truthy([item.hsn.as_ref()]).unwrap_or_default(),
            first_truthy([item.quantity.as_ref()]).unwrap_or_default(),
            first_truthy([item.rate.as_ref(), item.unit_price.as_ref()]).unwrap_or_default(),
            first_truthy([item.per.as_ref(), item.unit.as_ref()]).unwrap_or_default(),
            first_truthy([item.discount_percentage.as_ref()]).unwrap_or_default(),
            first_truthy([item.amount.as_ref(), item.total.as_ref()])
                .or_else(|| line_amount(item).map(format_decimal))
                .unwrap_or_default(),
        ]);
    }

    let totals = fields.totals(&items, own_items);
    rows.push(Vec::new());
    rows.push(row(["", "", "", "", "", "", "", "Total", &totals.total]));

    Sheet::new(InvoiceTemplate::Manufacturing.sheet_name(), rows)
        .with_header_row(header_row)
        .with_column_widths(&MANUFACTURING_WIDTHS)
}

fn render_services(fields: &Fields) -> Sheet {
    let company = |key: &'static str| fields.get(move |i| i.nested_field("companyInfo", key));
    let bill_to = |key: &'static str| fields.get(move |i| i.nested_field("billTo", key));
    let details = |key: &'static str| fields.get(move |i| i.nested_field("invoiceDetails", key));

    let number = fields.get(|i| {
        either(i.nested_field("invoiceDetails", "number"), || i.invoice_number.clone())
    });
    let date = fields.get(|i| either(i.nested_field("invoiceDetails", "date"), || i.date.clone()));

    let (items, own_items) = fields.items();
    let totals = fields.totals(&items, own_items);

    let amount_due = match fields.own.extra_field("amountDue").filter(Scalar::is_truthy) {
        Some(due) => due.text(),
        None if own_items => totals.total.clone(),
        None => fields.get(|i| i.extra_field("amountDue")),
    };

    let mut rows = vec![
        vec![fields.get(|i| i.extra_field("company"))],
        vec![company("address")],
        vec![company("location")],
        vec![company("phone")],
        Vec::new(),
        row(["Bill To", "", "Invoice Number", &number]),
        row([&bill_to("name"), "", "P.O./S.O. Number", &details("poNumber")]),
        row([&bill_to("address"), "", "Invoice Date", &date]),
        row([&bill_to("location"), "", "Payment Due", &details("paymentDue")]),
        row([&bill_to("country"), "", "Amount Due", &amount_due]),
        vec![bill_to("email")],
        Vec::new(),
    ];

    let header_row = rows.len();
    rows.push(row(["Services", "Quantity", "Price", "Amount"]));

    for item in &items {
        rows.push(vec![
            first_truthy([item.description.as_ref()]).unwrap_or_default(),
            first_truthy([item.quantity.as_ref()]).unwrap_or_default(),
            first_truthy([item.price.as_ref(), item.unit_price.as_ref(), item.rate.as_ref()])
                .unwrap_or_default(),
            first_truthy([item.amount.as_ref(), item.total.as_ref()])
                .or_else(|| line_amount(item).map(format_decimal))
                .unwrap_or_default(),
        ]);
    }

    push_totals(&mut rows, &totals);

    Sheet::new(InvoiceTemplate::Services.sheet_name(), rows)
        .with_header_row(header_row)
        .with_column_widths(&[45.0, 10.0, 18.0, 15.0])
}
