use chrono::NaiveDate;
use serde::Serialize;

use crate::cpq::pricing::{format_amount, Totals};
use crate::domain::cart::CartItem;
use crate::domain::client::ClientProfile;
use crate::domain::quote::QuotationRecord;

const TITLE: &str = "AUDIT QUOTATION";
const ITEMS_HEADING: &str = "QUOTED SERVICES";
const FOOTER: &str = "Generated by the quality audit quotation system";
const NOT_SPECIFIED: &str = "Not specified";
const FILE_NAME_FALLBACK: &str = "Audit";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExportLine {
    pub label: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExportItem {
    pub position: usize,
    pub name: String,
    pub amount: String,
}

/// Plain document data. Laying it out on a page is left to the renderer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExportDocument {
    pub title: String,
    pub client_lines: Vec<ExportLine>,
    pub items_heading: String,
    pub items: Vec<ExportItem>,
    pub totals: Vec<ExportLine>,
    pub footer: String,
    pub generated_on: NaiveDate,
    pub file_name: String,
}

impl ExportDocument {
    pub fn from_record(record: &QuotationRecord, generated_on: NaiveDate) -> Self {
        build_export(record.client(), record.items(), &record.totals(), generated_on)
    }
}

pub fn build_export(
    client: &ClientProfile,
    items: &[CartItem],
    totals: &Totals,
    generated_on: NaiveDate,
) -> ExportDocument {
    let mut contact = or_placeholder(Some(client.email.as_str()), NOT_SPECIFIED);
    if let Some(phone) = client.phone.as_deref().filter(|phone| !phone.trim().is_empty()) {
        contact = format!("{contact} | {phone}");
    }

    let client_lines = vec![
        line("Client", or_placeholder(Some(client.name.as_str()), NOT_SPECIFIED)),
        line("Company", or_placeholder(client.company.as_deref(), NOT_SPECIFIED)),
        line("Contact", contact),
        line("Observations", or_placeholder(Some(client.observations.as_str()), "None")),
    ];

    let items = items
        .iter()
        .enumerate()
        .map(|(index, item)| ExportItem {
            position: index + 1,
            name: item.name.clone(),
            amount: money(item.price),
        })
        .collect();

    let totals = vec![
        line("Subtotal (excl. tax)", money(totals.subtotal)),
        line("Tax (21%)", money(totals.tax)),
        line("Total", money(totals.total)),
    ];

    ExportDocument {
        title: TITLE.to_string(),
        client_lines,
        items_heading: ITEMS_HEADING.to_string(),
        items,
        totals,
        footer: FOOTER.to_string(),
        generated_on,
        file_name: file_name(client.company.as_deref(), generated_on),
    }
}

fn file_name(company: Option<&str>, generated_on: NaiveDate) -> String {
    let company = company
        .map(str::trim)
        .filter(|company| !company.is_empty())
        .unwrap_or(FILE_NAME_FALLBACK)
        .replace(['/', '\\'], "-");
    format!("Quotation_{company}_{}.pdf", generated_on.format("%Y-%m-%d"))
}

fn or_placeholder(value: Option<&str>, placeholder: &str) -> String {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(placeholder)
        .to_string()
}

fn line(label: &str, value: String) -> ExportLine {
    ExportLine { label: label.to_string(), value }
}

fn money(amount: rust_decimal::Decimal) -> String {
    format!("${}", format_amount(amount))
}
