//! PDF customer report rendering.
//!
//! Produces a simple tabular A4 report of every customer: name, next
//! visit, cadence, statuses and price. Pure layout code; the caller
//! decides what list of customers goes in.

use chrono::NaiveDate;
use printpdf::{BuiltinFont, Mm, PdfDocument};
use rust_decimal::Decimal;
use thiserror::Error;

use brisa_core::Customer;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
const LINE_HEIGHT_MM: f32 = 6.0;
const BODY_FONT_SIZE: f32 = 9.0;

// Column x-offsets, in mm from the left edge.
const COL_NAME: f32 = MARGIN_MM;
const COL_VISIT: f32 = 75.0;
const COL_RECURRENCE: f32 = 100.0;
const COL_WORK: f32 = 125.0;
const COL_PAYMENT: f32 = 150.0;
const COL_PRICE: f32 = 175.0;

/// Errors that can occur while rendering a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// PDF library failure.
    #[error("pdf render error: {0}")]
    Pdf(String),
}

/// Render the customer report as PDF bytes.
///
/// # Errors
///
/// Returns `ReportError::Pdf` if the document cannot be built.
pub fn customer_report(customers: &[Customer], today: NaiveDate) -> Result<Vec<u8>, ReportError> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        "Brisa customer report",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;

    layer.use_text("Customer report", 16.0, Mm(MARGIN_MM), Mm(y), &font_bold);
    y -= LINE_HEIGHT_MM;
    layer.use_text(
        format!("Generated {today}"),
        BODY_FONT_SIZE,
        Mm(MARGIN_MM),
        Mm(y),
        &font,
    );
    y -= 2.0 * LINE_HEIGHT_MM;

    write_header_row(&layer, &font_bold, y);
    y -= LINE_HEIGHT_MM;

    for customer in customers {
        // Start a fresh page when the current one is full.
        if y < MARGIN_MM + LINE_HEIGHT_MM {
            let (page, page_layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            layer = doc.get_page(page).get_layer(page_layer);
            y = PAGE_HEIGHT_MM - MARGIN_MM;
            write_header_row(&layer, &font_bold, y);
            y -= LINE_HEIGHT_MM;
        }

        layer.use_text(
            truncate(&customer.name, 34),
            BODY_FONT_SIZE,
            Mm(COL_NAME),
            Mm(y),
            &font,
        );
        layer.use_text(
            customer.next_visit.to_string(),
            BODY_FONT_SIZE,
            Mm(COL_VISIT),
            Mm(y),
            &font,
        );
        layer.use_text(
            customer.recurring.to_string(),
            BODY_FONT_SIZE,
            Mm(COL_RECURRENCE),
            Mm(y),
            &font,
        );
        layer.use_text(
            customer.work_status.to_string(),
            BODY_FONT_SIZE,
            Mm(COL_WORK),
            Mm(y),
            &font,
        );
        layer.use_text(
            customer.payment_status.to_string(),
            BODY_FONT_SIZE,
            Mm(COL_PAYMENT),
            Mm(y),
            &font,
        );
        layer.use_text(
            format_price(customer.price, customer.price_type.to_string().as_str()),
            BODY_FONT_SIZE,
            Mm(COL_PRICE),
            Mm(y),
            &font,
        );
        y -= LINE_HEIGHT_MM;
    }

    doc.save_to_bytes().map_err(|e| ReportError::Pdf(e.to_string()))
}

fn write_header_row(layer: &printpdf::PdfLayerReference, font: &printpdf::IndirectFontRef, y: f32) {
    layer.use_text("Name", BODY_FONT_SIZE, Mm(COL_NAME), Mm(y), font);
    layer.use_text("Next visit", BODY_FONT_SIZE, Mm(COL_VISIT), Mm(y), font);
    layer.use_text("Cadence", BODY_FONT_SIZE, Mm(COL_RECURRENCE), Mm(y), font);
    layer.use_text("Work", BODY_FONT_SIZE, Mm(COL_WORK), Mm(y), font);
    layer.use_text("Payment", BODY_FONT_SIZE, Mm(COL_PAYMENT), Mm(y), font);
    layer.use_text("Price", BODY_FONT_SIZE, Mm(COL_PRICE), Mm(y), font);
}

fn format_price(price: Option<Decimal>, price_type: &str) -> String {
    match price {
        Some(p) if price_type == "hourly" => format!("${p}/h"),
        Some(p) => format!("${p}"),
        None => "-".to_string(),
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{cut}\u{2026}")
    }
}
