/*!
 * Export of an inventory session.
 *
 * Produces the CSV sheet handed to the library, a `mailto:` link that opens
 * a pre-filled email, and a WhatsApp share link with a one-line summary.
 * All functions are read-only over a session snapshot.
 */

use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone};
use log::info;
use serde::Serialize;
use std::io;
use std::path::Path;

use crate::inventory::InventorySession;

/// Date format used in exported rows
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Time format used in exported rows
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// One exported row
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Barcode")]
    barcode: &'a str,
    #[serde(rename = "Fecha")]
    fecha: String,
    #[serde(rename = "Hora")]
    hora: String,
    #[serde(rename = "Sede")]
    sede: &'static str,
    #[serde(rename = "Coleccion")]
    coleccion: &'static str,
}

/// Convert epoch milliseconds to local time
pub fn local_time(millis: i64) -> Option<DateTime<Local>> {
    Local.timestamp_millis_opt(millis).single()
}

/// Format epoch milliseconds as local date and time, or `N/A`
pub fn format_local_datetime(millis: i64) -> String {
    local_time(millis)
        .map(|t| t.format(&format!("{} {}", DATE_FORMAT, TIME_FORMAT)).to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Write the session as CSV to `writer`, one row per item in scan order
pub fn write_csv_to<W: io::Write>(session: &InventorySession, writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    if session.items.is_empty() {
        // serialize() only emits the header together with the first row
        csv_writer.write_record(["Barcode", "Fecha", "Hora", "Sede", "Coleccion"])?;
    }

    for item in &session.items {
        let time = local_time(item.timestamp);
        csv_writer.serialize(CsvRow {
            barcode: &item.barcode,
            fecha: time.map(|t| t.format(DATE_FORMAT).to_string()).unwrap_or_default(),
            hora: time.map(|t| t.format(TIME_FORMAT).to_string()).unwrap_or_default(),
            sede: session.sede.tag(),
            coleccion: session.coleccion.tag(),
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Render the session as a CSV string
pub fn to_csv(session: &InventorySession) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv_to(session, &mut buffer)?;
    String::from_utf8(buffer).context("CSV output is not valid UTF-8")
}

/// Write the session CSV to a file
pub fn write_csv(session: &InventorySession, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create export file: {:?}", path))?;
    write_csv_to(session, io::BufWriter::new(file))?;
    info!("Exported {} items to {:?}", session.item_count(), path);
    Ok(())
}

/// `mailto:` link with the inventory summary and CSV in the body
pub fn email_link(session: &InventorySession) -> Result<String> {
    let subject = format!("Inventario: {}", session.name);
    let body = format!(
        "Adjunto registro de inventario.\n\nSede: {}\nColección: {}\nTotal: {}\n\nDatos:\n{}",
        session.sede,
        session.coleccion,
        session.item_count(),
        to_csv(session)?
    );

    Ok(format!(
        "mailto:?subject={}&body={}",
        urlencoding::encode(&subject),
        urlencoding::encode(&body)
    ))
}

/// WhatsApp share link with a one-line summary
pub fn share_link(session: &InventorySession) -> String {
    let text = format!(
        "Inventario {} ({}). Total: {} items.",
        session.name,
        session.sede,
        session.item_count()
    );
    format!("https://wa.me/?text={}", urlencoding::encode(&text))
}
