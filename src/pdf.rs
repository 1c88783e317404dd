//! Printable PDF version of an event report.
//!
//! Same content as the Markdown report, laid out as a plain A4 attendee
//! table with the built-in Helvetica faces so no font files are needed.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDateTime;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::debug;

use crate::output::format_event_date;
use crate::roster::EventRoster;
use crate::services::ticketing_api::Event;

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const MARGIN: f32 = 20.0;
const ROW_HEIGHT: f32 = 6.0;
const LAYER: &str = "Report";

/// Table columns: header, x offset in mm, max characters.
const COLUMNS: [(&str, f32, usize); 5] = [
    ("#", 20.0, 4),
    ("First Name", 30.0, 18),
    ("Last Name", 68.0, 18),
    ("Company", 106.0, 22),
    ("Dietary", 150.0, 24),
];

/// Truncates `value` to `max` characters, marking the cut with `...`.
fn fit(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let mut cut: String = value.chars().take(max.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

/// Tracks the current page and vertical position while writing lines.
struct Cursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
    pages: usize,
}

impl<'a> Cursor<'a> {
    fn new(doc: &'a PdfDocumentReference, layer: PdfLayerReference) -> Self {
        Self {
            doc,
            layer,
            y: PAGE_HEIGHT.0 - MARGIN,
            pages: 1,
        }
    }

    /// Moves down by `height`, starting a new page when the bottom margin is reached.
    fn advance(&mut self, height: f32) {
        self.y -= height;
        if self.y < MARGIN {
            let (page, layer) = self.doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, LAYER);
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT.0 - MARGIN;
            self.pages += 1;
        }
    }

    fn text(&self, text: &str, size: f32, x: f32, font: &IndirectFontRef) {
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    fn row(&self, cells: [&str; 5], font: &IndirectFontRef) {
        for (cell, (_, x, max)) in cells.iter().zip(COLUMNS) {
            self.text(&fit(cell, max), 10.0, x, font);
        }
    }
}

/// Writes the PDF report for one event to `path`.
pub fn write_event_pdf(
    path: &Path,
    event: &Event,
    roster: &EventRoster,
    generated_at: NaiveDateTime,
) -> Result<()> {
    let (doc, page, layer) = PdfDocument::new(&event.title, PAGE_WIDTH, PAGE_HEIGHT, LAYER);
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| anyhow!("loading Helvetica: {e:?}"))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| anyhow!("loading Helvetica-Bold: {e:?}"))?;

    let mut cursor = Cursor::new(&doc, doc.get_page(page).get_layer(layer));

    cursor.text(&event.title, 18.0, MARGIN, &bold);
    cursor.advance(10.0);
    for line in [
        format!("Date: {}", format_event_date(event)),
        format!("Location: {}", event.location()),
        format!("Registrations: {}", roster.len()),
    ] {
        cursor.text(&line, 11.0, MARGIN, &regular);
        cursor.advance(ROW_HEIGHT);
    }
    cursor.advance(ROW_HEIGHT);

    if roster.is_empty() {
        cursor.text("No confirmed attendees.", 11.0, MARGIN, &regular);
        cursor.advance(ROW_HEIGHT);
    } else {
        cursor.row(COLUMNS.map(|(header, _, _)| header), &bold);
        cursor.advance(ROW_HEIGHT);
        for (i, a) in roster.iter().enumerate() {
            let position = (i + 1).to_string();
            cursor.row(
                [&position, &a.first_name, &a.last_name, &a.company, &a.dietary],
                &regular,
            );
            cursor.advance(ROW_HEIGHT);
        }
    }

    cursor.advance(ROW_HEIGHT);
    cursor.text(
        &format!("Report generated on {}", generated_at.format("%Y-%m-%d at %H:%M")),
        9.0,
        MARGIN,
        &regular,
    );
    let pages = cursor.pages;

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| anyhow!("writing {}: {e:?}", path.display()))?;

    debug!(path = %path.display(), pages, attendees = roster.len(), "PDF written");
    Ok(())
}
