//! Printable itinerary export.
//!
//! Layout happens in millimetres from the top-left corner of an A4 page and produces a
//! list of drawing operations per page; serialization turns those into a PDF 1.4 file
//! using the standard Helvetica fonts. No timestamps or ids are written, so the same
//! itinerary always yields the same bytes.

use std::fmt::Write as _;

use crate::{
    error::{FormErrors, Result},
    types::{ItineraryDay, ItineraryPlan, Rupees},
};

pub const PAGE_WIDTH: f64 = 210.0;
pub const PAGE_HEIGHT: f64 = 297.0;
pub const MARGIN: f64 = 20.0;
const CONTENT_WIDTH: f64 = PAGE_WIDTH - 2.0 * MARGIN;
const LINE_HEIGHT: f64 = 5.0;
const HEADER_BAR_HEIGHT: f64 = 12.0;

const DAY_BREAK_AT: f64 = PAGE_HEIGHT - 40.0;
const ITEM_BREAK_AT: f64 = PAGE_HEIGHT - 30.0;
const FOOTER_BREAK_AT: f64 = PAGE_HEIGHT - 50.0;

const MM_TO_PT: f64 = 72.0 / 25.4;
const PT_TO_MM: f64 = 25.4 / 72.0;

const BLACK: Rgb = Rgb(0, 0, 0);
const WHITE: Rgb = Rgb(255, 255, 255);
const GREY: Rgb = Rgb(100, 100, 100);
const EMERALD: Rgb = Rgb(16, 185, 129);

const DISCLAIMER: &str =
    "Note: All costs are approximate. Please verify with live sources for exact pricing.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    fn components(self) -> String {
        format!(
            "{:.3} {:.3} {:.3}",
            f64::from(self.0) / 255.0,
            f64::from(self.1) / 255.0,
            f64::from(self.2) / 255.0
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Normal,
    Bold,
    Italic,
}

impl FontStyle {
    fn resource(self) -> &'static str {
        match self {
            FontStyle::Normal => "F1",
            FontStyle::Bold => "F2",
            FontStyle::Italic => "F3",
        }
    }
}

/// One drawing operation; coordinates are millimetres from the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f64,
        y: f64,
        size: f64,
        style: FontStyle,
        color: Rgb,
        text: String,
    },
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Rgb,
    },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        width: f64,
        color: Rgb,
    },
}

impl DrawOp {
    pub fn y(&self) -> f64 {
        match self {
            DrawOp::Text { y, .. } | DrawOp::FillRect { y, .. } => *y,
            DrawOp::Line { from, .. } => from.1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

/// A laid-out itinerary, ready to serialize.
#[derive(Debug, Clone, PartialEq)]
pub struct ItineraryDocument {
    pages: Vec<Page>,
}

impl ItineraryDocument {
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn to_pdf_bytes(&self) -> Vec<u8> {
        PdfWriter::default().write(&self.pages)
    }
}

/// Approximate Helvetica advance width: half an em per character.
fn text_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * PT_TO_MM * 0.5
}

/// Greedy word wrap to `max_width` millimetres.
fn wrap_text(text: &str, size: f64, max_width: f64) -> Vec<String> {
    let max_chars = ((max_width / (size * PT_TO_MM * 0.5)).floor() as usize).max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let needed = if current.is_empty() {
            word.len()
        } else {
            current.chars().count() + 1 + word.len()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

struct Layout {
    pages: Vec<Page>,
    y: f64,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            y: MARGIN,
        }
    }

    fn break_if_past(&mut self, threshold: f64) {
        if self.y > threshold {
            self.pages.push(Page::default());
            self.y = MARGIN;
        }
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    fn text(&mut self, x: f64, y: f64, size: f64, style: FontStyle, color: Rgb, text: String) {
        self.push(DrawOp::Text {
            x,
            y,
            size,
            style,
            color,
            text,
        });
    }

    fn centered(&mut self, size: f64, style: FontStyle, text: String) {
        let x = (PAGE_WIDTH - text_width(&text, size)) / 2.0;
        let y = self.y;
        self.text(x.max(MARGIN), y, size, style, BLACK, text);
    }

    fn day(&mut self, day: &ItineraryDay) {
        self.break_if_past(DAY_BREAK_AT);

        let top = self.y;
        self.push(DrawOp::FillRect {
            x: MARGIN,
            y: top,
            width: CONTENT_WIDTH,
            height: HEADER_BAR_HEIGHT,
            color: EMERALD,
        });
        self.text(
            MARGIN + 5.0,
            top + 8.0,
            14.0,
            FontStyle::Bold,
            WHITE,
            format!("Day {}: {}", day.day, day.title),
        );
        self.y += HEADER_BAR_HEIGHT;

        let cost = format!(
            "Cost: {} | Transit: {} hours",
            day.estimated_cost_per_person, day.total_transit_hours
        );
        let y = self.y + 5.0;
        self.text(MARGIN, y, 10.0, FontStyle::Normal, BLACK, cost);
        self.y += 10.0;

        let y = self.y;
        self.text(MARGIN, y, 10.0, FontStyle::Bold, BLACK, "Activities:".into());
        self.y += 6.0;

        for item in &day.items {
            self.break_if_past(ITEM_BREAK_AT);

            let line = format!("• {} - {} ({})", item.time, item.activity, item.duration);
            for wrapped in wrap_text(&line, 10.0, CONTENT_WIDTH - 10.0) {
                let y = self.y;
                self.text(MARGIN + 5.0, y, 10.0, FontStyle::Normal, BLACK, wrapped);
                self.y += LINE_HEIGHT;
            }

            if item.transit {
                let y = self.y;
                self.text(MARGIN + 10.0, y, 9.0, FontStyle::Normal, GREY, "  [Transit time]".into());
                self.y += 4.0;
            }
            self.y += 2.0;
        }

        self.y += 8.0;
    }

    fn footer(&mut self, total: Rupees) {
        self.break_if_past(FOOTER_BREAK_AT);

        let y = self.y;
        self.push(DrawOp::Line {
            from: (MARGIN, y),
            to: (PAGE_WIDTH - MARGIN, y),
            width: 0.5,
            color: EMERALD,
        });
        self.y += 10.0;

        let y = self.y;
        self.text(
            MARGIN,
            y,
            12.0,
            FontStyle::Bold,
            BLACK,
            format!("Total Trip Cost: {total} per person"),
        );
        self.y += 8.0;

        let y = self.y;
        self.text(MARGIN, y, 9.0, FontStyle::Italic, BLACK, DISCLAIMER.into());
    }
}

/// Lay out the day plan for `destination` on A4 pages.
pub fn layout_itinerary(
    destination: &str,
    days: &[ItineraryDay],
    total: Rupees,
) -> Result<ItineraryDocument> {
    let destination = destination.trim();
    if destination.is_empty() {
        let mut errors = FormErrors::new();
        errors.add("destination", "Destination name is required for export");
        errors.into_result()?;
    }

    let mut layout = Layout::new();
    layout.centered(24.0, FontStyle::Bold, format!("{destination} Itinerary"));
    layout.y += 15.0;
    layout.centered(
        10.0,
        FontStyle::Normal,
        format!("{} Days | Total Cost: {total} per person", days.len()),
    );
    layout.y += 15.0;

    for day in days {
        layout.day(day);
    }
    layout.footer(total);

    Ok(ItineraryDocument {
        pages: layout.pages,
    })
}

/// Render a whole plan straight to PDF bytes.
pub fn render_itinerary_pdf(destination: &str, plan: &ItineraryPlan) -> Result<Vec<u8>> {
    let document = layout_itinerary(
        destination,
        &plan.itinerary,
        plan.total_estimated_cost_per_person,
    )?;
    Ok(document.to_pdf_bytes())
}

/// `Goa North` → `Goa_North_Itinerary.pdf`
pub fn pdf_filename(destination: &str) -> String {
    let stem = destination.split_whitespace().collect::<Vec<_>>().join("_");
    format!("{stem}_Itinerary.pdf")
}

/// Encode text as a PDF literal string body in WinAnsi.
fn pdf_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            '₹' => out.push_str("Rs."),
            '•' => out.push_str("\\225"),
            '–' | '—' => out.push('-'),
            ch if ch.is_ascii() && !ch.is_ascii_control() => out.push(ch),
            _ => out.push('?'),
        }
    }
    out
}

fn content_stream(page: &Page) -> String {
    let mut out = String::new();
    for op in &page.ops {
        // fmt::Write on String is infallible
        let _ = match op {
            DrawOp::Text {
                x,
                y,
                size,
                style,
                color,
                text,
            } => writeln!(
                out,
                "BT /{} {} Tf {} rg {:.2} {:.2} Td ({}) Tj ET",
                style.resource(),
                size,
                color.components(),
                x * MM_TO_PT,
                (PAGE_HEIGHT - y) * MM_TO_PT,
                pdf_string(text)
            ),
            DrawOp::FillRect {
                x,
                y,
                width,
                height,
                color,
            } => writeln!(
                out,
                "{} rg {:.2} {:.2} {:.2} {:.2} re f",
                color.components(),
                x * MM_TO_PT,
                (PAGE_HEIGHT - y - height) * MM_TO_PT,
                width * MM_TO_PT,
                height * MM_TO_PT
            ),
            DrawOp::Line {
                from,
                to,
                width,
                color,
            } => writeln!(
                out,
                "{} RG {:.2} w {:.2} {:.2} m {:.2} {:.2} l S",
                color.components(),
                width * MM_TO_PT,
                from.0 * MM_TO_PT,
                (PAGE_HEIGHT - from.1) * MM_TO_PT,
                to.0 * MM_TO_PT,
                (PAGE_HEIGHT - to.1) * MM_TO_PT
            ),
        };
    }
    out
}

#[derive(Default)]
struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    fn object(&mut self, body: &str) {
        self.offsets.push(self.buf.len());
        let id = self.offsets.len();
        self.buf
            .extend_from_slice(format!("{id} 0 obj\n{body}\nendobj\n").as_bytes());
    }

    fn write(mut self, pages: &[Page]) -> Vec<u8> {
        self.buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

        // 1 catalog, 2 page tree, 3-5 fonts, then a page and its content per page
        let first_page = 6;
        let kids = (0..pages.len())
            .map(|i| format!("{} 0 R", first_page + 2 * i))
            .collect::<Vec<_>>()
            .join(" ");

        self.object("<< /Type /Catalog /Pages 2 0 R >>");
        self.object(&format!(
            "<< /Type /Pages /Kids [{kids}] /Count {} >>",
            pages.len()
        ));
        for font in ["Helvetica", "Helvetica-Bold", "Helvetica-Oblique"] {
            self.object(&format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{font} /Encoding /WinAnsiEncoding >>"
            ));
        }

        let media_box = format!(
            "[0 0 {:.2} {:.2}]",
            PAGE_WIDTH * MM_TO_PT,
            PAGE_HEIGHT * MM_TO_PT
        );
        for (i, page) in pages.iter().enumerate() {
            let content_id = first_page + 2 * i + 1;
            self.object(&format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox {media_box} \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R /F3 5 0 R >> >> \
                 /Contents {content_id} 0 R >>"
            ));
            let stream = content_stream(page);
            self.object(&format!(
                "<< /Length {} >>\nstream\n{stream}endstream",
                stream.len()
            ));
        }

        let xref_at = self.buf.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", self.offsets.len() + 1);
        for offset in &self.offsets {
            let _ = writeln!(xref, "{offset:010} 00000 n ");
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
            self.offsets.len() + 1
        );
        self.buf.extend_from_slice(xref.as_bytes());
        self.buf
    }
}
