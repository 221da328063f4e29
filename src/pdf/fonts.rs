//! Standard font embedding and text measurement.
//!
//! The layout only ever draws with the two standard Type1 faces, so no
//! font files are embedded; widths come from the Helvetica AFM advance
//! table, which is enough to drive the adaptive city sizing.

use lopdf::{Document, Object, dictionary};

/// Content-stream resource name of the regular body font.
pub const FONT_REGULAR: &str = "F1";
/// Content-stream resource name of the bold checkmark font.
pub const FONT_BOLD: &str = "F2";

/// Standard PDF Type1 fonts used by the layout
#[derive(Debug, Clone, Copy)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

impl StandardFont {
    /// Get the PDF BaseFont name for this font
    pub fn base_font_name(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
        }
    }
}

/// Create a standard font object in the document.
///
/// WinAnsi encoding so accented Latin text in literal strings renders
/// with the expected glyphs.
pub fn create_font(doc: &mut Document, font: StandardFont) -> (u32, u16) {
    doc.add_object(Object::Dictionary(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => font.base_font_name(),
        "Encoding" => "WinAnsiEncoding",
    }))
}

/// Helvetica advance widths (1/1000 em) for codepoints 32..=126.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Measured width of `text` in points at `size`, using Helvetica metrics.
/// Codepoints outside the table fall back to a 600/1000 em advance.
pub fn text_width(text: &str, size: f64) -> f64 {
    let total: f64 = text
        .chars()
        .map(|c| {
            let code = c as u32;
            if (32..=126).contains(&code) {
                HELVETICA_WIDTHS[(code - 32) as usize] as f64
            } else {
                600.0
            }
        })
        .sum();
    total * size / 1000.0
}

/// Find the largest whole-point size from `default_size` down to
/// `min_size` at which `text` fits in `max_width`.
///
/// Returns `min_size` even when the text still overflows at the floor;
/// overflow is accepted rather than dropping the field.
pub fn ideal_font_size<F>(
    measure: F,
    text: &str,
    max_width: f64,
    min_size: f64,
    default_size: f64,
) -> f64
where
    F: Fn(&str, f64) -> f64,
{
    let mut current_size = default_size;
    let mut width = measure(text, current_size);

    while width > max_width && current_size > min_size {
        current_size -= 1.0;
        width = measure(text, current_size);
    }

    current_size
}
