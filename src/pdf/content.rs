//! PDF content stream generation for the overlay.
//!
//! This module provides:
//! - A builder collecting text and image drawing operators per page
//! - QR image embedding as a FlateDecode DeviceGray XObject
//! - Literal-string encoding for WinAnsi text (escapes + octal bytes)

use std::io::Write;

use flate2::Compression;
use lopdf::{Dictionary, Document, Object, Stream};

use crate::error::Result;
use crate::qr::QrImage;

/// Builder for one page's overlay content stream and its XObject
/// resource entries. Coordinates are PDF-native (origin bottom-left),
/// matching the template's own coordinate system.
pub struct ContentBuilder {
    pub content_parts: Vec<String>,
    pub xobjects: Dictionary,
}

impl ContentBuilder {
    pub fn new() -> Self {
        Self {
            content_parts: Vec::new(),
            xobjects: Dictionary::new(),
        }
    }

    /// Queue a text draw at the given baseline position.
    pub fn draw_text(&mut self, text: &str, x: f64, y: f64, size: f64, font_name: &str) {
        let encoded = encode_win_ansi(text);
        self.content_parts.push(format!(
            "q BT 0 g /{} {} Tf {} {} Td ({}) Tj ET Q ",
            font_name, size, x, y, encoded
        ));
    }

    /// Queue an image draw and register the XObject in this page's
    /// resources under `name`.
    pub fn draw_image(
        &mut self,
        name: &str,
        image_id: (u32, u16),
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) {
        self.xobjects.set(name, Object::Reference(image_id));
        self.content_parts.push(format!(
            "q {} 0 0 {} {} {} cm /{} Do Q ",
            width, height, x, y, name
        ));
    }

    /// Build the final content bytes
    pub fn build_content_bytes(&self) -> Vec<u8> {
        self.content_parts.join("").into_bytes()
    }
}

impl Default for ContentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode text as a PDF literal string: escape delimiters, pass ASCII
/// through, and emit Latin-1 codepoints as octal escapes (WinAnsi covers
/// the accented range). Anything outside Latin-1 degrades to `?`.
pub fn encode_win_ansi(s: &str) -> String {
    let mut result = String::new();
    for c in s.chars() {
        match c {
            '(' => result.push_str(r"\("),
            ')' => result.push_str(r"\)"),
            '\\' => result.push_str(r"\\"),
            '\n' => result.push_str(r"\n"),
            '\r' => result.push_str(r"\r"),
            '\t' => result.push_str(r"\t"),
            c if (c as u32) < 0x80 => result.push(c),
            c if (c as u32) <= 0xFF => {
                result.push_str(&format!("\\{:03o}", c as u32));
            }
            _ => result.push('?'),
        }
    }
    result
}

/// Bytes of `s` in Latin-1, for metadata strings. Codepoints beyond
/// Latin-1 degrade to `?`.
pub fn latin1_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| if (c as u32) <= 0xFF { c as u8 } else { b'?' })
        .collect()
}

/// Embed the QR raster as an image XObject and return its id and
/// content-stream name. The image is registered once and may be drawn
/// on any page that lists it in its resources.
pub fn embed_qr_image(doc: &mut Document, image: &QrImage) -> Result<((u32, u16), String)> {
    // 8-bit grayscale raw bytes, Flate-compressed
    let raw_bytes: Vec<u8> = image.pixels().map(|pixel| pixel[0]).collect();
    let compressed_bytes = compress_data(&raw_bytes)?;

    let mut img_dict = Dictionary::new();
    img_dict.set("Type", "XObject");
    img_dict.set("Subtype", "Image");
    img_dict.set("Width", image.width() as i64);
    img_dict.set("Height", image.height() as i64);
    img_dict.set("ColorSpace", "DeviceGray");
    img_dict.set("BitsPerComponent", 8_i64);
    img_dict.set("Filter", "FlateDecode");

    let img_id = doc.add_object(Stream::new(img_dict, compressed_bytes));
    let img_name = format!("Im{}", img_id.0);

    Ok((img_id, img_name))
}

/// Compress data using zlib/flate2
pub fn compress_data(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}
