use lopdf::{Dictionary, Document, Object, Stream, StringFormat, dictionary};

use crate::error::{CertificateError, Result};
use crate::pdf::content::latin1_bytes;

/// Document-level metadata, written once to the Info dictionary.
pub struct DocumentInfo<'a> {
    pub title: &'a str,
    pub subject: &'a str,
    pub keywords: &'a [&'a str],
    pub producer: &'a str,
    pub creator: &'a str,
    pub author: &'a str,
}

/// The loaded template, owned by a single request and mutated in place.
///
/// The template's static artwork and coordinate system are a fixed
/// contract; all mutations append overlay content, pages, and metadata
/// without touching existing page content.
pub struct TemplateDocument {
    doc: Document,
    first_page: (u32, u16),
    media_box: Object,
    page_width: f64,
    page_height: f64,
}

impl TemplateDocument {
    /// Parse template bytes into a mutable document.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let doc = Document::load_mem(bytes).map_err(CertificateError::TemplateParse)?;

        let first_page =
            *doc.get_pages()
                .values()
                .next()
                .ok_or_else(|| CertificateError::InvalidTemplate {
                    message: "template has no pages".to_string(),
                })?;

        // MediaBox may live on the page or be inherited from the page tree root
        let media_box = match doc.get_dictionary(first_page)?.get(b"MediaBox") {
            Ok(obj) => obj.clone(),
            Err(_) => {
                let pages_id = doc.catalog()?.get(b"Pages")?.as_reference()?;
                doc.get_dictionary(pages_id)?.get(b"MediaBox")?.clone()
            }
        };

        let rect = media_box.as_array()?;
        if rect.len() != 4 {
            return Err(CertificateError::InvalidTemplate {
                message: "MediaBox is not a 4-element rectangle".to_string(),
            });
        }
        let page_width = (rect[2].as_float()? - rect[0].as_float()?) as f64;
        let page_height = (rect[3].as_float()? - rect[1].as_float()?) as f64;

        Ok(Self {
            doc,
            first_page,
            media_box,
            page_width,
            page_height,
        })
    }

    pub fn first_page(&self) -> (u32, u16) {
        self.first_page
    }

    /// Page size in points, shared by the template page and appended pages.
    pub fn dimensions(&self) -> (f64, f64) {
        (self.page_width, self.page_height)
    }

    pub fn doc_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Append a blank page with the template's MediaBox and register it
    /// in the page tree. Must happen before any drawing on that page.
    pub fn append_page(&mut self) -> Result<(u32, u16)> {
        let pages_id = self.doc.catalog()?.get(b"Pages")?.as_reference()?;

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => self.media_box.clone(),
        });

        let mut kids = self
            .doc
            .get_dictionary(pages_id)
            .ok()
            .and_then(|d| d.get(b"Kids").ok())
            .and_then(|k| k.as_array().ok())
            .cloned()
            .unwrap_or_default();
        kids.push(Object::Reference(page_id));
        let count = kids.len();

        let pages = self.doc.get_dictionary_mut(pages_id)?;
        pages.set("Kids", kids);
        pages.set("Count", count as i64);

        Ok(page_id)
    }

    /// Append overlay content to an existing page, after its own streams.
    pub fn append_page_contents(&mut self, page_id: (u32, u16), content: Vec<u8>) -> Result<()> {
        self.doc.add_page_contents(page_id, content)?;
        Ok(())
    }

    /// Set the content stream of a freshly appended page.
    pub fn set_page_contents(&mut self, page_id: (u32, u16), content: Vec<u8>) -> Result<()> {
        let stream_id = self.doc.add_object(Stream::new(dictionary! {}, content));
        self.doc
            .get_dictionary_mut(page_id)?
            .set("Contents", Object::Reference(stream_id));
        Ok(())
    }

    /// Write the Info dictionary. Metadata strings are Latin-1 literals.
    pub fn set_info(&mut self, info: &DocumentInfo<'_>) {
        let literal = |s: &str| Object::String(latin1_bytes(s), StringFormat::Literal);

        let mut dict = Dictionary::new();
        dict.set("Title", literal(info.title));
        dict.set("Subject", literal(info.subject));
        dict.set("Keywords", literal(&info.keywords.join(" ")));
        dict.set("Producer", literal(info.producer));
        dict.set("Creator", literal(info.creator));
        dict.set("Author", literal(info.author));

        let info_id = self.doc.add_object(Object::Dictionary(dict));
        self.doc.trailer.set("Info", Object::Reference(info_id));
    }

    /// Finalize the mutated document into its binary form.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.doc.save_to(&mut bytes)?;
        Ok(bytes)
    }
}
