use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat};
use std::io::BufWriter;
use std::mem;
use time::OffsetDateTime;
use unicode_normalization::UnicodeNormalization as _;

use crate::error::RenderError;

/// The two styles every report is typeset with. These are fonts from the standard
/// set that every PDF renderer ships, so no font program is embedded into the
/// document; the font dictionaries reference them by their PostScript names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinFont {
    /// The regular style used for paragraph lines.
    Helvetica,
    /// The bold style used for headings and section titles.
    HelveticaBold,
}

impl BuiltinFont {
    const ALL: [BuiltinFont; 2] = [BuiltinFont::Helvetica, BuiltinFont::HelveticaBold];

    /// The PostScript name the font dictionary declares as its `BaseFont`.
    fn base_font(&self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "Helvetica",
            BuiltinFont::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// The name under which the font is registered in the page resources, to be
    /// referenced by the `Tf` operations in the content stream.
    fn resource_name(&self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "F0",
            BuiltinFont::HelveticaBold => "F1",
        }
    }
}

/// The representation of a single PDF page: its dimensions in points and the content
/// stream operations written onto it so far, in emission order.
#[derive(Debug, Clone)]
pub struct PdfPage {
    /// Page width in points.
    pub width: f32,
    /// Page height in points.
    pub height: f32,
    /// The operations of the page content stream. All writes are append-only, the
    /// top-to-bottom document order is determined entirely by the order in here.
    operations: Vec<Operation>,
}

/// This struct represents the actual PDF document on a high-level. It is an interface
/// to the underlying `lopdf::Document` with the addition of the pages being written
/// and the document identifier.
///
/// The documents produced through this interface are deterministic: the metadata
/// timestamps are pinned to the epoch and the trailer `ID` is derived from the
/// identifier handed to `new`, so rendering the same content twice yields the same
/// bytes.
pub struct PdfDocument {
    /// The underlying PDF document: this is a low-level interface and shouldn't be
    /// directly interacted with unless strictly necessary, anyway this is why it is
    /// exposed to the user.
    pub inner_document: lopdf::Document,
    /// The identifier of the document, it is used in order to set the PDF `ID` tag.
    pub identifier: String,
    /// The title recorded in the document information dictionary.
    pub title: String,
    pages: Vec<PdfPage>,
}

impl PdfDocument {
    /// Create a new `PdfDocument` by defaulting the underlying PDF document to
    /// version 1.5 of the PDF specification.
    pub fn new<S: Into<String>>(identifier: S, title: S) -> Self {
        PdfDocument {
            inner_document: lopdf::Document::with_version("1.5"),
            identifier: identifier.into(),
            title: title.into(),
            pages: Vec::new(),
        }
    }

    /// Adds a page of the given width and height in millimeters with an empty content
    /// stream, returning the index of the page. The index is to be passed to
    /// `write_text_line` when writing content onto the page.
    pub fn add_page(&mut self, page_width: f32, page_height: f32) -> usize {
        self.pages.push(PdfPage {
            width: millimeters_to_points(page_width),
            height: millimeters_to_points(page_height),
            operations: Vec::new(),
        });

        self.pages.len() - 1
    }

    /// Writes one line of text in the given font and size at the given position of
    /// the page, the position being expressed in points from the bottom-left corner.
    /// The text is normalized to its NFC form and encoded for the WinAnsi code page;
    /// a character the code page cannot represent is replaced and logged.
    pub fn write_text_line(
        &mut self,
        page_index: usize,
        text: &str,
        font: BuiltinFont,
        font_size: f32,
        position: [f32; 2],
    ) -> Result<(), RenderError> {
        let encoded_text = encode_win_ansi(text);
        let page = self.get_mut_page(page_index)?;

        page.operations.extend(vec![
            Operation::new("BT", vec![]), // Begin text section
            Operation::new(
                "Tf",
                vec![font.resource_name().into(), font_size.into()],
            ), // Set the font and the font size
            Operation::new("Td", {
                let [x, y] = position;
                vec![x.into(), y.into()]
            }), // Set the position where the text begins to be written
            Operation::new(
                "Tj",
                vec![Object::String(encoded_text, StringFormat::Literal)],
            ), // Show the actual text content
            Operation::new("ET", vec![]), // End text section
        ]);

        Ok(())
    }

    /// Write the pages and the operations so far specified to the PDF document and
    /// finalize its object graph: the information dictionary, the catalog, the page
    /// tree with one content stream per page, the font resources and the trailer.
    ///
    /// One mandatory argument needed by the PDF specification is the instance ID,
    /// which together with the document identifier forms the trailer `ID` tag.
    pub fn write_all(&mut self, instance_id: String) -> Result<(), RenderError> {
        use lopdf::Object::*;
        use lopdf::StringFormat::*;

        // Construct the general info that the PDF document needs in order to be parsed
        // correctly and insert it into the PDF document itself. The creation and
        // modification dates are pinned to the epoch so that rendering is reproducible.
        let document_info = lopdf::Dictionary::from_iter(vec![
            ("Trapped", "False".into()),
            (
                "CreationDate",
                String(
                    to_pdf_timestamp_format(&OffsetDateTime::UNIX_EPOCH).into_bytes(),
                    Literal,
                ),
            ),
            (
                "ModDate",
                String(
                    to_pdf_timestamp_format(&OffsetDateTime::UNIX_EPOCH).into_bytes(),
                    Literal,
                ),
            ),
            ("Title", String(self.title.clone().into_bytes(), Literal)),
            (
                "Creator",
                String("reportr".to_string().into_bytes(), Literal),
            ),
            (
                "Producer",
                String("reportr".to_string().into_bytes(), Literal),
            ),
            (
                "Identifier",
                String(self.identifier.clone().into_bytes(), Literal),
            ),
        ]);
        let document_info_id = self.inner_document.add_object(Dictionary(document_info));

        // Construct the catalog, required by the PDF specification
        let pages_id = self.inner_document.new_object_id();
        let catalog = lopdf::Dictionary::from_iter(vec![
            ("Type", "Catalog".into()),
            ("PageLayout", "OneColumn".into()),
            ("PageMode", "UseNone".into()),
            ("Pages", Reference(pages_id)),
        ]);
        let catalog_id = self.inner_document.add_object(catalog);

        self.inner_document
            .trailer
            .set("Root", Reference(catalog_id));
        self.inner_document
            .trailer
            .set("Info", Reference(document_info_id));
        self.inner_document.trailer.set(
            "ID",
            Array(vec![
                String(self.identifier.clone().into_bytes(), Literal),
                String(instance_id.into_bytes(), Literal),
            ]),
        );

        // Register the two built-in fonts and insert them into the PDF document
        let fonts_dictionary = self.insert_fonts_into_document();
        let fonts_dictionary_id = self.inner_document.add_object(Dictionary(fonts_dictionary));

        // Begin constructing the pages dictionary
        let mut pages = lopdf::Dictionary::from_iter(vec![
            ("Type", "Pages".into()),
            ("Count", Integer(self.pages.len() as i64)),
        ]);

        let mut page_ids = Vec::<Object>::new();

        // For each page present in the document...
        for page in self.pages.iter() {
            // Encode the collected operations into the page content stream. Page
            // contents should not be compressed.
            let page_content = Content {
                operations: page.operations.clone(),
            };
            let encoded_content = page_content.encode().map_err(|error| {
                RenderError::with_error("Failed to encode the page content stream", &error)
            })?;
            let content_stream =
                lopdf::Stream::new(lopdf::Dictionary::new(), encoded_content).with_compression(false);
            let page_content_id = self.inner_document.add_object(content_stream);

            // The only resources a page references are the two fonts
            let resources_dictionary =
                lopdf::Dictionary::from_iter(vec![("Font", Reference(fonts_dictionary_id))]);
            let resources_id = self
                .inner_document
                .add_object(Dictionary(resources_dictionary));

            // Construct the dictionary which specifies all the page information
            let page_dictionary = lopdf::Dictionary::from_iter(vec![
                ("Type", "Page".into()),
                ("Rotate", Integer(0)),
                (
                    "MediaBox",
                    vec![0.into(), 0.into(), page.width.into(), page.height.into()].into(),
                ),
                (
                    "TrimBox",
                    vec![0.into(), 0.into(), page.width.into(), page.height.into()].into(),
                ),
                (
                    "CropBox",
                    vec![0.into(), 0.into(), page.width.into(), page.height.into()].into(),
                ),
                ("Parent", Reference(pages_id)),
                ("Resources", Reference(resources_id)),
                ("Contents", Reference(page_content_id)),
            ]);

            let page_id = self.inner_document.add_object(page_dictionary);
            page_ids.push(Reference(page_id));
        }

        // Use all the collected page references in order to set the "Kids" field of
        // the page tree and then insert the pages dictionary into the document itself
        // as a last operation
        pages.set::<_, lopdf::Object>("Kids".to_string(), page_ids.into());
        self.inner_document
            .objects
            .insert(pages_id, Dictionary(pages));

        Ok(())
    }

    /// Save the `PdfDocument` to bytes in order for it to be written to a file or
    /// served to a caller.
    pub fn save_to_bytes(&mut self) -> Result<Vec<u8>, RenderError> {
        let mut pdf_document_bytes = Vec::new();
        let mut writer = BufWriter::new(&mut pdf_document_bytes);
        self.inner_document.save_to(&mut writer).map_err(|error| {
            RenderError::with_error("Error while saving the PDF document to bytes", &error)
        })?;
        mem::drop(writer);

        Ok(pdf_document_bytes)
    }

    /// Converts the built-in fonts into dictionaries, inserts them into the document
    /// and returns the resource dictionary referencing them.
    fn insert_fonts_into_document(&mut self) -> lopdf::Dictionary {
        let mut font_dictionary = lopdf::Dictionary::new();

        for font in BuiltinFont::ALL {
            let font_descriptor = lopdf::Dictionary::from_iter(vec![
                ("Type", Object::Name("Font".into())),
                ("Subtype", Object::Name("Type1".into())),
                ("BaseFont", Object::Name(font.base_font().into())),
                ("Encoding", Object::Name("WinAnsiEncoding".into())),
            ]);
            let font_id = self
                .inner_document
                .add_object(Object::Dictionary(font_descriptor));
            font_dictionary.set(font.resource_name(), Object::Reference(font_id));
        }

        font_dictionary
    }

    // Retrieve the page at the given page index.
    fn get_mut_page(&mut self, page_index: usize) -> Result<&mut PdfPage, RenderError> {
        self.pages
            .get_mut(page_index)
            .ok_or(RenderError::with_context(format!(
                "Failed to find the page with index {}",
                page_index
            )))
    }
}

/// Converts millimeters to points. This function is used in order to present the data
/// in the format required by the PDF specification, while the page geometry is easier
/// to reason about in millimeters.
fn millimeters_to_points(millimeters: f32) -> f32 {
    millimeters * 2.834646
}

/// Encodes the text for the WinAnsi code page the built-in fonts are declared with.
/// The text is normalized to its NFC form first; a character outside the code page is
/// replaced with a question mark and the event is logged.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut encoded_text = Vec::with_capacity(text.len());
    for character in text.nfc() {
        match win_ansi_byte(character) {
            Some(byte) => encoded_text.push(byte),
            None => {
                log::warn!(
                    "Unable to represent the character {:?} in the WinAnsi encoding, replacing it",
                    character
                );
                encoded_text.push(b'?');
            }
        }
    }

    encoded_text
}

/// The WinAnsi (code page 1252) byte for a character, if the code page contains it.
/// The printable ASCII and Latin-1 ranges map to their own codepoints; the 0x80..0x9F
/// window holds the typographic characters listed below instead of the C1 controls.
fn win_ansi_byte(character: char) -> Option<u8> {
    match character {
        '\u{20}'..='\u{7e}' => Some(character as u8),
        '\u{a0}'..='\u{ff}' => Some(character as u8),
        '\u{20ac}' => Some(0x80), // €
        '\u{201a}' => Some(0x82), // ‚
        '\u{0192}' => Some(0x83), // ƒ
        '\u{201e}' => Some(0x84), // „
        '\u{2026}' => Some(0x85), // …
        '\u{2020}' => Some(0x86), // †
        '\u{2021}' => Some(0x87), // ‡
        '\u{02c6}' => Some(0x88), // ˆ
        '\u{2030}' => Some(0x89), // ‰
        '\u{0160}' => Some(0x8a), // Š
        '\u{2039}' => Some(0x8b), // ‹
        '\u{0152}' => Some(0x8c), // Œ
        '\u{017d}' => Some(0x8e), // Ž
        '\u{2018}' => Some(0x91), // '
        '\u{2019}' => Some(0x92), // '
        '\u{201c}' => Some(0x93), // "
        '\u{201d}' => Some(0x94), // "
        '\u{2022}' => Some(0x95), // •
        '\u{2013}' => Some(0x96), // –
        '\u{2014}' => Some(0x97), // —
        '\u{02dc}' => Some(0x98), // ˜
        '\u{2122}' => Some(0x99), // ™
        '\u{0161}' => Some(0x9a), // š
        '\u{203a}' => Some(0x9b), // ›
        '\u{0153}' => Some(0x9c), // œ
        '\u{017e}' => Some(0x9e), // ž
        '\u{0178}' => Some(0x9f), // Ÿ
        _ => None,
    }
}

/// Formats the given time so that it matches what the PDF specification expects.
/// An example of it is the following: D:20170505150224+02'00'.
fn to_pdf_timestamp_format(date: &OffsetDateTime) -> String {
    let offset = date.offset();
    let offset_sign = if offset.is_negative() { '-' } else { '+' };
    format!(
        "D:{:04}{:02}{:02}{:02}{:02}{:02}{offset_sign}{:02}'{:02}'",
        date.year(),
        u8::from(date.month()),
        date.day(),
        date.hour(),
        date.minute(),
        date.second(),
        offset.whole_hours().abs(),
        offset.minutes_past_hour().abs(),
    )
}
