use crate::error::RenderError;
use crate::pdf::{BuiltinFont, PdfDocument};

/// The substitute text rendered in place of absent or empty content.
pub const PLACEHOLDER: &str = "-";

/// The column width, in characters, at which paragraph text is wrapped.
pub const PARAGRAPH_WRAP_COLUMNS: usize = 90;

const HEADING_FONT_SIZE: f32 = 18.0;
const SECTION_TITLE_FONT_SIZE: f32 = 12.0;
const PARAGRAPH_FONT_SIZE: f32 = 11.0;

/// The fixed geometry of a report page, expressed in points. The cursor derives the
/// starting offset and the per-line advance from these values.
#[derive(Debug, Clone, Copy)]
pub struct PageGeometry {
    /// The height of the page.
    pub page_height: f32,
    /// The top and side margin.
    pub margin: f32,
    /// The vertical distance between two consecutive lines.
    pub line_height: f32,
}

impl PageGeometry {
    /// The geometry every report is rendered with: an A4 page with a 50 point margin
    /// and 16 points between lines.
    pub const A4: PageGeometry = PageGeometry {
        page_height: 841.89,
        margin: 50.0,
        line_height: 16.0,
    };

    /// The starting position for a new page: the page height minus the top margin.
    pub fn page_top(&self) -> Cursor {
        Cursor {
            offset: self.page_height - self.margin,
        }
    }
}

/// The current vertical writing position on a page. A cursor is an immutable value
/// threaded by return through every drawing call, never a shared mutable field, so a
/// render sequence stays reproducible and safe to run in parallel with others.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    offset: f32,
}

impl Cursor {
    /// The vertical offset from the bottom of the page.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Returns the position one line height further down the page. No lower bound is
    /// applied; every report is expected to fit on a single page and content past the
    /// bottom edge is the caller's responsibility.
    #[must_use]
    pub fn advance(self, geometry: &PageGeometry) -> Cursor {
        Cursor {
            offset: self.offset - geometry.line_height,
        }
    }

    /// The usable height left above the bottom margin.
    pub fn remaining(&self, geometry: &PageGeometry) -> f32 {
        self.offset - geometry.margin
    }
}

/// One styled unit of report content. The templates describe a whole document as an
/// ordered list of these and `write_blocks` turns the list into page content, so the
/// three document kinds share a single rendering pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// A single large bold line, the document title.
    Heading(String),
    /// A single medium bold line opening a section.
    SectionTitle(String),
    /// Free text, wrapped at [`PARAGRAPH_WRAP_COLUMNS`] characters into regular lines.
    Paragraph(String),
    /// Vertical spacing between sections, one line height with no visible content.
    Blank,
}

/// Splits a paragraph of text into display lines no wider than `maximum_width`
/// characters. Explicit newlines separate paragraphs and an empty paragraph is kept
/// as a single blank line. Words are accumulated greedily: the current line is closed
/// as soon as appending the next word (and its separating space) would exceed the
/// bound. A single word longer than the bound is placed alone on its own line rather
/// than split mid-word, so the bound is advisory for that case only.
///
/// Empty or all-whitespace input produces exactly one line containing [`PLACEHOLDER`].
pub fn wrap(text: &str, maximum_width: usize) -> Vec<String> {
    if text.trim().is_empty() {
        return vec![PLACEHOLDER.to_string()];
    }

    let normalized = text.replace('\r', "");
    let mut lines = Vec::new();
    for paragraph in normalized.split('\n') {
        let trimmed = paragraph.trim();
        if trimmed.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current_line = String::new();
        let mut current_width = 0;
        for word in trimmed.split_whitespace() {
            let word_width = word.chars().count();
            if current_width > 0 && current_width + 1 + word_width > maximum_width {
                lines.push(std::mem::take(&mut current_line));
                current_width = 0;
            }
            if current_width > 0 {
                current_line.push(' ');
                current_width += 1;
            }
            current_line.push_str(word);
            current_width += word_width;
        }
        if current_width > 0 {
            lines.push(current_line);
        }
    }

    lines
}

/// Writes the given blocks onto the page in order, from the top of the page downwards.
/// Each block advances the cursor by as many line heights as it emits lines, so the
/// top-to-bottom document order is determined entirely by the order of the list.
pub fn write_blocks(
    document: &mut PdfDocument,
    page_index: usize,
    blocks: &[Block],
    geometry: &PageGeometry,
) -> Result<(), RenderError> {
    let mut cursor = geometry.page_top();

    for block in blocks {
        match block {
            Block::Heading(text) => {
                document.write_text_line(
                    page_index,
                    text,
                    BuiltinFont::HelveticaBold,
                    HEADING_FONT_SIZE,
                    [geometry.margin, cursor.offset()],
                )?;
                cursor = cursor.advance(geometry);
            }
            Block::SectionTitle(text) => {
                document.write_text_line(
                    page_index,
                    text,
                    BuiltinFont::HelveticaBold,
                    SECTION_TITLE_FONT_SIZE,
                    [geometry.margin, cursor.offset()],
                )?;
                cursor = cursor.advance(geometry);
            }
            Block::Paragraph(text) => {
                for line in wrap(text, PARAGRAPH_WRAP_COLUMNS) {
                    document.write_text_line(
                        page_index,
                        &line,
                        BuiltinFont::Helvetica,
                        PARAGRAPH_FONT_SIZE,
                        [geometry.margin, cursor.offset()],
                    )?;
                    cursor = cursor.advance(geometry);
                }
            }
            Block::Blank => {
                cursor = cursor.advance(geometry);
            }
        }
    }

    Ok(())
}
