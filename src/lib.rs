//! Reportr renders the repair shop's business records into printable, single-page PDF
//! documents: the budget quote and the technical report for a ticket, and the stock
//! report over the catalogued inventory.
//!
//! The crate consumes already-validated, fully-populated records and produces an
//! opaque byte sequence; it knows nothing about how the records were created, stored
//! or transported. Every render call is independent and stateless: a document kind
//! plus its records go in, PDF bytes (or a `RenderError`) come out. Given the same
//! records and the same emission instant the produced bytes are identical, which is
//! what the test suite leans on.

/// The data model the engine consumes and the three rendering operations it exposes.
///
/// # Introduction
///
/// The entry points of this module are `render_budget`, `render_technical_report` and
/// `render_inventory_report`, together with their `_at` twins which take the emission
/// instant explicitly instead of reading the clock. The `ReportRequest` enum bundles
/// a document kind with its payload so that a whole request can be read from a JSON
/// document, which is how the command line interface drives the engine.
///
/// Each document kind is described as an ordered list of layout blocks built by the
/// `*_blocks` functions. The section content and its ordering live entirely in this
/// module; the other modules know nothing about tickets, customers or stock.
pub mod report;

/// This module contains the `RenderError` type which is the error type used
/// throughout this library.
///
/// Gaps in the input shape (absent sub-records, empty text, missing prices) are never
/// errors: they are recovered locally with placeholders while rendering. The only
/// fatal condition is a fault in the document serialization itself, and whenever a
/// function of this library returns a `RenderError` the caller can expect to find the
/// propagated source error inside it, next to a context message.
pub mod error;

/// The pt-BR display formatting of money amounts and instants.
pub mod format;

/// Text wrapping, the page geometry and the block writer.
///
/// The `wrap` function splits free text into display lines bounded by a column width,
/// `PageGeometry`/`Cursor` track the vertical writing position down a fixed page, and
/// `write_blocks` converts an ordered block list into styled text operations on a
/// page. The cursor is a value threaded by return through every drawing call, so a
/// render sequence has no shared mutable position state.
pub mod layout;

/// The module where the `PdfDocument` interface for building the PDF output is
/// presented.
///
/// # Introduction
///
/// The main component of this module is the struct `PdfDocument`, a thin layer over
/// `lopdf` with the convenience functions `add_page`, `write_text_line`, `write_all`
/// and `save_to_bytes`, which keep the PDF object-graph plumbing below a curtain of
/// private methods. Documents are typeset with the two built-in Helvetica fonts in
/// the WinAnsi encoding, so no font program is embedded, and every timestamp the PDF
/// metadata requires is pinned to the epoch so that the output is reproducible.
pub mod pdf;
