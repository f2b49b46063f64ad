//! Report renderers.
//!
//! - [`table`] — renders header + rows in one of the [`TableFormat`]s.
//! - [`terminal`] — coloured summary printed after a `check`.

pub mod table;
pub mod terminal;

/// Output format for tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TableFormat {
    /// Markdown pipe table
    #[default]
    Pipe,
    /// ASCII grid with borders around every cell
    Grid,
    /// Header underline only
    Simple,
    /// No borders
    Plain,
    /// Unicode box drawing
    Fancy,
    /// JSON array of rows
    Json,
}
