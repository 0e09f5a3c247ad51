//! Keypad matrix trait

/// A row/column switch matrix
///
/// Rows are driven, columns are read. Implementations handle pin polarity
/// and the settle delay after selecting a row; the scanner only asks
/// "is this column contacted while this row is selected".
pub trait KeyMatrix {
    /// Number of driven rows
    fn rows(&self) -> usize;

    /// Number of sensed columns
    fn cols(&self) -> usize;

    /// Activate one row and wait for the lines to settle
    fn select_row(&mut self, row: usize);

    /// Return every row to its idle level
    fn release_rows(&mut self);

    /// Whether the given column sees the selected row
    fn column_active(&self, col: usize) -> bool;
}
