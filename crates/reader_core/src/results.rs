use crate::ExtractionRow;

/// Append-only table of rows drained from finished jobs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultsAccumulator {
    rows: Vec<ExtractionRow>,
}

impl ResultsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, rows: impl IntoIterator<Item = ExtractionRow>) -> usize {
        let before = self.rows.len();
        self.rows.extend(rows);
        self.rows.len() - before
    }

    pub fn rows(&self) -> &[ExtractionRow] {
        &self.rows
    }

    /// Raw text of the row at `index`, the payload of the row's copy action.
    pub fn copy_text(&self, index: usize) -> Option<&str> {
        self.rows.get(index).map(|row| row.text.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
