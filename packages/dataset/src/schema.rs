//! Declared input schemas and their resolution against a file header.

use climate_clean_dataset_models::{ColumnSpec, ColumnType};

use crate::DatasetError;

/// Ordered, immutable list of the columns a dataset reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<ColumnSpec>,
}

/// Position of a declared column within a [`Schema`].
///
/// Obtained from [`Schema::column`], so it always refers to a declared
/// column of the expected type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRef(usize);

impl ColumnRef {
    /// Index of the column in schema order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// For each declared column, the index of the matching header cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSchema {
    positions: Vec<usize>,
}

impl ResolvedSchema {
    /// Header positions in schema order.
    #[must_use]
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }
}

impl Schema {
    /// Creates a schema from its ordered column declarations.
    #[must_use]
    pub const fn new(columns: Vec<ColumnSpec>) -> Self {
        Self { columns }
    }

    /// Declared columns, in order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Looks up a declared column by name, checking its declared type.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::TypeCoercion`] if the column is not declared
    /// or is declared with a different type.
    pub fn column(&self, name: &str, expected: ColumnType) -> Result<ColumnRef, DatasetError> {
        let Some(index) = self.columns.iter().position(|c| c.name == name) else {
            return Err(DatasetError::TypeCoercion {
                message: format!("column '{name}' is not declared in the schema"),
            });
        };

        let declared = self.columns[index].column_type;
        if declared != expected {
            return Err(DatasetError::TypeCoercion {
                message: format!("column '{name}' is declared as {declared}, expected {expected}"),
            });
        }

        Ok(ColumnRef(index))
    }

    /// Matches every declared column to a header cell by name.
    ///
    /// Header cells are trimmed before comparison; if a name appears more
    /// than once the first occurrence is used.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::SchemaMismatch`] listing every declared
    /// column that has no header cell.
    pub fn resolve<'a>(
        &self,
        dataset: &str,
        header: impl IntoIterator<Item = &'a str>,
    ) -> Result<ResolvedSchema, DatasetError> {
        let header: Vec<&str> = header
            .into_iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim())
            .collect();

        let mut positions = Vec::with_capacity(self.columns.len());
        let mut missing = Vec::new();

        for column in &self.columns {
            match header.iter().position(|h| *h == column.name) {
                Some(pos) => positions.push(pos),
                None => missing.push(column.name.clone()),
            }
        }

        if !missing.is_empty() {
            return Err(DatasetError::SchemaMismatch {
                dataset: dataset.to_string(),
                missing,
            });
        }

        Ok(ResolvedSchema { positions })
    }
}
