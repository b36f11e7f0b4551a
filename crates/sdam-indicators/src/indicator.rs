//! The `Indicator` trait.

use crate::error::{IndicatorError, Result};
use polars::prelude::*;

/// A row-wise transform that appends columns to the company table.
pub trait Indicator: Send + Sync {
    /// Unique indicator name.
    fn name(&self) -> &str;

    /// Columns the input must provide.
    fn required_columns(&self) -> &[&str];

    /// Columns appended to the output.
    fn output_columns(&self) -> &[&str];

    /// Build the lazy computation. Input columns are passed through.
    fn compute(&self, data: LazyFrame) -> Result<LazyFrame>;

    /// Check the input columns, then compute eagerly.
    fn apply(&self, table: DataFrame) -> Result<DataFrame> {
        for column in self.required_columns() {
            if table.get_column_index(column).is_none() {
                return Err(IndicatorError::MissingColumn {
                    indicator: self.name().to_string(),
                    column: (*column).to_string(),
                });
            }
        }
        Ok(self.compute(table.lazy())?.collect()?)
    }
}
