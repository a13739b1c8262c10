//! DataFrame access helpers shared by the stages.

use polars::prelude::*;

use crate::error::{Result, TransformError};

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

/// Fail with [`TransformError::MissingColumns`] unless every name is present.
pub fn require_columns<'a>(
    df: &DataFrame,
    table: &str,
    required: impl IntoIterator<Item = &'a str>,
) -> Result<()> {
    let missing: Vec<String> = required
        .into_iter()
        .filter(|name| !has_column(df, name))
        .map(str::to_string)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(TransformError::MissingColumns {
            table: table.to_string(),
            columns: missing,
        })
    }
}

/// Drop the named columns that exist; absent names are ignored.
pub fn drop_present(df: &DataFrame, names: &[&str]) -> Result<DataFrame> {
    let mut out = df.clone();
    for name in names {
        if has_column(&out, name) {
            out = out.drop(name)?;
        }
    }
    Ok(out)
}

/// Add a column, refusing to overwrite an existing one.
pub fn with_new_column(df: &DataFrame, column: Series) -> Result<DataFrame> {
    if has_column(df, column.name().as_str()) {
        return Err(TransformError::ColumnExists {
            column: column.name().to_string(),
        });
    }
    let mut out = df.clone();
    out.with_column(column)?;
    Ok(out)
}

/// Cast identifier-like columns to `Int64`, failing on non-integer text.
pub fn cast_integer_columns(df: &DataFrame, names: &[&str]) -> Result<DataFrame> {
    let mut out = df.clone();
    for name in names {
        let column = out.column(name)?;
        if column.dtype() == &DataType::Int64 {
            continue;
        }
        let cast = column
            .strict_cast(&DataType::Int64)
            .map_err(|e| TransformError::InvalidKey {
                column: (*name).to_string(),
                message: e.to_string(),
            })?;
        out.with_column(cast)?;
    }
    Ok(out)
}

/// Nullable integer values of a column.
pub fn integer_values(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>> {
    let column = df.column(name)?.cast(&DataType::Int64)?;
    Ok(column.i64()?.into_iter().collect())
}

/// Integer key values; a null key is an error.
pub fn required_keys(df: &DataFrame, name: &str) -> Result<Vec<i64>> {
    integer_values(df, name)?
        .into_iter()
        .map(|value| {
            value.ok_or_else(|| TransformError::InvalidKey {
                column: name.to_string(),
                message: "null key".to_string(),
            })
        })
        .collect()
}

pub fn string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df.column(name)?.cast(&DataType::String)?;
    Ok(column
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

/// `true` for every row where the column holds a value.
pub fn present_mask(df: &DataFrame, name: &str) -> Result<Vec<bool>> {
    Ok(df
        .column(name)?
        .is_not_null()
        .into_iter()
        .map(|value| value.unwrap_or(false))
        .collect())
}

/// Keep the rows whose mask entry is `true`.
pub fn filter_rows(df: &DataFrame, keep: &[bool]) -> Result<DataFrame> {
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    Ok(df.filter(&mask)?)
}
