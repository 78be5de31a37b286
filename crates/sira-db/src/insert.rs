//! Append-only bulk inserts.
//!
//! Destination column names carry spaces and accents, so identifiers are
//! always double-quoted. Bind types follow the frame's column dtypes; the
//! store enforces its own constraints on top.

use anyhow::{Context, Result};
use polars::prelude::{AnyValue, DataFrame, DataType};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use sira_ingest::{any_to_datetime, any_to_f64, any_to_i64, any_to_string, is_null_value};

/// Rows per INSERT statement.
pub const INSERT_CHUNK_ROWS: usize = 500;

/// Appends every row of the frame to the destination table, in chunks.
/// Returns the number of rows written.
pub async fn append_frame(pool: &PgPool, table: &str, df: &DataFrame) -> Result<u64> {
    if df.height() == 0 || df.width() == 0 {
        return Ok(0);
    }

    let columns = df.get_columns();
    let column_list = columns
        .iter()
        .map(|column| quote_ident(column.name()))
        .collect::<Vec<_>>()
        .join(", ");

    let mut inserted = 0u64;
    let mut start = 0usize;
    while start < df.height() {
        let end = (start + INSERT_CHUNK_ROWS).min(df.height());
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "INSERT INTO {} ({}) ",
            quote_ident(table),
            column_list
        ));
        builder.push_values(start..end, |mut row, idx| {
            for column in columns {
                let value = column.get(idx).unwrap_or(AnyValue::Null);
                match column.dtype() {
                    DataType::Float64 => {
                        row.push_bind(any_to_f64(&value));
                    }
                    DataType::Int64 => {
                        row.push_bind(any_to_i64(&value));
                    }
                    DataType::Datetime(_, _) => {
                        row.push_bind(any_to_datetime(&value));
                    }
                    _ => {
                        let text = if is_null_value(&value) {
                            None
                        } else {
                            Some(any_to_string(value))
                        };
                        row.push_bind(text);
                    }
                }
            }
        });
        let result = builder
            .build()
            .execute(pool)
            .await
            .with_context(|| format!("append rows {start}..{end} into '{table}'"))?;
        inserted += result.rows_affected();
        debug!(table, rows = end - start, "chunk appended");
        start = end;
    }

    Ok(inserted)
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_are_quoted_with_doubling() {
        assert_eq!(quote_ident("Centro MTBT"), "\"Centro MTBT\"");
        assert_eq!(
            quote_ident("Código Centro de transformación MT/BT"),
            "\"Código Centro de transformación MT/BT\""
        );
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
