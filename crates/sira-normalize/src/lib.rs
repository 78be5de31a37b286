//! Field normalization, applied after column reconciliation.
//!
//! The generic pass drops all-empty columns and rows and cleans text; the
//! record-type passes coerce designated fields to their destination types.
//! A value that fails coercion degrades to null: normalization never
//! raises for malformed data, and never reorders the rows it keeps.

pub mod coerce;

use chrono::NaiveDateTime;
use polars::prelude::{
    AnyValue, BooleanChunked, Column, DataFrame, DataType, NamedFrom, NewChunkedArray,
    PolarsResult, Series,
};
use tracing::{debug, info, warn};

use sira_ingest::{any_to_datetime, any_to_f64, any_to_string, is_null_value};
use sira_model::RecordType;
use sira_schema::columns;

pub use coerce::{clean_text, first_equipment_code, parse_timestamp};

/// Normalizes one reconciled batch for its record type.
pub fn normalize(df: DataFrame, record_type: RecordType) -> PolarsResult<DataFrame> {
    let mut df = drop_empty_columns(df)?;
    df = drop_empty_rows(df)?;
    clean_text_columns(&mut df)?;

    match record_type {
        RecordType::TransformerCenter => normalize_transformer_center(&mut df)?,
        RecordType::SwitchingEquipment => normalize_switching_equipment(&mut df)?,
        RecordType::Interruption => normalize_interruption(&mut df)?,
    }

    if df.column(columns::IDENTITY).is_ok() {
        df = df.drop(columns::IDENTITY)?;
        info!("removed '{}' column (destination-managed identity)", columns::IDENTITY);
    }

    Ok(df)
}

fn normalize_transformer_center(df: &mut DataFrame) -> PolarsResult<()> {
    coerce_decimal(df, columns::KVA_INSTALLED, columns::KVA_LIMIT)?;
    coerce_rounded_int(df, columns::CT_UTM_NORTH)?;
    coerce_rounded_int(df, columns::CT_UTM_WEST)?;
    Ok(())
}

fn normalize_switching_equipment(df: &mut DataFrame) -> PolarsResult<()> {
    coerce_decimal(df, columns::VOLTAGE_LEVEL, columns::VOLTAGE_LIMIT_KV)?;
    coerce_rounded_int(df, columns::MAX_CURRENT)?;
    coerce_rounded_int(df, columns::EQ_UTM_NORTH)?;
    coerce_rounded_int(df, columns::EQ_UTM_WEST)?;
    Ok(())
}

fn normalize_interruption(df: &mut DataFrame) -> PolarsResult<()> {
    for name in [
        columns::INTERRUPTION_START,
        columns::INTERRUPTION_CLOSE,
        columns::INTERRUPTION_USER_NOTICE,
    ] {
        coerce_timestamp(df, name)?;
    }
    derive_first_equipment_code(df)?;
    Ok(())
}

/// Drops columns whose every cell is null or blank.
fn drop_empty_columns(df: DataFrame) -> PolarsResult<DataFrame> {
    let height = df.height();
    if height == 0 {
        return Ok(df);
    }
    let keep: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|column| !column_is_empty(column, height))
        .map(|column| column.name().to_string())
        .collect();
    if keep.len() == df.width() {
        return Ok(df);
    }
    debug!(dropped = df.width() - keep.len(), "dropped all-empty columns");
    df.select(keep)
}

/// Drops rows whose every cell is null or blank. Surviving rows keep their
/// relative order.
fn drop_empty_rows(df: DataFrame) -> PolarsResult<DataFrame> {
    if df.height() == 0 || df.width() == 0 {
        return Ok(df);
    }
    let columns_ref = df.get_columns();
    let keep: Vec<bool> = (0..df.height())
        .map(|idx| {
            columns_ref.iter().any(|column| {
                !is_null_value(&column.get(idx).unwrap_or(AnyValue::Null))
            })
        })
        .collect();
    if keep.iter().all(|flag| *flag) {
        return Ok(df);
    }
    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    df.filter(&mask)
}

fn column_is_empty(column: &Column, height: usize) -> bool {
    (0..height).all(|idx| is_null_value(&column.get(idx).unwrap_or(AnyValue::Null)))
}

/// Text hygiene over every string column: trim, collapse whitespace runs,
/// and turn the literal "nan" token into a true null.
fn clean_text_columns(df: &mut DataFrame) -> PolarsResult<()> {
    let text_columns: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|column| column.dtype() == &DataType::String)
        .map(|column| column.name().to_string())
        .collect();
    for name in text_columns {
        let column = df.column(&name)?.clone();
        let values: Vec<Option<String>> = (0..df.height())
            .map(|idx| match column.get(idx).unwrap_or(AnyValue::Null) {
                AnyValue::Null => None,
                value => clean_text(&any_to_string(value)),
            })
            .collect();
        df.with_column(Series::new(name.as_str().into(), values))?;
    }
    Ok(())
}

/// Coerces a column to decimal. Values past `limit` are counted and warned
/// about but pass through unmodified; the destination rejects or stores
/// them as it sees fit.
fn coerce_decimal(df: &mut DataFrame, name: &str, limit: f64) -> PolarsResult<()> {
    if df.column(name).is_err() {
        return Ok(());
    }
    let column = df.column(name)?.clone();
    let mut oversized = 0u64;
    let values: Vec<Option<f64>> = (0..df.height())
        .map(|idx| {
            let value = any_to_f64(&column.get(idx).unwrap_or(AnyValue::Null));
            if let Some(number) = value
                && number > limit
            {
                oversized += 1;
            }
            value
        })
        .collect();
    if oversized > 0 {
        warn!(
            column = name,
            count = oversized,
            "values exceed the destination precision limit; loaded unmodified"
        );
    }
    df.with_column(Series::new(name.into(), values))?;
    Ok(())
}

/// Coerces a column to integer by rounding halves away from zero.
/// Non-numeric input coerces to null.
fn coerce_rounded_int(df: &mut DataFrame, name: &str) -> PolarsResult<()> {
    if df.column(name).is_err() {
        return Ok(());
    }
    let column = df.column(name)?.clone();
    let values: Vec<Option<i64>> = (0..df.height())
        .map(|idx| {
            any_to_f64(&column.get(idx).unwrap_or(AnyValue::Null)).map(|number| number.round() as i64)
        })
        .collect();
    df.with_column(Series::new(name.into(), values))?;
    Ok(())
}

/// Coerces a column to timestamps; unparseable values become null.
fn coerce_timestamp(df: &mut DataFrame, name: &str) -> PolarsResult<()> {
    if df.column(name).is_err() {
        return Ok(());
    }
    let column = df.column(name)?.clone();
    let values: Vec<Option<NaiveDateTime>> = (0..df.height())
        .map(|idx| {
            let value = column.get(idx).unwrap_or(AnyValue::Null);
            any_to_datetime(&value).or_else(|| parse_timestamp(&any_to_string(value)))
        })
        .collect();
    df.with_column(Series::new(name.into(), values))?;
    Ok(())
}

/// Adds the derived first-equipment-code column from the comma-separated
/// equipment code list.
fn derive_first_equipment_code(df: &mut DataFrame) -> PolarsResult<()> {
    if df.column(columns::INTERRUPTION_EQUIPMENT).is_err() {
        return Ok(());
    }
    let column = df.column(columns::INTERRUPTION_EQUIPMENT)?.clone();
    let values: Vec<Option<String>> = (0..df.height())
        .map(|idx| match column.get(idx).unwrap_or(AnyValue::Null) {
            AnyValue::Null => None,
            value => first_equipment_code(&any_to_string(value)),
        })
        .collect();
    df.with_column(Series::new(columns::FIRST_EQUIPMENT_CODE.into(), values))?;
    info!("derived '{}' column", columns::FIRST_EQUIPMENT_CODE);
    Ok(())
}
