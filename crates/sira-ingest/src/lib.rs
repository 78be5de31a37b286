pub mod discovery;
pub mod error;
pub mod excel;
pub mod polars_utils;

pub use discovery::list_workbooks;
pub use error::{IngestError, Result};
pub use excel::read_sheet;
pub use polars_utils::{
    any_to_datetime, any_to_f64, any_to_i64, any_to_string, format_numeric, is_null_value,
    parse_f64,
};
