//! Strict integer coercion for recognized columns.
//!
//! Unlike a best-effort conversion, a value that cannot be represented as an
//! integer is an error: it is malformed data, not a missing value.

use crate::error::{AnalysisError, Result};
use crate::utils::{float_to_integer, get_dtype_category, parse_integer_string, DtypeCategory};
use polars::prelude::*;

/// Coerce a column to `Int64`.
///
/// * integer columns are cast (overflow is an error),
/// * float columns must hold integral values only,
/// * text columns must hold integer literals (`"25"`, `"25.0"`).
///
/// When `non_negative` is set, negative values are rejected as well.
pub(crate) fn coerce_to_integer(
    series: &Series,
    file: &str,
    non_negative: bool,
) -> Result<Series> {
    let column = series.name().to_string();
    let coercion_error = |value: String, reason: &str| AnalysisError::TypeCoercion {
        file: file.to_string(),
        column: column.clone(),
        value,
        reason: reason.to_string(),
    };

    let values: Vec<Option<i64>> = match get_dtype_category(series.dtype()) {
        DtypeCategory::Integer => {
            let cast = series
                .strict_cast(&DataType::Int64)
                .map_err(|e| coercion_error(String::new(), &e.to_string()))?;
            cast.i64()?.into_iter().collect()
        }
        DtypeCategory::Float => {
            let cast = series.cast(&DataType::Float64)?;
            cast.f64()?
                .into_iter()
                .map(|opt| match opt {
                    Some(v) => float_to_integer(v)
                        .map(Some)
                        .ok_or_else(|| coercion_error(v.to_string(), "not an integral number")),
                    None => Ok(None),
                })
                .collect::<Result<_>>()?
        }
        DtypeCategory::String => series
            .str()?
            .into_iter()
            .map(|opt| match opt {
                Some(text) => parse_integer_string(text)
                    .map(Some)
                    .ok_or_else(|| coercion_error(text.to_string(), "not an integer")),
                None => Ok(None),
            })
            .collect::<Result<_>>()?,
        DtypeCategory::Boolean | DtypeCategory::Other => {
            return Err(coercion_error(
                format!("{:?}", series.dtype()),
                "unsupported column type",
            ));
        }
    };

    if non_negative
        && let Some(negative) = values.iter().flatten().find(|v| **v < 0)
    {
        return Err(coercion_error(negative.to_string(), "negative value"));
    }

    Ok(Series::new(series.name().clone(), values))
}
