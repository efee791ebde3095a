// Copyright 2024 Branchval Contributors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Display;
use std::fmt::Formatter;

use crate::error::Error;
use crate::error::Result;

/// A runtime SQL value as handed over by the executor with an INSERT or
/// DDL statement.
///
/// Only the variants the AUTO_INCREMENT path can receive are represented.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// SQL NULL.
    Null,
    /// A signed integer.
    Int(i64),
    /// An unsigned integer.
    Uint(u64),
    /// A 32-bit float.
    Float32(f32),
    /// A 64-bit float.
    Float64(f64),
    /// A boolean.
    Bool(bool),
    /// A string, converted by numeric parse.
    Text(String),
}

impl Display for SqlValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Int(v) => write!(f, "{v}"),
            SqlValue::Uint(v) => write!(f, "{v}"),
            SqlValue::Float32(v) => write!(f, "{v}"),
            SqlValue::Float64(v) => write!(f, "{v}"),
            SqlValue::Bool(v) => write!(f, "{v}"),
            SqlValue::Text(v) => write!(f, "{v:?}"),
        }
    }
}

/// Converts a runtime value into an AUTO_INCREMENT sequence value.
///
/// Floats are rounded half away from zero before conversion. NULL and zero
/// both map to 0, the sentinel for "no user value supplied". Negative,
/// non-finite and unparseable inputs are [`Error::Coercion`].
pub fn coerce_auto_increment_value(val: &SqlValue) -> Result<u64> {
    match val {
        SqlValue::Null => Ok(0),
        SqlValue::Int(v) => {
            if *v < 0 {
                Err(Error::Coercion(val.to_string()))
            } else {
                Ok(*v as u64)
            }
        }
        SqlValue::Uint(v) => Ok(*v),
        SqlValue::Float32(v) => rounded_to_u64(f64::from(*v)),
        SqlValue::Float64(v) => rounded_to_u64(*v),
        SqlValue::Bool(v) => Ok(u64::from(*v)),
        SqlValue::Text(s) => {
            let trimmed = s.trim();
            if let Ok(v) = trimmed.parse::<u64>() {
                return Ok(v);
            }
            match trimmed.parse::<f64>() {
                Ok(v) => rounded_to_u64(v),
                Err(_) => Err(Error::Coercion(val.to_string())),
            }
        }
    }
}

// u64::MAX as f64 rounds up to 2^64, which would wrap on an `as` cast.
const U64_BOUND: f64 = 18_446_744_073_709_551_616.0;

fn rounded_to_u64(v: f64) -> Result<u64> {
    // f64::round rounds half away from zero.
    let rounded = v.round();
    if !rounded.is_finite() || rounded < 0.0 || rounded >= U64_BOUND {
        return Err(Error::Coercion(format!("{v}")));
    }
    Ok(rounded as u64)
}
