// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Scalar literal values.

use crate::error::{MatviewError, Result};
use arrow::datatypes::DataType;
use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::fmt;

/// A single scalar literal value.
///
/// Float payloads are wrapped in [`OrderedFloat`] so expressions holding
/// literals can derive `Eq` and `Hash`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarValue {
    Int16(Option<i16>),
    Int32(Option<i32>),
    Int64(Option<i64>),
    Float32(Option<OrderedFloat<f32>>),
    Float64(Option<OrderedFloat<f64>>),
    Utf8(Option<String>),
}

impl ScalarValue {
    pub fn data_type(&self) -> DataType {
        match self {
            ScalarValue::Int16(_) => DataType::Int16,
            ScalarValue::Int32(_) => DataType::Int32,
            ScalarValue::Int64(_) => DataType::Int64,
            ScalarValue::Float32(_) => DataType::Float32,
            ScalarValue::Float64(_) => DataType::Float64,
            ScalarValue::Utf8(_) => DataType::Utf8,
        }
    }

    pub fn is_null(&self) -> bool {
        match self {
            ScalarValue::Int16(v) => v.is_none(),
            ScalarValue::Int32(v) => v.is_none(),
            ScalarValue::Int64(v) => v.is_none(),
            ScalarValue::Float32(v) => v.is_none(),
            ScalarValue::Float64(v) => v.is_none(),
            ScalarValue::Utf8(v) => v.is_none(),
        }
    }

    fn numeric(&self) -> Option<f64> {
        match self {
            ScalarValue::Int16(Some(v)) => Some(*v as f64),
            ScalarValue::Int32(Some(v)) => Some(*v as f64),
            ScalarValue::Int64(Some(v)) => Some(*v as f64),
            ScalarValue::Float32(Some(v)) => Some(v.into_inner() as f64),
            ScalarValue::Float64(Some(v)) => Some(v.into_inner()),
            _ => None,
        }
    }

    fn integer(&self) -> Option<i64> {
        match self {
            ScalarValue::Int16(Some(v)) => Some(*v as i64),
            ScalarValue::Int32(Some(v)) => Some(*v as i64),
            ScalarValue::Int64(Some(v)) => Some(*v),
            _ => None,
        }
    }

    fn is_numeric_type(&self) -> bool {
        !matches!(self, ScalarValue::Utf8(_))
    }

    /// Order two literals for the range algebra: numerics compare by value
    /// across widths, strings lexicographically. Any other pairing (and any
    /// null) is an error.
    pub fn partial_cmp_values(&self, other: &ScalarValue) -> Result<Ordering> {
        if self.is_null() || other.is_null() {
            return Err(MatviewError::Internal(
                "cannot order a null literal in a range comparison".to_string(),
            ));
        }
        match (self, other) {
            (ScalarValue::Utf8(Some(l)), ScalarValue::Utf8(Some(r))) => Ok(l.cmp(r)),
            (l, r) if l.is_numeric_type() && r.is_numeric_type() => {
                if let (Some(l), Some(r)) = (l.integer(), r.integer()) {
                    return Ok(l.cmp(&r));
                }
                // at least one side is a float, compare widened
                let (l, r) = (l.numeric().unwrap(), r.numeric().unwrap());
                l.partial_cmp(&r).ok_or_else(|| {
                    MatviewError::Internal(format!(
                        "incomparable float literals {l} and {r}"
                    ))
                })
            }
            (l, r) => Err(MatviewError::UnsupportedRangeType(format!(
                "{:?} vs {:?}",
                l.data_type(),
                r.data_type()
            ))),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fn fmt_option<T: fmt::Display>(
            f: &mut fmt::Formatter,
            name: &str,
            v: &Option<T>,
        ) -> fmt::Result {
            match v {
                Some(v) => write!(f, "{name}({v})"),
                None => write!(f, "{name}(NULL)"),
            }
        }
        match self {
            ScalarValue::Int16(v) => fmt_option(f, "Int16", v),
            ScalarValue::Int32(v) => fmt_option(f, "Int32", v),
            ScalarValue::Int64(v) => fmt_option(f, "Int64", v),
            ScalarValue::Float32(v) => fmt_option(f, "Float32", v),
            ScalarValue::Float64(v) => fmt_option(f, "Float64", v),
            ScalarValue::Utf8(v) => match v {
                Some(v) => write!(f, "Utf8(\"{v}\")"),
                None => write!(f, "Utf8(NULL)"),
            },
        }
    }
}

impl From<i16> for ScalarValue {
    fn from(value: i16) -> Self {
        ScalarValue::Int16(Some(value))
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        ScalarValue::Int32(Some(value))
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Int64(Some(value))
    }
}

impl From<f32> for ScalarValue {
    fn from(value: f32) -> Self {
        ScalarValue::Float32(Some(OrderedFloat(value)))
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Float64(Some(OrderedFloat(value)))
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Utf8(Some(value.to_string()))
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::Utf8(Some(value))
    }
}
