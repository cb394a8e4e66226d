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

//! Functions for creating logical expressions.

use crate::aggregate_function::AggregateFunction;
use crate::expr::Expr;
use arrow::datatypes::DataType;
use matview_common::{Column, ScalarValue};

/// Create an unresolved column reference, optionally qualified
/// (`"a"` or `"t.a"`). The reference is bound to a concrete column and
/// type when the enclosing plan node is built.
pub fn col(name: &str) -> Expr {
    match name.split_once('.') {
        Some((relation, name)) => {
            Expr::Column(Column::new(Some(relation), name, DataType::Null))
        }
        None => Expr::Column(Column::from_name(name, DataType::Null)),
    }
}

/// Create a literal expression.
pub fn lit(value: impl Into<ScalarValue>) -> Expr {
    Expr::Literal(value.into())
}

/// `AND` two expressions together.
pub fn and(left: Expr, right: Expr) -> Expr {
    left.and(right)
}

fn aggregate(fun: AggregateFunction, expr: Expr) -> Expr {
    Expr::AggregateFunction {
        fun,
        args: vec![expr],
    }
}

/// Create a `SUM` expression.
pub fn sum(expr: Expr) -> Expr {
    aggregate(AggregateFunction::Sum, expr)
}

/// Create a `COUNT` expression.
pub fn count(expr: Expr) -> Expr {
    aggregate(AggregateFunction::Count, expr)
}

/// Create a `COUNT(*)` expression, represented as `COUNT(1)` the way the
/// analyzer emits it.
pub fn count_star() -> Expr {
    aggregate(AggregateFunction::Count, lit(1i32))
}

/// Create an `AVG` expression.
pub fn avg(expr: Expr) -> Expr {
    aggregate(AggregateFunction::Avg, expr)
}

/// Create a `MIN` expression.
pub fn min(expr: Expr) -> Expr {
    aggregate(AggregateFunction::Min, expr)
}

/// Create a `MAX` expression.
pub fn max(expr: Expr) -> Expr {
    aggregate(AggregateFunction::Max, expr)
}
