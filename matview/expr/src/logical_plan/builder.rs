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

//! Builder for logical plans.

use crate::expr::Expr;
use crate::logical_plan::plan::{
    Aggregate, Filter, Join, JoinType, LogicalPlan, Projection, TableScan,
};
use arrow::datatypes::{DataType, SchemaRef};
use matview_common::{Column, MatviewError, Result};
use std::sync::Arc;

/// Builder for logical plans, resolving column references against the
/// output of the plan built so far.
///
/// ```
/// # use std::sync::Arc;
/// # use arrow::datatypes::{DataType, Field, Schema};
/// # use matview_expr::{col, lit, LogicalPlanBuilder};
/// # fn main() -> matview_common::Result<()> {
/// let schema = Arc::new(Schema::new(vec![
///     Field::new("a", DataType::Int32, false),
///     Field::new("b", DataType::Utf8, false),
/// ]));
/// let plan = LogicalPlanBuilder::scan("t", schema)?
///     .filter(col("a").gt(lit(1i32)))?
///     .project(vec![col("a"), col("b")])?
///     .build()?;
/// assert_eq!(
///     format!("{plan:?}"),
///     "Projection: #t.a, #t.b\
///     \n  Filter: #t.a > Int32(1)\
///     \n    TableScan: t"
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LogicalPlanBuilder {
    plan: LogicalPlan,
}

impl LogicalPlanBuilder {
    /// Create a builder from an existing plan.
    pub fn from(plan: LogicalPlan) -> Self {
        Self { plan }
    }

    /// Scan a table.
    pub fn scan(table_name: impl Into<String>, schema: SchemaRef) -> Result<Self> {
        let table_name = table_name.into();
        if table_name.is_empty() {
            return Err(MatviewError::Plan(
                "table_name cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            plan: LogicalPlan::TableScan(TableScan { table_name, schema }),
        })
    }

    /// Apply a filter.
    pub fn filter(self, predicate: Expr) -> Result<Self> {
        let predicate = normalize_expr(predicate, &self.plan.output())?;
        Ok(Self {
            plan: LogicalPlan::Filter(Filter {
                predicate,
                input: Arc::new(self.plan),
            }),
        })
    }

    /// Apply a projection.
    pub fn project(self, expr: Vec<Expr>) -> Result<Self> {
        let output = self.plan.output();
        let expr = expr
            .into_iter()
            .map(|e| normalize_expr(e, &output))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            plan: LogicalPlan::Projection(Projection {
                expr,
                input: Arc::new(self.plan),
            }),
        })
    }

    /// Apply an aggregation.
    pub fn aggregate(self, group_expr: Vec<Expr>, aggr_expr: Vec<Expr>) -> Result<Self> {
        let output = self.plan.output();
        let group_expr = group_expr
            .into_iter()
            .map(|e| normalize_expr(e, &output))
            .collect::<Result<Vec<_>>>()?;
        let aggr_expr = aggr_expr
            .into_iter()
            .map(|e| normalize_expr(e, &output))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            plan: LogicalPlan::Aggregate(Aggregate {
                group_expr,
                aggr_expr,
                input: Arc::new(self.plan),
            }),
        })
    }

    /// Join with another plan.
    pub fn join(self, right: LogicalPlan, join_type: JoinType, on: Expr) -> Result<Self> {
        let mut output = self.plan.output();
        output.extend(right.output());
        let on = normalize_expr(on, &output)?;
        Ok(Self {
            plan: LogicalPlan::Join(Join {
                left: Arc::new(self.plan),
                right: Arc::new(right),
                join_type,
                on,
            }),
        })
    }

    /// Build the plan.
    pub fn build(self) -> Result<LogicalPlan> {
        Ok(self.plan)
    }
}

/// Bind every unresolved column reference in `expr` to a column of
/// `outputs`, filling in the qualifier and data type.
fn normalize_expr(expr: Expr, outputs: &[Column]) -> Result<Expr> {
    Ok(match expr {
        Expr::Column(c) => Expr::Column(resolve_column(c, outputs)?),
        Expr::Alias(expr, name) => {
            Expr::Alias(Box::new(normalize_expr(*expr, outputs)?), name)
        }
        Expr::BinaryExpr { left, op, right } => Expr::BinaryExpr {
            left: Box::new(normalize_expr(*left, outputs)?),
            op,
            right: Box::new(normalize_expr(*right, outputs)?),
        },
        Expr::Cast { expr, data_type } => Expr::Cast {
            expr: Box::new(normalize_expr(*expr, outputs)?),
            data_type,
        },
        Expr::AggregateFunction { fun, args } => Expr::AggregateFunction {
            fun,
            args: args
                .into_iter()
                .map(|a| normalize_expr(a, outputs))
                .collect::<Result<Vec<_>>>()?,
        },
        literal @ Expr::Literal(_) => literal,
    })
}

fn resolve_column(column: Column, outputs: &[Column]) -> Result<Column> {
    // already bound by an earlier normalization
    if column.data_type != DataType::Null {
        return Ok(column);
    }
    let mut matches = outputs.iter().filter(|o| {
        o.name == column.name
            && column
                .relation
                .as_ref()
                .map(|r| o.relation.as_deref() == Some(r.as_str()))
                .unwrap_or(true)
    });
    match (matches.next(), matches.next()) {
        (Some(found), None) => Ok(found.clone()),
        (Some(_), Some(_)) => Err(MatviewError::Plan(format!(
            "reference '{}' is ambiguous",
            column.flat_name()
        ))),
        (None, _) => Err(MatviewError::Plan(format!(
            "no field named '{}'",
            column.flat_name()
        ))),
    }
}
