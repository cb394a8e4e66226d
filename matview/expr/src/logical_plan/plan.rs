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

//! Logical plan tree.

use crate::expr::Expr;
use arrow::datatypes::SchemaRef;
use matview_common::Column;
use std::fmt;
use std::sync::Arc;

/// Join type
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            JoinType::Inner => write!(f, "Inner"),
            JoinType::Left => write!(f, "Left"),
            JoinType::Right => write!(f, "Right"),
            JoinType::Full => write!(f, "Full"),
        }
    }
}

/// Evaluates an arbitrary list of expressions on its input
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// The list of expressions
    pub expr: Vec<Expr>,
    /// The incoming logical plan
    pub input: Arc<LogicalPlan>,
}

/// Filters rows from its input that do not satisfy the predicate
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// The boolean expression that determines which rows survive
    pub predicate: Expr,
    /// The incoming logical plan
    pub input: Arc<LogicalPlan>,
}

/// Aggregates its input based on a set of grouping and aggregate
/// expressions
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    /// Grouping expressions
    pub group_expr: Vec<Expr>,
    /// Aggregate expressions
    pub aggr_expr: Vec<Expr>,
    /// The incoming logical plan
    pub input: Arc<LogicalPlan>,
}

/// Produces rows from a table or materialized view
#[derive(Debug, Clone, PartialEq)]
pub struct TableScan {
    /// The name of the table
    pub table_name: String,
    /// The schema of the table
    pub schema: SchemaRef,
}

/// Join two logical plans on one or more join columns
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    /// Left input
    pub left: Arc<LogicalPlan>,
    /// Right input
    pub right: Arc<LogicalPlan>,
    /// Join type
    pub join_type: JoinType,
    /// Join condition
    pub on: Expr,
}

/// A logical plan is an immutable tree of relational operators.
#[derive(Clone, PartialEq)]
pub enum LogicalPlan {
    Projection(Projection),
    Filter(Filter),
    Aggregate(Aggregate),
    TableScan(TableScan),
    Join(Join),
}

impl LogicalPlan {
    /// The columns this plan node produces at its first level.
    pub fn output(&self) -> Vec<Column> {
        match self {
            LogicalPlan::Projection(Projection { expr, .. }) => {
                expr.iter().map(|e| e.to_output_column()).collect()
            }
            LogicalPlan::Filter(Filter { input, .. }) => input.output(),
            LogicalPlan::Aggregate(Aggregate {
                group_expr,
                aggr_expr,
                ..
            }) => group_expr
                .iter()
                .chain(aggr_expr.iter())
                .map(|e| e.to_output_column())
                .collect(),
            LogicalPlan::TableScan(TableScan { table_name, schema }) => schema
                .fields()
                .iter()
                .map(|f| {
                    Column::new(
                        Some(table_name.clone()),
                        f.name().clone(),
                        f.data_type().clone(),
                    )
                })
                .collect(),
            LogicalPlan::Join(Join { left, right, .. }) => {
                let mut out = left.output();
                out.extend(right.output());
                out
            }
        }
    }

    /// Direct children of this node.
    pub fn inputs(&self) -> Vec<&LogicalPlan> {
        match self {
            LogicalPlan::Projection(Projection { input, .. }) => vec![input.as_ref()],
            LogicalPlan::Filter(Filter { input, .. }) => vec![input.as_ref()],
            LogicalPlan::Aggregate(Aggregate { input, .. }) => vec![input.as_ref()],
            LogicalPlan::TableScan(_) => vec![],
            LogicalPlan::Join(Join { left, right, .. }) => {
                vec![left.as_ref(), right.as_ref()]
            }
        }
    }

    /// True when any node of the tree is a [`LogicalPlan::Join`].
    pub fn has_join(&self) -> bool {
        matches!(self, LogicalPlan::Join(_))
            || self.inputs().iter().any(|i| i.has_join())
    }

    /// True when any node of the tree is a [`LogicalPlan::Aggregate`].
    pub fn has_aggregate(&self) -> bool {
        matches!(self, LogicalPlan::Aggregate(_))
            || self.inputs().iter().any(|i| i.has_aggregate())
    }

    /// Apply `f` to each node top-down, rebuilding the tree. When `f`
    /// returns `Some(replacement)` the replacement subtree is used as-is
    /// and not visited again, so a rewrite cannot recurse into plan
    /// fragments it has just introduced.
    pub fn transform_down<F>(&self, f: &F) -> LogicalPlan
    where
        F: Fn(&LogicalPlan) -> Option<LogicalPlan>,
    {
        if let Some(replacement) = f(self) {
            return replacement;
        }
        match self {
            LogicalPlan::Projection(Projection { expr, input }) => {
                LogicalPlan::Projection(Projection {
                    expr: expr.clone(),
                    input: Arc::new(input.transform_down(f)),
                })
            }
            LogicalPlan::Filter(Filter { predicate, input }) => {
                LogicalPlan::Filter(Filter {
                    predicate: predicate.clone(),
                    input: Arc::new(input.transform_down(f)),
                })
            }
            LogicalPlan::Aggregate(Aggregate {
                group_expr,
                aggr_expr,
                input,
            }) => LogicalPlan::Aggregate(Aggregate {
                group_expr: group_expr.clone(),
                aggr_expr: aggr_expr.clone(),
                input: Arc::new(input.transform_down(f)),
            }),
            scan @ LogicalPlan::TableScan(_) => scan.clone(),
            LogicalPlan::Join(Join {
                left,
                right,
                join_type,
                on,
            }) => LogicalPlan::Join(Join {
                left: Arc::new(left.transform_down(f)),
                right: Arc::new(right.transform_down(f)),
                join_type: *join_type,
                on: on.clone(),
            }),
        }
    }

    /// Format the plan as an indented tree, one node per line.
    pub fn display_indent(&self) -> impl fmt::Display + '_ {
        struct Wrapper<'a>(&'a LogicalPlan);
        impl fmt::Display for Wrapper<'_> {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                fmt_plan(self.0, 0, f)
            }
        }
        Wrapper(self)
    }
}

fn fmt_exprs(exprs: &[Expr]) -> String {
    exprs
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn fmt_plan(plan: &LogicalPlan, indent: usize, f: &mut fmt::Formatter) -> fmt::Result {
    if indent > 0 {
        writeln!(f)?;
        write!(f, "{:indent$}", "", indent = indent * 2)?;
    }
    match plan {
        LogicalPlan::Projection(Projection { expr, .. }) => {
            write!(f, "Projection: {}", fmt_exprs(expr))?
        }
        LogicalPlan::Filter(Filter { predicate, .. }) => {
            write!(f, "Filter: {predicate}")?
        }
        LogicalPlan::Aggregate(Aggregate {
            group_expr,
            aggr_expr,
            ..
        }) => write!(
            f,
            "Aggregate: groupBy=[[{}]], aggr=[[{}]]",
            fmt_exprs(group_expr),
            fmt_exprs(aggr_expr)
        )?,
        LogicalPlan::TableScan(TableScan { table_name, .. }) => {
            write!(f, "TableScan: {table_name}")?
        }
        LogicalPlan::Join(Join { join_type, on, .. }) => {
            write!(f, "{join_type} Join: {on}")?
        }
    }
    for input in plan.inputs() {
        fmt_plan(input, indent + 1, f)?;
    }
    Ok(())
}

impl fmt::Debug for LogicalPlan {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.display_indent())
    }
}
