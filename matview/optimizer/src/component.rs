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

//! The per-candidate working set matchers read and rewriters edit around.

use indexmap::IndexMap;
use matview_common::{Column, MatviewError, Result};
use matview_expr::utils::{extract_table_names, split_conjunctive_predicates};
use matview_expr::{Aggregate, Expr, LogicalPlan, Projection};

/// The query and view fragments a pipeline run works from, split once per
/// candidate. Matchers only read this; rewriters read it and edit the
/// evolving plan.
#[derive(Debug, Clone, Default)]
pub struct ProcessedComponent {
    /// Conjuncts of the query's filter.
    pub query_predicates: Vec<Expr>,
    /// Conjuncts of the view definition's filter.
    pub view_predicates: Vec<Expr>,
    /// The query's non-aggregate result expressions: the projection list,
    /// or the grouping list when the query aggregates.
    pub query_project: Vec<Expr>,
    /// The view definition's first-level result expressions.
    pub view_project: Vec<Expr>,
    /// The query's grouping expressions, when it aggregates.
    pub query_grouping: Vec<Expr>,
    /// The view definition's grouping expressions.
    pub view_grouping: Vec<Expr>,
    /// The query's aggregate call expressions.
    pub query_aggregates: Vec<Expr>,
    /// The view definition's aggregate call expressions.
    pub view_aggregates: Vec<Expr>,
    /// Join conditions observed in the query.
    pub query_joins: Vec<Expr>,
    /// Join conditions observed in the view definition.
    pub view_joins: Vec<Expr>,
    /// Base tables scanned by the query.
    pub query_tables: Vec<String>,
    /// Base tables scanned by the view definition.
    pub view_tables: Vec<String>,
}

fn collect_joins(plan: &LogicalPlan, joins: &mut Vec<Expr>) {
    if let LogicalPlan::Join(join) = plan {
        joins.push(join.on.clone());
    }
    for input in plan.inputs() {
        collect_joins(input, joins);
    }
}

fn find_aggregate(plan: &LogicalPlan) -> Option<&Aggregate> {
    match plan {
        LogicalPlan::Aggregate(aggregate) => Some(aggregate),
        _ => plan.inputs().iter().find_map(|i| find_aggregate(i)),
    }
}

fn first_level_exprs(plan: &LogicalPlan) -> Vec<Expr> {
    match plan {
        LogicalPlan::Projection(Projection { expr, .. }) => expr.clone(),
        LogicalPlan::Aggregate(Aggregate {
            group_expr,
            aggr_expr,
            ..
        }) => group_expr.iter().chain(aggr_expr.iter()).cloned().collect(),
        _ => plan
            .output()
            .into_iter()
            .map(Expr::Column)
            .collect(),
    }
}

impl ProcessedComponent {
    /// Split the query plan and the candidate's definition plan into the
    /// fragments the matchers consume.
    pub fn populate(query: &LogicalPlan, view_definition: &LogicalPlan) -> Self {
        let mut component = ProcessedComponent {
            query_predicates: split_conjunctive_predicates(query),
            view_predicates: split_conjunctive_predicates(view_definition),
            view_project: first_level_exprs(view_definition),
            query_tables: extract_table_names(query),
            view_tables: extract_table_names(view_definition),
            ..Default::default()
        };
        collect_joins(query, &mut component.query_joins);
        collect_joins(view_definition, &mut component.view_joins);
        match find_aggregate(query) {
            Some(aggregate) => {
                component.query_grouping = aggregate.group_expr.clone();
                component.query_aggregates = aggregate.aggr_expr.clone();
                // the grouping list doubles as the non-aggregate output
                component.query_project = aggregate.group_expr.clone();
            }
            None => component.query_project = first_level_exprs(query),
        }
        if let Some(aggregate) = find_aggregate(view_definition) {
            component.view_grouping = aggregate.group_expr.clone();
            component.view_aggregates = aggregate.aggr_expr.clone();
        }
        component
    }
}

/// Shared state for one pipeline run over one candidate view. Not to be
/// shared between concurrent rewrites.
#[derive(Debug, Clone)]
pub struct RewriteContext {
    /// Name the candidate is registered under.
    pub view_name: String,
    /// The `CREATE MATERIALIZED VIEW AS …` plan.
    pub view_definition: LogicalPlan,
    /// A scan of the persisted view rows.
    pub view_table_plan: LogicalPlan,
    /// The split fragments of both sides.
    pub component: ProcessedComponent,
    /// Substitutions performed so far, query column name to view column.
    pub replaced: IndexMap<String, Column>,
}

impl RewriteContext {
    pub fn new(
        view_name: impl Into<String>,
        view_definition: LogicalPlan,
        view_table_plan: LogicalPlan,
        component: ProcessedComponent,
    ) -> Self {
        Self {
            view_name: view_name.into(),
            view_definition,
            view_table_plan,
            component,
            replaced: IndexMap::new(),
        }
    }

    /// The view's first-level projected output, per its definition.
    pub fn view_output(&self) -> Vec<Column> {
        self.view_definition.output()
    }

    /// The column of the persisted view carrying `name`, if the view
    /// projects it.
    pub fn view_table_column(&self, name: &str) -> Option<Column> {
        self.view_table_plan
            .output()
            .into_iter()
            .find(|c| c.name == name)
    }

    /// Replace every column of `expr` with the persisted view's column of
    /// the same name, recording each substitution. Matchers have already
    /// verified the columns are projected, so a miss here is a bug.
    pub fn substitute(&mut self, expr: Expr) -> Result<Expr> {
        Ok(match expr {
            Expr::Column(column) => {
                let replacement =
                    self.view_table_column(&column.name).ok_or_else(|| {
                        MatviewError::Internal(format!(
                            "column {} is not produced by view {}",
                            column.flat_name(),
                            self.view_name
                        ))
                    })?;
                self.replaced
                    .insert(column.flat_name(), replacement.clone());
                Expr::Column(replacement)
            }
            Expr::Alias(expr, name) => {
                Expr::Alias(Box::new(self.substitute(*expr)?), name)
            }
            Expr::BinaryExpr { left, op, right } => Expr::BinaryExpr {
                left: Box::new(self.substitute(*left)?),
                op,
                right: Box::new(self.substitute(*right)?),
            },
            Expr::Cast { expr, data_type } => Expr::Cast {
                expr: Box::new(self.substitute(*expr)?),
                data_type,
            },
            Expr::AggregateFunction { fun, args } => Expr::AggregateFunction {
                fun,
                args: args
                    .into_iter()
                    .map(|a| self.substitute(a))
                    .collect::<Result<Vec<_>>>()?,
            },
            literal @ Expr::Literal(_) => literal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::{DataType, Field, Schema};
    use matview_expr::{col, count_star, lit, sum, LogicalPlanBuilder};
    use std::sync::Arc;

    fn scan_employees() -> LogicalPlanBuilder {
        let schema = Arc::new(Schema::new(vec![
            Field::new("dept", DataType::Utf8, false),
            Field::new("sal", DataType::Int64, true),
        ]));
        LogicalPlanBuilder::scan("e", schema).unwrap()
    }

    #[test]
    fn populate_splits_projection_query() -> Result<()> {
        let query = scan_employees()
            .filter(col("dept").eq(lit("eng")).and(col("sal").gt(lit(10i64))))?
            .project(vec![col("dept")])?
            .build()?;
        let view = scan_employees()
            .filter(col("sal").gt(lit(0i64)))?
            .project(vec![col("dept"), col("sal")])?
            .build()?;
        let component = ProcessedComponent::populate(&query, &view);
        assert_eq!(component.query_predicates.len(), 2);
        assert_eq!(component.view_predicates.len(), 1);
        assert_eq!(component.query_project.len(), 1);
        assert_eq!(component.view_project.len(), 2);
        assert!(component.query_aggregates.is_empty());
        assert_eq!(component.query_tables, vec!["e"]);
        assert_eq!(component.view_tables, vec!["e"]);
        Ok(())
    }

    #[test]
    fn populate_splits_aggregate_query() -> Result<()> {
        let query = scan_employees()
            .aggregate(vec![col("dept")], vec![count_star(), sum(col("sal"))])?
            .build()?;
        let view = scan_employees()
            .aggregate(
                vec![col("dept")],
                vec![count_star().alias("c"), sum(col("sal")).alias("s")],
            )?
            .build()?;
        let component = ProcessedComponent::populate(&query, &view);
        assert_eq!(component.query_grouping.len(), 1);
        assert_eq!(component.query_aggregates.len(), 2);
        assert_eq!(component.query_project.len(), 1);
        assert_eq!(component.view_aggregates.len(), 2);
        // the view's first-level output covers grouping and aggregates
        assert_eq!(component.view_project.len(), 3);
        Ok(())
    }

    #[test]
    fn substitute_records_replacements() -> Result<()> {
        let view_table = LogicalPlanBuilder::scan(
            "mv",
            Arc::new(Schema::new(vec![
                Field::new("dept", DataType::Utf8, false),
                Field::new("sal", DataType::Int64, true),
            ])),
        )?
        .build()?;
        let view_def = scan_employees()
            .project(vec![col("dept"), col("sal")])?
            .build()?;
        let mut cx = RewriteContext::new(
            "mv",
            view_def,
            view_table,
            ProcessedComponent::default(),
        );
        let rewritten =
            cx.substitute(col("dept").eq(lit("eng")))?;
        assert_eq!(format!("{rewritten}"), "#mv.dept = Utf8(\"eng\")");
        assert_eq!(cx.replaced.len(), 1);
        assert!(cx.substitute(col("bonus")).is_err());
        Ok(())
    }
}
