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

//! Grouping and aggregate equivalence, with roll-up compensation.

use crate::component::RewriteContext;
use crate::failure::{MatchOutcome, RewriteFailure};
use crate::matchers::ViewMatcher;
use matview_common::{Column, MatviewError, Result};
use matview_expr::utils::semantic_contains;
use matview_expr::{sum, AggregateFunction, Expr};

/// Checks that the query's grouping is no finer than the view's and
/// rewrites each query aggregate into a roll-up over the view's
/// pre-aggregated columns. The rewritten aggregate list is the
/// compensation.
///
/// Because the query may group coarser than the view, every aggregate is
/// re-aggregated: `COUNT` becomes a `SUM` of the view's partial counts,
/// `AVG(k)` becomes `SUM(s_k) / SUM(c)` over the view's `SUM(k)` and
/// `COUNT(*)` columns, and the decomposable aggregates re-apply
/// themselves over the matching view column.
pub struct AggMatcher;

fn as_aggregate(expr: &Expr) -> Option<(AggregateFunction, &[Expr])> {
    match expr.unwrap_cosmetic() {
        Expr::AggregateFunction { fun, args } => Some((*fun, args.as_slice())),
        _ => None,
    }
}

/// `COUNT(*)` reaches the engine as `COUNT` of a literal.
fn is_count_star(expr: &Expr) -> bool {
    matches!(
        as_aggregate(expr),
        Some((AggregateFunction::Count, [Expr::Literal(_)]))
    )
}

fn find_matching<'a>(view_aggregates: &'a [Expr], needle: &Expr) -> Option<&'a Expr> {
    view_aggregates
        .iter()
        .find(|candidate| candidate.semantically_eq(needle))
}

/// The persisted view column holding the given view aggregate's result.
fn view_column(cx: &RewriteContext, view_aggregate: &Expr) -> Result<Column> {
    let name = view_aggregate.name();
    cx.view_table_column(&name).ok_or_else(|| {
        MatviewError::Internal(format!(
            "aggregate output {name} is not a column of view {}",
            cx.view_name
        ))
    })
}

impl ViewMatcher for AggMatcher {
    fn name(&self) -> &str {
        "aggregate"
    }

    fn try_match(&self, cx: &RewriteContext) -> Result<MatchOutcome> {
        let component = &cx.component;

        if component.query_grouping.len() > component.view_grouping.len() {
            return Ok(Err(RewriteFailure::GroupBySizeUnmatch));
        }
        for grouping in &component.query_grouping {
            if !semantic_contains(&component.view_grouping, grouping) {
                return Ok(Err(RewriteFailure::GroupByColumnsNotInView));
            }
        }

        let view_count_star = component
            .view_aggregates
            .iter()
            .find(|aggregate| is_count_star(aggregate));
        let query_counts_rows = component
            .query_aggregates
            .iter()
            .any(is_count_star);
        if query_counts_rows && view_count_star.is_none() {
            return Ok(Err(RewriteFailure::AggNumberUnmatch));
        }

        let mut compensation = Vec::with_capacity(component.query_aggregates.len());
        for aggregate in &component.query_aggregates {
            let output_name = aggregate.name();
            let Some((fun, args)) = as_aggregate(aggregate) else {
                return Ok(Err(RewriteFailure::AggColumnsUnmatch));
            };
            let rolled_up = if is_count_star(aggregate) {
                // checked above, so the view's counter exists
                let count = view_column(cx, view_count_star.unwrap())?;
                sum(Expr::Column(count))
            } else {
                match fun {
                    AggregateFunction::Avg => {
                        let summed = Expr::AggregateFunction {
                            fun: AggregateFunction::Sum,
                            args: args.to_vec(),
                        };
                        let Some(view_sum) =
                            find_matching(&component.view_aggregates, &summed)
                        else {
                            return Ok(Err(RewriteFailure::AggColumnsUnmatch));
                        };
                        let Some(count_star) = view_count_star else {
                            return Ok(Err(RewriteFailure::AggViewMissingCountStar));
                        };
                        let summed = sum(Expr::Column(view_column(cx, view_sum)?));
                        let counted =
                            sum(Expr::Column(view_column(cx, count_star)?));
                        summed.div(counted)
                    }
                    AggregateFunction::Count => {
                        let Some(matched) =
                            find_matching(&component.view_aggregates, aggregate)
                        else {
                            return Ok(Err(RewriteFailure::AggColumnsUnmatch));
                        };
                        sum(Expr::Column(view_column(cx, matched)?))
                    }
                    _ => {
                        let Some(matched) =
                            find_matching(&component.view_aggregates, aggregate)
                        else {
                            return Ok(Err(RewriteFailure::AggColumnsUnmatch));
                        };
                        Expr::AggregateFunction {
                            fun,
                            args: vec![Expr::Column(view_column(cx, matched)?)],
                        }
                    }
                }
            };
            compensation.push(rolled_up.alias(output_name));
        }
        Ok(Ok(compensation))
    }
}
