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

//! Conjunctive predicate containment.

use crate::component::RewriteContext;
use crate::failure::{MatchOutcome, RewriteFailure};
use crate::matchers::ViewMatcher;
use crate::range_condition::{canonicalize, RangeCondition};
use itertools::{Either, Itertools};
use matview_common::{Column, Result};
use matview_expr::utils::{expr_to_columns, is_subset_of, semantic_contains};
use matview_expr::Expr;
use std::collections::HashSet;

/// Checks that the view's filter admits every row the query's filter
/// admits, and emits the query predicates the view does not already
/// enforce.
///
/// Conjuncts fall into three disjoint classes: equalities, ranges of a
/// key against a literal, and residuals (everything else). Each class is
/// contained separately.
pub struct PredicateMatcher;

fn partition(
    conjuncts: &[Expr],
) -> (Vec<Expr>, Vec<RangeCondition>, Vec<Expr>) {
    let (equals, rest): (Vec<_>, Vec<_>) =
        conjuncts.iter().partition_map(|conjunct| match conjunct {
            Expr::BinaryExpr { op, .. } if op.is_equality() => {
                Either::Left(conjunct.clone())
            }
            other => Either::Right(other.clone()),
        });
    let (ranges, residuals): (Vec<_>, Vec<_>) =
        rest.into_iter().partition_map(|conjunct| {
            match RangeCondition::try_from_expr(&conjunct) {
                Some(range) => Either::Left(range),
                None => Either::Right(conjunct),
            }
        });
    (equals, ranges, residuals)
}

fn columns_not_in(compensation: &[Expr], output: &[Column]) -> bool {
    let mut columns = HashSet::new();
    for expr in compensation {
        expr_to_columns(expr, &mut columns);
    }
    columns
        .iter()
        .any(|c| !output.iter().any(|o| o.same_column(c)))
}

impl ViewMatcher for PredicateMatcher {
    fn name(&self) -> &str {
        "predicate"
    }

    fn try_match(&self, cx: &RewriteContext) -> Result<MatchOutcome> {
        let query = &cx.component.query_predicates;
        let view = &cx.component.view_predicates;

        // quick reject: the view may not be stricter in raw conjunct count
        if view.len() > query.len() {
            return Ok(Err(RewriteFailure::PredicateUnmatch));
        }

        let (query_equals, query_ranges, query_residuals) = partition(query);
        let (view_equals, view_ranges, view_residuals) = partition(view);

        if !is_subset_of(&view_equals, &query_equals) {
            return Ok(Err(RewriteFailure::PredicateEqualsUnmatch));
        }
        let mut compensation: Vec<Expr> = query_equals
            .iter()
            .filter(|e| !semantic_contains(&view_equals, e))
            .cloned()
            .collect();

        let query_ranges = canonicalize(query_ranges)?;
        let view_ranges = canonicalize(view_ranges)?;
        if view_ranges.len() > query_ranges.len() {
            return Ok(Err(RewriteFailure::PredicateRangeUnmatch));
        }
        for view_range in &view_ranges {
            let mut contained = false;
            for query_range in &query_ranges {
                if query_range.is_sub_range(view_range)? {
                    contained = true;
                    break;
                }
            }
            if !contained {
                return Ok(Err(RewriteFailure::PredicateRangeUnmatch));
            }
        }
        // the view already enforces its own ranges; restating the query's
        // narrowing above it is redundant at worst
        for query_range in &query_ranges {
            compensation.extend(query_range.to_exprs());
        }

        if !is_subset_of(&view_residuals, &query_residuals) {
            return Ok(Err(RewriteFailure::PredicateResidualUnmatch));
        }
        compensation.extend(
            query_residuals
                .iter()
                .filter(|e| !semantic_contains(&view_residuals, e))
                .cloned(),
        );

        if columns_not_in(&compensation, &cx.view_output()) {
            return Ok(Err(RewriteFailure::PredicateColumnsNotInView));
        }
        Ok(Ok(compensation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ProcessedComponent;
    use arrow::datatypes::{DataType, Field, Schema};
    use matview_expr::{col, lit, LogicalPlanBuilder};
    use std::sync::Arc;

    fn context(query: Vec<Expr>, view: Vec<Expr>) -> RewriteContext {
        context_with_view_columns(query, view, &["a", "b", "c"])
    }

    fn context_with_view_columns(
        query_predicates: Vec<Expr>,
        view_predicates: Vec<Expr>,
        view_columns: &[&str],
    ) -> RewriteContext {
        let schema = Arc::new(Schema::new(vec![
            Field::new("a", DataType::Int32, false),
            Field::new("b", DataType::Utf8, false),
            Field::new("c", DataType::Int32, false),
        ]));
        let definition = LogicalPlanBuilder::scan("t", schema.clone())
            .unwrap()
            .project(view_columns.iter().map(|c| col(c)).collect())
            .unwrap()
            .build()
            .unwrap();
        let table = LogicalPlanBuilder::scan("mv", schema)
            .unwrap()
            .build()
            .unwrap();
        let component = ProcessedComponent {
            query_predicates,
            view_predicates,
            ..Default::default()
        };
        RewriteContext::new("mv", definition, table, component)
    }

    fn a() -> Expr {
        col("t.a")
    }

    fn run(cx: &RewriteContext) -> MatchOutcome {
        PredicateMatcher.try_match(cx).unwrap()
    }

    #[test]
    fn extra_query_equalities_become_compensation() {
        let cx = context(
            vec![a().eq(lit(1i32)), col("t.b").eq(lit("wow"))],
            vec![a().eq(lit(1i32))],
        );
        let compensation = run(&cx).unwrap();
        assert_eq!(compensation.len(), 1);
        assert_eq!(format!("{}", compensation[0]), "#t.b = Utf8(\"wow\")");
    }

    #[test]
    fn view_with_more_conjuncts_is_rejected() {
        let cx = context(
            vec![a().eq(lit(1i32))],
            vec![a().eq(lit(1i32)), col("t.b").eq(lit("x"))],
        );
        assert_eq!(run(&cx), Err(RewriteFailure::PredicateUnmatch));
    }

    #[test]
    fn view_equality_without_counterpart_is_rejected() {
        let cx = context(
            vec![a().eq(lit(1i32))],
            vec![a().eq(lit(2i32))],
        );
        assert_eq!(run(&cx), Err(RewriteFailure::PredicateEqualsUnmatch));
    }

    #[test]
    fn narrower_query_range_matches_and_is_restated() {
        let cx = context(
            vec![a().gt_eq(lit(3i32)), a().lt_eq(lit(7i32))],
            vec![a().gt(lit(1i32)), a().lt(lit(10i32))],
        );
        let compensation = run(&cx).unwrap();
        let rendered: Vec<String> =
            compensation.iter().map(|e| e.to_string()).collect();
        assert_eq!(rendered, vec!["#t.a >= Int32(3)", "#t.a <= Int32(7)"]);
    }

    #[test]
    fn wider_query_range_is_rejected() {
        let cx = context(
            vec![a().gt_eq(lit(3i32))],
            vec![a().gt_eq(lit(5i32))],
        );
        assert_eq!(run(&cx), Err(RewriteFailure::PredicateRangeUnmatch));
    }

    #[test]
    fn view_range_on_unfiltered_key_is_rejected() {
        let cx = context(
            vec![a().gt(lit(0i32)), a().lt(lit(10i32))],
            vec![a().gt(lit(0i32)), col("t.c").lt(lit(5i32))],
        );
        assert_eq!(run(&cx), Err(RewriteFailure::PredicateRangeUnmatch));
    }

    #[test]
    fn equality_on_range_key_does_not_satisfy_the_range() {
        // a = 5 is classified as an equality, not as the range [5, 5]
        let cx = context(
            vec![a().eq(lit(5i32))],
            vec![a().gt(lit(0i32))],
        );
        assert_eq!(run(&cx), Err(RewriteFailure::PredicateRangeUnmatch));
    }

    #[test]
    fn residuals_are_compared_exactly() {
        let b = || col("t.b");
        let cx = context(
            vec![a().gt(col("t.c")), b().not_eq(lit("x"))],
            vec![a().gt(col("t.c"))],
        );
        let compensation = run(&cx).unwrap();
        assert_eq!(compensation.len(), 1);
        assert_eq!(format!("{}", compensation[0]), "#t.b != Utf8(\"x\")");

        let unmatched = context(
            vec![a().gt(col("t.c"))],
            // logically equal but syntactically different: no match
            vec![col("t.c").lt(a())],
        );
        assert_eq!(
            run(&unmatched),
            Err(RewriteFailure::PredicateResidualUnmatch)
        );
    }

    #[test]
    fn compensation_columns_must_be_projected() {
        let cx = context_with_view_columns(
            vec![a().gt(lit(0i32)), col("t.b").eq(lit("x"))],
            vec![a().gt(lit(0i32))],
            &["a"],
        );
        assert_eq!(run(&cx), Err(RewriteFailure::PredicateColumnsNotInView));
    }

    #[test]
    fn equal_predicates_need_no_compensation() {
        let cx = context(
            vec![a().eq(lit(1i32))],
            vec![a().eq(lit(1i32))],
        );
        assert_eq!(run(&cx), Ok(vec![]));
    }
}
