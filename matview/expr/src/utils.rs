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

//! Expression and plan utilities shared by the rewriter.

use crate::expr::Expr;
use crate::logical_plan::{Filter, LogicalPlan};
use crate::operator::Operator;
use matview_common::Column;
use std::collections::HashSet;

/// converts "A AND B AND C" => [A, B, C]
pub fn split_conjunction<'a>(predicate: &'a Expr, predicates: &mut Vec<&'a Expr>) {
    match predicate {
        Expr::BinaryExpr {
            right,
            op: Operator::And,
            left,
        } => {
            split_conjunction(left, predicates);
            split_conjunction(right, predicates);
        }
        Expr::Alias(expr, _) => {
            split_conjunction(expr, predicates);
        }
        other => predicates.push(other),
    }
}

/// The conjuncts of a plan's top-level filter, in source order. A plan
/// without a filter has no conjuncts.
pub fn split_conjunctive_predicates(plan: &LogicalPlan) -> Vec<Expr> {
    fn find_filter(plan: &LogicalPlan) -> Option<&Filter> {
        match plan {
            LogicalPlan::Filter(filter) => Some(filter),
            _ => plan.inputs().iter().find_map(|i| find_filter(i)),
        }
    }
    match find_filter(plan) {
        Some(filter) => {
            let mut conjuncts = vec![];
            split_conjunction(&filter.predicate, &mut conjuncts);
            conjuncts.into_iter().cloned().collect()
        }
        None => vec![],
    }
}

/// Combine `exprs` with `AND`, left-deep. `None` for an empty input.
pub fn conjunction(exprs: impl IntoIterator<Item = Expr>) -> Option<Expr> {
    exprs.into_iter().reduce(|acc, e| acc.and(e))
}

/// Collect every column referenced by `expr` into `accum`.
pub fn expr_to_columns(expr: &Expr, accum: &mut HashSet<Column>) {
    match expr {
        Expr::Column(c) => {
            accum.insert(c.clone());
        }
        Expr::Literal(_) => {}
        Expr::Alias(expr, _) => expr_to_columns(expr, accum),
        Expr::Cast { expr, .. } => expr_to_columns(expr, accum),
        Expr::BinaryExpr { left, right, .. } => {
            expr_to_columns(left, accum);
            expr_to_columns(right, accum);
        }
        Expr::AggregateFunction { args, .. } => {
            for arg in args {
                expr_to_columns(arg, accum);
            }
        }
    }
}

/// The names of the base tables scanned by `plan`, in plan order,
/// without duplicates.
pub fn extract_table_names(plan: &LogicalPlan) -> Vec<String> {
    fn collect(plan: &LogicalPlan, names: &mut Vec<String>) {
        if let LogicalPlan::TableScan(scan) = plan {
            if !names.contains(&scan.table_name) {
                names.push(scan.table_name.clone());
            }
        }
        for input in plan.inputs() {
            collect(input, names);
        }
    }
    let mut names = vec![];
    collect(plan, &mut names);
    names
}

/// True when some element of `haystack` is semantically equal to `needle`.
pub fn semantic_contains(haystack: &[Expr], needle: &Expr) -> bool {
    haystack.iter().any(|e| e.semantically_eq(needle))
}

/// True when every element of `a` semantically equals some element of `b`.
/// Unordered; duplicates on either side are not counted.
pub fn is_subset_of(a: &[Expr], b: &[Expr]) -> bool {
    a.iter().all(|e| semantic_contains(b, e))
}
