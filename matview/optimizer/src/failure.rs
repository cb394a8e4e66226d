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

//! Typed reasons for rejecting a rewrite candidate.

use std::fmt;

/// Why a candidate view cannot answer the query.
///
/// These are data, not errors: a failure aborts only the candidate under
/// consideration, and the caller decides whether to try the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RewriteFailure {
    /// The view has more conjunctive predicates than the query.
    PredicateUnmatch,
    /// A view equality predicate has no counterpart in the query.
    PredicateEqualsUnmatch,
    /// A view range predicate is not implied by the query's ranges.
    PredicateRangeUnmatch,
    /// A view residual predicate has no counterpart in the query.
    PredicateResidualUnmatch,
    /// A compensation predicate references a column the view does not
    /// project.
    PredicateColumnsNotInView,
    /// The query projection references a column the view does not project.
    ProjectUnmatch,
    /// The query groups by more expressions than the view.
    GroupBySizeUnmatch,
    /// A query grouping expression is not part of the view's grouping.
    GroupByColumnsNotInView,
    /// The query counts rows but the view keeps no `COUNT(*)`.
    AggNumberUnmatch,
    /// A query aggregate has no matching view aggregate.
    AggColumnsUnmatch,
    /// An `AVG` roll-up needs a `COUNT(*)` aggregate in the view.
    AggViewMissingCountStar,
    /// A join was observed in the query or the view definition.
    JoinUnmatch,
}

impl fmt::Display for RewriteFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let message = match self {
            RewriteFailure::PredicateUnmatch => {
                "view has more conjunctive predicates than the query"
            }
            RewriteFailure::PredicateEqualsUnmatch => {
                "view equality predicates are not contained in the query's"
            }
            RewriteFailure::PredicateRangeUnmatch => {
                "view range predicates are not all implied by the query's"
            }
            RewriteFailure::PredicateResidualUnmatch => {
                "view residual predicates are not contained in the query's"
            }
            RewriteFailure::PredicateColumnsNotInView => {
                "compensation predicate references a column the view does not project"
            }
            RewriteFailure::ProjectUnmatch => {
                "query projection references a column the view does not project"
            }
            RewriteFailure::GroupBySizeUnmatch => {
                "query groups by more expressions than the view"
            }
            RewriteFailure::GroupByColumnsNotInView => {
                "query grouping expression is not part of the view's grouping"
            }
            RewriteFailure::AggNumberUnmatch => {
                "query counts rows but the view has no COUNT(*) aggregate"
            }
            RewriteFailure::AggColumnsUnmatch => {
                "query aggregate has no matching view aggregate"
            }
            RewriteFailure::AggViewMissingCountStar => {
                "AVG roll-up requires a COUNT(*) aggregate in the view"
            }
            RewriteFailure::JoinUnmatch => {
                "joins are not supported in rewrite candidates"
            }
        };
        write!(f, "{message}")
    }
}

/// The outcome of a matcher: the compensation expressions the paired
/// rewriter must re-apply above the view, or the typed reason the
/// candidate is rejected.
pub type MatchOutcome = std::result::Result<Vec<matview_expr::Expr>, RewriteFailure>;
