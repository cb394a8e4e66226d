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

//! Materialized-view query rewriting.
//!
//! Given a logical plan and a [`ViewCatalog`] of materialized views, the
//! [`Rewriter`] decides whether the query can be answered from a view —
//! possibly with a compensating filter, projection or aggregation on top
//! — and, if so, redirects the plan at the view's table.
//!
//! The engine is an algebra of containment checks: predicate containment
//! over equalities, canonical ranges and residuals; projection
//! containment over the view's output; and aggregate roll-up when the
//! query groups coarser than the view. Each check is a matcher paired
//! with the rewriter that re-applies its compensation, driven in a fixed
//! order by the [`pipeline::RewritePipeline`]. Rejections are typed
//! [`RewriteFailure`] values, logged and returned as data rather than
//! raised.

pub mod catalog;
pub mod component;
pub mod failure;
pub mod matchers;
pub mod pipeline;
pub mod range_condition;
pub mod rewriter;
pub mod rewriters;
pub mod rules;

pub use catalog::ViewCatalog;
pub use component::{ProcessedComponent, RewriteContext};
pub use failure::{MatchOutcome, RewriteFailure};
pub use range_condition::RangeCondition;
pub use rewriter::Rewriter;
pub use rules::{AggregateWithoutJoinRule, RewriteRule, WithoutJoinGroupRule};
