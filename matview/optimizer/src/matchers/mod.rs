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

//! Matchers decide whether a candidate view can answer the query and
//! compute the compensation the paired rewriter must re-apply.

mod aggregate;
mod predicate;
mod project;
mod table;

pub use aggregate::AggMatcher;
pub use predicate::PredicateMatcher;
pub use project::ProjectMatcher;
pub use table::TableNonOpMatcher;

use crate::component::RewriteContext;
use crate::failure::MatchOutcome;
use matview_common::Result;

/// Decides one aspect of query/view containment.
///
/// A matcher only reads the context. The outer `Result` carries fatal
/// errors; the [`MatchOutcome`] carries the typed per-candidate verdict.
pub trait ViewMatcher {
    /// Name of the matcher, for logs.
    fn name(&self) -> &str;

    /// Check containment and compute compensation expressions.
    fn try_match(&self, cx: &RewriteContext) -> Result<MatchOutcome>;
}
