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

//! The match-and-compensate pipeline.

use crate::component::RewriteContext;
use crate::failure::RewriteFailure;
use crate::matchers::{
    AggMatcher, PredicateMatcher, ProjectMatcher, TableNonOpMatcher, ViewMatcher,
};
use crate::rewriters::{
    GroupByRewrite, PredicateRewrite, ProjectRewrite, TableOrViewRewrite, ViewRewriter,
};
use log::trace;
use matview_common::Result;
use matview_expr::LogicalPlan;

/// A matcher paired with the rewriter that consumes its compensation.
pub struct Stage {
    pub matcher: Box<dyn ViewMatcher + Send + Sync>,
    pub rewriter: Box<dyn ViewRewriter + Send + Sync>,
}

impl Stage {
    pub fn new(
        matcher: impl ViewMatcher + Send + Sync + 'static,
        rewriter: impl ViewRewriter + Send + Sync + 'static,
    ) -> Self {
        Self {
            matcher: Box::new(matcher),
            rewriter: Box::new(rewriter),
        }
    }
}

/// Where a pipeline run ended up: the evolving plan, and whether a stage
/// stopped the run with a typed failure.
#[derive(Debug)]
pub struct PipelineState {
    /// The rewritten plan, or the untouched original when stopped.
    pub plan: LogicalPlan,
    /// Set when a matcher rejected the candidate.
    pub stopped: bool,
    /// The rejecting matcher's reason.
    pub failure: Option<RewriteFailure>,
}

/// Runs the stages in order, feeding each matcher's compensation to its
/// rewriter, short-circuiting on the first failure. Stage `i` always
/// observes the context and plan produced by stage `i - 1`.
pub struct RewritePipeline {
    stages: Vec<Stage>,
}

impl RewritePipeline {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    /// Predicate → Project → Table, for queries without aggregation.
    pub fn without_aggregate() -> Self {
        Self::new(vec![
            Stage::new(PredicateMatcher, PredicateRewrite),
            Stage::new(ProjectMatcher, ProjectRewrite),
            Stage::new(TableNonOpMatcher, TableOrViewRewrite),
        ])
    }

    /// Predicate → Project → GroupBy → Table, for aggregating queries.
    pub fn with_aggregate() -> Self {
        Self::new(vec![
            Stage::new(PredicateMatcher, PredicateRewrite),
            Stage::new(ProjectMatcher, ProjectRewrite),
            Stage::new(AggMatcher, GroupByRewrite),
            Stage::new(TableNonOpMatcher, TableOrViewRewrite),
        ])
    }

    /// Drive all stages over one candidate. A stopped state carries the
    /// original plan unchanged.
    pub fn run(
        &self,
        plan: &LogicalPlan,
        cx: &mut RewriteContext,
    ) -> Result<PipelineState> {
        let mut state = PipelineState {
            plan: plan.clone(),
            stopped: false,
            failure: None,
        };
        for stage in &self.stages {
            match stage.matcher.try_match(cx)? {
                Ok(compensation) => {
                    trace!(
                        "stage {} matched view {} with {} compensation expression(s)",
                        stage.matcher.name(),
                        cx.view_name,
                        compensation.len()
                    );
                    state.plan = stage.rewriter.rewrite(state.plan, compensation, cx)?;
                }
                Err(failure) => {
                    state.plan = plan.clone();
                    state.stopped = true;
                    state.failure = Some(failure);
                    return Ok(state);
                }
            }
        }
        Ok(state)
    }
}
