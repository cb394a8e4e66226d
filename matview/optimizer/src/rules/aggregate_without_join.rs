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

//! Rewrite rule for aggregating queries.

use crate::catalog::ViewCatalog;
use crate::pipeline::RewritePipeline;
use crate::rules::{is_filter_over_scan, try_candidates, RewriteRule};
use matview_common::Result;
use matview_expr::LogicalPlan;
use std::sync::Arc;

/// Answers `Aggregate` over optional `Filter` over a single scan —
/// optionally under a `Projection` — from a grouping view, rolling the
/// view's partial aggregates up to the query's coarser grouping.
pub struct AggregateWithoutJoinRule {
    catalog: Arc<ViewCatalog>,
    pipeline: RewritePipeline,
}

impl AggregateWithoutJoinRule {
    pub fn new(catalog: Arc<ViewCatalog>) -> Self {
        Self {
            catalog,
            pipeline: RewritePipeline::with_aggregate(),
        }
    }
}

fn is_aggregate_over_scan(plan: &LogicalPlan) -> bool {
    matches!(plan, LogicalPlan::Aggregate(aggregate)
        if is_filter_over_scan(aggregate.input.as_ref()))
}

fn applies(plan: &LogicalPlan) -> bool {
    match plan {
        LogicalPlan::Projection(projection) => {
            is_aggregate_over_scan(projection.input.as_ref())
        }
        _ => is_aggregate_over_scan(plan),
    }
}

impl RewriteRule for AggregateWithoutJoinRule {
    fn try_rewrite(&self, plan: &LogicalPlan) -> Result<Option<LogicalPlan>> {
        if !applies(plan) {
            return Ok(None);
        }
        try_candidates(
            &self.catalog,
            plan,
            &self.pipeline,
            self.name(),
            is_aggregate_over_scan,
        )
    }

    fn name(&self) -> &str {
        "aggregate_without_join"
    }
}
