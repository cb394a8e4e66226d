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

//! Rewrite rule for plain select-project queries.

use crate::catalog::ViewCatalog;
use crate::pipeline::RewritePipeline;
use crate::rules::{is_filter_over_scan, try_candidates, RewriteRule};
use matview_common::Result;
use matview_expr::LogicalPlan;
use std::sync::Arc;

/// Answers `Projection` over optional `Filter` over a single scan — no
/// join, no aggregate on either side — from a candidate view of the same
/// shape.
pub struct WithoutJoinGroupRule {
    catalog: Arc<ViewCatalog>,
    pipeline: RewritePipeline,
}

impl WithoutJoinGroupRule {
    pub fn new(catalog: Arc<ViewCatalog>) -> Self {
        Self {
            catalog,
            pipeline: RewritePipeline::without_aggregate(),
        }
    }
}

fn is_project_over_scan(plan: &LogicalPlan) -> bool {
    match plan {
        LogicalPlan::Projection(projection) => {
            is_filter_over_scan(projection.input.as_ref())
        }
        _ => false,
    }
}

impl RewriteRule for WithoutJoinGroupRule {
    fn try_rewrite(&self, plan: &LogicalPlan) -> Result<Option<LogicalPlan>> {
        if !is_project_over_scan(plan) {
            return Ok(None);
        }
        // an aggregated view collapses rows, so only plain select-project
        // definitions may answer here
        try_candidates(
            &self.catalog,
            plan,
            &self.pipeline,
            self.name(),
            is_project_over_scan,
        )
    }

    fn name(&self) -> &str {
        "without_join_group"
    }
}
