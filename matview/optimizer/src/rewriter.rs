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

//! The rewriter driver.

use crate::catalog::ViewCatalog;
use crate::rules::{AggregateWithoutJoinRule, RewriteRule, WithoutJoinGroupRule};
use log::debug;
use matview_common::Result;
use matview_expr::LogicalPlan;
use std::sync::Arc;

/// Runs the rewrite rules against a plan and commits the first rewrite.
///
/// Rewriting is pure in `(plan, catalog snapshot)`: a plan no rule can
/// answer from a view is returned verbatim, and a context is built fresh
/// per candidate, so one `Rewriter` may serve many threads.
pub struct Rewriter {
    rules: Vec<Arc<dyn RewriteRule + Send + Sync>>,
}

impl Rewriter {
    /// A rewriter with the standard rule set over `catalog`.
    pub fn new(catalog: Arc<ViewCatalog>) -> Self {
        Self {
            rules: vec![
                Arc::new(WithoutJoinGroupRule::new(catalog.clone())),
                Arc::new(AggregateWithoutJoinRule::new(catalog)),
            ],
        }
    }

    /// A rewriter with a custom rule set.
    pub fn with_rules(rules: Vec<Arc<dyn RewriteRule + Send + Sync>>) -> Self {
        Self { rules }
    }

    /// Rewrite `plan` to read from a materialized view where one rule
    /// commits, or return it unchanged.
    pub fn rewrite(&self, plan: &LogicalPlan) -> Result<LogicalPlan> {
        for rule in &self.rules {
            if let Some(rewritten) = rule.try_rewrite(plan)? {
                debug!("plan rewritten by rule {}", rule.name());
                return Ok(rewritten);
            }
        }
        Ok(plan.clone())
    }
}
