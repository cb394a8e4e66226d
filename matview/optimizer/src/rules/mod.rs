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

//! Top-level rewrite strategies.

mod aggregate_without_join;
mod without_join_group;

pub use aggregate_without_join::AggregateWithoutJoinRule;
pub use without_join_group::WithoutJoinGroupRule;

use crate::catalog::ViewCatalog;
use crate::component::{ProcessedComponent, RewriteContext};
use crate::pipeline::RewritePipeline;
use log::debug;
use matview_common::Result;
use matview_expr::utils::extract_table_names;
use matview_expr::LogicalPlan;

/// A strategy for answering a class of query plans from the catalog.
///
/// `Ok(None)` means the rule does not apply or no candidate committed;
/// the caller keeps the original plan.
pub trait RewriteRule {
    /// Attempt the rewrite.
    fn try_rewrite(&self, plan: &LogicalPlan) -> Result<Option<LogicalPlan>>;

    /// A human readable name for this rule.
    fn name(&self) -> &str;
}

/// `Filter?` over a single `TableScan`.
fn is_filter_over_scan(plan: &LogicalPlan) -> bool {
    match plan {
        LogicalPlan::Filter(filter) => {
            matches!(filter.input.as_ref(), LogicalPlan::TableScan(_))
        }
        LogicalPlan::TableScan(_) => true,
        _ => false,
    }
}

/// Try the candidate views for `plan`'s base table in catalog order. A
/// view missing from the catalog or rejected by `view_applies` is
/// skipped; the first pipeline failure stops the whole attempt, and the
/// first committed candidate wins.
fn try_candidates(
    catalog: &ViewCatalog,
    plan: &LogicalPlan,
    pipeline: &RewritePipeline,
    rule_name: &str,
    view_applies: impl Fn(&LogicalPlan) -> bool,
) -> Result<Option<LogicalPlan>> {
    let tables = extract_table_names(plan);
    let [table] = tables.as_slice() else {
        return Ok(None);
    };
    let Some(candidates) = catalog.candidate_views_by_table(table) else {
        return Ok(None);
    };
    for view_name in candidates {
        let (Some(definition), Some(table_plan)) = (
            catalog.view_definition_plan(&view_name),
            catalog.view_table_plan(&view_name),
        ) else {
            debug!("{rule_name}: view {view_name} has no plans in the catalog, skipping");
            continue;
        };
        if !view_applies(&definition) {
            debug!("{rule_name}: view {view_name} is of a different shape, skipping");
            continue;
        }
        let component = ProcessedComponent::populate(plan, &definition);
        let mut cx =
            RewriteContext::new(view_name.clone(), definition, table_plan, component);
        let state = pipeline.run(plan, &mut cx)?;
        if state.stopped {
            if let Some(failure) = state.failure {
                debug!("{rule_name}: view {view_name} rejected: {failure}");
            }
            return Ok(None);
        }
        debug!("{rule_name}: query rewritten against view {view_name}");
        return Ok(Some(state.plan));
    }
    Ok(None)
}
