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

//! Projection rewrite.

use crate::component::RewriteContext;
use crate::rewriters::ViewRewriter;
use matview_common::Result;
use matview_expr::{Expr, LogicalPlan, Projection};

/// Substitutes the view's columns into the query's projection list,
/// recording each substitution in the context's replacement map.
///
/// When the query aggregates there is no projection to edit here: the
/// grouping list is rewritten together with the `Aggregate` node, and an
/// outer projection keeps referring to the aggregate's output names,
/// which the roll-up preserves. The substitutions are still recorded so
/// every stage maps the same query column to the same view column.
pub struct ProjectRewrite;

impl ViewRewriter for ProjectRewrite {
    fn name(&self) -> &str {
        "project"
    }

    fn rewrite(
        &self,
        plan: LogicalPlan,
        _compensation: Vec<Expr>,
        cx: &mut RewriteContext,
    ) -> Result<LogicalPlan> {
        if !cx.component.query_aggregates.is_empty() {
            for expr in cx.component.query_project.clone() {
                cx.substitute(expr)?;
            }
            return Ok(plan);
        }
        let substituted = cx
            .component
            .query_project
            .clone()
            .into_iter()
            .map(|e| cx.substitute(e))
            .collect::<Result<Vec<_>>>()?;
        Ok(plan.transform_down(&|node| match node {
            LogicalPlan::Projection(projection) => {
                Some(LogicalPlan::Projection(Projection {
                    expr: substituted.clone(),
                    input: projection.input.clone(),
                }))
            }
            _ => None,
        }))
    }
}
