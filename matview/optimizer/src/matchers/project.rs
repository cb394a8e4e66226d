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

//! Projection containment.

use crate::component::RewriteContext;
use crate::failure::{MatchOutcome, RewriteFailure};
use crate::matchers::ViewMatcher;
use matview_expr::utils::expr_to_columns;
use std::collections::HashSet;

/// Checks that every column the query's result expressions reference is
/// available at the first level of the view's output. The projection
/// itself is rewritten later, so no compensation is emitted.
pub struct ProjectMatcher;

impl ViewMatcher for ProjectMatcher {
    fn name(&self) -> &str {
        "project"
    }

    fn try_match(&self, cx: &RewriteContext) -> matview_common::Result<MatchOutcome> {
        let view_output = cx.view_output();
        let mut columns = HashSet::new();
        for expr in &cx.component.query_project {
            expr_to_columns(expr, &mut columns);
        }
        let missing = columns
            .iter()
            .any(|c| !view_output.iter().any(|o| o.same_column(c)));
        if missing {
            return Ok(Err(RewriteFailure::ProjectUnmatch));
        }
        Ok(Ok(vec![]))
    }
}
