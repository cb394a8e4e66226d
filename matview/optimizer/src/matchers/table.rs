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

//! Base table identity.

use crate::component::RewriteContext;
use crate::failure::{MatchOutcome, RewriteFailure};
use crate::matchers::ViewMatcher;
use matview_common::{MatviewError, Result};

/// Confirms the query and the view definition read the same single base
/// table and observed no join. No compensation.
pub struct TableNonOpMatcher;

impl ViewMatcher for TableNonOpMatcher {
    fn name(&self) -> &str {
        "table"
    }

    fn try_match(&self, cx: &RewriteContext) -> Result<MatchOutcome> {
        let component = &cx.component;
        if !component.query_joins.is_empty() || !component.view_joins.is_empty() {
            return Ok(Err(RewriteFailure::JoinUnmatch));
        }
        // candidates are selected by base table, so a mismatch here means
        // the component was populated from the wrong plans
        match (
            component.query_tables.as_slice(),
            component.view_tables.as_slice(),
        ) {
            ([query], [view]) if query == view => Ok(Ok(vec![])),
            (query, view) => Err(MatviewError::Internal(format!(
                "candidate tables diverged from the query's: {query:?} vs {view:?}"
            ))),
        }
    }
}
