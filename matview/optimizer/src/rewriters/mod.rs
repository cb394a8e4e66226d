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

//! Rewriters apply the compensation their paired matcher computed,
//! editing the evolving plan.

mod group_by;
mod predicate;
mod project;
mod table;

pub use group_by::GroupByRewrite;
pub use predicate::PredicateRewrite;
pub use project::ProjectRewrite;
pub use table::TableOrViewRewrite;

use crate::component::RewriteContext;
use matview_common::Result;
use matview_expr::{Expr, LogicalPlan};

/// Applies one aspect of the rewrite, consuming the paired matcher's
/// compensation. Rewriters may record substitutions in the context so
/// later stages agree on them.
pub trait ViewRewriter {
    /// Name of the rewriter, for logs.
    fn name(&self) -> &str;

    /// Edit `plan`, re-applying `compensation` above the view.
    fn rewrite(
        &self,
        plan: LogicalPlan,
        compensation: Vec<Expr>,
        cx: &mut RewriteContext,
    ) -> Result<LogicalPlan>;
}
