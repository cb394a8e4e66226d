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

//! Scan redirection.

use crate::component::RewriteContext;
use crate::rewriters::ViewRewriter;
use matview_common::Result;
use matview_expr::{Expr, LogicalPlan};

/// Replaces the base table scan with the view's table plan. The
/// replacement subtree is not recursed into, so a view reading from a
/// table of the same name cannot be redirected at itself.
pub struct TableOrViewRewrite;

impl ViewRewriter for TableOrViewRewrite {
    fn name(&self) -> &str {
        "table_or_view"
    }

    fn rewrite(
        &self,
        plan: LogicalPlan,
        _compensation: Vec<Expr>,
        cx: &mut RewriteContext,
    ) -> Result<LogicalPlan> {
        Ok(plan.transform_down(&|node| match node {
            LogicalPlan::TableScan(_) => Some(cx.view_table_plan.clone()),
            _ => None,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ProcessedComponent;
    use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
    use matview_expr::{col, lit, LogicalPlanBuilder};
    use std::sync::Arc;

    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![Field::new("a", DataType::Int32, false)]))
    }

    #[test]
    fn scan_is_redirected_at_the_view() -> Result<()> {
        let plan = LogicalPlanBuilder::scan("t", schema())?
            .filter(col("a").gt(lit(0i32)))?
            .project(vec![col("a")])?
            .build()?;
        let view_table = LogicalPlanBuilder::scan("mv", schema())?.build()?;
        let definition = LogicalPlanBuilder::scan("t", schema())?
            .project(vec![col("a")])?
            .build()?;
        let mut cx = RewriteContext::new(
            "mv",
            definition,
            view_table,
            ProcessedComponent::default(),
        );
        let rewritten = TableOrViewRewrite.rewrite(plan, vec![], &mut cx)?;
        let expected = "Projection: #t.a\
        \n  Filter: #t.a > Int32(0)\
        \n    TableScan: mv";
        assert_eq!(expected, format!("{rewritten:?}"));
        Ok(())
    }
}
