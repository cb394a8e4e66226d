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

//! Filter compensation.

use crate::component::RewriteContext;
use crate::rewriters::ViewRewriter;
use matview_common::Result;
use matview_expr::utils::conjunction;
use matview_expr::{Expr, Filter, LogicalPlan};
use std::sync::Arc;

/// Replaces the query's filter with the AND of the compensation
/// predicates, rewritten over the view's columns. An empty compensation
/// drops the filter; a missing one is inserted above the scan.
pub struct PredicateRewrite;

impl ViewRewriter for PredicateRewrite {
    fn name(&self) -> &str {
        "predicate"
    }

    fn rewrite(
        &self,
        plan: LogicalPlan,
        compensation: Vec<Expr>,
        cx: &mut RewriteContext,
    ) -> Result<LogicalPlan> {
        let compensation = compensation
            .into_iter()
            .map(|e| cx.substitute(e))
            .collect::<Result<Vec<_>>>()?;
        let predicate = conjunction(compensation);
        Ok(plan.transform_down(&|node| match node {
            LogicalPlan::Filter(filter) => Some(match &predicate {
                Some(predicate) => LogicalPlan::Filter(Filter {
                    predicate: predicate.clone(),
                    input: filter.input.clone(),
                }),
                None => filter.input.as_ref().clone(),
            }),
            scan @ LogicalPlan::TableScan(_) => predicate.as_ref().map(|predicate| {
                LogicalPlan::Filter(Filter {
                    predicate: predicate.clone(),
                    input: Arc::new(scan.clone()),
                })
            }),
            _ => None,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ProcessedComponent;
    use arrow::datatypes::{DataType, Field, Schema};
    use matview_expr::{col, lit, LogicalPlanBuilder};

    fn schema() -> arrow::datatypes::SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("a", DataType::Int32, false),
            Field::new("b", DataType::Utf8, false),
        ]))
    }

    fn context() -> RewriteContext {
        let definition = LogicalPlanBuilder::scan("t", schema())
            .unwrap()
            .project(vec![col("a"), col("b")])
            .unwrap()
            .build()
            .unwrap();
        let table = LogicalPlanBuilder::scan("mv", schema())
            .unwrap()
            .build()
            .unwrap();
        RewriteContext::new("mv", definition, table, ProcessedComponent::default())
    }

    #[test]
    fn filter_is_replaced_with_compensation() -> Result<()> {
        let plan = LogicalPlanBuilder::scan("t", schema())?
            .filter(col("a").eq(lit(1i32)).and(col("b").eq(lit("wow"))))?
            .project(vec![col("a")])?
            .build()?;
        let rewritten = PredicateRewrite.rewrite(
            plan,
            vec![col("b").eq(lit("wow"))],
            &mut context(),
        )?;
        let expected = "Projection: #t.a\
        \n  Filter: #mv.b = Utf8(\"wow\")\
        \n    TableScan: t";
        assert_eq!(expected, format!("{rewritten:?}"));
        Ok(())
    }

    #[test]
    fn empty_compensation_drops_the_filter() -> Result<()> {
        let plan = LogicalPlanBuilder::scan("t", schema())?
            .filter(col("a").eq(lit(1i32)))?
            .project(vec![col("a")])?
            .build()?;
        let rewritten = PredicateRewrite.rewrite(plan, vec![], &mut context())?;
        let expected = "Projection: #t.a\
        \n  TableScan: t";
        assert_eq!(expected, format!("{rewritten:?}"));
        Ok(())
    }

    #[test]
    fn missing_filter_is_inserted_above_the_scan() -> Result<()> {
        let plan = LogicalPlanBuilder::scan("t", schema())?
            .project(vec![col("a")])?
            .build()?;
        let rewritten = PredicateRewrite.rewrite(
            plan,
            vec![col("a").gt(lit(0i32))],
            &mut context(),
        )?;
        let expected = "Projection: #t.a\
        \n  Filter: #mv.a > Int32(0)\
        \n    TableScan: t";
        assert_eq!(expected, format!("{rewritten:?}"));
        Ok(())
    }
}
