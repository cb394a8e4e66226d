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

//! Aggregate roll-up rewrite.

use crate::component::RewriteContext;
use crate::rewriters::ViewRewriter;
use matview_common::Result;
use matview_expr::{Aggregate, Expr, LogicalPlan};

/// Replaces the query's `Aggregate` node: the grouping expressions are
/// rewritten over the view's columns and the aggregate list becomes the
/// roll-up compensation the matcher computed. The aggregate's input is
/// left for the table rewrite to redirect at the view.
pub struct GroupByRewrite;

impl ViewRewriter for GroupByRewrite {
    fn name(&self) -> &str {
        "group_by"
    }

    fn rewrite(
        &self,
        plan: LogicalPlan,
        compensation: Vec<Expr>,
        cx: &mut RewriteContext,
    ) -> Result<LogicalPlan> {
        let grouping = cx
            .component
            .query_grouping
            .clone()
            .into_iter()
            .map(|e| cx.substitute(e))
            .collect::<Result<Vec<_>>>()?;
        Ok(plan.transform_down(&|node| match node {
            LogicalPlan::Aggregate(aggregate) => {
                Some(LogicalPlan::Aggregate(Aggregate {
                    group_expr: grouping.clone(),
                    aggr_expr: compensation.clone(),
                    input: aggregate.input.clone(),
                }))
            }
            _ => None,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ProcessedComponent;
    use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
    use matview_expr::{col, count_star, sum, LogicalPlanBuilder};
    use std::sync::Arc;

    fn view_schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("dept", DataType::Utf8, false),
            Field::new("c", DataType::Int64, true),
            Field::new("s", DataType::Int64, true),
        ]))
    }

    #[test]
    fn aggregate_node_is_replaced() -> Result<()> {
        let base = Arc::new(Schema::new(vec![
            Field::new("dept", DataType::Utf8, false),
            Field::new("sal", DataType::Int64, true),
        ]));
        let plan = LogicalPlanBuilder::scan("e", base.clone())?
            .aggregate(vec![col("dept")], vec![count_star(), sum(col("sal"))])?
            .build()?;
        let definition = LogicalPlanBuilder::scan("e", base)?
            .aggregate(
                vec![col("dept")],
                vec![count_star().alias("c"), sum(col("sal")).alias("s")],
            )?
            .build()?;
        let table = LogicalPlanBuilder::scan("mv", view_schema())?.build()?;
        let mut cx = RewriteContext::new(
            "mv",
            definition,
            table,
            ProcessedComponent {
                query_grouping: vec![col("e.dept")],
                query_aggregates: vec![count_star(), sum(col("e.sal"))],
                ..Default::default()
            },
        );
        let compensation = vec![
            sum(col("mv.c")).alias("COUNT(Int32(1))"),
            sum(col("mv.s")).alias("SUM(e.sal)"),
        ];
        let rewritten = GroupByRewrite.rewrite(plan, compensation, &mut cx)?;
        let expected = "Aggregate: groupBy=[[#mv.dept]], \
                        aggr=[[SUM(#mv.c) AS COUNT(Int32(1)), SUM(#mv.s) AS SUM(e.sal)]]\
        \n  TableScan: e";
        assert_eq!(expected, format!("{rewritten:?}"));
        Ok(())
    }
}
