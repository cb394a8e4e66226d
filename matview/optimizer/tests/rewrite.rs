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

//! End-to-end rewrite scenarios.

use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use matview_common::Result;
use matview_expr::{
    avg, col, count_star, lit, sum, JoinType, LogicalPlan, LogicalPlanBuilder,
};
use matview_optimizer::{Rewriter, ViewCatalog};
use std::sync::Arc;

#[ctor::ctor]
fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn table_t() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("a", DataType::Int32, false),
        Field::new("b", DataType::Utf8, false),
    ]))
}

fn employees() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("dept", DataType::Utf8, false),
        Field::new("emp", DataType::Utf8, false),
        Field::new("sal", DataType::Int64, true),
    ]))
}

/// A scan of the persisted view rows, one column per definition output.
fn view_table(name: &str, definition: &LogicalPlan) -> LogicalPlan {
    let schema = Arc::new(Schema::new(
        definition
            .output()
            .iter()
            .map(|c| Field::new(c.name.clone(), c.data_type.clone(), true))
            .collect::<Vec<_>>(),
    ));
    LogicalPlanBuilder::scan(name, schema).unwrap().build().unwrap()
}

fn register(catalog: &ViewCatalog, name: &str, definition: LogicalPlan) {
    let table = view_table(name, &definition);
    catalog.register_view(name, definition, table);
}

fn assert_rewritten(
    catalog: Arc<ViewCatalog>,
    plan: &LogicalPlan,
    expected: &str,
) -> Result<()> {
    let rewritten = Rewriter::new(catalog).rewrite(plan)?;
    assert_eq!(expected, format!("{rewritten:?}"));
    Ok(())
}

fn assert_unchanged(catalog: Arc<ViewCatalog>, plan: &LogicalPlan) -> Result<()> {
    let rewritten = Rewriter::new(catalog).rewrite(plan)?;
    assert_eq!(plan, &rewritten);
    Ok(())
}

#[test]
fn equality_subset_adds_residual_filter() -> Result<()> {
    let catalog = Arc::new(ViewCatalog::new());
    let definition = LogicalPlanBuilder::scan("t", table_t())?
        .filter(col("a").eq(lit("jack")))?
        .project(vec![col("a"), col("b")])?
        .build()?;
    register(&catalog, "mv1", definition);

    let query = LogicalPlanBuilder::scan("t", table_t())?
        .filter(col("a").eq(lit("jack")).and(col("b").eq(lit("wow"))))?
        .project(vec![col("a"), col("b")])?
        .build()?;
    let expected = "Projection: #mv1.a, #mv1.b\
    \n  Filter: #mv1.b = Utf8(\"wow\")\
    \n    TableScan: mv1";
    assert_rewritten(catalog, &query, expected)
}

#[test]
fn range_narrowing_is_restated_above_the_view() -> Result<()> {
    let catalog = Arc::new(ViewCatalog::new());
    let definition = LogicalPlanBuilder::scan("t", table_t())?
        .filter(col("a").gt(lit(1i32)).and(col("a").lt(lit(10i32))))?
        .project(vec![col("a"), col("b")])?
        .build()?;
    register(&catalog, "mv2", definition);

    let query = LogicalPlanBuilder::scan("t", table_t())?
        .filter(col("a").gt_eq(lit(3i32)).and(col("a").lt_eq(lit(7i32))))?
        .project(vec![col("a"), col("b")])?
        .build()?;
    let expected = "Projection: #mv2.a, #mv2.b\
    \n  Filter: #mv2.a >= Int32(3) AND #mv2.a <= Int32(7)\
    \n    TableScan: mv2";
    assert_rewritten(catalog, &query, expected)
}

#[test]
fn wider_query_range_keeps_the_original_plan() -> Result<()> {
    let catalog = Arc::new(ViewCatalog::new());
    let definition = LogicalPlanBuilder::scan("t", table_t())?
        .filter(col("a").gt_eq(lit(5i32)))?
        .project(vec![col("a"), col("b")])?
        .build()?;
    register(&catalog, "mv3", definition);

    let query = LogicalPlanBuilder::scan("t", table_t())?
        .filter(col("a").gt_eq(lit(3i32)))?
        .project(vec![col("a"), col("b")])?
        .build()?;
    assert_unchanged(catalog, &query)
}

#[test]
fn compensation_column_missing_from_view_keeps_the_original_plan() -> Result<()> {
    let catalog = Arc::new(ViewCatalog::new());
    let definition = LogicalPlanBuilder::scan("t", table_t())?
        .filter(col("a").gt(lit(0i32)))?
        .project(vec![col("a")])?
        .build()?;
    register(&catalog, "mv4", definition);

    let query = LogicalPlanBuilder::scan("t", table_t())?
        .filter(col("a").gt(lit(0i32)).and(col("b").eq(lit("x"))))?
        .project(vec![col("a")])?
        .build()?;
    assert_unchanged(catalog, &query)
}

#[test]
fn count_star_rolls_up_to_sum_of_partial_counts() -> Result<()> {
    let catalog = Arc::new(ViewCatalog::new());
    let definition = LogicalPlanBuilder::scan("e", employees())?
        .aggregate(
            vec![col("dept"), col("emp")],
            vec![count_star().alias("c"), sum(col("sal")).alias("s")],
        )?
        .build()?;
    register(&catalog, "mv5", definition);

    let query = LogicalPlanBuilder::scan("e", employees())?
        .aggregate(vec![col("dept")], vec![count_star(), sum(col("sal"))])?
        .build()?;
    let expected = "Aggregate: groupBy=[[#mv5.dept]], \
                    aggr=[[SUM(#mv5.c) AS COUNT(Int32(1)), SUM(#mv5.s) AS SUM(e.sal)]]\
    \n  TableScan: mv5";
    assert_rewritten(catalog, &query, expected)
}

#[test]
fn avg_without_view_count_star_keeps_the_original_plan() -> Result<()> {
    let catalog = Arc::new(ViewCatalog::new());
    let definition = LogicalPlanBuilder::scan("e", employees())?
        .aggregate(vec![col("dept")], vec![sum(col("sal")).alias("s")])?
        .build()?;
    register(&catalog, "mv6", definition);

    let query = LogicalPlanBuilder::scan("e", employees())?
        .aggregate(vec![col("dept")], vec![avg(col("sal"))])?
        .build()?;
    assert_unchanged(catalog, &query)
}

#[test]
fn avg_rolls_up_to_sum_over_count() -> Result<()> {
    let catalog = Arc::new(ViewCatalog::new());
    let definition = LogicalPlanBuilder::scan("e", employees())?
        .aggregate(
            vec![col("dept")],
            vec![count_star().alias("c"), sum(col("sal")).alias("s")],
        )?
        .build()?;
    register(&catalog, "mv7", definition);

    let query = LogicalPlanBuilder::scan("e", employees())?
        .aggregate(vec![col("dept")], vec![avg(col("sal"))])?
        .build()?;
    let expected = "Aggregate: groupBy=[[#mv7.dept]], \
                    aggr=[[SUM(#mv7.s) / SUM(#mv7.c) AS AVG(e.sal)]]\
    \n  TableScan: mv7";
    assert_rewritten(catalog, &query, expected)
}

#[test]
fn aggregate_query_with_range_filter_on_grouping_key() -> Result<()> {
    let catalog = Arc::new(ViewCatalog::new());
    let definition = LogicalPlanBuilder::scan("e", employees())?
        .filter(col("dept").gt_eq(lit("a")))?
        .aggregate(vec![col("dept")], vec![count_star().alias("c")])?
        .build()?;
    register(&catalog, "mv8", definition);

    let query = LogicalPlanBuilder::scan("e", employees())?
        .filter(col("dept").gt_eq(lit("b")))?
        .aggregate(vec![col("dept")], vec![count_star()])?
        .build()?;
    let expected = "Aggregate: groupBy=[[#mv8.dept]], \
                    aggr=[[SUM(#mv8.c) AS COUNT(Int32(1))]]\
    \n  Filter: #mv8.dept >= Utf8(\"b\")\
    \n    TableScan: mv8";
    assert_rewritten(catalog, &query, expected)
}

#[test]
fn projection_above_the_aggregate_is_preserved() -> Result<()> {
    let catalog = Arc::new(ViewCatalog::new());
    let definition = LogicalPlanBuilder::scan("e", employees())?
        .aggregate(
            vec![col("dept"), col("emp")],
            vec![count_star().alias("c")],
        )?
        .build()?;
    register(&catalog, "mv9", definition);

    let query = LogicalPlanBuilder::scan("e", employees())?
        .aggregate(vec![col("dept")], vec![count_star().alias("n")])?
        .project(vec![col("n"), col("dept")])?
        .build()?;
    let expected = "Projection: #n, #dept\
    \n  Aggregate: groupBy=[[#mv9.dept]], aggr=[[SUM(#mv9.c) AS n]]\
    \n    TableScan: mv9";
    assert_rewritten(catalog, &query, expected)
}

#[test]
fn rewriting_is_idempotent() -> Result<()> {
    let catalog = Arc::new(ViewCatalog::new());
    let definition = LogicalPlanBuilder::scan("t", table_t())?
        .filter(col("a").eq(lit("jack")))?
        .project(vec![col("a"), col("b")])?
        .build()?;
    register(&catalog, "mv1", definition);

    let query = LogicalPlanBuilder::scan("t", table_t())?
        .filter(col("a").eq(lit("jack")).and(col("b").eq(lit("wow"))))?
        .project(vec![col("a"), col("b")])?
        .build()?;
    let rewriter = Rewriter::new(catalog);
    let once = rewriter.rewrite(&query)?;
    let twice = rewriter.rewrite(&once)?;
    assert_ne!(query, once);
    assert_eq!(once, twice);
    Ok(())
}

#[test]
fn no_candidate_views_returns_the_plan_verbatim() -> Result<()> {
    let catalog = Arc::new(ViewCatalog::new());
    let query = LogicalPlanBuilder::scan("t", table_t())?
        .project(vec![col("a")])?
        .build()?;
    assert_unchanged(catalog, &query)
}

#[test]
fn joined_query_is_left_alone() -> Result<()> {
    let catalog = Arc::new(ViewCatalog::new());
    let definition = LogicalPlanBuilder::scan("t", table_t())?
        .project(vec![col("a"), col("b")])?
        .build()?;
    register(&catalog, "mv10", definition);

    let other = LogicalPlanBuilder::scan("e", employees())?.build()?;
    let query = LogicalPlanBuilder::scan("t", table_t())?
        .join(other, JoinType::Inner, col("t.b").eq(col("e.dept")))?
        .project(vec![col("a"), col("sal")])?
        .build()?;
    assert_unchanged(catalog, &query)
}

#[test]
fn first_committing_candidate_wins() -> Result<()> {
    let catalog = Arc::new(ViewCatalog::new());
    let definition = LogicalPlanBuilder::scan("t", table_t())?
        .project(vec![col("a"), col("b")])?
        .build()?;
    register(&catalog, "mv_first", definition.clone());
    register(&catalog, "mv_second", definition);

    let query = LogicalPlanBuilder::scan("t", table_t())?
        .project(vec![col("a")])?
        .build()?;
    let expected = "Projection: #mv_first.a\
    \n  TableScan: mv_first";
    assert_rewritten(catalog, &query, expected)
}

#[test]
fn first_failing_candidate_stops_the_rule() -> Result<()> {
    let catalog = Arc::new(ViewCatalog::new());
    let too_narrow = LogicalPlanBuilder::scan("t", table_t())?
        .filter(col("a").gt_eq(lit(5i32)))?
        .project(vec![col("a"), col("b")])?
        .build()?;
    let wide_enough = LogicalPlanBuilder::scan("t", table_t())?
        .filter(col("a").gt_eq(lit(0i32)))?
        .project(vec![col("a"), col("b")])?
        .build()?;
    register(&catalog, "mv_narrow", too_narrow);
    register(&catalog, "mv_wide", wide_enough);

    // mv_narrow is tried first and rejected; the minimal policy stops
    // there instead of trying mv_wide
    let query = LogicalPlanBuilder::scan("t", table_t())?
        .filter(col("a").gt_eq(lit(3i32)))?
        .project(vec![col("a"), col("b")])?
        .build()?;
    assert_unchanged(catalog, &query)
}

#[test]
fn grouping_view_cannot_answer_a_plain_select() -> Result<()> {
    let catalog = Arc::new(ViewCatalog::new());
    let definition = LogicalPlanBuilder::scan("e", employees())?
        .aggregate(vec![col("dept")], vec![count_star().alias("c")])?
        .build()?;
    register(&catalog, "mv11", definition);

    // dept is projected by the view, but the view has collapsed rows
    let query = LogicalPlanBuilder::scan("e", employees())?
        .project(vec![col("dept")])?
        .build()?;
    assert_unchanged(catalog, &query)
}
