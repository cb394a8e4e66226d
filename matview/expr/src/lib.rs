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

//! Logical plan and expression representation for the matview rewriter.
//!
//! Plans and expressions are immutable tagged trees; rewrites rebuild the
//! affected spine through the `transform_down` combinators.

mod aggregate_function;
mod expr;
mod expr_fn;
pub mod logical_plan;
mod operator;
pub mod utils;

pub use aggregate_function::AggregateFunction;
pub use expr::Expr;
pub use expr_fn::{and, avg, col, count, count_star, lit, max, min, sum};
pub use logical_plan::{
    Aggregate, Filter, Join, JoinType, LogicalPlan, LogicalPlanBuilder, Projection,
    TableScan,
};
pub use operator::Operator;
