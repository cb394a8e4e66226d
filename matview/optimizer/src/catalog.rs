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

//! Catalog of registered materialized views.

use dashmap::DashMap;
use matview_expr::utils::extract_table_names;
use matview_expr::LogicalPlan;

#[derive(Debug, Clone)]
struct ViewPlans {
    definition: LogicalPlan,
    table: LogicalPlan,
}

/// Mapping from base tables to candidate views and from view names to the
/// view's definition plan and table plan.
///
/// Reads are safe under concurrent registration; the catalog is an
/// explicit handle passed to the rules rather than process-global state.
#[derive(Debug, Default)]
pub struct ViewCatalog {
    views_by_table: DashMap<String, Vec<String>>,
    views: DashMap<String, ViewPlans>,
}

impl ViewCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a view under `name`, indexing it by every base table its
    /// definition scans. Registering the same name again replaces the
    /// plans and keeps the original candidate position.
    pub fn register_view(
        &self,
        name: impl Into<String>,
        definition: LogicalPlan,
        table: LogicalPlan,
    ) {
        let name = name.into();
        for base_table in extract_table_names(&definition) {
            let mut candidates =
                self.views_by_table.entry(base_table).or_default();
            if !candidates.contains(&name) {
                candidates.push(name.clone());
            }
        }
        self.views.insert(name, ViewPlans { definition, table });
    }

    /// The views whose definitions scan `table`, in registration order.
    pub fn candidate_views_by_table(&self, table: &str) -> Option<Vec<String>> {
        self.views_by_table.get(table).map(|v| v.clone())
    }

    /// The `CREATE MATERIALIZED VIEW AS …` plan of `name`.
    pub fn view_definition_plan(&self, name: &str) -> Option<LogicalPlan> {
        self.views.get(name).map(|v| v.definition.clone())
    }

    /// A scan over the persisted rows of `name`.
    pub fn view_table_plan(&self, name: &str) -> Option<LogicalPlan> {
        self.views.get(name).map(|v| v.table.clone())
    }
}
