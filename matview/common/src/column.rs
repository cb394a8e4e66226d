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

//! Column reference type.

use arrow::datatypes::DataType;
use std::fmt;

/// A named, typed reference to a column of a relation.
///
/// `relation` is the optional qualifier (`t` in `t.a`). Two references to
/// the same column may differ in qualifier depending on how far from the
/// scan they were resolved; comparisons in the rewriter therefore go
/// through [`Column::same_column`] rather than `==`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column {
    /// relation/table qualifier, if any
    pub relation: Option<String>,
    /// field/column name
    pub name: String,
    /// type of the referenced column
    pub data_type: DataType,
}

impl Column {
    pub fn new(
        relation: Option<impl Into<String>>,
        name: impl Into<String>,
        data_type: DataType,
    ) -> Self {
        Self {
            relation: relation.map(|r| r.into()),
            name: name.into(),
            data_type,
        }
    }

    /// Create an unqualified column reference.
    pub fn from_name(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            relation: None,
            name: name.into(),
            data_type,
        }
    }

    /// Qualified name, e.g. `t.a`, or the bare name when unqualified.
    pub fn flat_name(&self) -> String {
        match &self.relation {
            Some(r) => format!("{}.{}", r, self.name),
            None => self.name.clone(),
        }
    }

    /// True when `other` refers to the same underlying column, ignoring
    /// the qualifier.
    pub fn same_column(&self, other: &Column) -> bool {
        self.name == other.name
    }

    /// The same reference re-qualified with `relation`.
    pub fn with_relation(&self, relation: impl Into<String>) -> Self {
        Self {
            relation: Some(relation.into()),
            name: self.name.clone(),
            data_type: self.data_type.clone(),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.flat_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_name_includes_qualifier() {
        let c = Column::new(Some("t"), "a", DataType::Int32);
        assert_eq!(c.flat_name(), "t.a");
        assert_eq!(format!("{c}"), "#t.a");
        let bare = Column::from_name("a", DataType::Int32);
        assert_eq!(bare.flat_name(), "a");
    }

    #[test]
    fn same_column_ignores_qualifier() {
        let qualified = Column::new(Some("t"), "a", DataType::Int32);
        let unqualified = Column::from_name("a", DataType::Int32);
        assert!(qualified.same_column(&unqualified));
        assert!(!qualified.same_column(&Column::from_name("b", DataType::Int32)));
    }
}
