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

//! Expression representation.

use crate::aggregate_function::AggregateFunction;
use crate::operator::Operator;
use arrow::datatypes::DataType;
use matview_common::{Column, ScalarValue};
use std::fmt;

/// A logical expression tree.
///
/// Expressions are immutable values; edits go through [`Expr::transform_down`]
/// which rebuilds the affected spine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    /// A named reference to a column
    Column(Column),
    /// A constant value
    Literal(ScalarValue),
    /// An expression with an assigned output name
    Alias(Box<Expr>, String),
    /// A binary expression such as `a + b` or `a >= 3`
    BinaryExpr {
        /// Left-hand side of the expression
        left: Box<Expr>,
        /// The operator
        op: Operator,
        /// Right-hand side of the expression
        right: Box<Expr>,
    },
    /// Casts the expression to a given type
    Cast {
        /// The expression being cast
        expr: Box<Expr>,
        /// The `DataType` the expression will yield
        data_type: DataType,
    },
    /// An aggregate function call such as `SUM(sal)`
    AggregateFunction {
        /// Name of the function
        fun: AggregateFunction,
        /// List of expressions to feed to the function
        args: Vec<Expr>,
    },
}

impl Expr {
    /// The type this expression evaluates to.
    pub fn data_type(&self) -> DataType {
        match self {
            Expr::Column(c) => c.data_type.clone(),
            Expr::Literal(v) => v.data_type(),
            Expr::Alias(expr, _) => expr.data_type(),
            Expr::Cast { data_type, .. } => data_type.clone(),
            Expr::BinaryExpr { left, op, .. } => {
                if op.is_comparison() || matches!(op, Operator::And | Operator::Or) {
                    DataType::Boolean
                } else {
                    left.data_type()
                }
            }
            Expr::AggregateFunction { fun, args } => match fun {
                AggregateFunction::Count => DataType::Int64,
                AggregateFunction::Avg => DataType::Float64,
                _ => args
                    .first()
                    .map(|a| a.data_type())
                    .unwrap_or(DataType::Null),
            },
        }
    }

    /// The output name of this expression: the alias if one is set, the
    /// column name for bare references, otherwise the display form
    /// (`SUM(e.sal)`), matching how a planner names derived columns.
    pub fn name(&self) -> String {
        match self {
            Expr::Alias(_, name) => name.clone(),
            Expr::Column(c) => c.name.clone(),
            other => other.display_name(),
        }
    }

    /// Qualifier-bearing name used when naming derived columns, without
    /// the `#` sigil of the plan display.
    pub fn display_name(&self) -> String {
        match self {
            Expr::Column(c) => c.flat_name(),
            Expr::Literal(v) => v.to_string(),
            Expr::Alias(expr, name) => format!("{} AS {name}", expr.display_name()),
            Expr::BinaryExpr { left, op, right } => {
                format!("{} {op} {}", left.display_name(), right.display_name())
            }
            Expr::Cast { expr, data_type } => {
                format!("CAST({} AS {data_type:?})", expr.display_name())
            }
            Expr::AggregateFunction { fun, args } => {
                let args = args
                    .iter()
                    .map(|a| a.display_name())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{fun}({args})")
            }
        }
    }

    /// The first-level output column this expression contributes when it
    /// appears in a projection or aggregate list.
    pub fn to_output_column(&self) -> Column {
        Column::from_name(self.name(), self.data_type())
    }

    /// The expression with cosmetic wrappers removed: aliases, and casts
    /// around literals.
    pub fn unwrap_cosmetic(&self) -> &Expr {
        match self {
            Expr::Alias(expr, _) => expr.unwrap_cosmetic(),
            Expr::Cast { expr, .. } if matches!(expr.unwrap_cosmetic(), Expr::Literal(_)) => {
                expr.unwrap_cosmetic()
            }
            other => other,
        }
    }

    /// Structural equality modulo column qualifiers, aliases and casts
    /// wrapped around literals.
    pub fn semantically_eq(&self, other: &Expr) -> bool {
        match (self.unwrap_cosmetic(), other.unwrap_cosmetic()) {
            (Expr::Column(l), Expr::Column(r)) => l.same_column(r),
            (Expr::Literal(l), Expr::Literal(r)) => l == r,
            (
                Expr::BinaryExpr {
                    left: ll,
                    op: lop,
                    right: lr,
                },
                Expr::BinaryExpr {
                    left: rl,
                    op: rop,
                    right: rr,
                },
            ) => lop == rop && ll.semantically_eq(rl) && lr.semantically_eq(rr),
            (
                Expr::Cast {
                    expr: le,
                    data_type: lt,
                },
                Expr::Cast {
                    expr: re,
                    data_type: rt,
                },
            ) => lt == rt && le.semantically_eq(re),
            (
                Expr::AggregateFunction { fun: lf, args: la },
                Expr::AggregateFunction { fun: rf, args: ra },
            ) => {
                lf == rf
                    && la.len() == ra.len()
                    && la.iter().zip(ra).all(|(l, r)| l.semantically_eq(r))
            }
            _ => false,
        }
    }

    /// Apply `f` to this node and then to the children of whatever `f`
    /// returned, top-down, rebuilding the tree.
    pub fn transform_down<F>(self, f: &F) -> Expr
    where
        F: Fn(Expr) -> Expr,
    {
        let node = f(self);
        match node {
            Expr::Alias(expr, name) => Expr::Alias(Box::new(expr.transform_down(f)), name),
            Expr::BinaryExpr { left, op, right } => Expr::BinaryExpr {
                left: Box::new(left.transform_down(f)),
                op,
                right: Box::new(right.transform_down(f)),
            },
            Expr::Cast { expr, data_type } => Expr::Cast {
                expr: Box::new(expr.transform_down(f)),
                data_type,
            },
            Expr::AggregateFunction { fun, args } => Expr::AggregateFunction {
                fun,
                args: args.into_iter().map(|a| a.transform_down(f)).collect(),
            },
            leaf @ (Expr::Column(_) | Expr::Literal(_)) => leaf,
        }
    }

    fn binary(self, op: Operator, other: Expr) -> Expr {
        Expr::BinaryExpr {
            left: Box::new(self),
            op,
            right: Box::new(other),
        }
    }

    /// `self = other`
    pub fn eq(self, other: Expr) -> Expr {
        self.binary(Operator::Eq, other)
    }

    /// `self <=> other`, the null-safe equality
    pub fn eq_null_safe(self, other: Expr) -> Expr {
        self.binary(Operator::IsNotDistinctFrom, other)
    }

    /// `self != other`
    pub fn not_eq(self, other: Expr) -> Expr {
        self.binary(Operator::NotEq, other)
    }

    /// `self < other`
    pub fn lt(self, other: Expr) -> Expr {
        self.binary(Operator::Lt, other)
    }

    /// `self <= other`
    pub fn lt_eq(self, other: Expr) -> Expr {
        self.binary(Operator::LtEq, other)
    }

    /// `self > other`
    pub fn gt(self, other: Expr) -> Expr {
        self.binary(Operator::Gt, other)
    }

    /// `self >= other`
    pub fn gt_eq(self, other: Expr) -> Expr {
        self.binary(Operator::GtEq, other)
    }

    /// `self AND other`
    pub fn and(self, other: Expr) -> Expr {
        self.binary(Operator::And, other)
    }

    /// `self / other`
    pub fn div(self, other: Expr) -> Expr {
        self.binary(Operator::Divide, other)
    }

    /// `self AS name`
    pub fn alias(self, name: impl Into<String>) -> Expr {
        Expr::Alias(Box::new(self), name.into())
    }

    /// `CAST(self AS data_type)`
    pub fn cast_to(self, data_type: DataType) -> Expr {
        Expr::Cast {
            expr: Box::new(self),
            data_type,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Column(c) => write!(f, "{c}"),
            Expr::Literal(v) => write!(f, "{v}"),
            Expr::Alias(expr, name) => write!(f, "{expr} AS {name}"),
            Expr::BinaryExpr { left, op, right } => write!(f, "{left} {op} {right}"),
            Expr::Cast { expr, data_type } => {
                write!(f, "CAST({expr} AS {data_type:?})")
            }
            Expr::AggregateFunction { fun, args } => {
                let args = args
                    .iter()
                    .map(|a| a.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{fun}({args})")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr_fn::{avg, col, count_star, lit, sum};

    fn typed_col(relation: &str, name: &str, data_type: DataType) -> Expr {
        Expr::Column(Column::new(Some(relation), name, data_type))
    }

    #[test]
    fn semantic_eq_ignores_qualifier() {
        let qualified = typed_col("t", "a", DataType::Int32);
        let bare = Expr::Column(Column::from_name("a", DataType::Int32));
        assert!(qualified.semantically_eq(&bare));
        assert!(!qualified.semantically_eq(&typed_col("t", "b", DataType::Int32)));
    }

    #[test]
    fn semantic_eq_ignores_cast_around_literal() {
        let plain = lit(3i32);
        let cast = lit(3i32).cast_to(DataType::Int64);
        assert!(plain.semantically_eq(&cast));
        assert!(cast.semantically_eq(&plain));
        // casts of non-literals are significant
        let col_cast = typed_col("t", "a", DataType::Int32).cast_to(DataType::Int64);
        assert!(!col_cast.semantically_eq(&typed_col("t", "a", DataType::Int32)));
    }

    #[test]
    fn semantic_eq_ignores_alias() {
        let named = sum(col("sal")).alias("s");
        assert!(named.semantically_eq(&sum(col("sal"))));
    }

    #[test]
    fn semantic_eq_compares_shape() {
        let a = typed_col("t", "a", DataType::Int32);
        let pred = a.clone().gt_eq(lit(3i32));
        assert!(pred.semantically_eq(&a.clone().gt_eq(lit(3i32))));
        assert!(!pred.semantically_eq(&a.clone().gt(lit(3i32))));
        assert!(!pred.semantically_eq(&a.clone().gt_eq(lit(4i32))));
    }

    #[test]
    fn names_for_derived_columns() {
        assert_eq!(count_star().name(), "COUNT(Int32(1))");
        assert_eq!(avg(col("sal")).alias("average").name(), "average");
        assert_eq!(
            typed_col("e", "sal", DataType::Int64).name(),
            "sal"
        );
    }

    #[test]
    fn transform_down_replaces_columns() {
        let pred = typed_col("t", "a", DataType::Int32).gt(lit(1i32));
        let replaced = pred.transform_down(&|e| match e {
            Expr::Column(c) => Expr::Column(c.with_relation("mv")),
            other => other,
        });
        assert_eq!(format!("{replaced}"), "#mv.a > Int32(1)");
    }
}
