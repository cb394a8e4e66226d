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

//! Range normalization and containment over a single keyed expression.

use arrow::datatypes::DataType;
use matview_common::{MatviewError, Result, ScalarValue};
use matview_expr::{Expr, Operator};
use std::cmp::Ordering;
use std::fmt;

/// The interval a conjunction of comparison predicates admits for one key
/// expression. A missing bound is unbounded on that side.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeCondition {
    /// The keyed expression, usually a column reference.
    pub key: Expr,
    /// Greatest lower bound, if any.
    pub lower: Option<ScalarValue>,
    /// Least upper bound, if any.
    pub upper: Option<ScalarValue>,
    /// Whether the lower bound itself is admitted.
    pub incl_lower: bool,
    /// Whether the upper bound itself is admitted.
    pub incl_upper: bool,
}

/// The literal operand of a comparison, looking through a cast.
fn literal_operand(expr: &Expr) -> Option<&ScalarValue> {
    match expr.unwrap_cosmetic() {
        Expr::Literal(value) => Some(value),
        _ => None,
    }
}

impl RangeCondition {
    fn lower_bound(key: Expr, value: ScalarValue, inclusive: bool) -> Self {
        Self {
            key,
            lower: Some(value),
            upper: None,
            incl_lower: inclusive,
            incl_upper: false,
        }
    }

    fn upper_bound(key: Expr, value: ScalarValue, inclusive: bool) -> Self {
        Self {
            key,
            lower: None,
            upper: Some(value),
            incl_lower: false,
            incl_upper: inclusive,
        }
    }

    /// Normalize a comparison of a key against a (possibly cast-wrapped)
    /// literal, on either side, into a one-sided range. Returns `None`
    /// for expressions of any other shape.
    pub fn try_from_expr(expr: &Expr) -> Option<RangeCondition> {
        let Expr::BinaryExpr { left, op, right } = expr else {
            return None;
        };
        if !op.is_range_comparison() {
            return None;
        }
        match (literal_operand(left), literal_operand(right)) {
            // k op L
            (None, Some(value)) => {
                let key = left.as_ref().clone();
                let value = value.clone();
                Some(match op {
                    Operator::Gt => Self::lower_bound(key, value, false),
                    Operator::GtEq => Self::lower_bound(key, value, true),
                    Operator::Lt => Self::upper_bound(key, value, false),
                    Operator::LtEq => Self::upper_bound(key, value, true),
                    _ => unreachable!(),
                })
            }
            // L op k reads as k swapped(op) L
            (Some(value), None) => {
                let key = right.as_ref().clone();
                let value = value.clone();
                Some(match op {
                    Operator::Gt => Self::upper_bound(key, value, false),
                    Operator::GtEq => Self::upper_bound(key, value, true),
                    Operator::Lt => Self::lower_bound(key, value, false),
                    Operator::LtEq => Self::lower_bound(key, value, true),
                    _ => unreachable!(),
                })
            }
            _ => None,
        }
    }

    /// Intersect with another range over the same key: the greater lower
    /// bound and the lesser upper bound win, exclusivity winning ties.
    ///
    /// An intersection may come out empty (`lower > upper`); it is kept
    /// as-is rather than normalized to an empty marker.
    pub fn intersect(self, other: RangeCondition) -> Result<RangeCondition> {
        if !self.key.semantically_eq(&other.key) {
            return Err(MatviewError::Internal(format!(
                "cannot intersect ranges over different keys {} and {}",
                self.key, other.key
            )));
        }
        let (lower, incl_lower) = match (self.lower, other.lower) {
            (None, bound) => (bound, other.incl_lower),
            (bound, None) => (bound, self.incl_lower),
            (Some(l), Some(r)) => match l.partial_cmp_values(&r)? {
                Ordering::Greater => (Some(l), self.incl_lower),
                Ordering::Less => (Some(r), other.incl_lower),
                Ordering::Equal => (Some(l), self.incl_lower && other.incl_lower),
            },
        };
        let (upper, incl_upper) = match (self.upper, other.upper) {
            (None, bound) => (bound, other.incl_upper),
            (bound, None) => (bound, self.incl_upper),
            (Some(l), Some(r)) => match l.partial_cmp_values(&r)? {
                Ordering::Less => (Some(l), self.incl_upper),
                Ordering::Greater => (Some(r), other.incl_upper),
                Ordering::Equal => (Some(l), self.incl_upper && other.incl_upper),
            },
        };
        Ok(RangeCondition {
            key: self.key,
            lower,
            upper,
            incl_lower,
            incl_upper,
        })
    }

    /// `self ⊆ other`, with a missing bound unbounded on its side.
    ///
    /// Inclusivity flags are NOT compared, so `a >= 5` counts as a
    /// sub-range of `a > 5`. This matches the behavior the rewriter has
    /// always had and is compensated by re-applying the query's own
    /// ranges above the view; [`RangeCondition::is_sub_range_strict`] is
    /// the exact variant.
    pub fn is_sub_range(&self, other: &RangeCondition) -> Result<bool> {
        if !self.key.semantically_eq(&other.key) {
            return Ok(false);
        }
        let lower_ok = match (&self.lower, &other.lower) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some(l), Some(r)) => l.partial_cmp_values(r)? != Ordering::Less,
        };
        if !lower_ok {
            return Ok(false);
        }
        let upper_ok = match (&self.upper, &other.upper) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some(l), Some(r)) => l.partial_cmp_values(r)? != Ordering::Greater,
        };
        Ok(upper_ok)
    }

    /// `self ⊆ other` with inclusivity honored: a bound shared by value
    /// only contains the sub-range when the containing side also admits
    /// the bound.
    pub fn is_sub_range_strict(&self, other: &RangeCondition) -> Result<bool> {
        if !self.is_sub_range(other)? {
            return Ok(false);
        }
        if let (Some(l), Some(r)) = (&self.lower, &other.lower) {
            if l.partial_cmp_values(r)? == Ordering::Equal
                && self.incl_lower
                && !other.incl_lower
            {
                return Ok(false);
            }
        }
        if let (Some(l), Some(r)) = (&self.upper, &other.upper) {
            if l.partial_cmp_values(r)? == Ordering::Equal
                && self.incl_upper
                && !other.incl_upper
            {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Render the canonical range back into 0, 1 or 2 comparison
    /// predicates on the key, casting the literal to the key's type where
    /// they differ (which is where the parser would have put the cast).
    pub fn to_exprs(&self) -> Vec<Expr> {
        let key_type = self.key.data_type();
        let literal = |value: &ScalarValue| {
            let literal = Expr::Literal(value.clone());
            if key_type != DataType::Null && value.data_type() != key_type {
                literal.cast_to(key_type.clone())
            } else {
                literal
            }
        };
        let mut exprs = vec![];
        if let Some(lower) = &self.lower {
            let lower = literal(lower);
            exprs.push(if self.incl_lower {
                self.key.clone().gt_eq(lower)
            } else {
                self.key.clone().gt(lower)
            });
        }
        if let Some(upper) = &self.upper {
            let upper = literal(upper);
            exprs.push(if self.incl_upper {
                self.key.clone().lt_eq(upper)
            } else {
                self.key.clone().lt(upper)
            });
        }
        exprs
    }
}

impl fmt::Display for RangeCondition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let lower_mark = if self.incl_lower { "[" } else { "(" };
        let upper_mark = if self.incl_upper { "]" } else { ")" };
        let fmt_bound = |b: &Option<ScalarValue>| match b {
            Some(v) => v.to_string(),
            None => "..".to_string(),
        };
        write!(
            f,
            "{}: {lower_mark}{}, {}{upper_mark}",
            self.key,
            fmt_bound(&self.lower),
            fmt_bound(&self.upper)
        )
    }
}

/// Fold one-sided ranges into a single canonical range per key,
/// preserving first-seen key order.
pub fn canonicalize(ranges: Vec<RangeCondition>) -> Result<Vec<RangeCondition>> {
    let mut canonical: Vec<RangeCondition> = vec![];
    for range in ranges {
        match canonical
            .iter_mut()
            .find(|c| c.key.semantically_eq(&range.key))
        {
            Some(existing) => *existing = existing.clone().intersect(range)?,
            None => canonical.push(range),
        }
    }
    Ok(canonical)
}
