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

//! Error type for the matview crates.

use thiserror::Error;

/// Result type used throughout the matview crates.
pub type Result<T> = std::result::Result<T, MatviewError>;

/// Fatal errors raised by the rewriter.
///
/// Per-candidate rewrite rejections are *not* errors; they are modeled as
/// data (`RewriteFailure` in the optimizer crate) and abort only the
/// candidate under consideration.
#[derive(Debug, Error)]
pub enum MatviewError {
    /// A plan was handed to the engine that violates an invariant the
    /// caller is expected to uphold.
    #[error("Invalid plan: {0}")]
    Plan(String),

    /// An invariant inside the engine was violated. Reaching this is a bug.
    #[error("Internal error: {0}. This was likely caused by a bug in \
             matview's code and we would welcome that you file an bug report \
             in our issue tracker")]
    Internal(String),

    /// A literal of a type the range algebra does not order.
    #[error("Unsupported literal type in range comparison: {0}")]
    UnsupportedRangeType(String),
}
