// Copyright 2026 the Vigil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View tree configuration.

/// Tunable behavior of a [`ViewTree`](crate::view::ViewTree).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeConfig {
    /// When `true`, every outermost `tick` and `detect_changes` pass is
    /// followed by a verification pass over the same subtree, and any
    /// binding that changed in between is reported as
    /// [`CheckError::ExpressionChanged`](crate::CheckError::ExpressionChanged).
    pub dev_mode: bool,
}

impl TreeConfig {
    /// Development preset: verification passes enabled.
    #[must_use]
    pub const fn development() -> Self {
        Self { dev_mode: true }
    }

    /// Production preset: no verification passes.
    #[must_use]
    pub const fn production() -> Self {
        Self { dev_mode: false }
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self::development()
    }
}
