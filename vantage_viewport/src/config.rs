// Copyright 2025 the Vantage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// How a culling pass updates visibility.
///
/// Both strategies leave every indexed object visible exactly when its bound
/// intersects the frustum. They differ in cost.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RefreshStrategy {
    /// Hide every indexed object, then show the ones the query returns.
    ///
    /// Cost grows with the number of indexed objects on every pass.
    #[default]
    Reset,
    /// Compare against the previous pass and touch only objects whose
    /// visibility flips.
    ///
    /// Cost grows with the number of visible objects.
    Diff,
}

/// Viewport options.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportConfig {
    /// Logical viewport width.
    pub width: f64,
    /// Logical viewport height.
    pub height: f64,
    /// Keep a spatial index and toggle visibility on refresh.
    ///
    /// When off, child mutations go straight to the host and nothing is
    /// hidden.
    pub culling: bool,
    /// Visibility update strategy for culling passes.
    pub strategy: RefreshStrategy,
}

impl ViewportConfig {
    /// Culling on with [`RefreshStrategy::Reset`].
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            culling: true,
            strategy: RefreshStrategy::default(),
        }
    }

    /// Builder-style culling toggle.
    #[must_use]
    pub fn with_culling(mut self, culling: bool) -> Self {
        self.culling = culling;
        self
    }

    /// Builder-style strategy setter.
    #[must_use]
    pub fn with_strategy(mut self, strategy: RefreshStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}
