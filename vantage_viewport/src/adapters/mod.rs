// Copyright 2025 the Vantage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`Host`](crate::Host) implementations for concrete scene graphs.

#[cfg(feature = "scene_adapter")]
pub mod scene;
