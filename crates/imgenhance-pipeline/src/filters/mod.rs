// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Filter module — per-pixel colour adjustments, Gaussian blur, and the
// ordered chain that composes them.

pub mod blur;
pub mod chain;
pub mod color;

pub use chain::{FilterChain, FilterStep};
