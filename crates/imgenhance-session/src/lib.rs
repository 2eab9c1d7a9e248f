// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// imgenhance-session — The command surface a UI talks to.
//
// `EnhancerSession` owns the loaded image, the current parameters, a dirty
// flag and the last render, and notifies subscribers of every change.
// `BackgroundRenderer` offloads renders to blocking worker threads and only
// ever publishes the newest result for the current image.

pub mod background;
pub mod events;
pub mod session;

pub use background::{BackgroundRenderer, RenderOutcome};
pub use events::SessionEvent;
pub use session::{EnhancerSession, ImageInfo, SessionSnapshot};
