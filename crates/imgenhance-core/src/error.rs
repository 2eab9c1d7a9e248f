// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for imgenhance.

use thiserror::Error;

/// Top-level error type for all imgenhance operations.
#[derive(Debug, Error)]
pub enum EnhanceError {
    // -- Image errors --
    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("failed to encode image: {0}")]
    Encode(String),

    // -- Session errors --
    #[error("no image loaded")]
    NoImageLoaded,

    #[error("unknown enhancement parameter: {0}")]
    UnknownParameter(String),

    #[error("render was cancelled before completion")]
    RenderCancelled,

    // -- Host I/O --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, EnhanceError>;
