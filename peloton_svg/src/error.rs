// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for loading tile drawings.

use core::fmt;

/// Why a tile drawing could not be loaded.
#[derive(Debug)]
pub enum SvgError {
    /// The text is not well-formed XML.
    Parse(roxmltree::Error),
    /// The document element is not `<svg>`.
    MissingSvgRoot {
        /// Local name of the element found instead.
        found: String,
    },
}

impl fmt::Display for SvgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "malformed tile drawing: {e}"),
            Self::MissingSvgRoot { found } => {
                write!(f, "tile drawing root is <{found}>, expected <svg>")
            }
        }
    }
}

impl std::error::Error for SvgError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::MissingSvgRoot { .. } => None,
        }
    }
}

impl From<roxmltree::Error> for SvgError {
    fn from(e: roxmltree::Error) -> Self {
        Self::Parse(e)
    }
}
