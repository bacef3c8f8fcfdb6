//! IMGT/HLA database release labels.
//!
//! Releases are written `3.25.0` but history files encode them as column
//! codes without dots, with the middle field padded to two digits:
//!
//! | Label | Column code |
//! |-------|-------------|
//! | `3.1.0` | `3010` |
//! | `3.20.0` | `3200` |
//! | `3.25.0` | `3250` |
//!
//! The encoding only has room for a two-digit minor and a one-digit patch,
//! so labels such as `3.100.0` or `3.25.10` are rejected.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::GlError;

/// A database release, ordered by release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DbVersion {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

impl DbVersion {
    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// History file column code, e.g. `3250` for `3.25.0`
    pub fn column_code(&self) -> String {
        format!("{}{:02}{}", self.major, self.minor, self.patch)
    }

    /// Parse a dotted label (`3.25.0`)
    pub fn from_label(label: &str) -> Result<Self, GlError> {
        let invalid = || GlError::InvalidVersion {
            version: label.to_string(),
        };
        let parts = label
            .split('.')
            .map(|p| p.parse::<u16>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;
        match parts.as_slice() {
            [major, minor, patch] if *minor <= 99 && *patch <= 9 => {
                Ok(Self::new(*major, *minor, *patch))
            }
            _ => Err(invalid()),
        }
    }

    /// Parse a history column code (`3250`)
    pub fn from_column_code(code: &str) -> Result<Self, GlError> {
        let invalid = || GlError::InvalidVersion {
            version: code.to_string(),
        };
        if code.len() < 4 || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let n = code.len();
        let number = |s: &str| s.parse::<u16>().map_err(|_| invalid());
        Ok(Self::new(
            number(&code[..n - 3])?,
            number(&code[n - 3..n - 1])?,
            number(&code[n - 1..])?,
        ))
    }
}

impl FromStr for DbVersion {
    type Err = GlError;

    /// Accepts either form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.contains('.') {
            Self::from_label(s)
        } else {
            Self::from_column_code(s)
        }
    }
}

impl fmt::Display for DbVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl Serialize for DbVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
