// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Severity levels.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// An enum representing the available severities of a log message.
///
/// Levels are totally ordered from the most verbose to the least:
///
/// ```text
/// All < Trace < Debug < Info < Warning < Error < None
/// ```
///
/// A message is delivered when its level is greater than or equal to the current threshold.
/// `All` as a threshold lets everything through, and `None` as a threshold disables all output.
/// `None` is not a valid level for a message.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Level {
    /// Enables every message when used as a threshold.
    All = 0,
    /// Designates very low priority, often extremely verbose, information.
    Trace = 1,
    /// Designates lower priority information.
    Debug = 2,
    /// Designates useful information.
    Info = 3,
    /// Designates hazardous situations.
    Warning = 4,
    /// Designates serious errors.
    Error = 5,
    /// Disables every message when used as a threshold.
    None = 6,
}

impl Level {
    /// Return the 4-character label of the `Level`.
    ///
    /// This returns the same string as the `fmt::Display` implementation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::All => "ALL ",
            Level::Trace => "TRC ",
            Level::Debug => "DBG ",
            Level::Info => "INFO",
            Level::Warning => "WARN",
            Level::Error => "ERR ",
            Level::None => "NONE",
        }
    }

    /// Convert a raw discriminant back into a `Level`.
    ///
    /// # Examples
    ///
    /// ```
    /// use logroute::Level;
    ///
    /// assert_eq!(Level::from_repr(4), Some(Level::Warning));
    /// assert_eq!(Level::from_repr(7), None);
    /// ```
    pub const fn from_repr(repr: u8) -> Option<Level> {
        match repr {
            0 => Some(Level::All),
            1 => Some(Level::Trace),
            2 => Some(Level::Debug),
            3 => Some(Level::Info),
            4 => Some(Level::Warning),
            5 => Some(Level::Error),
            6 => Some(Level::None),
            _ => None,
        }
    }

    /// Return whether a message at this level passes the given threshold.
    pub fn passes(self, threshold: Level) -> bool {
        self >= threshold
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl TryFrom<u8> for Level {
    type Error = Error;

    fn try_from(repr: u8) -> Result<Level, Error> {
        Level::from_repr(repr)
            .ok_or_else(|| Error::new("invalid level").with_context("repr", repr))
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Level, Self::Err> {
        for (names, level) in [
            (&["all"][..], Level::All),
            (&["trace", "trc"][..], Level::Trace),
            (&["debug", "dbg"][..], Level::Debug),
            (&["info"][..], Level::Info),
            (&["warning", "warn"][..], Level::Warning),
            (&["error", "err"][..], Level::Error),
            (&["none", "off"][..], Level::None),
        ] {
            if names.iter().any(|name| s.trim().eq_ignore_ascii_case(name)) {
                return Ok(level);
            }
        }

        Err(Error::new(format!("malformed level: {s:?}")))
    }
}
