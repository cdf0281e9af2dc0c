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

//! Call-site context for log messages.

use std::panic::Location;

/// The call site that produced a log message.
///
/// Rust has no runtime reflection over stack frames, so the call site is supplied by the
/// producer: the logging macros fill it with [`caller!`](crate::caller), [`Logger::log`] fills
/// the file and line through `#[track_caller]`, and callers may build one by hand or pass
/// [`Caller::none`].
///
/// [`Logger::log`]: crate::Logger::log
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Caller {
    function: &'static str,
    file: &'static str,
    line: u32,
}

impl Caller {
    /// Create a caller from its parts.
    pub const fn new(function: &'static str, file: &'static str, line: u32) -> Self {
        Self {
            function,
            file,
            line,
        }
    }

    /// A caller with no information. Renders as empty fields.
    pub const fn none() -> Self {
        Self::new("", "", 0)
    }

    /// Capture the file and line of the caller.
    ///
    /// The function name is left empty; use [`caller!`](crate::caller) to capture it as well.
    #[track_caller]
    pub fn location() -> Self {
        let location = Location::caller();
        Self::new("", location.file(), location.line())
    }

    /// Replace the function name.
    pub const fn with_function(mut self, function: &'static str) -> Self {
        self.function = function;
        self
    }

    /// The fully qualified name of the calling function, or an empty string if unknown.
    pub fn function(&self) -> &'static str {
        self.function
    }

    /// The source file of the call site, or an empty string if unknown.
    pub fn file(&self) -> &'static str {
        self.file
    }

    /// The line of the call site, `0` if unknown.
    pub fn line(&self) -> u32 {
        self.line
    }

    pub(crate) fn is_known(&self) -> bool {
        self.line != 0
    }
}

/// Return the type name of a value. Used by [`caller!`](crate::caller).
#[doc(hidden)]
pub fn type_name_of<T>(_: T) -> &'static str {
    std::any::type_name::<T>()
}

/// Capture the enclosing function name, file and line as a [`Caller`].
///
/// # Examples
///
/// ```
/// fn handle() -> logroute::Caller {
///     logroute::caller!()
/// }
///
/// let caller = handle();
/// assert!(caller.function().ends_with("handle"));
/// assert!(caller.line() > 0);
/// ```
#[macro_export]
macro_rules! caller {
    () => {{
        fn __logroute_here() {}
        let name = $crate::caller::type_name_of(__logroute_here);
        let name = name.strip_suffix("::__logroute_here").unwrap_or(name);
        let name = name.strip_suffix("::{{closure}}").unwrap_or(name);
        $crate::Caller::new(name, file!(), line!())
    }};
}
