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

use std::io;
use std::io::Write;

use crate::Error;
use crate::trap::Trap;

/// The trap used by a dispatcher unless [`DispatcherBuilder::trap`] overrides it.
///
/// Sink failures, failed flushes and commands that could not be enqueued are printed on standard
/// error, one per line, tagged with `logroute:`. Nothing is retried, and a closed standard error
/// silently swallows the report.
///
/// [`DispatcherBuilder::trap`]: crate::DispatcherBuilder::trap
#[derive(Debug, Default)]
#[non_exhaustive]
pub struct DefaultTrap {}

impl Trap for DefaultTrap {
    fn trap(&self, err: &Error) {
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "logroute: {err}");
    }
}
