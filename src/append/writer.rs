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

use crate::Error;
use crate::append::Append;

/// An appender that writes log lines to any [`io::Write`] handle, such as a file or a socket.
///
/// The handle is not buffered by the appender; wrap it in [`io::BufWriter`] if needed and call
/// [`Logger::flush`](crate::Logger::flush) to push buffered lines out.
///
/// # Examples
///
/// ```no_run
/// use std::fs::File;
///
/// use logroute::Sink;
/// use logroute::append::Writer;
///
/// let file = File::create("app.log").unwrap();
/// let sink = Sink::new("file", Writer::new(file));
/// ```
pub struct Writer<W> {
    inner: W,
}

impl<W> std::fmt::Debug for Writer<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Writer").finish_non_exhaustive()
    }
}

impl<W: io::Write + Send + 'static> Writer<W> {
    /// Create an appender writing to `inner`.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: io::Write + Send + 'static> Append for Writer<W> {
    fn append(&mut self, line: &str) -> Result<(), Error> {
        let mut bytes = Vec::with_capacity(line.len() + 1);
        bytes.extend_from_slice(line.as_bytes());
        bytes.push(b'\n');
        self.inner.write_all(&bytes).map_err(Error::from_io_error)
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.inner.flush().map_err(Error::from_io_error)
    }
}
