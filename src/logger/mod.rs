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

//! The ingestion API.

use std::borrow::Cow;
use std::sync::Arc;
use std::sync::OnceLock;

use crossbeam_channel::bounded;

use crate::Caller;
use crate::DispatcherBuilder;
use crate::Error;
use crate::Level;
use crate::Sink;
use crate::dispatcher::Command;
use crate::dispatcher::DispatcherState;
use crate::record::Arg;
use crate::record::Message;

/// A handle to a running dispatcher.
///
/// Every method only enqueues a command and returns; the dispatcher thread applies commands in
/// the order they were enqueued. Cloning a `Logger` is cheap and every clone feeds the same
/// dispatcher. When the last clone is dropped, the dispatcher drains its queue, flushes every
/// sink and exits.
///
/// # Examples
///
/// ```
/// use logroute::DispatcherBuilder;
/// use logroute::Level;
/// use logroute::Sink;
/// use logroute::append::Testing;
///
/// let logger = DispatcherBuilder::new("example").no_default_sink().build();
/// logger.add_sink(Sink::new("test", Testing::default()).with_tags(["db"]));
/// logger.set_level(Level::Debug);
/// logroute::debug!(logger: &logger, tags: ["db"], "connected to {}", "primary");
/// logger.flush().unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct Logger {
    state: Arc<DispatcherState>,
}

impl Logger {
    pub(crate) fn new(state: DispatcherState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Log a message without tags.
    ///
    /// The file and line of the caller are captured; use the [`log!`](crate::log) macros to also
    /// capture the function name or to attach tags.
    #[track_caller]
    pub fn log(
        &self,
        level: Level,
        subject: Option<Arg>,
        format: impl Into<Cow<'static, str>>,
        args: Vec<Arg>,
    ) {
        let message = Message::builder(level, format)
            .subject_opt(subject)
            .args(args)
            .caller(Caller::location())
            .build();
        self.send(message);
    }

    /// Enqueue a fully built message.
    ///
    /// Messages at [`Level::None`] are discarded, since `None` only makes sense as a threshold.
    pub fn send(&self, message: Message) {
        if message.level() == Level::None {
            return;
        }
        self.enqueue(Command::Log(Box::new(message)));
    }

    /// Register a sink. Sinks with duplicate names are accepted.
    pub fn add_sink(&self, sink: Sink) {
        self.enqueue(Command::AddSink(Box::new(sink)));
    }

    /// Remove every sink with the given name. Removing an unknown name is a no-op.
    pub fn remove_sink(&self, name: impl Into<String>) {
        self.enqueue(Command::RemoveSink(name.into()));
    }

    /// Replace the threshold.
    pub fn set_level(&self, level: Level) {
        self.enqueue(Command::SetLevel(level));
    }

    /// Set the prefix written in front of every line on every sink.
    pub fn set_prefix(&self, prefix: impl Into<String>) {
        self.enqueue(Command::SetPrefix(prefix.into()));
    }

    /// Raise the threshold to [`Level::Warning`] when `production` is `true`.
    pub fn production(&self, production: bool) {
        if production {
            self.set_level(Level::Warning);
        }
    }

    /// Block until every command enqueued before this call has been handled and every sink has
    /// been flushed.
    ///
    /// # Errors
    ///
    /// Return an error if the dispatcher thread is gone, or if called from the dispatcher thread
    /// itself (from a sink or while formatting an argument), where waiting would never end.
    pub fn flush(&self) -> Result<(), Error> {
        if self.state.on_dispatcher_thread() {
            return Err(Error::new("cannot flush from the dispatcher thread"));
        }
        let (done, wait) = bounded(1);
        self.state.send_command(Command::Flush(done))?;
        wait.recv()
            .map_err(|_| Error::new("dispatcher stopped before flush completed"))
    }

    /// The number of messages discarded because the queue was full.
    ///
    /// Messages are only dropped when the dispatcher was built with
    /// [`overflow_drop_incoming`](DispatcherBuilder::overflow_drop_incoming), or when they are
    /// logged from the dispatcher thread itself while its queue is full.
    pub fn dropped(&self) -> u64 {
        self.state.dropped()
    }

    fn enqueue(&self, command: Command) {
        if let Err(err) = self.state.send_command(command) {
            self.report(&err);
        }
    }

    pub(crate) fn report(&self, err: &Error) {
        self.state.trap().trap(err);
    }
}

static DEFAULT_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Return the process-wide logger, starting it with the default configuration on first use.
///
/// The default configuration has one `"default"` sink on stdout and the [`Level::Info`]
/// threshold. Call [`set_default_logger`] before any logging to use another configuration.
pub fn default_logger() -> &'static Logger {
    DEFAULT_LOGGER.get_or_init(|| DispatcherBuilder::new("logroute-dispatcher").build())
}

/// Install the process-wide logger.
///
/// # Errors
///
/// Return the logger back if a process-wide logger has already been set or started.
pub fn set_default_logger(logger: Logger) -> Result<(), Logger> {
    DEFAULT_LOGGER.set(logger)
}

/// Log a message without tags on the process-wide logger.
#[track_caller]
pub fn log(
    level: Level,
    subject: Option<Arg>,
    format: impl Into<Cow<'static, str>>,
    args: Vec<Arg>,
) {
    default_logger().log(level, subject, format, args)
}

/// Register a sink on the process-wide logger.
pub fn add_sink(sink: Sink) {
    default_logger().add_sink(sink)
}

/// Remove every sink with the given name from the process-wide logger.
pub fn remove_sink(name: impl Into<String>) {
    default_logger().remove_sink(name)
}

/// Replace the threshold of the process-wide logger.
pub fn set_level(level: Level) {
    default_logger().set_level(level)
}

/// Set the line prefix of the process-wide logger.
pub fn set_prefix(prefix: impl Into<String>) {
    default_logger().set_prefix(prefix)
}

/// Raise the threshold of the process-wide logger to [`Level::Warning`] in production.
pub fn production(production: bool) {
    default_logger().production(production)
}

/// Flush the process-wide logger. See [`Logger::flush`].
pub fn flush() -> Result<(), Error> {
    default_logger().flush()
}
