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

use std::sync::Arc;

use jiff::tz::TimeZone;

use crate::Error;
use crate::Level;
use crate::Logger;
use crate::Sink;
use crate::Trap;
use crate::append::Stdout;
use crate::dispatcher::Dispatcher;
use crate::dispatcher::DispatcherState;
use crate::dispatcher::Overflow;
use crate::dispatcher::worker::Worker;
use crate::trap::DefaultTrap;

const DEFAULT_BUFFERED_LINES_LIMIT: usize = 256;

/// A builder for configuring a dispatcher and the [`Logger`] that feeds it.
///
/// By default the dispatcher starts with one sink named `"default"` that writes to stdout with
/// the [`FixedLayout`](crate::layout::FixedLayout), the threshold is [`Level::Info`], the queue
/// holds 256 commands and producers block when it is full.
///
/// # Examples
///
/// ```
/// use logroute::DispatcherBuilder;
/// use logroute::Level;
/// use logroute::Sink;
/// use logroute::append::Stderr;
///
/// let logger = DispatcherBuilder::new("logroute-dispatcher")
///     .level(Level::Debug)
///     .no_default_sink()
///     .sink(Sink::new("stderr", Stderr::default()))
///     .build();
/// ```
#[must_use = "call `build` to start the dispatcher"]
#[derive(Debug)]
pub struct DispatcherBuilder {
    thread_name: String,
    buffered_lines_limit: Option<usize>,
    overflow: Overflow,
    trap: Box<dyn Trap>,
    level: Level,
    timezone: TimeZone,
    default_sink: bool,
    sinks: Vec<Sink>,
}

impl DispatcherBuilder {
    /// Create a new dispatcher builder.
    pub fn new(thread_name: impl Into<String>) -> DispatcherBuilder {
        DispatcherBuilder {
            thread_name: thread_name.into(),
            buffered_lines_limit: Some(DEFAULT_BUFFERED_LINES_LIMIT),
            overflow: Overflow::Block,
            trap: Box::new(DefaultTrap::default()),
            level: Level::Info,
            timezone: TimeZone::system(),
            default_sink: true,
            sinks: vec![],
        }
    }

    /// Set the capacity of the command queue. `None` makes the queue unbounded.
    pub fn buffered_lines_limit(mut self, buffered_lines_limit: Option<usize>) -> Self {
        self.buffered_lines_limit = buffered_lines_limit;
        self
    }

    /// Set the overflow policy to block when the queue is full.
    pub fn overflow_block(mut self) -> Self {
        self.overflow = Overflow::Block;
        self
    }

    /// Set the overflow policy to drop incoming messages when the queue is full.
    pub fn overflow_drop_incoming(mut self) -> Self {
        self.overflow = Overflow::DropIncoming;
        self
    }

    /// Set the trap for errors raised on the dispatcher thread.
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    /// Set the initial threshold.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Read the initial threshold from an environment variable.
    ///
    /// Unset or malformed values leave the threshold unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use logroute::DispatcherBuilder;
    ///
    /// let logger = DispatcherBuilder::new("logroute-dispatcher")
    ///     .level_from_env("LOGROUTE_LEVEL")
    ///     .build();
    /// ```
    pub fn level_from_env(mut self, var: &str) -> Self {
        if let Some(level) = std::env::var(var).ok().and_then(|v| v.parse().ok()) {
            self.level = level;
        }
        self
    }

    /// Set the time zone used to render the `TIME` field.
    ///
    /// Defaults to the system time zone.
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.timezone = tz;
        self
    }

    /// Do not register the `"default"` stdout sink.
    pub fn no_default_sink(mut self) -> Self {
        self.default_sink = false;
        self
    }

    /// Register a sink before the dispatcher starts.
    pub fn sink(mut self, sink: Sink) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Start the dispatcher thread.
    ///
    /// # Errors
    ///
    /// Return an error if the thread cannot be spawned.
    pub fn try_build(self) -> Result<Logger, Error> {
        let Self {
            thread_name,
            buffered_lines_limit,
            overflow,
            trap,
            level,
            timezone,
            default_sink,
            sinks,
        } = self;

        let trap: Arc<dyn Trap> = Arc::from(trap);

        let mut all_sinks = Vec::with_capacity(sinks.len() + 1);
        if default_sink {
            all_sinks.push(Sink::new("default", Stdout::default()));
        }
        all_sinks.extend(sinks);

        let (sender, receiver) = match buffered_lines_limit {
            Some(limit) => crossbeam_channel::bounded(limit),
            None => crossbeam_channel::unbounded(),
        };

        let dispatcher = Dispatcher::new(all_sinks, level, timezone, trap.clone());
        let worker = Worker::new(receiver, dispatcher);
        let handle = std::thread::Builder::new()
            .name(thread_name)
            .spawn(move || worker.run())
            .map_err(|err| Error::new("failed to spawn dispatcher thread").with_source(err))?;

        let state = DispatcherState::new(overflow, sender, handle, trap);
        Ok(Logger::new(state))
    }

    /// Start the dispatcher thread.
    ///
    /// # Panics
    ///
    /// Panic if the thread cannot be spawned.
    pub fn build(self) -> Logger {
        self.try_build().expect("failed to spawn dispatcher thread")
    }
}
