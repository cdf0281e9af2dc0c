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
use std::time::SystemTime;

use crossbeam_channel::Receiver;
use jiff::Timestamp;
use jiff::tz::TimeZone;

use crate::Error;
use crate::Level;
use crate::Sink;
use crate::Trap;
use crate::dispatcher::Command;
use crate::layout::Context;
use crate::record::Message;

/// The state owned by the dispatcher thread.
#[derive(Debug)]
pub(crate) struct Dispatcher {
    sinks: Vec<Sink>,
    level: Level,
    prefix: String,
    start: SystemTime,
    timezone: TimeZone,
    trap: Arc<dyn Trap>,
}

impl Dispatcher {
    pub(crate) fn new(
        sinks: Vec<Sink>,
        level: Level,
        timezone: TimeZone,
        trap: Arc<dyn Trap>,
    ) -> Self {
        Self {
            sinks,
            level,
            prefix: String::new(),
            start: SystemTime::now(),
            timezone,
            trap,
        }
    }

    pub(crate) fn handle(&mut self, command: Command) {
        match command {
            Command::AddSink(sink) => {
                let mut sink = *sink;
                sink.set_prefix(&self.prefix);
                self.sinks.push(sink);
            }
            Command::RemoveSink(name) => {
                self.sinks.retain(|sink| sink.name() != name);
            }
            Command::SetLevel(level) => {
                self.level = level;
            }
            Command::SetPrefix(prefix) => {
                for sink in self.sinks.iter_mut() {
                    sink.set_prefix(&prefix);
                }
                self.prefix = prefix;
            }
            Command::Log(message) => {
                self.deliver(&message);
            }
            Command::Flush(done) => {
                self.flush();
                // the requester may have given up waiting
                let _ = done.send(());
            }
        }
    }

    fn deliver(&mut self, message: &Message) {
        if !message.level().passes(self.level) {
            return;
        }

        let tags = message.tags();
        let selected: Vec<usize> = self
            .sinks
            .iter()
            .enumerate()
            .filter(|(_, sink)| sink.accepts(tags))
            .map(|(index, _)| index)
            .collect();
        if selected.is_empty() {
            return;
        }

        let needs_caller = selected.iter().any(|&index| self.sinks[index].needs_caller());
        let ctx = self.make_context(message, needs_caller);

        for index in selected {
            let sink = &mut self.sinks[index];
            if let Err(err) = sink.write(&ctx) {
                let err = Error::new("failed to append log line")
                    .with_context("sink", sink.name())
                    .with_source(err);
                self.trap.trap(&err);
            }
        }
    }

    fn make_context(&self, message: &Message, needs_caller: bool) -> Context {
        let mut ctx = Context::new(message.level(), message.body())
            .with_time(self.format_time(message.time()))
            .with_duration(self.format_duration(message.time()));
        if let Some(subject) = message.subject() {
            ctx = ctx.with_subject(subject.render());
        }
        if needs_caller {
            ctx = ctx.with_caller(message.caller());
        }
        ctx
    }

    fn format_time(&self, time: SystemTime) -> String {
        match Timestamp::try_from(time) {
            Ok(ts) => {
                let offset = self.timezone.to_offset(ts);
                format!("{:.6}", ts.display_with_offset(offset))
            }
            Err(_) => String::new(),
        }
    }

    fn format_duration(&self, time: SystemTime) -> String {
        let elapsed = time.duration_since(self.start).unwrap_or_default();
        format!("{elapsed:?}")
    }

    pub(crate) fn flush(&mut self) {
        for sink in self.sinks.iter_mut() {
            if let Err(err) = sink.flush() {
                let err = Error::new("failed to flush sink")
                    .with_context("sink", sink.name())
                    .with_source(err);
                self.trap.trap(&err);
            }
        }
    }
}

pub(crate) struct Worker {
    receiver: Receiver<Command>,
    dispatcher: Dispatcher,
}

impl Worker {
    pub(crate) fn new(receiver: Receiver<Command>, dispatcher: Dispatcher) -> Self {
        Self {
            receiver,
            dispatcher,
        }
    }

    pub(crate) fn run(self) {
        let Self {
            receiver,
            mut dispatcher,
        } = self;

        while let Ok(command) = receiver.recv() {
            dispatcher.handle(command);
        }

        // all senders are gone; the queue has been drained
        dispatcher.flush();
    }
}
