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

//! Log messages as they travel from producers to the dispatcher.

use std::borrow::Cow;
use std::fmt;
use std::fmt::Write;
use std::time::SystemTime;

use crate::Caller;
use crate::Level;

/// An owned, displayable argument of a log message.
///
/// Arguments are moved to the dispatcher thread and only formatted there, and only when at least
/// one sink accepts the message. Use [`Arg::render`] to format one by hand.
pub struct Arg(Box<dyn fmt::Display + Send>);

impl Arg {
    /// Wrap a displayable value.
    pub fn new(value: impl fmt::Display + Send + 'static) -> Self {
        Self(Box::new(value))
    }
}

impl<T: fmt::Display + Send + 'static> From<T> for Arg {
    fn from(value: T) -> Self {
        Arg::new(value)
    }
}

impl Arg {
    /// Format the argument into a new string.
    pub fn render(&self) -> String {
        self.0.to_string()
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Arg").field(&self.render()).finish()
    }
}

/// A log message.
#[derive(Debug)]
pub struct Message {
    // the observed time
    time: SystemTime,

    level: Level,
    subject: Option<Arg>,
    tags: Vec<String>,
    caller: Caller,

    // the payload, interpolated on the dispatcher
    format: Cow<'static, str>,
    args: Vec<Arg>,
}

impl Message {
    /// Returns a new builder.
    pub fn builder(level: Level, format: impl Into<Cow<'static, str>>) -> MessageBuilder {
        MessageBuilder {
            message: Message {
                time: SystemTime::now(),
                level,
                subject: None,
                tags: vec![],
                caller: Caller::none(),
                format: format.into(),
                args: vec![],
            },
        }
    }

    /// The observed time.
    pub fn time(&self) -> SystemTime {
        self.time
    }

    /// The severity of the message.
    pub fn level(&self) -> Level {
        self.level
    }

    /// The subject of the message, if any.
    pub fn subject(&self) -> Option<&Arg> {
        self.subject.as_ref()
    }

    /// The routing tags of the message.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// The call site of the message.
    pub fn caller(&self) -> &Caller {
        &self.caller
    }

    /// The format string before interpolation.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// The arguments before interpolation.
    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Interpolate the format string with the arguments.
    pub fn body(&self) -> String {
        interpolate(&self.format, &self.args)
    }
}

/// Builder for [`Message`].
#[derive(Debug)]
pub struct MessageBuilder {
    message: Message,
}

impl MessageBuilder {
    /// Set [`subject`](Message::subject).
    pub fn subject(mut self, subject: impl Into<Arg>) -> Self {
        self.message.subject = Some(subject.into());
        self
    }

    /// Set or clear [`subject`](Message::subject).
    pub fn subject_opt(mut self, subject: Option<Arg>) -> Self {
        self.message.subject = subject;
        self
    }

    /// Add one routing tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.message.tags.push(tag.into());
        self
    }

    /// Add routing tags.
    pub fn tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.message.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Add one format argument.
    pub fn arg(mut self, arg: impl Into<Arg>) -> Self {
        self.message.args.push(arg.into());
        self
    }

    /// Set all format arguments.
    pub fn args(mut self, args: Vec<Arg>) -> Self {
        self.message.args = args;
        self
    }

    /// Set [`caller`](Message::caller).
    pub fn caller(mut self, caller: Caller) -> Self {
        self.message.caller = caller;
        self
    }

    /// Set [`time`](Message::time).
    pub fn time(mut self, time: SystemTime) -> Self {
        self.message.time = time;
        self
    }

    /// Invoke the builder and return a `Message`.
    pub fn build(self) -> Message {
        self.message
    }
}

/// Substitute `{}` and `{N}` placeholders with arguments.
///
/// `{}` consumes the next argument in order, `{N}` refers to argument `N` and does not move the
/// cursor. `{{` and `}}` are literal braces. Placeholders without a matching argument are kept
/// verbatim; surplus arguments are ignored.
pub fn interpolate(format: &str, args: &[Arg]) -> String {
    let mut out = String::with_capacity(format.len());
    let mut next = 0;
    let mut rest = format;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") || tail.starts_with("}}") {
            out.push_str(&tail[..1]);
            rest = &tail[2..];
            continue;
        }
        if tail.starts_with('}') {
            out.push('}');
            rest = &tail[1..];
            continue;
        }

        let Some(end) = tail.find('}') else {
            out.push_str(tail);
            return out;
        };
        let spec = &tail[1..end];
        let arg = if spec.is_empty() {
            let arg = args.get(next);
            next += 1;
            arg
        } else {
            spec.parse::<usize>().ok().and_then(|index| args.get(index))
        };
        match arg {
            // SAFETY: write to a string always succeeds
            Some(arg) => write!(&mut out, "{}", arg.0).unwrap(),
            None => out.push_str(&tail[..=end]),
        }
        rest = &tail[end + 1..];
    }

    out.push_str(rest);
    out
}
