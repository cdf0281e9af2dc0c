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

//! Layouts for rendering log messages into lines.

use std::fmt;

use crate::Caller;
use crate::Level;

mod fixed;
mod template;

pub use self::fixed::FixedLayout;
pub use self::template::TemplateLayout;

/// A layout for rendering a message context into one output line.
///
/// Layouts are pure: they must not fail and must not have side effects. Fields missing from the
/// context render as empty strings.
pub trait Layout: fmt::Debug + Send + Sync + 'static {
    /// Render the context into a line, without a trailing newline.
    fn format(&self, ctx: &Context) -> String;

    /// Whether this layout renders the caller's function name or line.
    ///
    /// Default to `false`.
    fn needs_caller(&self) -> bool {
        false
    }
}

impl<T: Layout> From<T> for Box<dyn Layout> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}

/// A field of [`Context`] that a template can reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    /// The calling function, `FUNCTION`.
    Function,
    /// The calling line, `LINE`.
    Line,
    /// The observed time, `TIME`.
    Time,
    /// The time elapsed since the dispatcher started, `DURATION`.
    Duration,
    /// The subject, `SUBJECT`.
    Subject,
    /// The level label, `LEVEL`.
    Level,
    /// The interpolated body, `MESSAGE`.
    Message,
}

impl Token {
    /// All tokens.
    pub const ALL: [Token; 7] = [
        Token::Function,
        Token::Line,
        Token::Time,
        Token::Duration,
        Token::Subject,
        Token::Level,
        Token::Message,
    ];

    /// The literal that a template uses to reference this token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Token::Function => "FUNCTION",
            Token::Line => "LINE",
            Token::Time => "TIME",
            Token::Duration => "DURATION",
            Token::Subject => "SUBJECT",
            Token::Level => "LEVEL",
            Token::Message => "MESSAGE",
        }
    }
}

/// The derived fields of a message, fully populated before any layout runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Context {
    level: Level,
    function: String,
    line: String,
    time: String,
    duration: String,
    subject: Option<String>,
    message: String,
}

impl Context {
    /// Create a context with a level and a body; every other field is empty.
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            function: String::new(),
            line: String::new(),
            time: String::new(),
            duration: String::new(),
            subject: None,
            message: message.into(),
        }
    }

    /// Set the subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the function and line from a caller. An unknown caller leaves both empty.
    pub fn with_caller(mut self, caller: &Caller) -> Self {
        self.function = caller.function().to_owned();
        self.line = if caller.is_known() {
            caller.line().to_string()
        } else {
            String::new()
        };
        self
    }

    /// Set the function name and line verbatim.
    pub fn with_function_line(
        mut self,
        function: impl Into<String>,
        line: impl Into<String>,
    ) -> Self {
        self.function = function.into();
        self.line = line.into();
        self
    }

    /// Set the rendered time.
    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = time.into();
        self
    }

    /// Set the rendered duration.
    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = duration.into();
        self
    }

    /// The level of the message.
    pub fn level(&self) -> Level {
        self.level
    }

    /// The subject, if the message has one.
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// The interpolated body.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Look up the rendered value of a token.
    pub fn get(&self, token: Token) -> &str {
        match token {
            Token::Function => &self.function,
            Token::Line => &self.line,
            Token::Time => &self.time,
            Token::Duration => &self.duration,
            Token::Subject => self.subject.as_deref().unwrap_or_default(),
            Token::Level => self.level.as_str(),
            Token::Message => &self.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_are_empty() {
        let ctx = Context::new(Level::Info, "hello");
        assert_eq!(ctx.get(Token::Function), "");
        assert_eq!(ctx.get(Token::Line), "");
        assert_eq!(ctx.get(Token::Subject), "");
        assert_eq!(ctx.get(Token::Level), "INFO");
        assert_eq!(ctx.get(Token::Message), "hello");
    }

    #[test]
    fn unknown_caller_has_no_line() {
        let ctx = Context::new(Level::Info, "").with_caller(&Caller::none());
        assert_eq!(ctx.get(Token::Line), "");

        let ctx = Context::new(Level::Info, "").with_caller(&Caller::new("f", "a.rs", 7));
        assert_eq!(ctx.get(Token::Function), "f");
        assert_eq!(ctx.get(Token::Line), "7");
    }
}
