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

/// Log a message, capturing the calling function, file and line.
///
/// The first argument is the [`Level`](crate::Level). It may be preceded by `logger: <expr>` to
/// log on a specific [`Logger`](crate::Logger) instead of the process-wide one, and followed by
/// `subject: <expr>` and `tags: [..]` before the format string. Placeholders in the format string
/// are `{}` and `{N}`; arguments are moved to the dispatcher and formatted there.
///
/// # Examples
///
/// ```
/// use logroute::Level;
///
/// let logger = logroute::DispatcherBuilder::new("macros").build();
/// logroute::log!(logger: &logger, Level::Warning, subject: "auth", "failed {} times", 3);
/// logroute::log!(logger: &logger, Level::Error, tags: ["db"], "connection lost");
/// ```
#[macro_export]
macro_rules! log {
    (logger: $logger:expr, $level:expr, $($rest:tt)+) => {
        $crate::__log!(@parse $logger, $level, subject: None, tags: [], $($rest)+)
    };
    ($level:expr, $($rest:tt)+) => {
        $crate::__log!(@parse $crate::default_logger(), $level, subject: None, tags: [], $($rest)+)
    };
}

/// Parse the optional `subject:` and `tags:` arguments of [`log!`](crate::log).
#[doc(hidden)]
#[macro_export]
macro_rules! __log {
    (@parse $logger:expr, $level:expr, subject: $_old:expr, tags: [$($tag:expr),*], subject: $subject:expr, $($rest:tt)+) => {
        $crate::__log!(
            @parse $logger, $level,
            subject: Some($crate::Arg::from($subject)),
            tags: [$($tag),*],
            $($rest)+
        )
    };
    (@parse $logger:expr, $level:expr, subject: $subject:expr, tags: [$($_old:expr),*], tags: [$($tag:expr),* $(,)?], $($rest:tt)+) => {
        $crate::__log!(@parse $logger, $level, subject: $subject, tags: [$($tag),*], $($rest)+)
    };
    (@parse $logger:expr, $level:expr, subject: $subject:expr, tags: [$($tag:expr),*], $format:expr $(, $arg:expr)* $(,)?) => {{
        let message = $crate::Message::builder($level, $format)
            .subject_opt($subject)
            $(.tag($tag))*
            $(.arg($arg))*
            .caller($crate::caller!())
            .build();
        ($logger).send(message);
    }};
}

/// Log a message at [`Level::Trace`](crate::Level::Trace). See [`log!`](crate::log).
#[macro_export]
macro_rules! trace {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::Level::Trace, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::Trace, $($arg)+)
    };
}

/// Log a message at [`Level::Debug`](crate::Level::Debug). See [`log!`](crate::log).
#[macro_export]
macro_rules! debug {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::Level::Debug, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::Debug, $($arg)+)
    };
}

/// Log a message at [`Level::Info`](crate::Level::Info). See [`log!`](crate::log).
#[macro_export]
macro_rules! info {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::Level::Info, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::Info, $($arg)+)
    };
}

/// Log a message at [`Level::Warning`](crate::Level::Warning). See [`log!`](crate::log).
#[macro_export]
macro_rules! warn {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::Level::Warning, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::Warning, $($arg)+)
    };
}

/// Log a message at [`Level::Error`](crate::Level::Error). See [`log!`](crate::log).
#[macro_export]
macro_rules! error {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::Level::Error, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::Level::Error, $($arg)+)
    };
}
