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

//! Logroute is a process-wide asynchronous logger that routes messages to named, tagged sinks.
//!
//! # Overview
//!
//! Producers hand messages to a [`Logger`], which only enqueues them. A dedicated dispatcher
//! thread owns every piece of mutable logging state (the registered [`Sink`]s, the threshold
//! [`Level`], the line prefix) and handles one command at a time, in arrival order. For each
//! message it checks the threshold, selects the sinks whose tag filters match, renders the line
//! with each sink's [`Layout`] and writes it to the sink's [`Append`].
//!
//! # Examples
//!
//! Log on the process-wide logger, which starts with one stdout sink named `"default"`:
//!
//! ```
//! logroute::warn!(subject: "auth", "failed {} times", 3);
//! logroute::flush().unwrap();
//! ```
//!
//! Route tagged messages to a dedicated sink with a template layout:
//!
//! ```
//! use logroute::DispatcherBuilder;
//! use logroute::Level;
//! use logroute::Sink;
//! use logroute::append::Stderr;
//! use logroute::layout::TemplateLayout;
//!
//! let logger = DispatcherBuilder::new("app-logger").build();
//! logger.add_sink(
//!     Sink::new("db", Stderr::default())
//!         .with_layout(TemplateLayout::new("TIME LEVEL FUNCTION:LINE MESSAGE"))
//!         .with_tags(["db"]),
//! );
//! logger.set_level(Level::Debug);
//!
//! logroute::debug!(logger: &logger, tags: ["db"], "query took {}ms", 12);
//! logger.remove_sink("db");
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![deny(missing_docs)]

pub mod append;
pub mod caller;
pub mod layout;
pub mod record;
pub mod trap;

mod dispatcher;
mod error;
mod level;
mod logger;
mod macros;
mod sink;

#[cfg(feature = "bridge-log")]
pub mod bridge;

pub use self::append::Append;
pub use self::caller::Caller;
pub use self::dispatcher::DispatcherBuilder;
pub use self::dispatcher::Overflow;
pub use self::error::Error;
pub use self::layout::Layout;
pub use self::level::Level;
pub use self::logger::Logger;
pub use self::logger::add_sink;
pub use self::logger::default_logger;
pub use self::logger::flush;
pub use self::logger::log;
pub use self::logger::production;
pub use self::logger::remove_sink;
pub use self::logger::set_default_logger;
pub use self::logger::set_level;
pub use self::logger::set_prefix;
pub use self::record::Arg;
pub use self::record::Message;
pub use self::sink::Sink;
pub use self::trap::Trap;
