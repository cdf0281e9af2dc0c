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

//! The dispatcher thread and the commands it serializes.
//!
//! All mutable logging state (the sink list, the threshold, the prefix) lives on one dedicated
//! thread. Producers only enqueue [`Command`]s on a single FIFO queue, so every registration,
//! configuration change and delivery is observed in arrival order and no lock guards the state.

use crossbeam_channel::Sender;

use crate::Level;
use crate::Sink;
use crate::record::Message;

mod builder;
mod state;
mod worker;

pub use self::builder::DispatcherBuilder;
pub(crate) use self::state::DispatcherState;
pub(crate) use self::worker::Dispatcher;

/// Overflow policy for the dispatcher queue.
///
/// When the queue is full, an incoming log message is handled according to the specified
/// policy. Control commands (sink registration, level and prefix changes, flushes) always block.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[non_exhaustive]
pub enum Overflow {
    /// Blocks until the queue is not full.
    Block,
    /// Drops the incoming message and counts it.
    DropIncoming,
}

#[derive(Debug)]
pub(crate) enum Command {
    AddSink(Box<Sink>),
    RemoveSink(String),
    SetLevel(Level),
    SetPrefix(String),
    Log(Box<Message>),
    Flush(Sender<()>),
}

impl Command {
    fn describe(&self) -> &'static str {
        match self {
            Command::AddSink(_) => "failed to send add-sink command to dispatcher",
            Command::RemoveSink(_) => "failed to send remove-sink command to dispatcher",
            Command::SetLevel(_) => "failed to send set-level command to dispatcher",
            Command::SetPrefix(_) => "failed to send set-prefix command to dispatcher",
            Command::Log(_) => "failed to send log command to dispatcher",
            Command::Flush(_) => "failed to send flush command to dispatcher",
        }
    }
}
