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
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::thread;
use std::thread::JoinHandle;

use crossbeam_channel::Sender;
use crossbeam_channel::TrySendError;

use crate::Error;
use crate::Trap;
use crate::dispatcher::Command;
use crate::dispatcher::Overflow;

#[derive(Debug)]
pub(crate) struct DispatcherState {
    state: Option<State>,
    dropped: AtomicU64,
    trap: Arc<dyn Trap>,
}

#[derive(Debug)]
struct State {
    overflow: Overflow,
    sender: Sender<Command>,
    handle: JoinHandle<()>,
}

impl DispatcherState {
    pub(crate) fn new(
        overflow: Overflow,
        sender: Sender<Command>,
        handle: JoinHandle<()>,
        trap: Arc<dyn Trap>,
    ) -> Self {
        Self {
            state: Some(State {
                overflow,
                sender,
                handle,
            }),
            dropped: AtomicU64::new(0),
            trap,
        }
    }

    pub(crate) fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub(crate) fn trap(&self) -> &dyn Trap {
        self.trap.as_ref()
    }

    /// Whether the caller runs on this dispatcher's own thread, e.g. inside a sink or while an
    /// argument is formatted.
    pub(crate) fn on_dispatcher_thread(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(|state| is_current(&state.handle))
    }

    /// Enqueue a command, honoring the overflow policy for log commands.
    ///
    /// Commands sent from the dispatcher thread itself never block: the dispatcher is the only
    /// consumer of its queue.
    pub(crate) fn send_command(&self, command: Command) -> Result<(), Error> {
        let Some(State {
            overflow,
            sender,
            handle,
        }) = self.state.as_ref()
        else {
            return Err(Error::new(command.describe()).with_context("reason", "dispatcher stopped"));
        };

        let droppable = matches!(command, Command::Log(_));
        let reentrant = is_current(handle);
        if !reentrant && !(droppable && matches!(overflow, Overflow::DropIncoming)) {
            return sender
                .send(command)
                .map_err(|err| Error::new(err.0.describe()));
        }

        match sender.try_send(command) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) if droppable => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(TrySendError::Full(command)) => Err(Error::new(command.describe())
                .with_context("reason", "queue full on dispatcher thread")),
            Err(TrySendError::Disconnected(command)) => Err(Error::new(command.describe())),
        }
    }
}

fn is_current(handle: &JoinHandle<()>) -> bool {
    handle.thread().id() == thread::current().id()
}

impl Drop for DispatcherState {
    fn drop(&mut self) {
        let Some(State {
            overflow: _,
            sender,
            handle,
        }) = self.state.take()
        else {
            return;
        };

        // drop our sender, the dispatcher breaks its loop after draining the queue
        drop(sender);

        // the last handle was released by a message or sink owned by the dispatcher; it cannot
        // join itself and exits on its own once the queue is drained
        if is_current(&handle) {
            return;
        }

        if handle.join().is_err() {
            self.trap.trap(&Error::new("dispatcher thread panicked"));
        }
    }
}
