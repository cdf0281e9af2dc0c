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
use std::sync::Mutex;

use crossbeam_channel::Receiver;
use crossbeam_channel::Sender;
use logroute::Append;
use logroute::Arg;
use logroute::DispatcherBuilder;
use logroute::Error;
use logroute::Level;
use logroute::Logger;
use logroute::Message;
use logroute::Sink;
use logroute::Trap;
use logroute::layout::TemplateLayout;

#[derive(Debug, Clone, Default)]
struct Capture(Arc<Mutex<Vec<String>>>);

impl Capture {
    fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl Append for Capture {
    fn append(&mut self, line: &str) -> Result<(), Error> {
        self.0.lock().unwrap().push(line.to_owned());
        Ok(())
    }
}

fn logger() -> Logger {
    DispatcherBuilder::new("dispatch-test")
        .no_default_sink()
        .build()
}

#[test]
fn warning_with_subject_uses_fixed_layout() {
    let logger = logger();
    let s1 = Capture::default();
    logger.add_sink(Sink::new("s1", s1.clone()));

    logroute::log!(logger: &logger, Level::Warning, subject: "auth", "failed {} times", 3);
    logger.flush().unwrap();

    assert_eq!(s1.lines(), ["[WARN] auth, failed 3 times"]);
}

#[test]
fn below_threshold_is_dropped() {
    let logger = logger();
    let s1 = Capture::default();
    logger.add_sink(Sink::new("s1", s1.clone()));

    logger.log(Level::Debug, None, "tick", vec![]);
    logger.flush().unwrap();

    assert!(s1.lines().is_empty());
}

#[test]
fn every_level_against_every_threshold() {
    const LEVELS: [Level; 6] = [
        Level::All,
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Warning,
        Level::Error,
    ];

    let logger = logger();
    let sink = Capture::default();
    logger.add_sink(Sink::new("s", sink.clone()).with_layout(TemplateLayout::new("LEVEL")));

    let mut expected = vec![];
    for threshold in LEVELS.iter().copied().chain([Level::None]) {
        logger.set_level(threshold);
        for level in LEVELS {
            logger.send(Message::builder(level, "").build());
            if level >= threshold {
                expected.push(level.as_str().to_owned());
            }
        }
    }
    logger.flush().unwrap();

    assert_eq!(sink.lines(), expected);
}

#[test]
fn tag_filters_route_messages() {
    let logger = logger();
    let s1 = Capture::default();
    let s2 = Capture::default();
    logger.add_sink(Sink::new("s1", s1.clone()).with_tags(["db"]));
    logger.add_sink(Sink::new("s2", s2.clone()));

    logroute::error!(logger: &logger, tags: ["db"], "x");
    logroute::error!(logger: &logger, tags: ["http"], "y");
    logroute::error!(logger: &logger, "z");
    logger.flush().unwrap();

    assert_eq!(s1.lines(), ["[ERR ] x"]);
    assert_eq!(s2.lines(), ["[ERR ] x", "[ERR ] y", "[ERR ] z"]);
}

#[test]
fn removal_affects_only_later_messages() {
    let logger = logger();
    let sink = Capture::default();
    logger.add_sink(Sink::new("s", sink.clone()));

    logroute::info!(logger: &logger, "before");
    logger.remove_sink("s");
    logroute::info!(logger: &logger, "after");
    logger.remove_sink("s");
    logger.flush().unwrap();

    assert_eq!(sink.lines(), ["[INFO] before"]);
}

#[test]
fn set_level_is_ordered_with_messages() {
    let logger = logger();
    let sink = Capture::default();
    logger.add_sink(Sink::new("s", sink.clone()));

    logroute::debug!(logger: &logger, "hidden");
    logger.set_level(Level::Debug);
    logroute::debug!(logger: &logger, "shown");
    logger.production(true);
    logroute::info!(logger: &logger, "hidden again");
    logroute::warn!(logger: &logger, "loud");
    logger.flush().unwrap();

    assert_eq!(sink.lines(), ["[DBG ] shown", "[WARN] loud"]);
}

#[test]
fn none_is_not_a_message_level() {
    let logger = logger();
    let sink = Capture::default();
    logger.add_sink(Sink::new("s", sink.clone()));
    logger.set_level(Level::All);

    logger.log(Level::None, None, "never", vec![]);
    logger.log(Level::All, None, "always", vec![]);
    logger.flush().unwrap();

    assert_eq!(sink.lines(), ["[ALL ] always"]);
}

#[test]
fn prefix_decorates_every_sink() {
    let logger = logger();
    let a = Capture::default();
    let b = Capture::default();
    logger.add_sink(Sink::new("a", a.clone()));
    logger.add_sink(Sink::new("b", b.clone()).with_layout(TemplateLayout::new("MESSAGE")));

    logroute::info!(logger: &logger, "plain");
    logger.set_prefix("svc| ");
    logroute::info!(logger: &logger, "decorated");
    logger.flush().unwrap();

    assert_eq!(a.lines(), ["[INFO] plain", "svc| [INFO] decorated"]);
    assert_eq!(b.lines(), ["plain", "svc| decorated"]);
}

fn emit_from_here(logger: &Logger) {
    logroute::info!(logger: logger, subject: "caller", "from {}", "macro");
}

#[test]
fn macros_capture_function_and_line() {
    let logger = logger();
    let sink = Capture::default();
    logger.add_sink(
        Sink::new("s", sink.clone())
            .with_layout(TemplateLayout::new("FUNCTION|LINE|SUBJECT|MESSAGE")),
    );

    emit_from_here(&logger);
    logger.log(Level::Info, Some(Arg::new("direct")), "no {}", vec![Arg::new("macro")]);
    logger.flush().unwrap();

    let lines = sink.lines();
    assert_eq!(lines.len(), 2);

    let fields: Vec<&str> = lines[0].split('|').collect();
    assert!(fields[0].ends_with("emit_from_here"), "{}", lines[0]);
    assert!(fields[1].parse::<u32>().unwrap() > 0);
    assert_eq!(fields[2..], ["caller", "from macro"]);

    let fields: Vec<&str> = lines[1].split('|').collect();
    assert_eq!(fields[0], "");
    assert!(fields[1].parse::<u32>().unwrap() > 0);
    assert_eq!(fields[2..], ["direct", "no macro"]);
}

#[derive(Debug)]
struct Failing;

impl Append for Failing {
    fn append(&mut self, _: &str) -> Result<(), Error> {
        Err(Error::from_io_error(std::io::Error::other("device gone")))
    }
}

#[derive(Debug, Clone, Default)]
struct Collect(Arc<Mutex<Vec<String>>>);

impl Trap for Collect {
    fn trap(&self, err: &Error) {
        self.0.lock().unwrap().push(err.to_string());
    }
}

#[test]
fn sink_failures_are_trapped_and_isolated() {
    let trap = Collect::default();
    let logger = DispatcherBuilder::new("dispatch-test-trap")
        .no_default_sink()
        .trap(trap.clone())
        .build();
    let ok = Capture::default();
    logger.add_sink(Sink::new("broken", Failing));
    logger.add_sink(Sink::new("ok", ok.clone()));

    logroute::error!(logger: &logger, "first");
    logroute::error!(logger: &logger, "second");
    logger.flush().unwrap();

    assert_eq!(ok.lines(), ["[ERR ] first", "[ERR ] second"]);
    let errors = trap.0.lock().unwrap().clone();
    assert_eq!(errors.len(), 2);
    for err in errors {
        assert!(err.starts_with("failed to append log line"), "{err}");
        assert!(err.contains("sink: broken"), "{err}");
        assert!(err.contains("device gone"), "{err}");
    }
}

#[test]
fn producers_on_many_threads() {
    let logger = logger();
    let sink = Capture::default();
    logger.add_sink(
        Sink::new("s", sink.clone()).with_layout(TemplateLayout::new("SUBJECT MESSAGE")),
    );

    let handles: Vec<_> = (0..4)
        .map(|producer| {
            let logger = logger.clone();
            std::thread::spawn(move || {
                for seq in 0..100 {
                    logroute::info!(logger: &logger, subject: producer, "{}", seq);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    logger.flush().unwrap();

    let lines = sink.lines();
    assert_eq!(lines.len(), 400);
    for producer in 0..4 {
        let prefix = format!("{producer} ");
        let seqs: Vec<u32> = lines
            .iter()
            .filter_map(|line| line.strip_prefix(&prefix))
            .map(|seq| seq.parse().unwrap())
            .collect();
        assert_eq!(seqs, (0..100).collect::<Vec<_>>());
    }
}

#[test]
fn drop_drains_the_queue() {
    let sink = Capture::default();
    let logger = DispatcherBuilder::new("dispatch-test-drain")
        .no_default_sink()
        .sink(Sink::new("s", sink.clone()))
        .build();

    for i in 0..50 {
        logroute::info!(logger: &logger, "{}", i);
    }
    drop(logger);

    assert_eq!(sink.lines().len(), 50);
}

#[derive(Debug)]
struct Gate {
    started: Sender<()>,
    release: Receiver<()>,
    lines: Capture,
}

impl Append for Gate {
    fn append(&mut self, line: &str) -> Result<(), Error> {
        let _ = self.started.try_send(());
        let _ = self.release.recv();
        self.lines.append(line)
    }
}

#[test]
fn drop_incoming_never_blocks_producers() {
    let (started_tx, started_rx) = crossbeam_channel::bounded(1);
    let (release_tx, release_rx) = crossbeam_channel::bounded::<()>(0);
    let lines = Capture::default();

    let logger = DispatcherBuilder::new("dispatch-test-overflow")
        .no_default_sink()
        .buffered_lines_limit(Some(1))
        .overflow_drop_incoming()
        .sink(Sink::new(
            "gate",
            Gate {
                started: started_tx,
                release: release_rx,
                lines: lines.clone(),
            },
        ))
        .build();

    logroute::info!(logger: &logger, "in flight");
    started_rx.recv().unwrap();

    // the dispatcher is parked inside the sink: one message fits the queue, the rest are dropped
    for i in 0..10 {
        logroute::info!(logger: &logger, "burst {}", i);
    }
    assert_eq!(logger.dropped(), 9);

    drop(release_tx);
    logger.flush().unwrap();

    assert_eq!(lines.lines(), ["[INFO] in flight", "[INFO] burst 0"]);
}

#[test]
fn block_applies_backpressure_without_losing_messages() {
    let (started_tx, started_rx) = crossbeam_channel::bounded(1);
    let (release_tx, release_rx) = crossbeam_channel::bounded::<()>(0);
    let lines = Capture::default();

    let logger = DispatcherBuilder::new("dispatch-test-block")
        .no_default_sink()
        .buffered_lines_limit(Some(1))
        .overflow_block()
        .sink(Sink::new(
            "gate",
            Gate {
                started: started_tx,
                release: release_rx,
                lines: lines.clone(),
            },
        ))
        .build();

    logroute::info!(logger: &logger, "in flight");
    started_rx.recv().unwrap();

    let (done_tx, done_rx) = crossbeam_channel::bounded(1);
    let producer = {
        let logger = logger.clone();
        std::thread::spawn(move || {
            for i in 0..10 {
                logroute::info!(logger: &logger, "burst {}", i);
            }
            done_tx.send(()).unwrap();
        })
    };

    // the dispatcher is parked inside the sink and the queue holds one message
    let waited = done_rx.recv_timeout(std::time::Duration::from_millis(100));
    assert!(waited.is_err(), "producer finished while the queue was full");

    drop(release_tx);
    done_rx.recv().unwrap();
    producer.join().unwrap();
    logger.flush().unwrap();

    let mut expected = vec!["[INFO] in flight".to_owned()];
    expected.extend((0..10).map(|i| format!("[INFO] burst {i}")));
    assert_eq!(lines.lines(), expected);
    assert_eq!(logger.dropped(), 0);
}
