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

use std::io::Read;
use std::io::Seek;

use logroute::DispatcherBuilder;
use logroute::Level;
use logroute::Sink;
use logroute::append::Writer;
use logroute::layout::TemplateLayout;

// the process-wide logger can only be installed once, so this file holds a single test
#[test]
fn process_wide_logger_round_trip() {
    let file = tempfile::tempfile().unwrap();
    let reader = file.try_clone().unwrap();

    let logger = DispatcherBuilder::new("default-logger-test")
        .no_default_sink()
        .build();
    logroute::set_default_logger(logger).unwrap();
    assert!(logroute::set_default_logger(DispatcherBuilder::new("second").build()).is_err());

    logroute::add_sink(
        Sink::new("file", Writer::new(file))
            .with_layout(TemplateLayout::new("LEVEL SUBJECT: MESSAGE")),
    );
    logroute::warn!(subject: "auth", "failed {} times", 3);
    logroute::debug!("invisible");
    logroute::set_level(Level::Trace);
    logroute::trace!(tags: ["ignored"], "visible");
    logroute::set_prefix("> ");
    logroute::log(Level::Error, None, "plain", vec![]);
    logroute::production(true);
    logroute::info!("quiet");
    logroute::remove_sink("file");
    logroute::error!("gone");
    logroute::flush().unwrap();

    let mut reader = reader;
    reader.rewind().unwrap();
    let mut content = String::new();
    reader.read_to_string(&mut content).unwrap();

    assert_eq!(
        content,
        "WARN auth: failed 3 times\nTRC  : visible\n> ERR  : plain\n"
    );
}
