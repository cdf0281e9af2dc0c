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

//! Named output destinations.

use std::collections::BTreeSet;

use crate::Error;
use crate::append::Append;
use crate::layout::Context;
use crate::layout::FixedLayout;
use crate::layout::Layout;

/// A named output destination with a tag filter and a layout.
///
/// A sink with an empty tag filter accepts every message. A sink with a non-empty filter accepts
/// a message only if the message carries at least one of the filter's tags, so untagged messages
/// never reach it.
///
/// # Examples
///
/// ```
/// use logroute::Sink;
/// use logroute::append::Stderr;
/// use logroute::layout::TemplateLayout;
///
/// let sink = Sink::new("db-errors", Stderr::default())
///     .with_layout(TemplateLayout::new("TIME LEVEL MESSAGE"))
///     .with_tags(["db"]);
/// assert_eq!(sink.name(), "db-errors");
/// ```
#[derive(Debug)]
pub struct Sink {
    name: String,
    tags: BTreeSet<String>,
    layout: Box<dyn Layout>,
    append: Box<dyn Append>,
    prefix: String,
}

impl Sink {
    /// Create a sink with the [`FixedLayout`] and an empty tag filter.
    pub fn new(name: impl Into<String>, append: impl Into<Box<dyn Append>>) -> Self {
        Self {
            name: name.into(),
            tags: BTreeSet::new(),
            layout: Box::new(FixedLayout::default()),
            append: append.into(),
            prefix: String::new(),
        }
    }

    /// Set the layout of this sink.
    pub fn with_layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.layout = layout.into();
        self
    }

    /// Add tags to the filter of this sink.
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// The name of this sink.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The tag filter of this sink. Empty means every message is accepted.
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Whether a message carrying `tags` is routed to this sink.
    pub fn accepts(&self, tags: &[String]) -> bool {
        self.tags.is_empty() || tags.iter().any(|tag| self.tags.contains(tag))
    }

    pub(crate) fn needs_caller(&self) -> bool {
        self.layout.needs_caller()
    }

    pub(crate) fn set_prefix(&mut self, prefix: &str) {
        prefix.clone_into(&mut self.prefix);
    }

    pub(crate) fn write(&mut self, ctx: &Context) -> Result<(), Error> {
        let rendered = self.layout.format(ctx);
        if self.prefix.is_empty() {
            self.append.append(&rendered)
        } else {
            let mut line = String::with_capacity(self.prefix.len() + rendered.len());
            line.push_str(&self.prefix);
            line.push_str(&rendered);
            self.append.append(&line)
        }
    }

    pub(crate) fn flush(&mut self) -> Result<(), Error> {
        self.append.flush()
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;
    use rand::seq::IndexedRandom;

    use super::*;
    use crate::append::Testing;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn empty_filter_accepts_everything() {
        let sink = Sink::new("all", Testing::default());
        assert!(sink.accepts(&[]));
        assert!(sink.accepts(&tags(&["db"])));
    }

    #[test]
    fn filter_needs_shared_tag() {
        let sink = Sink::new("db", Testing::default()).with_tags(["db", "cache"]);
        assert!(sink.accepts(&tags(&["http", "cache"])));
        assert!(!sink.accepts(&tags(&["http"])));
        assert!(!sink.accepts(&[]));
    }

    #[test]
    fn filter_matches_iff_intersection_is_not_empty() {
        const POOL: [&str; 5] = ["db", "http", "auth", "cache", "queue"];

        let mut rng = rand::rng();
        for _ in 0..128 {
            let filter_len = rng.random_range(1..=3);
            let message_len = rng.random_range(0..=3);
            let filter: Vec<&str> = POOL
                .choose_multiple(&mut rng, filter_len)
                .copied()
                .collect();
            let message: Vec<String> = POOL
                .choose_multiple(&mut rng, message_len)
                .map(|t| t.to_string())
                .collect();

            let sink = Sink::new("s", Testing::default()).with_tags(filter.iter().copied());
            let expected = message.iter().any(|t| filter.contains(&t.as_str()));
            assert_eq!(sink.accepts(&message), expected, "{filter:?} {message:?}");
        }
    }
}
