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

use crate::layout::Context;
use crate::layout::Layout;

/// A layout that renders the level, the optional subject and the body.
///
/// Output format:
///
/// ```text
/// [WARN] auth, failed 3 times
/// [INFO] server started
/// ```
///
/// With the `colored` feature, [`FixedLayout::colored`] colors the level label.
///
/// # Examples
///
/// ```
/// use logroute::layout::FixedLayout;
///
/// let layout = FixedLayout::default();
/// ```
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct FixedLayout {
    #[cfg(feature = "colored")]
    colors: Option<color::LevelColor>,
}

impl Layout for FixedLayout {
    fn format(&self, ctx: &Context) -> String {
        let level = self.format_level(ctx);
        let message = ctx.message();
        match ctx.subject() {
            Some(subject) => format!("[{level}] {subject}, {message}"),
            None => format!("[{level}] {message}"),
        }
    }
}

#[cfg(not(feature = "colored"))]
impl FixedLayout {
    fn format_level(&self, ctx: &Context) -> &'static str {
        ctx.level().as_str()
    }
}

#[cfg(feature = "colored")]
impl FixedLayout {
    /// Color the level label with the default palette.
    pub fn colored(mut self) -> Self {
        self.colors = Some(color::LevelColor::default());
        self
    }

    fn format_level(&self, ctx: &Context) -> colored::ColoredString {
        let level = ctx.level();
        match &self.colors {
            Some(colors) => colors.colorize(level),
            None => colored::ColoredString::from(level.as_str()),
        }
    }
}

#[cfg(feature = "colored")]
mod color {
    use colored::Color;
    use colored::ColoredString;
    use colored::Colorize;

    use crate::Level;

    #[derive(Debug, Clone)]
    pub(super) struct LevelColor {
        error: Color,
        warn: Color,
        info: Color,
        debug: Color,
        trace: Color,
    }

    impl Default for LevelColor {
        fn default() -> Self {
            Self {
                error: Color::Red,
                warn: Color::Yellow,
                info: Color::Green,
                debug: Color::Blue,
                trace: Color::Magenta,
            }
        }
    }

    impl LevelColor {
        pub(super) fn colorize(&self, level: Level) -> ColoredString {
            let label = ColoredString::from(level.as_str());
            match level {
                Level::Error => label.color(self.error),
                Level::Warning => label.color(self.warn),
                Level::Info => label.color(self.info),
                Level::Debug => label.color(self.debug),
                Level::Trace => label.color(self.trace),
                Level::All | Level::None => label,
            }
        }
    }
}
