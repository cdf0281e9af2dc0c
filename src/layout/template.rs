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
use crate::layout::Token;

/// A layout that expands tokens in a template string.
///
/// Recognized tokens are `FUNCTION`, `LINE`, `TIME`, `DURATION`, `SUBJECT`, `LEVEL` and
/// `MESSAGE`. Every occurrence of a token is replaced with the corresponding context value; any
/// other text is copied verbatim. Values are not rescanned, so a message body that contains a
/// token name is written as is.
///
/// # Examples
///
/// ```
/// use logroute::Level;
/// use logroute::layout::Context;
/// use logroute::layout::Layout;
/// use logroute::layout::TemplateLayout;
///
/// let layout = TemplateLayout::new("LEVEL | SUBJECT | MESSAGE");
/// let ctx = Context::new(Level::Info, "ready").with_subject("db");
/// assert_eq!(layout.format(&ctx), "INFO | db | ready");
/// ```
#[derive(Debug, Clone)]
pub struct TemplateLayout {
    template: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Token(Token),
}

impl TemplateLayout {
    /// Parse a template.
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let segments = parse(&template);
        Self { template, segments }
    }

    /// The template this layout was built from.
    pub fn template(&self) -> &str {
        &self.template
    }
}

fn parse(template: &str) -> Vec<Segment> {
    let mut segments = vec![];
    let mut literal = String::new();
    let mut rest = template;

    'outer: while !rest.is_empty() {
        for token in Token::ALL {
            if let Some(tail) = rest.strip_prefix(token.as_str()) {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Token(token));
                rest = tail;
                continue 'outer;
            }
        }

        // SAFETY: rest is not empty
        let c = rest.chars().next().unwrap();
        literal.push(c);
        rest = &rest[c.len_utf8()..];
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

impl Layout for TemplateLayout {
    fn format(&self, ctx: &Context) -> String {
        let mut text = String::with_capacity(self.template.len() + ctx.message().len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => text.push_str(s),
                Segment::Token(token) => text.push_str(ctx.get(*token)),
            }
        }
        text
    }

    fn needs_caller(&self) -> bool {
        self.segments.iter().any(|segment| {
            matches!(
                segment,
                Segment::Token(Token::Function) | Segment::Token(Token::Line)
            )
        })
    }
}

impl From<&str> for TemplateLayout {
    fn from(template: &str) -> Self {
        TemplateLayout::new(template)
    }
}

impl From<String> for TemplateLayout {
    fn from(template: String) -> Self {
        TemplateLayout::new(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Level;

    #[test]
    fn expands_caller_and_message() {
        let layout = TemplateLayout::new("FUNCTION:LINE LEVEL MESSAGE");
        let ctx = Context::new(Level::Error, "boom").with_function_line("Handle", "42");
        insta::assert_snapshot!(layout.format(&ctx), @"Handle:42 ERR  boom");
        assert!(layout.needs_caller());
    }

    #[test]
    fn replaces_every_occurrence() {
        let layout = TemplateLayout::new("LEVEL LEVEL");
        let ctx = Context::new(Level::Info, "");
        assert_eq!(layout.format(&ctx), "INFO INFO");
        assert!(!layout.needs_caller());
    }

    #[test]
    fn template_without_tokens_is_unchanged() {
        for template in ["", "plain text", "level message", "LEVE L", "héllo wörld"] {
            let layout = TemplateLayout::new(template);
            let ctx = Context::new(Level::Warning, "body").with_subject("s");
            assert_eq!(layout.format(&ctx), template);
        }
    }

    #[test]
    fn values_are_not_rescanned() {
        let layout = TemplateLayout::new("[LEVEL] MESSAGE");
        let ctx = Context::new(Level::Debug, "LEVEL up to SUBJECT");
        assert_eq!(layout.format(&ctx), "[DBG ] LEVEL up to SUBJECT");
    }

    #[test]
    fn missing_fields_render_empty() {
        let layout = TemplateLayout::new("TIME|DURATION|SUBJECT|FUNCTION|LINE|MESSAGE");
        let ctx = Context::new(Level::Info, "m");
        assert_eq!(layout.format(&ctx), "|||||m");
    }

    #[test]
    fn adjacent_tokens() {
        let layout = TemplateLayout::new("LEVELSUBJECTMESSAGE");
        let ctx = Context::new(Level::Info, "c").with_subject("b");
        assert_eq!(layout.format(&ctx), "INFObc");
        assert_eq!(layout.template(), "LEVELSUBJECTMESSAGE");
    }
}
