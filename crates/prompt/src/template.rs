//! Prompt templates and the `{name}` placeholder renderer.
//!
//! Templates use `{placeholder}` slots with `{{` / `}}` as literal braces.
//! Substituted values are inserted verbatim, so a JSON-formatted window
//! never needs escaping.

use serde::Serialize;
use std::borrow::Cow;
use tsprompt_core::{PromptError, PromptType};

/// Placeholders every strategy fills.
pub const BASE_PLACEHOLDERS: [&str; 7] = [
    "periods",
    "start_forecast",
    "output",
    "output_example",
    "data_prompt",
    "timestamp",
    "n",
];

/// Placeholders only FEW_SHOT and COT_FEW fill.
pub const EXAMPLE_PLACEHOLDERS: [&str; 4] = ["period1", "period2", "period3", "period4"];

/// Values substituted into a template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptFields {
    /// Number of readings in the window.
    pub periods: usize,
    /// The first few readings, rendered.
    pub start_forecast: String,
    /// Forecast horizon.
    pub output: usize,
    /// The first readings rendered as an output-shape example.
    pub output_example: String,
    /// The whole window, rendered.
    pub data_prompt: String,
    /// Unit of one step, e.g. "hour".
    pub timestamp: String,
    /// Forecast horizon again, under its short name.
    pub n: usize,
    /// The four worked-example sub-windows, when the strategy uses them.
    pub examples: Option<[String; 4]>,
}

impl PromptFields {
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        let value = match name {
            "periods" => Cow::Owned(self.periods.to_string()),
            "start_forecast" => Cow::Borrowed(self.start_forecast.as_str()),
            "output" => Cow::Owned(self.output.to_string()),
            "output_example" => Cow::Borrowed(self.output_example.as_str()),
            "data_prompt" => Cow::Borrowed(self.data_prompt.as_str()),
            "timestamp" => Cow::Borrowed(self.timestamp.as_str()),
            "n" => Cow::Owned(self.n.to_string()),
            _ => {
                let slot = EXAMPLE_PLACEHOLDERS.iter().position(|p| *p == name)?;
                Cow::Borrowed(self.examples.as_ref()?[slot].as_str())
            }
        };
        Some(value)
    }
}

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment<'a> {
    Literal(Cow<'a, str>),
    Slot(&'a str),
}

fn segments(source: &str) -> Result<Vec<Segment<'_>>, PromptError> {
    let mut out = Vec::new();
    let mut literal = String::new();
    let mut rest = source;

    while let Some(i) = rest.find(['{', '}']) {
        literal.push_str(&rest[..i]);
        let tail = &rest[i..];

        if let Some(after) = tail.strip_prefix("{{") {
            literal.push('{');
            rest = after;
        } else if let Some(after) = tail.strip_prefix("}}") {
            literal.push('}');
            rest = after;
        } else if tail.starts_with('}') {
            return Err(PromptError::MalformedTemplate(
                "single '}' encountered".into(),
            ));
        } else {
            let close = tail.find('}').ok_or_else(|| {
                PromptError::MalformedTemplate("unclosed '{' in template".into())
            })?;
            let name = &tail[1..close];
            if name.is_empty() || name.contains('{') {
                return Err(PromptError::MalformedTemplate(format!(
                    "invalid placeholder {:?}",
                    &tail[..=close]
                )));
            }
            if !literal.is_empty() {
                out.push(Segment::Literal(Cow::Owned(std::mem::take(&mut literal))));
            }
            out.push(Segment::Slot(name));
            rest = &tail[close + 1..];
        }
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        out.push(Segment::Literal(Cow::Owned(literal)));
    }
    Ok(out)
}

/// A template bound to the strategy it is written for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    strategy: PromptType,
    source: Cow<'static, str>,
}

impl PromptTemplate {
    /// The template shipped with tsprompt for `strategy`.
    pub fn builtin(strategy: PromptType) -> Self {
        let source = match strategy {
            PromptType::ZeroShot => include_str!("../templates/zero_shot.txt"),
            PromptType::FewShot => include_str!("../templates/few_shot.txt"),
            PromptType::Cot => include_str!("../templates/cot.txt"),
            PromptType::CotFew => include_str!("../templates/cot_few.txt"),
        };
        Self {
            strategy,
            source: Cow::Borrowed(source),
        }
    }

    /// A user-supplied template, checked against the strategy's placeholders.
    pub fn custom(strategy: PromptType, source: impl Into<String>) -> Result<Self, PromptError> {
        let template = Self {
            strategy,
            source: Cow::Owned(source.into()),
        };
        template.validate()?;
        Ok(template)
    }

    pub fn strategy(&self) -> PromptType {
        self.strategy
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Placeholder names in order of appearance (repeats included).
    pub fn placeholders(&self) -> Result<Vec<&str>, PromptError> {
        Ok(segments(&self.source)?
            .into_iter()
            .filter_map(|s| match s {
                Segment::Slot(name) => Some(name),
                Segment::Literal(_) => None,
            })
            .collect())
    }

    /// Check that every placeholder is one the strategy fills.
    pub fn validate(&self) -> Result<(), PromptError> {
        for name in self.placeholders()? {
            let known = BASE_PLACEHOLDERS.contains(&name)
                || (self.strategy.uses_examples() && EXAMPLE_PLACEHOLDERS.contains(&name));
            if !known {
                return Err(PromptError::UnknownPlaceholder(name.to_string()));
            }
        }
        Ok(())
    }

    /// Substitute `fields` into the template.
    pub fn render(&self, fields: &PromptFields) -> Result<String, PromptError> {
        let mut out = String::with_capacity(self.source.len() + fields.data_prompt.len() * 2);
        for segment in segments(&self.source)? {
            match segment {
                Segment::Literal(text) => out.push_str(&text),
                Segment::Slot(name) => {
                    let value = fields
                        .lookup(name)
                        .ok_or_else(|| PromptError::UnknownPlaceholder(name.to_string()))?;
                    out.push_str(&value);
                }
            }
        }
        Ok(out)
    }
}
