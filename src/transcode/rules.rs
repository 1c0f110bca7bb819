//! Ordered rewrite rules.
//!
//! Dialect fixes are expressed as a list of named rules applied one after
//! the other. Order is part of the contract: a rule only ever sees the output
//! of the rules before it.

use std::fmt;

use regex::{Captures, Regex};

type CapturesFn = Box<dyn Fn(&Captures<'_>) -> String + Send + Sync>;
type TextFn = Box<dyn Fn(&str) -> String + Send + Sync>;

enum Rewrite {
    /// Replace every match with a `${n}` template.
    Template(&'static Regex, &'static str),
    /// Replace every match with the result of a function of its captures.
    Captures(&'static Regex, CapturesFn),
    /// Rewrite the whole text.
    Text(TextFn),
}

/// A single named rewrite step.
pub struct RewriteRule {
    name: &'static str,
    rewrite: Rewrite,
}

impl RewriteRule {
    pub fn template(name: &'static str, pattern: &'static Regex, template: &'static str) -> Self {
        Self {
            name,
            rewrite: Rewrite::Template(pattern, template),
        }
    }

    pub fn captures<F>(name: &'static str, pattern: &'static Regex, replace: F) -> Self
    where
        F: Fn(&Captures<'_>) -> String + Send + Sync + 'static,
    {
        Self {
            name,
            rewrite: Rewrite::Captures(pattern, Box::new(replace)),
        }
    }

    pub fn text<F>(name: &'static str, rewrite: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self {
            name,
            rewrite: Rewrite::Text(Box::new(rewrite)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn apply(&self, input: &str) -> String {
        match &self.rewrite {
            Rewrite::Template(pattern, template) => {
                pattern.replace_all(input, *template).into_owned()
            }
            Rewrite::Captures(pattern, replace) => pattern
                .replace_all(input, |caps: &Captures<'_>| replace(caps))
                .into_owned(),
            Rewrite::Text(rewrite) => rewrite(input),
        }
    }
}

impl fmt::Debug for RewriteRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RewriteRule").field("name", &self.name).finish()
    }
}

/// Rules applied in sequence.
#[derive(Debug, Default)]
pub struct RulePipeline {
    rules: Vec<RewriteRule>,
}

impl RulePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule to the end of the pipeline.
    pub fn push(&mut self, rule: RewriteRule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    pub fn extend(&mut self, rules: impl IntoIterator<Item = RewriteRule>) -> &mut Self {
        self.rules.extend(rules);
        self
    }

    pub fn apply(&self, input: &str) -> String {
        self.rules
            .iter()
            .fold(input.to_string(), |text, rule| rule.apply(&text))
    }

    /// Rule names in application order.
    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(RewriteRule::name).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
