use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use serde_json::Value;

use super::endpoint::BodyFactory;

/// Placeholders that render as JSON numbers when they make up a whole leaf.
const NUMERIC_KEYS: [&str; 4] = ["timestamp_ms", "timestamp_s", "seq", "rand_int"];

/// Values available to `{{...}}` placeholders for one rendering pass.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TemplateContext {
    now: DateTime<Utc>,
    seq: u64,
}

impl TemplateContext {
    pub(crate) fn new(seq: u64) -> Self {
        Self {
            now: Utc::now(),
            seq,
        }
    }

    fn resolve(&self, key: &str) -> Option<String> {
        match key {
            "timestamp_ms" => Some(self.now.timestamp_millis().to_string()),
            "timestamp_s" => Some(self.now.timestamp().to_string()),
            "date" => Some(self.now.format("%Y-%m-%d").to_string()),
            "datetime" => Some(self.now.to_rfc3339_opts(SecondsFormat::Millis, true)),
            "seq" => Some(self.seq.to_string()),
            _ => resolve_function(key),
        }
    }
}

fn resolve_function(key: &str) -> Option<String> {
    let (name, args) = key.split_once(':')?;
    match name.trim() {
        "rand_int" => {
            let (min, max) = args.split_once(':')?;
            let min: i64 = min.trim().parse().ok()?;
            let max: i64 = max.trim().parse().ok()?;
            if min > max {
                return None;
            }
            Some(rand::thread_rng().gen_range(min..=max).to_string())
        }
        "choice" => {
            let options: Vec<&str> = args.split('|').collect();
            options
                .choose(&mut rand::thread_rng())
                .map(|choice| (*choice).to_owned())
        }
        _ => None,
    }
}

/// Expands `{{key}}` placeholders. Unknown keys and unterminated braces are
/// kept verbatim.
pub(crate) fn render_template(input: &str, context: &TemplateContext) -> String {
    let mut rest = input;
    let mut output = String::with_capacity(input.len());

    loop {
        let Some(start) = rest.find("{{") else {
            output.push_str(rest);
            break;
        };
        let (before, after_start) = rest.split_at(start);
        output.push_str(before);
        let Some(after) = after_start.strip_prefix("{{") else {
            output.push_str(after_start);
            break;
        };
        let Some(end) = after.find("}}") else {
            output.push_str("{{");
            output.push_str(after);
            break;
        };
        let (key_part, after_end) = after.split_at(end);
        let key = key_part.trim();
        if let Some(value) = context.resolve(key) {
            output.push_str(&value);
        } else {
            output.push_str("{{");
            output.push_str(key);
            output.push_str("}}");
        }
        rest = match after_end.strip_prefix("}}") {
            Some(remaining) => remaining,
            None => {
                output.push_str(after_end);
                break;
            }
        };
    }

    output
}

fn sole_placeholder(input: &str) -> Option<&str> {
    let inner = input.trim().strip_prefix("{{")?.strip_suffix("}}")?;
    if inner.contains("{{") || inner.contains("}}") {
        return None;
    }
    Some(inner.trim())
}

fn render_leaf(input: &str, context: &TemplateContext) -> Value {
    if let Some(key) = sole_placeholder(input)
        && NUMERIC_KEYS
            .iter()
            .any(|numeric| key == *numeric || key.starts_with(&format!("{numeric}:")))
        && let Some(rendered) = context.resolve(key)
        && let Ok(number) = rendered.parse::<i64>()
    {
        return Value::from(number);
    }
    Value::String(render_template(input, context))
}

pub(crate) fn render_value(value: &Value, context: &TemplateContext) -> Value {
    match value {
        Value::String(text) => render_leaf(text, context),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| render_value(item, context))
                .collect(),
        ),
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(key, item)| (key.clone(), render_value(item, context)))
                .collect(),
        ),
        Value::Null | Value::Bool(_) | Value::Number(_) => value.clone(),
    }
}

/// Config-defined body: a JSON tree whose string leaves are templates.
#[derive(Debug)]
pub struct TemplateBody {
    template: Value,
}

impl TemplateBody {
    #[must_use]
    pub const fn new(template: Value) -> Self {
        Self { template }
    }
}

impl BodyFactory for TemplateBody {
    fn generate(&self, seq: u64) -> Value {
        render_value(&self.template, &TemplateContext::new(seq))
    }
}
