//! Declarative parameter schema.
//!
//! Parameters are pure data. The host UI checks them against their
//! [`ParamSpec`]; the engine only fills in defaults and never rejects a run
//! because of them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A parameter value as entered by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(i64),
    Text(String),
}

impl ParamValue {
    /// Numbers stay numbers; anything else is text.
    pub fn parse(raw: &str) -> Self {
        raw.trim()
            .parse::<i64>()
            .map(ParamValue::Number)
            .unwrap_or_else(|_| ParamValue::Text(raw.to_string()))
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(n) => write!(f, "{n}"),
            ParamValue::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Input widget and its constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParamKind {
    Range { min: i64, max: i64, step: i64 },
    Select { options: Vec<SelectOption> },
    Text { max_len: usize },
}

/// Show a parameter only while another parameter has a given value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub key: String,
    pub equals: ParamValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub key: String,
    pub label: String,
    pub kind: ParamKind,
    pub default: ParamValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_when: Option<Condition>,
}

impl ParamSpec {
    pub fn range(key: &str, label: &str, min: i64, max: i64, default: i64) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind: ParamKind::Range { min, max, step: 1 },
            default: ParamValue::Number(default),
            visible_when: None,
        }
    }

    /// `options` are `(value, label)` pairs.
    pub fn select(key: &str, label: &str, options: &[(&str, &str)], default: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind: ParamKind::Select {
                options: options
                    .iter()
                    .map(|(value, label)| SelectOption {
                        value: value.to_string(),
                        label: label.to_string(),
                    })
                    .collect(),
            },
            default: ParamValue::Text(default.to_string()),
            visible_when: None,
        }
    }

    pub fn text(key: &str, label: &str, max_len: usize, default: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind: ParamKind::Text { max_len },
            default: ParamValue::Text(default.to_string()),
            visible_when: None,
        }
    }

    #[must_use]
    pub fn visible_when(mut self, key: &str, equals: ParamValue) -> Self {
        self.visible_when = Some(Condition {
            key: key.to_string(),
            equals,
        });
        self
    }

    /// Host-side check of a user-entered value.
    pub fn check(&self, value: &ParamValue) -> Result<(), String> {
        match (&self.kind, value) {
            (ParamKind::Range { min, max, .. }, ParamValue::Number(n)) => {
                if n < min || n > max {
                    return Err(format!("{} must be between {min} and {max}", self.label));
                }
                Ok(())
            }
            (ParamKind::Range { .. }, ParamValue::Text(_)) => {
                Err(format!("{} must be a number", self.label))
            }
            (ParamKind::Select { options }, v) => {
                let v = v.to_string();
                if options.iter().any(|o| o.value == v) {
                    Ok(())
                } else {
                    Err(format!("{} must be one of: {}", self.label, option_list(options)))
                }
            }
            (ParamKind::Text { max_len }, v) => {
                if v.to_string().chars().count() > *max_len {
                    return Err(format!("{} must be at most {max_len} characters", self.label));
                }
                Ok(())
            }
        }
    }

    /// Whether the parameter is shown given the other current values.
    pub fn is_visible(&self, params: &Params) -> bool {
        match &self.visible_when {
            Some(cond) => params.get(&cond.key) == Some(&cond.equals),
            None => true,
        }
    }
}

fn option_list(options: &[SelectOption]) -> String {
    options
        .iter()
        .map(|o| o.value.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parameter values keyed by [`ParamSpec::key`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: &str, value: ParamValue) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: ParamValue) {
        self.0.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn number(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            ParamValue::Number(n) => Some(*n),
            ParamValue::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            ParamValue::Text(s) => Some(s.as_str()),
            ParamValue::Number(_) => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Parse a `key=value` assignment.
    pub fn parse_assignment(raw: &str) -> Result<(String, ParamValue), String> {
        let (key, value) = raw
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got `{raw}`"))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("missing parameter name in `{raw}`"));
        }
        Ok((key.to_string(), ParamValue::parse(value)))
    }

    /// Defaults from `schema` overlaid with `overrides`.
    ///
    /// Keys not named by the schema are kept as given.
    pub fn resolve(schema: &[ParamSpec], overrides: &Params) -> Params {
        let mut resolved = overrides.clone();
        for spec in schema {
            resolved
                .0
                .entry(spec.key.clone())
                .or_insert_with(|| spec.default.clone());
        }
        resolved
    }
}

impl FromIterator<(String, ParamValue)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Params(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Vec<ParamSpec> {
        vec![
            ParamSpec::select("mode", "Mode", &[("first", "First"), ("all", "All")], "first"),
            ParamSpec::range("max_solutions", "Max solutions", 1, 10, 3)
                .visible_when("mode", ParamValue::Text("all".into())),
        ]
    }

    #[test]
    fn resolve_fills_defaults() {
        let params = Params::resolve(&schema(), &Params::new().with("mode", ParamValue::Text("all".into())));
        assert_eq!(params.text("mode"), Some("all"));
        assert_eq!(params.number("max_solutions"), Some(3));
    }

    #[test]
    fn conditional_visibility() {
        let schema = schema();
        let first = Params::resolve(&schema, &Params::new());
        assert!(!schema[1].is_visible(&first));
        let all = first.with("mode", ParamValue::Text("all".into()));
        assert!(schema[1].is_visible(&all));
    }

    #[test]
    fn check_enforces_kind() {
        let schema = schema();
        assert!(schema[0].check(&ParamValue::Text("all".into())).is_ok());
        assert!(schema[0].check(&ParamValue::Text("some".into())).is_err());
        assert!(schema[1].check(&ParamValue::Number(11)).is_err());
        assert!(schema[1].check(&ParamValue::Text("x".into())).is_err());

        let text = ParamSpec::text("other", "Other list", 5, "");
        assert!(text.check(&ParamValue::Text("1,2,3".into())).is_ok());
        assert!(text.check(&ParamValue::Text("1,2,3,4".into())).is_err());
    }

    #[test]
    fn parse_assignment_types_values() {
        assert_eq!(
            Params::parse_assignment("target=7"),
            Ok(("target".into(), ParamValue::Number(7)))
        );
        assert_eq!(
            Params::parse_assignment("mode=all"),
            Ok(("mode".into(), ParamValue::Text("all".into())))
        );
        assert!(Params::parse_assignment("nokey").is_err());
        assert!(Params::parse_assignment("=3").is_err());
    }
}
