//! Operator parameter schemas and value resolution.
//!
//! Each operator declares an ordered list of [`ParamSpec`]s. Raw values coming
//! from the presentation layer (slider positions, dropdown selections) are
//! resolved against that schema before the operator runs:
//!
//! - missing values take the declared default
//! - numeric values are clamped into the declared range
//! - odd-only integers (kernel sizes) that arrive even are decremented by 1
//! - values of the wrong type fall back to the default
//!
//! Resolution never fails; every correction is logged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::OpError;

/// A concrete parameter value as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

/// Type, range and default of a single parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParamKind {
    Int {
        min: i64,
        max: i64,
        default: i64,
        /// Only odd values are valid (kernel sizes).
        odd: bool,
    },
    Float {
        min: f64,
        max: f64,
        default: f64,
    },
    Choice {
        options: &'static [&'static str],
        default: &'static str,
    },
    Toggle {
        default: bool,
    },
}

/// Declaration of one operator parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamSpec {
    /// Key used in invocations.
    pub name: &'static str,
    /// Human-readable control label.
    pub label: &'static str,
    #[serde(flatten)]
    pub kind: ParamKind,
}

impl ParamSpec {
    pub const fn int(name: &'static str, label: &'static str, min: i64, max: i64, default: i64) -> Self {
        Self {
            name,
            label,
            kind: ParamKind::Int {
                min,
                max,
                default,
                odd: false,
            },
        }
    }

    /// An integer that must be odd (kernel sizes).
    pub const fn odd_int(
        name: &'static str,
        label: &'static str,
        min: i64,
        max: i64,
        default: i64,
    ) -> Self {
        Self {
            name,
            label,
            kind: ParamKind::Int {
                min,
                max,
                default,
                odd: true,
            },
        }
    }

    pub const fn float(name: &'static str, label: &'static str, min: f64, max: f64, default: f64) -> Self {
        Self {
            name,
            label,
            kind: ParamKind::Float { min, max, default },
        }
    }

    pub const fn choice(
        name: &'static str,
        label: &'static str,
        options: &'static [&'static str],
        default: &'static str,
    ) -> Self {
        Self {
            name,
            label,
            kind: ParamKind::Choice { options, default },
        }
    }

    pub const fn toggle(name: &'static str, label: &'static str, default: bool) -> Self {
        Self {
            name,
            label,
            kind: ParamKind::Toggle { default },
        }
    }

    /// The declared default as a value.
    pub fn default_value(&self) -> ParamValue {
        match self.kind {
            ParamKind::Int { default, .. } => ParamValue::Int(default),
            ParamKind::Float { default, .. } => ParamValue::Float(default),
            ParamKind::Choice { default, .. } => ParamValue::Text(default.to_string()),
            ParamKind::Toggle { default } => ParamValue::Bool(default),
        }
    }

    /// Check that the declared default satisfies the declared range.
    ///
    /// Returns a description of the problem on failure.
    pub fn check_default(&self) -> Result<(), String> {
        match self.kind {
            ParamKind::Int {
                min,
                max,
                default,
                odd,
            } => {
                if min > max {
                    return Err(format!("empty range [{min}, {max}]"));
                }
                if !(min..=max).contains(&default) {
                    return Err(format!("default {default} outside [{min}, {max}]"));
                }
                if odd && (default % 2 == 0 || min % 2 == 0) {
                    return Err(format!("odd-only range [{min}, {max}] with default {default}"));
                }
                Ok(())
            }
            ParamKind::Float { min, max, default } => {
                if min.is_nan() || max.is_nan() || min > max {
                    return Err(format!("empty range [{min}, {max}]"));
                }
                if !(min..=max).contains(&default) {
                    return Err(format!("default {default} outside [{min}, {max}]"));
                }
                Ok(())
            }
            ParamKind::Choice { options, default } => {
                if !options.contains(&default) {
                    return Err(format!("default {default:?} is not one of {options:?}"));
                }
                Ok(())
            }
            ParamKind::Toggle { .. } => Ok(()),
        }
    }

    /// Resolve a raw value into one that satisfies this spec.
    pub fn resolve(&self, raw: Option<&ParamValue>) -> ParamValue {
        let Some(raw) = raw else {
            return self.default_value();
        };

        match (&self.kind, raw) {
            (&ParamKind::Int { min, max, odd, .. }, ParamValue::Int(v)) => {
                ParamValue::Int(self.resolve_int(*v, min, max, odd))
            }
            (&ParamKind::Int { min, max, odd, .. }, ParamValue::Float(v)) if v.is_finite() => {
                let rounded = v.round().clamp(i64::MIN as f64, i64::MAX as f64) as i64;
                ParamValue::Int(self.resolve_int(rounded, min, max, odd))
            }
            (&ParamKind::Float { min, max, .. }, ParamValue::Float(v)) if v.is_finite() => {
                ParamValue::Float(self.clamp_float(*v, min, max))
            }
            (&ParamKind::Float { min, max, .. }, ParamValue::Int(v)) => {
                ParamValue::Float(self.clamp_float(*v as f64, min, max))
            }
            // Choice values pass through; the operator decides how to treat
            // identifiers it does not know.
            (ParamKind::Choice { .. }, ParamValue::Text(v)) => ParamValue::Text(v.clone()),
            (ParamKind::Toggle { .. }, ParamValue::Bool(v)) => ParamValue::Bool(*v),
            _ => {
                log::warn!(
                    "parameter '{}' has unexpected value {:?}; using default",
                    self.name,
                    raw
                );
                self.default_value()
            }
        }
    }

    fn resolve_int(&self, value: i64, min: i64, max: i64, odd: bool) -> i64 {
        let mut clamped = value.clamp(min, max);
        if clamped != value {
            log::warn!(
                "parameter '{}' = {} clamped to {}",
                self.name,
                value,
                clamped
            );
        }
        if odd && clamped % 2 == 0 {
            let coerced = if clamped - 1 >= min { clamped - 1 } else { clamped + 1 };
            log::warn!(
                "parameter '{}' must be odd; using {} instead of {}",
                self.name,
                coerced,
                clamped
            );
            clamped = coerced;
        }
        clamped
    }

    fn clamp_float(&self, value: f64, min: f64, max: f64) -> f64 {
        let clamped = value.clamp(min, max);
        if clamped != value {
            log::warn!(
                "parameter '{}' = {} clamped to {}",
                self.name,
                value,
                clamped
            );
        }
        clamped
    }
}

/// Resolved parameter values for one invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: BTreeMap<String, ParamValue>,
}

impl Params {
    /// Resolve raw values against a schema.
    ///
    /// Every declared parameter ends up present and in range. Undeclared
    /// keys are dropped.
    pub fn resolve(schema: &[ParamSpec], raw: &BTreeMap<String, ParamValue>) -> Self {
        for key in raw.keys() {
            if !schema.iter().any(|spec| spec.name == key) {
                log::debug!("ignoring unknown parameter '{}'", key);
            }
        }

        let values = schema
            .iter()
            .map(|spec| (spec.name.to_string(), spec.resolve(raw.get(spec.name))))
            .collect();
        Self { values }
    }

    /// Defaults for every declared parameter.
    pub fn defaults(schema: &[ParamSpec]) -> Self {
        Self::resolve(schema, &BTreeMap::new())
    }

    /// Set a value directly, bypassing resolution.
    pub fn with(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn int(&self, name: &'static str) -> Result<i64, OpError> {
        match self.values.get(name) {
            Some(ParamValue::Int(v)) => Ok(*v),
            _ => Err(OpError::MissingParam(name)),
        }
    }

    pub fn float(&self, name: &'static str) -> Result<f64, OpError> {
        match self.values.get(name) {
            Some(ParamValue::Float(v)) => Ok(*v),
            Some(ParamValue::Int(v)) => Ok(*v as f64),
            _ => Err(OpError::MissingParam(name)),
        }
    }

    pub fn text(&self, name: &'static str) -> Result<&str, OpError> {
        match self.values.get(name) {
            Some(ParamValue::Text(v)) => Ok(v),
            _ => Err(OpError::MissingParam(name)),
        }
    }

    pub fn flag(&self, name: &'static str) -> Result<bool, OpError> {
        match self.values.get(name) {
            Some(ParamValue::Bool(v)) => Ok(*v),
            _ => Err(OpError::MissingParam(name)),
        }
    }
}
