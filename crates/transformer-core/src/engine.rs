//! Execution engine.
//!
//! Evaluates an ordered list of operator invocations against one base image.
//! Every enabled invocation sees the same, unmodified base: results are
//! independent previews, not a chain. A failing invocation yields an error
//! for its own slot and the rest still run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::params::{ParamValue, Params};
use crate::raster::Image;
use crate::registry::{registry, Registry};

/// A request to run one operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    /// Registry identifier, e.g. `"gaussian_blur"`.
    pub operator: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Raw values keyed by parameter name; resolved against the schema.
    #[serde(default)]
    pub params: BTreeMap<String, ParamValue>,
}

fn enabled_by_default() -> bool {
    true
}

impl Invocation {
    pub fn new(operator: impl Into<String>) -> Self {
        Self {
            operator: operator.into(),
            enabled: true,
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// A successful operator result.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub operator: String,
    /// Caption to display under the image, e.g. "After Gaussian Blur".
    pub caption: &'static str,
    pub image: Image,
    /// True when `image` has a single channel.
    pub grayscale: bool,
    /// Non-fatal notices raised by the operator.
    pub warnings: Vec<String>,
}

pub type OperatorResult = Result<Rendered, PipelineError>;

/// Runs invocations against a registry.
#[derive(Debug, Clone, Copy)]
pub struct Engine<'a> {
    registry: &'a Registry,
}

impl<'a> Engine<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Evaluate every enabled invocation against `base`.
    ///
    /// Disabled invocations produce no entry. Results keep the relative order
    /// of the enabled invocations.
    pub fn run(&self, base: &Image, invocations: &[Invocation]) -> Vec<OperatorResult> {
        let enabled: Vec<&Invocation> = invocations.iter().filter(|inv| inv.enabled).collect();
        log::debug!(
            "running {} of {} invocations on {}x{} image",
            enabled.len(),
            invocations.len(),
            base.width,
            base.height
        );

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            enabled
                .par_iter()
                .map(|inv| self.run_one(base, inv))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            enabled.iter().map(|inv| self.run_one(base, inv)).collect()
        }
    }

    /// Evaluate a single invocation, ignoring its `enabled` flag.
    ///
    /// # Errors
    ///
    /// - `PipelineError::UnknownOperator` if the id is not registered
    /// - `PipelineError::Operator` if the operator itself fails
    pub fn run_one(&self, base: &Image, invocation: &Invocation) -> OperatorResult {
        let entry = self.registry.lookup(&invocation.operator).ok_or_else(|| {
            log::error!("unknown operator '{}'", invocation.operator);
            PipelineError::UnknownOperator {
                operator: invocation.operator.clone(),
            }
        })?;

        let params = Params::resolve(entry.params, &invocation.params);
        log::debug!("applying '{}' with {:?}", entry.id, params);

        let output = (entry.apply)(base, &params).map_err(|source| {
            log::error!("operator '{}' failed: {}", entry.id, source);
            PipelineError::Operator {
                operator: entry.id.to_string(),
                source,
            }
        })?;

        Ok(Rendered {
            operator: entry.id.to_string(),
            caption: entry.caption,
            grayscale: output.image.is_grayscale(),
            image: output.image,
            warnings: output.warning.into_iter().collect(),
        })
    }
}

/// Run invocations against the built-in registry.
pub fn run(base: &Image, invocations: &[Invocation]) -> Vec<OperatorResult> {
    Engine::new(registry()).run(base, invocations)
}
