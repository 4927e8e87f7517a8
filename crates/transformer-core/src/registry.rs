//! Operator registry.
//!
//! Maps operator identifiers to their implementation, category and parameter
//! schema. The built-in catalog is assembled once, on first use, and is
//! read-only afterwards. Building validates the catalog: duplicate
//! identifiers and defaults outside their declared range are configuration
//! errors.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::ops::{self, OperatorFn};
use crate::params::ParamSpec;

/// Operator groups, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    ColorSpace,
    LinearTransform,
    Filters,
    Effects,
    AdditionalEffects,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::ColorSpace,
        Category::LinearTransform,
        Category::Filters,
        Category::Effects,
        Category::AdditionalEffects,
    ];

    /// Tab label.
    pub fn label(self) -> &'static str {
        match self {
            Category::ColorSpace => "Color Space",
            Category::LinearTransform => "Linear Transform",
            Category::Filters => "Filters",
            Category::Effects => "Effects",
            Category::AdditionalEffects => "Additional Effects",
        }
    }

    /// Stable identifier used across the WASM boundary.
    pub fn id(self) -> &'static str {
        match self {
            Category::ColorSpace => "color_space",
            Category::LinearTransform => "linear_transform",
            Category::Filters => "filters",
            Category::Effects => "effects",
            Category::AdditionalEffects => "additional_effects",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Category::ALL.into_iter().find(|c| c.id() == id)
    }
}

/// One registered operator.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    /// Unique identifier used in invocations.
    pub id: &'static str,
    /// Control label, e.g. "Apply Gaussian Blur".
    pub name: &'static str,
    /// Caption shown under the result image.
    pub caption: &'static str,
    pub category: Category,
    pub params: &'static [ParamSpec],
    pub apply: OperatorFn,
}

/// Immutable operator catalog.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Find an operator by identifier.
    pub fn lookup(&self, id: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Entries of one category, in registration order.
    pub fn list_by_category(&self, category: Category) -> Vec<&RegistryEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.category == category)
            .collect()
    }

    /// All entries, in registration order.
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collects entries and validates them into a [`Registry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: Vec<RegistryEntry>,
}

impl RegistryBuilder {
    pub fn register(mut self, entry: RegistryEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Validate and freeze the catalog.
    ///
    /// # Errors
    ///
    /// - `RegistryError::DuplicateOperator` if two entries share an id
    /// - `RegistryError::InvalidDefault` if a default violates its range
    pub fn build(self) -> Result<Registry, RegistryError> {
        for (i, entry) in self.entries.iter().enumerate() {
            if self.entries[..i].iter().any(|prev| prev.id == entry.id) {
                return Err(RegistryError::DuplicateOperator(entry.id));
            }
            for spec in entry.params {
                spec.check_default().map_err(|reason| RegistryError::InvalidDefault {
                    operator: entry.id,
                    param: spec.name,
                    reason,
                })?;
            }
        }
        log::debug!("operator registry built with {} entries", self.entries.len());
        Ok(Registry {
            entries: self.entries,
        })
    }
}

/// The built-in catalog, in display order within each category.
pub fn builtin_entries() -> Vec<RegistryEntry> {
    vec![
        RegistryEntry {
            id: "color_space",
            name: "Convert Color Space",
            caption: "After Color Space Conversion",
            category: Category::ColorSpace,
            params: ops::color::PARAMS,
            apply: ops::color::apply,
        },
        RegistryEntry {
            id: "linear_transform",
            name: "Apply Linear Transformation",
            caption: "After Linear Transformation",
            category: Category::LinearTransform,
            params: ops::linear::PARAMS,
            apply: ops::linear::apply_linear,
        },
        RegistryEntry {
            id: "gaussian_blur",
            name: "Apply Gaussian Blur",
            caption: "After Gaussian Blur",
            category: Category::Filters,
            params: ops::blur::PARAMS,
            apply: ops::blur::apply,
        },
        RegistryEntry {
            id: "bilateral_filter",
            name: "Apply Bilateral Filter",
            caption: "After Bilateral Filter",
            category: Category::Filters,
            params: ops::bilateral::PARAMS,
            apply: ops::bilateral::apply,
        },
        RegistryEntry {
            id: "sharpen",
            name: "Apply Sharpening",
            caption: "After Sharpening",
            category: Category::Filters,
            params: ops::sharpen::PARAMS,
            apply: ops::sharpen::apply,
        },
        RegistryEntry {
            id: "negative",
            name: "Apply Negative Transformation",
            caption: "After Negative Transformation",
            category: Category::Effects,
            params: &[],
            apply: ops::linear::apply_negative,
        },
        RegistryEntry {
            id: "canny",
            name: "Apply Edge Detection (Canny)",
            caption: "After Edge Detection",
            category: Category::Effects,
            params: ops::edges::PARAMS,
            apply: ops::edges::apply,
        },
        RegistryEntry {
            id: "sepia",
            name: "Apply Sepia Effect",
            caption: "After Sepia Effect",
            category: Category::Effects,
            params: ops::stylize::SEPIA_PARAMS,
            apply: ops::stylize::apply_sepia,
        },
        RegistryEntry {
            id: "pencil_sketch",
            name: "Apply Pencil Sketch Effect",
            caption: "After Pencil Sketch Effect",
            category: Category::AdditionalEffects,
            params: ops::stylize::SKETCH_PARAMS,
            apply: ops::stylize::apply_sketch,
        },
    ]
}

static BUILTIN: Lazy<Registry> = Lazy::new(|| {
    builtin_entries()
        .into_iter()
        .fold(Registry::builder(), RegistryBuilder::register)
        .build()
        .expect("built-in operator catalog is invalid")
});

/// The process-wide built-in registry.
pub fn registry() -> &'static Registry {
    &BUILTIN
}
