//! Compatibility and filtering engine for PC part catalogs.
//!
//! Everything here is pure and synchronous: engines borrow an immutable
//! [`Catalog`] and a [`Selection`] and return fresh values.

mod collate;

pub mod catalog;
pub mod compat;
pub mod descriptor;
pub mod filter;
pub mod part;
pub mod power;
pub mod reduce;
pub mod selection;
pub mod sort;

pub use catalog::{Catalog, CatalogDocument};
pub use compat::{
    default_rules, evaluate, evaluate_with, CompatibilityRule, Issue, PartRef, RuleId,
};
pub use descriptor::{
    descriptor, descriptors, CategoryDescriptor, FieldKind, FieldSpec, FieldValue, FilterMode,
};
pub use filter::{facet_values, filter_parts, range_extent, Criterion, FilterCriteria};
pub use part::{
    Case, Category, Cooler, CoolerType, Cpu, CpuBrand, DdrType, Gpu, GpuBrand, Modularity,
    Motherboard, Part, Psu, Ram, Storage, StorageType,
};
pub use power::{
    estimate_power, power_breakdown, psu_has_headroom, recommended_psu_watts, PowerEstimate,
    BASELINE_OVERHEAD_WATTS,
};
pub use reduce::{reduce_all, reduce_options};
pub use selection::{ResolvedBuild, Selection};
pub use sort::{sort_parts, SortDirection, SortState};

#[derive(Debug, Clone, thiserror::Error, Eq, PartialEq)]
pub enum CoreError {
    #[error("catalog error: {0}")]
    Catalog(String),
    #[error("validation error: {0}")]
    Validation(String),
}

/// Check that `key` names a filterable field of `category`.
///
/// # Errors
/// Returns [`CoreError::Validation`] when the field is unknown or not filterable.
pub fn validate_filter_key(category: Category, key: &str) -> Result<&'static FieldSpec, CoreError> {
    match descriptor(category).field(key) {
        Some(spec) if spec.filter != FilterMode::Disabled => Ok(spec),
        Some(_) => Err(CoreError::Validation(format!("{category} field `{key}` is not filterable"))),
        None => Err(CoreError::Validation(format!("{category} has no field `{key}`"))),
    }
}

/// Check that `key` names a sortable field of `category`.
///
/// # Errors
/// Returns [`CoreError::Validation`] when the field is unknown or not sortable.
pub fn validate_sort_key(category: Category, key: &str) -> Result<&'static FieldSpec, CoreError> {
    match descriptor(category).field(key) {
        Some(spec) if spec.sortable => Ok(spec),
        Some(_) => Err(CoreError::Validation(format!("{category} field `{key}` is not sortable"))),
        None => Err(CoreError::Validation(format!("{category} has no field `{key}`"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_keys_are_checked_against_descriptors() {
        assert!(validate_filter_key(Category::Cpu, "socket").is_ok());
        assert_eq!(
            validate_filter_key(Category::Cpu, "name"),
            Err(CoreError::Validation("cpu field `name` is not filterable".to_string()))
        );
        assert_eq!(
            validate_filter_key(Category::Gpu, "socket"),
            Err(CoreError::Validation("gpu has no field `socket`".to_string()))
        );
    }

    #[test]
    fn sort_keys_are_checked_against_descriptors() {
        assert!(validate_sort_key(Category::Ram, "first_word_latency_ns").is_ok());
        assert!(validate_sort_key(Category::Case, "form_factor_support").is_err());
    }
}
