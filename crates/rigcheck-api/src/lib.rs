use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use rigcheck_core::{
    descriptor, descriptors, evaluate, facet_values, filter_parts, power_breakdown, range_extent,
    reduce_options, sort_parts, validate_filter_key, validate_sort_key, Catalog, Category,
    FieldSpec, FilterCriteria, FilterMode, Issue, Part, PowerEstimate, Selection, SortDirection,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

mod config;
mod session;

pub use config::{
    parse_switch, resolve_settings, Settings, SettingsSources, AUTO_FILTER_ENV, CONFIG_PATH_ENV,
};
pub use session::{BuildSession, RefreshTicket};

pub const API_CONTRACT_VERSION: &str = "api.v1";

const ROW_HEADER_KEYS: [&str; 3] = ["name", "brand", "price"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortSpec {
    pub key: String,
    #[serde(default)]
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BrowseRequest {
    pub category: Category,
    #[serde(default)]
    pub criteria: FilterCriteria,
    #[serde(default)]
    pub sort: Option<SortSpec>,
}

impl BrowseRequest {
    #[must_use]
    pub fn new(category: Category) -> Self {
        Self { category, criteria: FilterCriteria::new(), sort: None }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PartRow {
    pub name: String,
    pub brand: Option<String>,
    pub price: Option<f64>,
    pub fields: Map<String, Value>,
}

/// Values available for one filterable field across a whole category.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Facet {
    pub key: String,
    pub label: String,
    pub mode: FilterMode,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BrowseResult {
    pub category: Category,
    pub total: usize,
    pub matched: usize,
    pub rows: Vec<PartRow>,
    pub facets: Vec<Facet>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OptionsResult {
    pub category: Category,
    pub auto_filter: bool,
    pub total: usize,
    pub options: Vec<String>,
    /// The current pick is listed only because it is selected; it would
    /// otherwise have been narrowed away.
    pub kept_selection: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryInfo {
    pub category: Category,
    pub label: &'static str,
    pub records: usize,
    pub filterable: Vec<&'static str>,
    pub sortable: Vec<&'static str>,
    pub fields: &'static [FieldSpec],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildReport {
    pub api_contract_version: String,
    pub fingerprint: String,
    pub selection: Selection,
    pub dangling: Vec<Category>,
    pub issues: Vec<Issue>,
    pub estimated_watts: u32,
    pub power: Option<PowerEstimate>,
    pub compatible: bool,
}

#[derive(Debug, Clone)]
pub struct RigcheckApi {
    catalog: Arc<Catalog>,
    settings: Settings,
}

impl RigcheckApi {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, settings: Settings) -> Self {
        Self { catalog, settings }
    }

    /// Load a JSON catalog from disk.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read or is not a valid catalog.
    pub fn from_catalog_path(path: &Path, settings: Settings) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog {}", path.display()))?;
        let catalog = Catalog::from_json_str(&text)
            .with_context(|| format!("failed to load catalog {}", path.display()))?;
        tracing::info!(path = %path.display(), records = catalog.len(), "loaded catalog");
        Ok(Self::new(Arc::new(catalog), settings))
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn categories(&self) -> Vec<CategoryInfo> {
        descriptors()
            .iter()
            .map(|spec| CategoryInfo {
                category: spec.category,
                label: spec.label,
                records: self.catalog.parts(spec.category).len(),
                filterable: spec.filterable().map(|field| field.key).collect(),
                sortable: spec.sortable().map(|field| field.key).collect(),
                fields: spec.fields,
            })
            .collect()
    }

    /// Filter, sort and tabulate one category.
    ///
    /// Without an explicit sort the configured default applies when the category
    /// has that key; otherwise catalog order is kept.
    ///
    /// # Errors
    /// Returns an error when a criterion or the explicit sort names a field the
    /// category cannot filter or sort by.
    pub fn browse(&self, request: &BrowseRequest) -> Result<BrowseResult> {
        let category = request.category;
        for key in request.criteria.dimensions.keys() {
            validate_filter_key(category, key)?;
        }
        let sort = match &request.sort {
            Some(sort) => {
                validate_sort_key(category, &sort.key)?;
                Some((sort.key.as_str(), sort.direction))
            }
            None => self
                .settings
                .default_sort
                .as_deref()
                .filter(|key| validate_sort_key(category, key).is_ok())
                .map(|key| (key, self.settings.default_direction)),
        };

        let records = self.catalog.parts(category);
        let kept = filter_parts(category, records, &request.criteria);
        let ordered = match sort {
            Some((key, direction)) => sort_parts(category, kept, key, direction),
            None => kept,
        };

        tracing::debug!(%category, total = records.len(), matched = ordered.len(), "browsed category");
        Ok(BrowseResult {
            category,
            total: records.len(),
            matched: ordered.len(),
            rows: ordered.into_iter().map(part_row).collect(),
            facets: facets(category, records),
        })
    }

    /// Selectable records of `category` given the rest of `selection`.
    #[must_use]
    pub fn options(&self, category: Category, selection: &Selection) -> OptionsResult {
        let auto_filter = self.settings.auto_compatibility_filter;
        let options = reduce_options(category, &self.catalog, selection, auto_filter);

        let kept_selection = auto_filter
            && selection.resolved(&self.catalog, category).is_some_and(|current| {
                let without_pick = selection.clone().with(category, None);
                !reduce_options(category, &self.catalog, &without_pick, true)
                    .into_iter()
                    .any(|part| std::ptr::eq(part, current))
            });

        OptionsResult {
            category,
            auto_filter,
            total: self.catalog.parts(category).len(),
            options: options.into_iter().map(|part| part.name().to_string()).collect(),
            kept_selection,
        }
    }

    /// Evaluate a build: dangling picks, compatibility issues and power draw.
    #[must_use]
    pub fn check(&self, selection: &Selection) -> BuildReport {
        let issues = evaluate(&self.catalog, selection);
        let power = power_breakdown(&selection.resolve(&self.catalog));
        BuildReport {
            api_contract_version: API_CONTRACT_VERSION.to_string(),
            fingerprint: self.fingerprint(selection),
            selection: selection.clone(),
            dangling: selection.dangling(&self.catalog),
            compatible: issues.is_empty(),
            issues,
            estimated_watts: power.map_or(0, |estimate| estimate.total_watts),
            power,
        }
    }

    /// Stable digest of everything a [`BuildReport`] depends on besides the
    /// catalog: the picks and the auto-filter switch.
    #[must_use]
    pub fn fingerprint(&self, selection: &Selection) -> String {
        fingerprint(selection, self.settings.auto_compatibility_filter)
    }
}

#[must_use]
pub fn fingerprint(selection: &Selection, auto_filter: bool) -> String {
    let mut hasher = Sha256::new();
    hasher.update(API_CONTRACT_VERSION.as_bytes());
    hasher.update([0, u8::from(auto_filter)]);
    for (category, name) in selection.iter() {
        hasher.update(category.as_str().as_bytes());
        hasher.update([0]);
        hasher.update(name.as_bytes());
        hasher.update([0]);
    }
    format!("sha256:{}", hex::encode(hasher.finalize()))
}

fn part_row(part: &Part) -> PartRow {
    let spec = descriptor(part.category());
    let fields = spec
        .fields
        .iter()
        .filter(|field| !ROW_HEADER_KEYS.contains(&field.key))
        .map(|field| (field.key.to_string(), spec.value(part, field.key).to_json()))
        .collect();
    PartRow {
        name: part.name().to_string(),
        brand: part.brand().map(str::to_string),
        price: part.price(),
        fields,
    }
}

fn facets(category: Category, records: &[Part]) -> Vec<Facet> {
    descriptor(category)
        .filterable()
        .map(|field| {
            let mut facet = Facet {
                key: field.key.to_string(),
                label: field.label.to_string(),
                mode: field.filter,
                values: Vec::new(),
                min: None,
                max: None,
            };
            match field.filter {
                FilterMode::Discrete => facet.values = facet_values(category, records, field.key),
                FilterMode::Range => {
                    if let Some((min, max)) = range_extent(category, records, field.key) {
                        facet.min = Some(min);
                        facet.max = Some(max);
                    }
                }
                FilterMode::Disabled => {}
            }
            facet
        })
        .collect()
}
