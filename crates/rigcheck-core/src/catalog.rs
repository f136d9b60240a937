use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::part::{Case, Category, Cooler, CoolerType, Cpu, Gpu, Motherboard, Part, Psu, Ram, Storage};
use crate::CoreError;

/// Catalog document as supplied by an external data source.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CatalogDocument {
    #[serde(default)]
    pub cpu: Vec<Cpu>,
    #[serde(default)]
    pub motherboard: Vec<Motherboard>,
    #[serde(default)]
    pub ram: Vec<Ram>,
    #[serde(default)]
    pub gpu: Vec<Gpu>,
    #[serde(default)]
    pub storage: Vec<Storage>,
    #[serde(default)]
    pub psu: Vec<Psu>,
    #[serde(default)]
    pub case: Vec<Case>,
    #[serde(default)]
    pub cooler: Vec<Cooler>,
}

/// Immutable, category-grouped part records.
///
/// A catalog is built once and then only read. Engines borrow records from it;
/// nothing in this crate hands out mutable access.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    parts: [Vec<Part>; 8],
}

impl Catalog {
    /// Parse and validate a JSON catalog document.
    ///
    /// # Errors
    /// Returns [`CoreError::Catalog`] when the document is not valid JSON, does not
    /// match the catalog shape, or violates a catalog invariant.
    pub fn from_json_str(input: &str) -> Result<Self, CoreError> {
        let document: CatalogDocument = serde_json::from_str(input)
            .map_err(|err| CoreError::Catalog(format!("malformed catalog document: {err}")))?;
        Self::from_document(document)
    }

    /// Build a catalog from an already-deserialised document.
    ///
    /// # Errors
    /// Returns [`CoreError::Catalog`] on blank or duplicate names within a
    /// category, invalid prices, or an air cooler that declares a radiator.
    pub fn from_document(document: CatalogDocument) -> Result<Self, CoreError> {
        let CatalogDocument { cpu, motherboard, ram, gpu, storage, psu, case, cooler } = document;
        Self::from_parts(
            cpu.into_iter()
                .map(Part::Cpu)
                .chain(motherboard.into_iter().map(Part::Motherboard))
                .chain(ram.into_iter().map(Part::Ram))
                .chain(gpu.into_iter().map(Part::Gpu))
                .chain(storage.into_iter().map(Part::Storage))
                .chain(psu.into_iter().map(Part::Psu))
                .chain(case.into_iter().map(Part::Case))
                .chain(cooler.into_iter().map(Part::Cooler)),
        )
    }

    /// Build a catalog from records of any category, keeping per-category input order.
    ///
    /// # Errors
    /// Same conditions as [`Catalog::from_document`].
    pub fn from_parts<I>(parts: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = Part>,
    {
        let mut catalog = Self::default();
        let mut seen: BTreeMap<Category, BTreeSet<String>> = BTreeMap::new();

        for part in parts {
            validate_part(&part)?;
            let category = part.category();
            if !seen.entry(category).or_default().insert(part.name().to_string()) {
                return Err(CoreError::Catalog(format!(
                    "duplicate {category} name `{}`",
                    part.name()
                )));
            }
            catalog.parts[category.index()].push(part);
        }

        tracing::debug!(records = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    #[must_use]
    pub fn parts(&self, category: Category) -> &[Part] {
        &self.parts[category.index()]
    }

    #[must_use]
    pub fn find(&self, category: Category, name: &str) -> Option<&Part> {
        self.parts(category).iter().find(|part| part.name() == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.iter().all(Vec::is_empty)
    }

    #[must_use]
    pub fn category_counts(&self) -> BTreeMap<Category, usize> {
        Category::ALL.into_iter().map(|category| (category, self.parts(category).len())).collect()
    }
}

fn validate_part(part: &Part) -> Result<(), CoreError> {
    let category = part.category();
    if part.name().trim().is_empty() {
        return Err(CoreError::Catalog(format!("{category} record has an empty name")));
    }

    if let Some(price) = part.price() {
        if !price.is_finite() || price < 0.0 {
            return Err(CoreError::Catalog(format!(
                "{category} `{}` has invalid price {price}",
                part.name()
            )));
        }
    }

    if let Part::Cooler(cooler) = part {
        if cooler.cooler_type == CoolerType::Air && cooler.radiator_size_mm.is_some() {
            return Err(CoreError::Catalog(format!(
                "air cooler `{}` must not declare a radiator size",
                cooler.name
            )));
        }
    }

    Ok(())
}
