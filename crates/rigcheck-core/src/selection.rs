use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::part::{Case, Category, Cooler, Cpu, Gpu, Motherboard, Part, Psu, Ram, Storage};

/// One picked record name per category.
///
/// Names are stored as given. Membership in the catalog is checked lazily by
/// [`Selection::resolved`], so a pick that no longer exists reads as unselected
/// instead of failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
#[serde(transparent)]
pub struct Selection {
    picks: BTreeMap<Category, String>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear the pick for `category`. Names are kept verbatim; a blank
    /// or whitespace-only name clears the pick.
    pub fn set(&mut self, category: Category, name: Option<&str>) {
        match name.filter(|name| !name.trim().is_empty()) {
            Some(name) => {
                self.picks.insert(category, name.to_string());
            }
            None => {
                self.picks.remove(&category);
            }
        }
    }

    #[must_use]
    pub fn with(mut self, category: Category, name: Option<&str>) -> Self {
        self.set(category, name);
        self
    }

    #[must_use]
    pub fn name(&self, category: Category) -> Option<&str> {
        self.picks.get(&category).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &str)> {
        self.picks.iter().map(|(category, name)| (*category, name.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    #[must_use]
    pub fn resolved<'a>(&self, catalog: &'a Catalog, category: Category) -> Option<&'a Part> {
        catalog.find(category, self.name(category)?)
    }

    /// Categories whose pick does not resolve in `catalog`.
    #[must_use]
    pub fn dangling(&self, catalog: &Catalog) -> Vec<Category> {
        self.picks
            .iter()
            .filter(|(category, name)| catalog.find(**category, name).is_none())
            .map(|(category, _)| *category)
            .collect()
    }

    #[must_use]
    pub fn resolve<'a>(&self, catalog: &'a Catalog) -> ResolvedBuild<'a> {
        ResolvedBuild {
            cpu: self.resolved(catalog, Category::Cpu).and_then(Part::as_cpu),
            motherboard: self.resolved(catalog, Category::Motherboard).and_then(Part::as_motherboard),
            ram: self.resolved(catalog, Category::Ram).and_then(Part::as_ram),
            gpu: self.resolved(catalog, Category::Gpu).and_then(Part::as_gpu),
            storage: self.resolved(catalog, Category::Storage).and_then(Part::as_storage),
            psu: self.resolved(catalog, Category::Psu).and_then(Part::as_psu),
            case: self.resolved(catalog, Category::Case).and_then(Part::as_case),
            cooler: self.resolved(catalog, Category::Cooler).and_then(Part::as_cooler),
        }
    }
}

/// Typed view of the picks that resolve in a catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResolvedBuild<'a> {
    pub cpu: Option<&'a Cpu>,
    pub motherboard: Option<&'a Motherboard>,
    pub ram: Option<&'a Ram>,
    pub gpu: Option<&'a Gpu>,
    pub storage: Option<&'a Storage>,
    pub psu: Option<&'a Psu>,
    pub case: Option<&'a Case>,
    pub cooler: Option<&'a Cooler>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::part::CpuBrand;

    fn catalog_with_cpu(name: &str) -> Catalog {
        let cpu = Part::Cpu(Cpu {
            name: name.to_string(),
            brand: CpuBrand::Amd,
            price: Some(299.0),
            core_count: 8,
            base_clock_ghz: 4.5,
            boost_clock_ghz: Some(5.4),
            socket: "AM5".to_string(),
            tdp_watts: 105,
            has_integrated_graphics: true,
        });
        match Catalog::from_parts([cpu]) {
            Ok(catalog) => catalog,
            Err(err) => panic!("fixture catalog should load: {err}"),
        }
    }

    #[test]
    fn select_and_unselect() {
        let selection = Selection::new().with(Category::Cpu, Some("Ryzen 7 7700X"));
        assert_eq!(selection.name(Category::Cpu), Some("Ryzen 7 7700X"));
        let cleared = selection.with(Category::Cpu, None);
        assert!(cleared.is_empty());
    }

    #[test]
    fn blank_names_clear_the_pick() {
        let mut selection = Selection::new().with(Category::Gpu, Some("RTX 4070"));
        selection.set(Category::Gpu, Some("   "));
        assert_eq!(selection.name(Category::Gpu), None);
    }

    #[test]
    fn names_are_stored_verbatim() {
        let catalog = catalog_with_cpu("Ryzen 7 7700X ");
        let selection = Selection::new().with(Category::Cpu, Some("Ryzen 7 7700X "));
        assert_eq!(selection.name(Category::Cpu), Some("Ryzen 7 7700X "));
        assert!(selection.resolved(&catalog, Category::Cpu).is_some());
        assert!(selection.dangling(&catalog).is_empty());
    }

    #[test]
    fn unknown_names_are_kept_but_do_not_resolve() {
        let catalog = catalog_with_cpu("Ryzen 7 7700X");
        let selection = Selection::new()
            .with(Category::Cpu, Some("Ryzen 7 7700X"))
            .with(Category::Motherboard, Some("Imaginary B650"));

        assert!(selection.resolved(&catalog, Category::Cpu).is_some());
        assert!(selection.resolved(&catalog, Category::Motherboard).is_none());
        assert_eq!(selection.dangling(&catalog), vec![Category::Motherboard]);

        let build = selection.resolve(&catalog);
        assert!(build.cpu.is_some());
        assert!(build.motherboard.is_none());
    }

    #[test]
    fn serialises_as_category_map() {
        let selection = Selection::new().with(Category::Psu, Some("RM850x"));
        let json = match serde_json::to_string(&selection) {
            Ok(json) => json,
            Err(err) => panic!("selection should serialise: {err}"),
        };
        assert_eq!(json, r#"{"psu":"RM850x"}"#);
    }
}
