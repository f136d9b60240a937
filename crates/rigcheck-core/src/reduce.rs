use std::collections::BTreeMap;

use crate::catalog::Catalog;
use crate::part::{Category, Part};
use crate::power::{estimate_power, psu_has_headroom, BASELINE_OVERHEAD_WATTS};
use crate::selection::{ResolvedBuild, Selection};

/// Narrow the selectable options of `category` to those compatible with the
/// other picks.
///
/// With `auto_filter` off the whole category is returned. With it on, CPUs and
/// motherboards follow each other's socket, memory follows the motherboard's
/// memory type, and power supplies must cover the estimated load with 20%
/// headroom. GPU, storage, case and cooler options are never narrowed. If the
/// current pick of `category` is narrowed away it is put back at the front.
#[must_use]
pub fn reduce_options<'a>(
    category: Category,
    catalog: &'a Catalog,
    selection: &Selection,
    auto_filter: bool,
) -> Vec<&'a Part> {
    let options = catalog.parts(category);
    if !auto_filter {
        return options.iter().collect();
    }

    let build = selection.resolve(catalog);
    let mut narrowed: Vec<&'a Part> =
        options.iter().filter(|part| is_compatible(part, &build)).collect();

    if let Some(current) = selection.resolved(catalog, category) {
        if !narrowed.iter().any(|part| std::ptr::eq(*part, current)) {
            narrowed.insert(0, current);
        }
    }

    tracing::debug!(
        %category,
        total = options.len(),
        kept = narrowed.len(),
        "reduced options"
    );
    narrowed
}

/// [`reduce_options`] for every category.
#[must_use]
pub fn reduce_all<'a>(
    catalog: &'a Catalog,
    selection: &Selection,
    auto_filter: bool,
) -> BTreeMap<Category, Vec<&'a Part>> {
    Category::ALL
        .into_iter()
        .map(|category| (category, reduce_options(category, catalog, selection, auto_filter)))
        .collect()
}

fn is_compatible(part: &Part, build: &ResolvedBuild<'_>) -> bool {
    match part {
        Part::Cpu(cpu) => build.motherboard.map_or(true, |board| board.socket == cpu.socket),
        Part::Motherboard(board) => build.cpu.map_or(true, |cpu| cpu.socket == board.socket),
        Part::Ram(ram) => build
            .motherboard
            .and_then(|board| board.ram_type)
            .map_or(true, |ram_type| ram.ddr_type == ram_type),
        Part::Psu(psu) => {
            let required = estimate_power(build);
            required <= BASELINE_OVERHEAD_WATTS || psu_has_headroom(psu.wattage, required)
        }
        Part::Gpu(_) | Part::Storage(_) | Part::Case(_) | Part::Cooler(_) => true,
    }
}
