//! Per-category field tables.
//!
//! Each category lists the fields it exposes to browsing, how each field may be
//! filtered, and whether it can be sorted. Values are read through one accessor
//! function per category so the filter and sort engines stay category-agnostic.

use serde::Serialize;
use serde_json::Value;

use crate::part::{Category, Part};

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    TextList(&'a [String]),
    Number(f64),
    Flag(bool),
    Missing,
}

impl FieldValue<'_> {
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Keys used for discrete set membership. A list yields one key per element.
    #[must_use]
    pub fn discrete_keys(&self) -> Vec<String> {
        match self {
            Self::Text(value) => vec![(*value).to_string()],
            Self::TextList(values) => values.to_vec(),
            Self::Number(value) => vec![value.to_string()],
            Self::Flag(value) => vec![value.to_string()],
            Self::Missing => Vec::new(),
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(value) => Value::String((*value).to_string()),
            Self::TextList(values) => {
                Value::Array(values.iter().map(|value| Value::String(value.clone())).collect())
            }
            Self::Number(value) => serde_json::Number::from_f64(*value).map_or(Value::Null, Value::Number),
            Self::Flag(value) => Value::Bool(*value),
            Self::Missing => Value::Null,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    TextList,
    Number,
    Flag,
}

#[derive(Debug, Clone, Copy, Serialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    Discrete,
    Range,
    Disabled,
}

#[derive(Debug, Clone, Copy, Serialize, Eq, PartialEq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub filter: FilterMode,
    pub sortable: bool,
}

const fn field(
    key: &'static str,
    label: &'static str,
    kind: FieldKind,
    filter: FilterMode,
    sortable: bool,
) -> FieldSpec {
    FieldSpec { key, label, kind, filter, sortable }
}

const NAME: FieldSpec = field("name", "Name", FieldKind::Text, FilterMode::Disabled, true);
const BRAND: FieldSpec = field("brand", "Brand", FieldKind::Text, FilterMode::Discrete, true);
const PRICE: FieldSpec = field("price", "Price (USD)", FieldKind::Number, FilterMode::Range, true);

type Accessor = for<'a> fn(&'a Part, &str) -> FieldValue<'a>;

#[derive(Clone, Copy, Serialize)]
pub struct CategoryDescriptor {
    pub category: Category,
    pub label: &'static str,
    pub fields: &'static [FieldSpec],
    #[serde(skip)]
    accessor: Accessor,
}

impl std::fmt::Debug for CategoryDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryDescriptor")
            .field("category", &self.category)
            .field("label", &self.label)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl CategoryDescriptor {
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|spec| spec.key == key)
    }

    pub fn filterable(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields.iter().filter(|spec| spec.filter != FilterMode::Disabled)
    }

    pub fn sortable(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields.iter().filter(|spec| spec.sortable)
    }

    /// Read one field from a record. Keys this category does not declare, and
    /// records of another category, read as [`FieldValue::Missing`].
    #[must_use]
    pub fn value<'a>(&self, part: &'a Part, key: &str) -> FieldValue<'a> {
        if part.category() != self.category || self.field(key).is_none() {
            return FieldValue::Missing;
        }
        match key {
            "name" => FieldValue::Text(part.name()),
            "brand" => part.brand().map_or(FieldValue::Missing, FieldValue::Text),
            "price" => number(part.price()),
            _ => (self.accessor)(part, key),
        }
    }
}

#[must_use]
pub fn descriptor(category: Category) -> &'static CategoryDescriptor {
    &DESCRIPTORS[category.index()]
}

#[must_use]
pub fn descriptors() -> &'static [CategoryDescriptor] {
    &DESCRIPTORS
}

fn number(value: Option<f64>) -> FieldValue<'static> {
    value.map_or(FieldValue::Missing, FieldValue::Number)
}

fn count(value: u32) -> FieldValue<'static> {
    FieldValue::Number(f64::from(value))
}

fn optional_count(value: Option<u32>) -> FieldValue<'static> {
    value.map_or(FieldValue::Missing, count)
}

static DESCRIPTORS: [CategoryDescriptor; 8] = [
    CategoryDescriptor {
        category: Category::Cpu,
        label: "CPU",
        fields: &[
            NAME,
            BRAND,
            PRICE,
            field("core_count", "Cores", FieldKind::Number, FilterMode::Range, true),
            field("base_clock_ghz", "Base clock (GHz)", FieldKind::Number, FilterMode::Range, true),
            field("boost_clock_ghz", "Boost clock (GHz)", FieldKind::Number, FilterMode::Range, true),
            field("socket", "Socket", FieldKind::Text, FilterMode::Discrete, true),
            field("tdp_watts", "TDP (W)", FieldKind::Number, FilterMode::Range, true),
            field(
                "has_integrated_graphics",
                "Integrated graphics",
                FieldKind::Flag,
                FilterMode::Discrete,
                true,
            ),
        ],
        accessor: cpu_value,
    },
    CategoryDescriptor {
        category: Category::Motherboard,
        label: "Motherboard",
        fields: &[
            NAME,
            BRAND,
            PRICE,
            field("socket", "Socket", FieldKind::Text, FilterMode::Discrete, true),
            field("chipset", "Chipset", FieldKind::Text, FilterMode::Discrete, true),
            field("form_factor", "Form factor", FieldKind::Text, FilterMode::Discrete, true),
            field("ram_type", "Memory type", FieldKind::Text, FilterMode::Discrete, true),
            field("ram_slots", "Memory slots", FieldKind::Number, FilterMode::Discrete, true),
            field("ram_max_gb", "Max memory (GB)", FieldKind::Number, FilterMode::Range, true),
            field("supports_xmp", "XMP", FieldKind::Flag, FilterMode::Discrete, true),
            field("supports_expo", "EXPO", FieldKind::Flag, FilterMode::Discrete, true),
        ],
        accessor: motherboard_value,
    },
    CategoryDescriptor {
        category: Category::Ram,
        label: "Memory",
        fields: &[
            NAME,
            BRAND,
            PRICE,
            field("ddr_type", "Type", FieldKind::Text, FilterMode::Discrete, true),
            field("speed_mhz", "Speed (MT/s)", FieldKind::Number, FilterMode::Range, true),
            field("modules", "Modules", FieldKind::Number, FilterMode::Discrete, true),
            field("total_size_gb", "Capacity (GB)", FieldKind::Number, FilterMode::Discrete, true),
            field("cas_latency", "CAS latency", FieldKind::Number, FilterMode::Range, true),
            field("price_per_gb", "Price per GB", FieldKind::Number, FilterMode::Range, true),
            field(
                "first_word_latency_ns",
                "First word latency (ns)",
                FieldKind::Number,
                FilterMode::Range,
                true,
            ),
        ],
        accessor: ram_value,
    },
    CategoryDescriptor {
        category: Category::Gpu,
        label: "Video card",
        fields: &[
            NAME,
            BRAND,
            PRICE,
            field("chipset", "Chipset", FieldKind::Text, FilterMode::Discrete, true),
            field("vram_gb", "Memory (GB)", FieldKind::Number, FilterMode::Discrete, true),
            field("core_clock_mhz", "Core clock (MHz)", FieldKind::Number, FilterMode::Range, true),
            field("boost_clock_mhz", "Boost clock (MHz)", FieldKind::Number, FilterMode::Range, true),
            field("length_mm", "Length (mm)", FieldKind::Number, FilterMode::Range, true),
            field("tdp_watts", "TDP (W)", FieldKind::Number, FilterMode::Range, true),
        ],
        accessor: gpu_value,
    },
    CategoryDescriptor {
        category: Category::Storage,
        label: "Storage",
        fields: &[
            NAME,
            BRAND,
            PRICE,
            field("storage_type", "Type", FieldKind::Text, FilterMode::Discrete, true),
            field("capacity_gb", "Capacity (GB)", FieldKind::Number, FilterMode::Range, true),
            field("price_per_gb", "Price per GB", FieldKind::Number, FilterMode::Range, true),
        ],
        accessor: storage_value,
    },
    CategoryDescriptor {
        category: Category::Psu,
        label: "Power supply",
        fields: &[
            NAME,
            BRAND,
            PRICE,
            field("wattage", "Wattage", FieldKind::Number, FilterMode::Range, true),
            field("efficiency_rating", "Efficiency", FieldKind::Text, FilterMode::Discrete, true),
            field("modularity", "Modular", FieldKind::Text, FilterMode::Discrete, true),
        ],
        accessor: psu_value,
    },
    CategoryDescriptor {
        category: Category::Case,
        label: "Case",
        fields: &[
            NAME,
            BRAND,
            PRICE,
            field(
                "form_factor_support",
                "Form factors",
                FieldKind::TextList,
                FilterMode::Discrete,
                false,
            ),
            field("max_gpu_length_mm", "Max GPU length (mm)", FieldKind::Number, FilterMode::Range, true),
            field(
                "max_cooler_height_mm",
                "Max cooler height (mm)",
                FieldKind::Number,
                FilterMode::Range,
                true,
            ),
        ],
        accessor: case_value,
    },
    CategoryDescriptor {
        category: Category::Cooler,
        label: "CPU cooler",
        fields: &[
            NAME,
            BRAND,
            PRICE,
            field("cooler_type", "Type", FieldKind::Text, FilterMode::Discrete, true),
            field("radiator_size_mm", "Radiator (mm)", FieldKind::Number, FilterMode::Discrete, true),
            field("height_mm", "Height (mm)", FieldKind::Number, FilterMode::Range, true),
            field(
                "supported_sockets",
                "Sockets",
                FieldKind::TextList,
                FilterMode::Discrete,
                false,
            ),
        ],
        accessor: cooler_value,
    },
];

fn cpu_value<'a>(part: &'a Part, key: &str) -> FieldValue<'a> {
    let Some(cpu) = part.as_cpu() else {
        return FieldValue::Missing;
    };
    match key {
        "core_count" => count(cpu.core_count),
        "base_clock_ghz" => FieldValue::Number(cpu.base_clock_ghz),
        "boost_clock_ghz" => number(cpu.boost_clock_ghz),
        "socket" => FieldValue::Text(&cpu.socket),
        "tdp_watts" => count(cpu.tdp_watts),
        "has_integrated_graphics" => FieldValue::Flag(cpu.has_integrated_graphics),
        _ => FieldValue::Missing,
    }
}

fn motherboard_value<'a>(part: &'a Part, key: &str) -> FieldValue<'a> {
    let Some(board) = part.as_motherboard() else {
        return FieldValue::Missing;
    };
    match key {
        "socket" => FieldValue::Text(&board.socket),
        "chipset" => FieldValue::Text(&board.chipset),
        "form_factor" => FieldValue::Text(&board.form_factor),
        "ram_type" => board.ram_type.map_or(FieldValue::Missing, |ddr| FieldValue::Text(ddr.as_str())),
        "ram_slots" => count(board.ram_slots),
        "ram_max_gb" => count(board.ram_max_gb),
        "supports_xmp" => FieldValue::Flag(board.supports_xmp),
        "supports_expo" => FieldValue::Flag(board.supports_expo),
        _ => FieldValue::Missing,
    }
}

fn ram_value<'a>(part: &'a Part, key: &str) -> FieldValue<'a> {
    let Some(ram) = part.as_ram() else {
        return FieldValue::Missing;
    };
    match key {
        "ddr_type" => FieldValue::Text(ram.ddr_type.as_str()),
        "speed_mhz" => count(ram.speed_mhz),
        "modules" => count(ram.modules),
        "total_size_gb" => count(ram.total_size_gb),
        "cas_latency" => count(ram.cas_latency),
        "price_per_gb" => number(ram.price_per_gb()),
        "first_word_latency_ns" => number(ram.first_word_latency_ns()),
        _ => FieldValue::Missing,
    }
}

fn gpu_value<'a>(part: &'a Part, key: &str) -> FieldValue<'a> {
    let Some(gpu) = part.as_gpu() else {
        return FieldValue::Missing;
    };
    match key {
        "chipset" => FieldValue::Text(&gpu.chipset),
        "vram_gb" => count(gpu.vram_gb),
        "core_clock_mhz" => count(gpu.core_clock_mhz),
        "boost_clock_mhz" => count(gpu.boost_clock_mhz),
        "length_mm" => optional_count(gpu.length_mm),
        "tdp_watts" => count(gpu.tdp_watts),
        _ => FieldValue::Missing,
    }
}

fn storage_value<'a>(part: &'a Part, key: &str) -> FieldValue<'a> {
    let Some(storage) = part.as_storage() else {
        return FieldValue::Missing;
    };
    match key {
        "storage_type" => FieldValue::Text(storage.storage_type.as_str()),
        "capacity_gb" => count(storage.capacity_gb),
        "price_per_gb" => FieldValue::Number(storage.price_per_gb()),
        _ => FieldValue::Missing,
    }
}

fn psu_value<'a>(part: &'a Part, key: &str) -> FieldValue<'a> {
    let Some(psu) = part.as_psu() else {
        return FieldValue::Missing;
    };
    match key {
        "wattage" => count(psu.wattage),
        "efficiency_rating" => FieldValue::Text(&psu.efficiency_rating),
        "modularity" => FieldValue::Text(psu.modularity.as_str()),
        _ => FieldValue::Missing,
    }
}

fn case_value<'a>(part: &'a Part, key: &str) -> FieldValue<'a> {
    let Some(case) = part.as_case() else {
        return FieldValue::Missing;
    };
    match key {
        "form_factor_support" => FieldValue::TextList(&case.form_factor_support),
        "max_gpu_length_mm" => optional_count(case.max_gpu_length_mm),
        "max_cooler_height_mm" => optional_count(case.max_cooler_height_mm),
        _ => FieldValue::Missing,
    }
}

fn cooler_value<'a>(part: &'a Part, key: &str) -> FieldValue<'a> {
    let Some(cooler) = part.as_cooler() else {
        return FieldValue::Missing;
    };
    match key {
        "cooler_type" => FieldValue::Text(cooler.cooler_type.as_str()),
        "radiator_size_mm" => optional_count(cooler.radiator_size_mm),
        "height_mm" => optional_count(cooler.height_mm),
        "supported_sockets" => FieldValue::TextList(&cooler.supported_sockets),
        _ => FieldValue::Missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::part::{Cooler, CoolerType, DdrType, Ram};

    fn ram_part() -> Part {
        Part::Ram(Ram {
            name: "Flare X5 32GB".to_string(),
            brand: None,
            price: Some(104.0),
            ddr_type: DdrType::Ddr5,
            speed_mhz: 6000,
            modules: 2,
            total_size_gb: 32,
            cas_latency: 30,
        })
    }

    #[test]
    fn descriptor_table_is_indexed_by_category() {
        for category in Category::ALL {
            assert_eq!(descriptor(category).category, category);
        }
    }

    #[test]
    fn every_category_exposes_common_fields() {
        for spec in descriptors() {
            for key in ["name", "brand", "price"] {
                assert!(spec.field(key).is_some(), "{} is missing `{key}`", spec.label);
            }
        }
    }

    #[test]
    fn every_declared_field_is_readable() {
        let part = ram_part();
        let ram = descriptor(Category::Ram);
        for spec in ram.fields {
            if spec.key == "brand" {
                continue;
            }
            assert!(!ram.value(&part, spec.key).is_missing(), "`{}` read as missing", spec.key);
        }
    }

    #[test]
    fn derived_fields_read_through_the_descriptor() {
        let part = ram_part();
        let ram = descriptor(Category::Ram);
        assert_eq!(ram.value(&part, "price_per_gb"), FieldValue::Number(3.25));
        assert_eq!(ram.value(&part, "brand"), FieldValue::Missing);
    }

    #[test]
    fn undeclared_keys_and_foreign_records_read_as_missing() {
        let part = ram_part();
        assert!(descriptor(Category::Ram).value(&part, "socket").is_missing());
        assert!(descriptor(Category::Cpu).value(&part, "name").is_missing());
    }

    #[test]
    fn discrete_keys_render_integers_without_fraction() {
        assert_eq!(FieldValue::Number(16.0).discrete_keys(), vec!["16".to_string()]);
        assert_eq!(FieldValue::Number(3.5).discrete_keys(), vec!["3.5".to_string()]);
        assert_eq!(FieldValue::Flag(true).discrete_keys(), vec!["true".to_string()]);
        assert!(FieldValue::Missing.discrete_keys().is_empty());
    }

    #[test]
    fn list_fields_yield_one_key_per_element() {
        let part = Part::Cooler(Cooler {
            name: "AK620".to_string(),
            brand: Some("DeepCool".to_string()),
            price: Some(65.0),
            cooler_type: CoolerType::Air,
            radiator_size_mm: None,
            height_mm: Some(160),
            supported_sockets: vec!["AM5".to_string(), "LGA1700".to_string()],
        });
        let keys = descriptor(Category::Cooler).value(&part, "supported_sockets").discrete_keys();
        assert_eq!(keys, vec!["AM5".to_string(), "LGA1700".to_string()]);
    }
}
