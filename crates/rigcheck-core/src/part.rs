use std::fmt::{Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Cpu,
    Motherboard,
    Ram,
    Gpu,
    Storage,
    Psu,
    Case,
    Cooler,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Self::Cpu,
        Self::Motherboard,
        Self::Ram,
        Self::Gpu,
        Self::Storage,
        Self::Psu,
        Self::Case,
        Self::Cooler,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Motherboard => "motherboard",
            Self::Ram => "ram",
            Self::Gpu => "gpu",
            Self::Storage => "storage",
            Self::Psu => "psu",
            Self::Case => "case",
            Self::Cooler => "cooler",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "cpu" => Some(Self::Cpu),
            "motherboard" => Some(Self::Motherboard),
            "ram" => Some(Self::Ram),
            "gpu" => Some(Self::Gpu),
            "storage" => Some(Self::Storage),
            "psu" => Some(Self::Psu),
            "case" => Some(Self::Case),
            "cooler" => Some(Self::Cooler),
            _ => None,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Cpu => 0,
            Self::Motherboard => 1,
            Self::Ram => 2,
            Self::Gpu => 3,
            Self::Storage => 4,
            Self::Psu => 5,
            Self::Case => 6,
            Self::Cooler => 7,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub enum CpuBrand {
    Intel,
    #[serde(rename = "AMD")]
    Amd,
}

impl CpuBrand {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Intel => "Intel",
            Self::Amd => "AMD",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub enum GpuBrand {
    #[serde(rename = "NVIDIA")]
    Nvidia,
    #[serde(rename = "AMD")]
    Amd,
    Intel,
}

impl GpuBrand {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nvidia => "NVIDIA",
            Self::Amd => "AMD",
            Self::Intel => "Intel",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub enum DdrType {
    #[serde(rename = "DDR4")]
    Ddr4,
    #[serde(rename = "DDR5")]
    Ddr5,
}

impl DdrType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ddr4 => "DDR4",
            Self::Ddr5 => "DDR5",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub enum Modularity {
    Full,
    Semi,
    #[serde(rename = "None")]
    NonModular,
}

impl Modularity {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "Full",
            Self::Semi => "Semi",
            Self::NonModular => "None",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub enum CoolerType {
    Air,
    Liquid,
}

impl CoolerType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Air => "Air",
            Self::Liquid => "Liquid",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub enum StorageType {
    #[serde(rename = "SSD")]
    Ssd,
    #[serde(rename = "HDD")]
    Hdd,
    #[serde(rename = "NVMeSSD")]
    NvmeSsd,
}

impl StorageType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ssd => "SSD",
            Self::Hdd => "HDD",
            Self::NvmeSsd => "NVMeSSD",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cpu {
    pub name: String,
    pub brand: CpuBrand,
    pub price: Option<f64>,
    pub core_count: u32,
    pub base_clock_ghz: f64,
    pub boost_clock_ghz: Option<f64>,
    pub socket: String,
    pub tdp_watts: u32,
    #[serde(default)]
    pub has_integrated_graphics: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Motherboard {
    pub name: String,
    pub brand: Option<String>,
    pub price: Option<f64>,
    pub socket: String,
    pub chipset: String,
    pub form_factor: String,
    pub ram_type: Option<DdrType>,
    pub ram_slots: u32,
    pub ram_max_gb: u32,
    #[serde(default)]
    pub supports_xmp: bool,
    #[serde(default)]
    pub supports_expo: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ram {
    pub name: String,
    pub brand: Option<String>,
    pub price: Option<f64>,
    pub ddr_type: DdrType,
    pub speed_mhz: u32,
    pub modules: u32,
    pub total_size_gb: u32,
    pub cas_latency: u32,
}

impl Ram {
    #[must_use]
    pub fn price_per_gb(&self) -> Option<f64> {
        let price = self.price?;
        if self.total_size_gb == 0 {
            return None;
        }
        Some(price / f64::from(self.total_size_gb))
    }

    /// First-word latency in nanoseconds: CAS cycles over the I/O clock (half the
    /// transfer rate).
    #[must_use]
    pub fn first_word_latency_ns(&self) -> Option<f64> {
        if self.speed_mhz == 0 {
            return None;
        }
        Some(f64::from(self.cas_latency) / (f64::from(self.speed_mhz) / 2.0) * 1000.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Gpu {
    pub name: String,
    pub brand: GpuBrand,
    pub price: Option<f64>,
    pub chipset: String,
    pub vram_gb: u32,
    pub core_clock_mhz: u32,
    pub boost_clock_mhz: u32,
    pub length_mm: Option<u32>,
    pub tdp_watts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Psu {
    pub name: String,
    pub brand: Option<String>,
    pub price: Option<f64>,
    pub wattage: u32,
    pub efficiency_rating: String,
    pub modularity: Modularity,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Case {
    pub name: String,
    pub brand: Option<String>,
    pub price: Option<f64>,
    #[serde(deserialize_with = "one_or_many")]
    pub form_factor_support: Vec<String>,
    pub max_gpu_length_mm: Option<u32>,
    pub max_cooler_height_mm: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cooler {
    pub name: String,
    pub brand: Option<String>,
    pub price: Option<f64>,
    pub cooler_type: CoolerType,
    pub radiator_size_mm: Option<u32>,
    #[serde(default)]
    pub height_mm: Option<u32>,
    #[serde(default)]
    pub supported_sockets: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Storage {
    pub name: String,
    pub brand: Option<String>,
    pub price: Option<f64>,
    pub storage_type: StorageType,
    pub capacity_gb: u32,
}

impl Storage {
    /// Price per gigabyte, or `0.0` when price or capacity cannot produce one.
    #[must_use]
    pub fn price_per_gb(&self) -> f64 {
        match self.price {
            Some(price) if price > 0.0 && self.capacity_gb > 0 => {
                price / f64::from(self.capacity_gb)
            }
            _ => 0.0,
        }
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}

/// One catalog record of any category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum Part {
    Cpu(Cpu),
    Motherboard(Motherboard),
    Ram(Ram),
    Gpu(Gpu),
    Storage(Storage),
    Psu(Psu),
    Case(Case),
    Cooler(Cooler),
}

impl Part {
    #[must_use]
    pub fn category(&self) -> Category {
        match self {
            Self::Cpu(_) => Category::Cpu,
            Self::Motherboard(_) => Category::Motherboard,
            Self::Ram(_) => Category::Ram,
            Self::Gpu(_) => Category::Gpu,
            Self::Storage(_) => Category::Storage,
            Self::Psu(_) => Category::Psu,
            Self::Case(_) => Category::Case,
            Self::Cooler(_) => Category::Cooler,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Cpu(part) => &part.name,
            Self::Motherboard(part) => &part.name,
            Self::Ram(part) => &part.name,
            Self::Gpu(part) => &part.name,
            Self::Storage(part) => &part.name,
            Self::Psu(part) => &part.name,
            Self::Case(part) => &part.name,
            Self::Cooler(part) => &part.name,
        }
    }

    #[must_use]
    pub fn brand(&self) -> Option<&str> {
        match self {
            Self::Cpu(part) => Some(part.brand.as_str()),
            Self::Gpu(part) => Some(part.brand.as_str()),
            Self::Motherboard(part) => part.brand.as_deref(),
            Self::Ram(part) => part.brand.as_deref(),
            Self::Storage(part) => part.brand.as_deref(),
            Self::Psu(part) => part.brand.as_deref(),
            Self::Case(part) => part.brand.as_deref(),
            Self::Cooler(part) => part.brand.as_deref(),
        }
    }

    #[must_use]
    pub fn price(&self) -> Option<f64> {
        match self {
            Self::Cpu(part) => part.price,
            Self::Motherboard(part) => part.price,
            Self::Ram(part) => part.price,
            Self::Gpu(part) => part.price,
            Self::Storage(part) => part.price,
            Self::Psu(part) => part.price,
            Self::Case(part) => part.price,
            Self::Cooler(part) => part.price,
        }
    }

    #[must_use]
    pub fn as_cpu(&self) -> Option<&Cpu> {
        match self {
            Self::Cpu(part) => Some(part),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_motherboard(&self) -> Option<&Motherboard> {
        match self {
            Self::Motherboard(part) => Some(part),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_ram(&self) -> Option<&Ram> {
        match self {
            Self::Ram(part) => Some(part),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_gpu(&self) -> Option<&Gpu> {
        match self {
            Self::Gpu(part) => Some(part),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_storage(&self) -> Option<&Storage> {
        match self {
            Self::Storage(part) => Some(part),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_psu(&self) -> Option<&Psu> {
        match self {
            Self::Psu(part) => Some(part),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_case(&self) -> Option<&Case> {
        match self {
            Self::Case(part) => Some(part),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_cooler(&self) -> Option<&Cooler> {
        match self {
            Self::Cooler(part) => Some(part),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kit(price: Option<f64>, speed_mhz: u32, total_size_gb: u32, cas_latency: u32) -> Ram {
        Ram {
            name: "Vengeance 32GB".to_string(),
            brand: Some("Corsair".to_string()),
            price,
            ddr_type: DdrType::Ddr5,
            speed_mhz,
            modules: 2,
            total_size_gb,
            cas_latency,
        }
    }

    fn assert_close(actual: Option<f64>, expected: f64) {
        match actual {
            Some(value) => assert!((value - expected).abs() < 1e-9, "{value} != {expected}"),
            None => panic!("expected {expected}, got none"),
        }
    }

    #[test]
    fn category_keys_round_trip_through_parse() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
        assert_eq!(Category::parse("monitor"), None);
        assert_eq!(Category::parse("CPU"), None);
    }

    #[test]
    fn ram_derived_metrics_follow_source_fields() {
        let mut ram = kit(Some(120.0), 6000, 32, 30);
        assert_eq!(ram.price_per_gb(), Some(3.75));
        assert_close(ram.first_word_latency_ns(), 10.0);

        ram.cas_latency = 36;
        ram.price = Some(96.0);
        assert_eq!(ram.price_per_gb(), Some(3.0));
        assert_close(ram.first_word_latency_ns(), 12.0);
    }

    #[test]
    fn ram_derived_metrics_are_absent_for_degenerate_inputs() {
        assert_eq!(kit(None, 6000, 32, 30).price_per_gb(), None);
        assert_eq!(kit(Some(100.0), 6000, 0, 30).price_per_gb(), None);
        assert_eq!(kit(Some(100.0), 0, 32, 30).first_word_latency_ns(), None);
    }

    #[test]
    fn storage_price_per_gb_is_zero_when_inputs_are_invalid() {
        let mut drive = Storage {
            name: "990 Pro 2TB".to_string(),
            brand: Some("Samsung".to_string()),
            price: Some(180.0),
            storage_type: StorageType::NvmeSsd,
            capacity_gb: 2000,
        };
        assert!((drive.price_per_gb() - 0.09).abs() < 1e-12);

        drive.capacity_gb = 0;
        assert!(drive.price_per_gb().abs() < f64::EPSILON);

        drive.capacity_gb = 2000;
        drive.price = None;
        assert!(drive.price_per_gb().abs() < f64::EPSILON);
    }

    #[test]
    fn case_form_factor_support_accepts_string_or_list() {
        let single: Case = match serde_json::from_str(
            r#"{"name":"H5 Flow","brand":"NZXT","price":95.0,"form_factor_support":"ATX",
                "max_gpu_length_mm":365,"max_cooler_height_mm":165}"#,
        ) {
            Ok(case) => case,
            Err(err) => panic!("single form factor should parse: {err}"),
        };
        assert_eq!(single.form_factor_support, vec!["ATX".to_string()]);

        let many: Case = match serde_json::from_str(
            r#"{"name":"Meshify 2","brand":"Fractal","price":null,
                "form_factor_support":["E-ATX","ATX","mATX"],
                "max_gpu_length_mm":null,"max_cooler_height_mm":185}"#,
        ) {
            Ok(case) => case,
            Err(err) => panic!("form factor list should parse: {err}"),
        };
        assert_eq!(many.form_factor_support.len(), 3);
        assert_eq!(many.max_gpu_length_mm, None);
    }

    #[test]
    fn vendor_enums_use_catalog_spelling() {
        let cpu: Cpu = match serde_json::from_str(
            r#"{"name":"Ryzen 7 7700X","brand":"AMD","price":299.0,"core_count":8,
                "base_clock_ghz":4.5,"boost_clock_ghz":5.4,"socket":"AM5","tdp_watts":105,
                "has_integrated_graphics":true}"#,
        ) {
            Ok(cpu) => cpu,
            Err(err) => panic!("cpu should parse: {err}"),
        };
        assert_eq!(cpu.brand, CpuBrand::Amd);
        assert_eq!(Part::Cpu(cpu).brand(), Some("AMD"));
    }
}
