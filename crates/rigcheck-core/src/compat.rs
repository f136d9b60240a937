//! Cross-category compatibility rules.
//!
//! Each rule inspects a [`ResolvedBuild`] and raises at most one [`Issue`]. A rule
//! whose parts are not all selected stays silent. The default set covers socket,
//! memory and power checks. Physical-fit checks (GPU length and cooler height
//! against case clearance, cooler socket support) have their data in the model
//! but no default rule; callers can add them through [`CompatibilityRule`].

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::part::Category;
use crate::power::{estimate_power, BASELINE_OVERHEAD_WATTS};
use crate::selection::{ResolvedBuild, Selection};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    SocketMismatch,
    RamSlotOverflow,
    RamTypeMismatch,
    InsufficientPsuWattage,
}

impl RuleId {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SocketMismatch => "socket-mismatch",
            Self::RamSlotOverflow => "ram-slot-overflow",
            Self::RamTypeMismatch => "ram-type-mismatch",
            Self::InsufficientPsuWattage => "insufficient-psu-wattage",
        }
    }
}

impl Display for RuleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct PartRef {
    pub category: Category,
    pub name: String,
}

impl PartRef {
    fn new(category: Category, name: &str) -> Self {
        Self { category, name: name.to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Issue {
    pub rule: RuleId,
    pub message: String,
    pub parts: Vec<PartRef>,
}

pub trait CompatibilityRule {
    fn id(&self) -> RuleId;

    fn check(&self, build: &ResolvedBuild<'_>) -> Option<Issue>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SocketRule;

impl CompatibilityRule for SocketRule {
    fn id(&self) -> RuleId {
        RuleId::SocketMismatch
    }

    fn check(&self, build: &ResolvedBuild<'_>) -> Option<Issue> {
        let (cpu, board) = (build.cpu?, build.motherboard?);
        if cpu.socket == board.socket {
            return None;
        }
        Some(Issue {
            rule: self.id(),
            message: format!(
                "CPU {} uses socket {} but motherboard {} has socket {}",
                cpu.name, cpu.socket, board.name, board.socket
            ),
            parts: vec![
                PartRef::new(Category::Cpu, &cpu.name),
                PartRef::new(Category::Motherboard, &board.name),
            ],
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RamSlotRule;

impl CompatibilityRule for RamSlotRule {
    fn id(&self) -> RuleId {
        RuleId::RamSlotOverflow
    }

    fn check(&self, build: &ResolvedBuild<'_>) -> Option<Issue> {
        let (ram, board) = (build.ram?, build.motherboard?);
        if ram.modules <= board.ram_slots {
            return None;
        }
        Some(Issue {
            rule: self.id(),
            message: format!(
                "memory kit {} has {} modules but motherboard {} only has {} slots",
                ram.name, ram.modules, board.name, board.ram_slots
            ),
            parts: vec![
                PartRef::new(Category::Ram, &ram.name),
                PartRef::new(Category::Motherboard, &board.name),
            ],
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RamTypeRule;

impl CompatibilityRule for RamTypeRule {
    fn id(&self) -> RuleId {
        RuleId::RamTypeMismatch
    }

    fn check(&self, build: &ResolvedBuild<'_>) -> Option<Issue> {
        let (ram, board) = (build.ram?, build.motherboard?);
        let board_type = board.ram_type?;
        if ram.ddr_type == board_type {
            return None;
        }
        Some(Issue {
            rule: self.id(),
            message: format!(
                "memory kit {} is {} but motherboard {} supports {}",
                ram.name,
                ram.ddr_type.as_str(),
                board.name,
                board_type.as_str()
            ),
            parts: vec![
                PartRef::new(Category::Ram, &ram.name),
                PartRef::new(Category::Motherboard, &board.name),
            ],
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PsuWattageRule;

impl CompatibilityRule for PsuWattageRule {
    fn id(&self) -> RuleId {
        RuleId::InsufficientPsuWattage
    }

    fn check(&self, build: &ResolvedBuild<'_>) -> Option<Issue> {
        let psu = build.psu?;
        let load = estimate_power(build);
        if load <= BASELINE_OVERHEAD_WATTS || psu.wattage >= load {
            return None;
        }

        let mut parts = vec![PartRef::new(Category::Psu, &psu.name)];
        if let Some(cpu) = build.cpu {
            parts.push(PartRef::new(Category::Cpu, &cpu.name));
        }
        if let Some(gpu) = build.gpu {
            parts.push(PartRef::new(Category::Gpu, &gpu.name));
        }
        Some(Issue {
            rule: self.id(),
            message: format!(
                "power supply {} provides {}W but the build is estimated to draw {}W; choose a unit with more headroom",
                psu.name, psu.wattage, load
            ),
            parts,
        })
    }
}

/// The shipped rules, in evaluation order.
#[must_use]
pub fn default_rules() -> Vec<Box<dyn CompatibilityRule>> {
    vec![Box::new(SocketRule), Box::new(RamSlotRule), Box::new(RamTypeRule), Box::new(PsuWattageRule)]
}

/// Run `rules` in order; issues keep rule order and each rule fires at most once.
#[must_use]
pub fn evaluate_with(build: &ResolvedBuild<'_>, rules: &[Box<dyn CompatibilityRule>]) -> Vec<Issue> {
    let issues: Vec<Issue> = rules.iter().filter_map(|rule| rule.check(build)).collect();
    tracing::debug!(rules = rules.len(), issues = issues.len(), "evaluated compatibility");
    issues
}

/// Evaluate the default rules against the picks that resolve in `catalog`.
#[must_use]
pub fn evaluate(catalog: &Catalog, selection: &Selection) -> Vec<Issue> {
    evaluate_with(&selection.resolve(catalog), &default_rules())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::part::{Cpu, CpuBrand, DdrType, Modularity, Motherboard, Psu, Ram};

    fn cpu(socket: &str) -> Cpu {
        Cpu {
            name: "Core i7-14700K".to_string(),
            brand: CpuBrand::Intel,
            price: Some(409.0),
            core_count: 20,
            base_clock_ghz: 3.4,
            boost_clock_ghz: Some(5.6),
            socket: socket.to_string(),
            tdp_watts: 125,
            has_integrated_graphics: true,
        }
    }

    fn board(socket: &str, ram_type: Option<DdrType>, ram_slots: u32) -> Motherboard {
        Motherboard {
            name: "TUF B650-PLUS".to_string(),
            brand: Some("ASUS".to_string()),
            price: Some(199.0),
            socket: socket.to_string(),
            chipset: "B650".to_string(),
            form_factor: "ATX".to_string(),
            ram_type,
            ram_slots,
            ram_max_gb: 192,
            supports_xmp: true,
            supports_expo: true,
        }
    }

    fn ram(ddr_type: DdrType, modules: u32) -> Ram {
        Ram {
            name: "Trident Z5 64GB".to_string(),
            brand: Some("G.Skill".to_string()),
            price: Some(210.0),
            ddr_type,
            speed_mhz: 6000,
            modules,
            total_size_gb: 64,
            cas_latency: 30,
        }
    }

    fn psu(wattage: u32) -> Psu {
        Psu {
            name: "CX450".to_string(),
            brand: Some("Corsair".to_string()),
            price: Some(54.0),
            wattage,
            efficiency_rating: "80+ Bronze".to_string(),
            modularity: Modularity::NonModular,
        }
    }

    fn rules_fired(build: &ResolvedBuild<'_>) -> Vec<RuleId> {
        evaluate_with(build, &default_rules()).into_iter().map(|issue| issue.rule).collect()
    }

    #[test]
    fn empty_build_has_no_issues() {
        assert!(rules_fired(&ResolvedBuild::default()).is_empty());
    }

    #[test]
    fn socket_mismatch_names_both_parts_and_sockets() {
        let cpu = cpu("LGA1700");
        let board = board("AM5", Some(DdrType::Ddr5), 4);
        let build = ResolvedBuild { cpu: Some(&cpu), motherboard: Some(&board), ..ResolvedBuild::default() };
        let issues = evaluate_with(&build, &default_rules());
        assert_eq!(issues.len(), 1);
        let issue = &issues[0];
        assert_eq!(issue.rule, RuleId::SocketMismatch);
        for fragment in ["Core i7-14700K", "TUF B650-PLUS", "LGA1700", "AM5"] {
            assert!(issue.message.contains(fragment), "message `{}` lacks `{fragment}`", issue.message);
        }
        assert_eq!(issue.parts.len(), 2);
    }

    #[test]
    fn board_without_memory_type_skips_type_rule() {
        let ram = ram(DdrType::Ddr4, 2);
        let board = board("AM5", None, 4);
        let build = ResolvedBuild { ram: Some(&ram), motherboard: Some(&board), ..ResolvedBuild::default() };
        assert!(rules_fired(&build).is_empty());
    }

    #[test]
    fn issues_follow_rule_order() {
        let cpu = cpu("LGA1700");
        let board = board("AM5", Some(DdrType::Ddr5), 2);
        let ram = ram(DdrType::Ddr4, 4);
        let psu = psu(150);
        let build = ResolvedBuild {
            cpu: Some(&cpu),
            motherboard: Some(&board),
            ram: Some(&ram),
            psu: Some(&psu),
            ..ResolvedBuild::default()
        };
        assert_eq!(
            rules_fired(&build),
            vec![
                RuleId::SocketMismatch,
                RuleId::RamSlotOverflow,
                RuleId::RamTypeMismatch,
                RuleId::InsufficientPsuWattage,
            ]
        );
    }

    #[test]
    fn psu_rule_needs_a_power_consumer() {
        let psu = psu(150);
        let build = ResolvedBuild { psu: Some(&psu), ..ResolvedBuild::default() };
        assert!(rules_fired(&build).is_empty());
    }

    #[test]
    fn psu_exactly_at_load_passes() {
        let cpu = cpu("AM5");
        let psu = psu(175);
        let build = ResolvedBuild { cpu: Some(&cpu), psu: Some(&psu), ..ResolvedBuild::default() };
        assert!(rules_fired(&build).is_empty());
    }

    #[test]
    fn rule_ids_serialise_kebab_case() {
        let json = match serde_json::to_string(&RuleId::InsufficientPsuWattage) {
            Ok(json) => json,
            Err(err) => panic!("rule id should serialise: {err}"),
        };
        assert_eq!(json, format!("\"{}\"", RuleId::InsufficientPsuWattage));
    }

    struct AlwaysFires;

    impl CompatibilityRule for AlwaysFires {
        fn id(&self) -> RuleId {
            RuleId::SocketMismatch
        }

        fn check(&self, _build: &ResolvedBuild<'_>) -> Option<Issue> {
            Some(Issue { rule: self.id(), message: "custom".to_string(), parts: Vec::new() })
        }
    }

    #[test]
    fn custom_rules_plug_into_evaluation() {
        let rules: Vec<Box<dyn CompatibilityRule>> = vec![Box::new(AlwaysFires)];
        let issues = evaluate_with(&ResolvedBuild::default(), &rules);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "custom");
    }
}
