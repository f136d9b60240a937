use serde::{Deserialize, Serialize};

use crate::selection::ResolvedBuild;

/// Draw attributed to everything other than the CPU and GPU: board, memory,
/// storage, fans and pump.
pub const BASELINE_OVERHEAD_WATTS: u32 = 50;

const HEADROOM_NUMERATOR: u32 = 6;
const HEADROOM_DENOMINATOR: u32 = 5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
pub struct PowerEstimate {
    pub cpu_watts: u32,
    pub gpu_watts: u32,
    pub overhead_watts: u32,
    pub total_watts: u32,
    pub recommended_psu_watts: u32,
}

/// Estimated system draw in watts, or `0` when neither a CPU nor a GPU with a
/// positive TDP is selected.
#[must_use]
pub fn estimate_power(build: &ResolvedBuild<'_>) -> u32 {
    power_breakdown(build).map_or(0, |estimate| estimate.total_watts)
}

#[must_use]
pub fn power_breakdown(build: &ResolvedBuild<'_>) -> Option<PowerEstimate> {
    let cpu_watts = build.cpu.map_or(0, |cpu| cpu.tdp_watts);
    let gpu_watts = build.gpu.map_or(0, |gpu| gpu.tdp_watts);
    if cpu_watts == 0 && gpu_watts == 0 {
        return None;
    }

    let total_watts = cpu_watts.saturating_add(gpu_watts).saturating_add(BASELINE_OVERHEAD_WATTS);
    Some(PowerEstimate {
        cpu_watts,
        gpu_watts,
        overhead_watts: BASELINE_OVERHEAD_WATTS,
        total_watts,
        recommended_psu_watts: recommended_psu_watts(total_watts),
    })
}

/// Smallest whole wattage that leaves 20% headroom over `load`.
#[must_use]
pub fn recommended_psu_watts(load: u32) -> u32 {
    let scaled = u64::from(load) * u64::from(HEADROOM_NUMERATOR);
    let watts = scaled.div_ceil(u64::from(HEADROOM_DENOMINATOR));
    u32::try_from(watts).unwrap_or(u32::MAX)
}

/// Whether `wattage` covers `load` with 20% headroom.
#[must_use]
pub fn psu_has_headroom(wattage: u32, load: u32) -> bool {
    u64::from(wattage) * u64::from(HEADROOM_DENOMINATOR)
        >= u64::from(load) * u64::from(HEADROOM_NUMERATOR)
}
