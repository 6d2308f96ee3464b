//! Planner policy
//!
//! The periodization ratios, volume factors and session sizing used by the
//! pipeline. Defaults follow common endurance-training practice; deployments
//! can override them through configuration.

use serde::{Deserialize, Serialize};

/// Tunable planning policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerPolicy {
    /// Fewest whole weeks before the race that still allow periodization
    pub min_weeks: u32,
    /// Share of the macrocycle given to each phase
    pub base_ratio: f64,
    pub build_ratio: f64,
    pub peak_ratio: f64,
    /// Weekly volume per phase as a multiple of the athlete's current hours
    pub base_volume_factor: f64,
    pub build_volume_factor: f64,
    pub peak_volume_factor: f64,
    /// Allowed gap between discipline hours and the declared weekly band
    pub hours_tolerance: f64,
    /// Preferred length of a single session, used to size the week
    pub target_session_minutes: u32,
}

impl Default for PlannerPolicy {
    fn default() -> Self {
        Self {
            min_weeks: 4,
            base_ratio: 0.40,
            build_ratio: 0.50,
            peak_ratio: 0.10,
            base_volume_factor: 0.80,
            build_volume_factor: 1.10,
            peak_volume_factor: 0.50,
            hours_tolerance: 1.5,
            target_session_minutes: 60,
        }
    }
}

impl PlannerPolicy {
    /// Check that the ratios describe a usable split
    pub fn validate(&self) -> Result<(), String> {
        let ratios = [self.base_ratio, self.build_ratio, self.peak_ratio];
        if ratios.iter().any(|r| !r.is_finite() || *r < 0.0) {
            return Err("phase ratios must be non-negative numbers".to_string());
        }
        let total: f64 = ratios.iter().sum();
        if (total - 1.0).abs() > 1e-6 {
            return Err(format!("phase ratios must sum to 1.0, got {}", total));
        }
        let factors = [
            self.base_volume_factor,
            self.build_volume_factor,
            self.peak_volume_factor,
        ];
        if factors.iter().any(|f| !f.is_finite() || *f <= 0.0) {
            return Err("volume factors must be positive".to_string());
        }
        if self.target_session_minutes < 15 {
            return Err("target session length must be at least 15 minutes".to_string());
        }
        Ok(())
    }
}
