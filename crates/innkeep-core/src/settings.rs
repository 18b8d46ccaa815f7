//! Property-wide settings that feed payroll arithmetic

use serde::{Deserialize, Serialize};

/// Tunables loaded from configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotelSettings {
    /// Flat withholding applied to gross pay
    pub withholding_bp: i64,
    /// Minutes per attendance record paid at the regular rate
    pub standard_day_minutes: i64,
    /// Overtime multiplier; 15000 = time and a half
    pub overtime_multiplier_bp: i64,
}

impl Default for HotelSettings {
    fn default() -> Self {
        Self {
            withholding_bp: 1_500,
            standard_day_minutes: 480,
            overtime_multiplier_bp: 15_000,
        }
    }
}
