//! Material stock banding.

use crate::model::material::MaterialStatus;

/// Stock band of `current` relative to `minimum`.
///
/// - `LowStock` when `current < minimum`.
/// - `WellStocked` when `current > 1.5 * minimum`.
/// - `InStock` otherwise.
pub fn material_status(current: u32, minimum: u32) -> MaterialStatus {
    if current < minimum {
        return MaterialStatus::LowStock;
    }
    // 2 * current > 3 * minimum  <=>  current > 1.5 * minimum, without floats.
    if u64::from(current) * 2 > u64::from(minimum) * 3 {
        return MaterialStatus::WellStocked;
    }
    MaterialStatus::InStock
}
