//! Level data
//!
//! Serializable placement records shared by the bundled catalog (RON), the
//! shareable level-string codec (JSON in base64) and the editor. Records are
//! authored in "elevation" coordinates: height of the entity's top edge above
//! the ground platform. The simulation converts to absolute screen y at load
//! time (`y = GROUND_Y - elevation`).

mod catalog;
mod codec;

pub use catalog::{catalog_level, catalog_level_numbers};
pub use codec::{decode_level_string, encode_level_string, CodecError};

use serde::{Deserialize, Serialize};

use crate::sim::{BossKind, EnemyKind, Facing, PlatformKind};

/// Validation limits to keep malformed level strings from exhausting memory.
pub mod limits {
    pub const MAX_ENTITIES: usize = 1024;
    pub const MAX_COORD: f32 = 100_000.0;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformRecord {
    pub x: f32,
    /// Height of the platform's top edge above the ground platform.
    pub elevation: f32,
    pub width: f32,
    pub height: f32,
    pub kind: PlatformKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyRecord {
    pub x: f32,
    /// For patrolling enemies: offset above the associated platform's top
    /// edge. For all others: height above the ground platform.
    pub elevation: f32,
    pub kind: EnemyKind,
    /// Key of the patrol platform (patrolling enemies only): the platform
    /// record with this exact x/elevation pair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_elevation: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurretRecord {
    pub x: f32,
    pub elevation: f32,
    pub facing: Facing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossRecord {
    pub x: f32,
    pub elevation: f32,
    pub width: f32,
    pub height: f32,
    pub health: i32,
    pub kind: BossKind,
}

/// One level's worth of placements. The ground platform is implicit: every
/// loaded level gets it regardless of the records.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LevelData {
    pub platforms: Vec<PlatformRecord>,
    #[serde(default)]
    pub enemies: Vec<EnemyRecord>,
    #[serde(default)]
    pub turrets: Vec<TurretRecord>,
    #[serde(default)]
    pub boss: Option<BossRecord>,
}

fn finite(v: f32) -> bool {
    v.is_finite() && v.abs() <= limits::MAX_COORD
}

/// Check a decoded level for NaN/infinite coordinates and absurd entity
/// counts. Catalog levels pass by construction; this guards the codec path.
pub fn validate(data: &LevelData) -> Result<(), String> {
    let total = data.platforms.len() + data.enemies.len() + data.turrets.len();
    if total > limits::MAX_ENTITIES {
        return Err(format!(
            "too many entities ({} > {})",
            total,
            limits::MAX_ENTITIES
        ));
    }
    for (i, p) in data.platforms.iter().enumerate() {
        if !(finite(p.x) && finite(p.elevation) && finite(p.width) && finite(p.height)) {
            return Err(format!("platform {}: invalid coordinates", i));
        }
        if p.width <= 0.0 || p.height <= 0.0 {
            return Err(format!("platform {}: non-positive size", i));
        }
    }
    for (i, e) in data.enemies.iter().enumerate() {
        if !(finite(e.x) && finite(e.elevation)) {
            return Err(format!("enemy {}: invalid coordinates", i));
        }
        if !(e.platform_x.map_or(true, finite) && e.platform_elevation.map_or(true, finite)) {
            return Err(format!("enemy {}: invalid platform key", i));
        }
    }
    for (i, t) in data.turrets.iter().enumerate() {
        if !(finite(t.x) && finite(t.elevation)) {
            return Err(format!("turret {}: invalid coordinates", i));
        }
    }
    if let Some(b) = &data.boss {
        if !(finite(b.x) && finite(b.elevation) && finite(b.width) && finite(b.height)) {
            return Err("boss: invalid coordinates".to_string());
        }
    }
    Ok(())
}
