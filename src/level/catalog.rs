//! Built-in level catalog
//!
//! The shipped levels are embedded at compile time from `levels.ron` and
//! parsed once on first access. A parse failure here is a packaging defect,
//! so it panics with the parser's message instead of surfacing an error type.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use super::LevelData;

const CATALOG_RON: &str = include_str!("levels.ron");

fn catalog() -> &'static BTreeMap<u32, LevelData> {
    static CATALOG: OnceLock<BTreeMap<u32, LevelData>> = OnceLock::new();
    CATALOG.get_or_init(|| match ron::from_str(CATALOG_RON) {
        Ok(levels) => levels,
        Err(e) => panic!("embedded level catalog is invalid: {}", e),
    })
}

/// Look up a built-in level by number.
pub fn catalog_level(number: u32) -> Option<&'static LevelData> {
    catalog().get(&number)
}

/// Level numbers in ascending order, for the level select screen.
pub fn catalog_level_numbers() -> Vec<u32> {
    catalog().keys().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::validate;
    use crate::sim::{BossKind, EnemyKind, PlatformKind};

    #[test]
    fn test_catalog_has_ten_levels() {
        assert_eq!(catalog_level_numbers(), (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_every_catalog_level_validates() {
        for number in catalog_level_numbers() {
            let level = catalog_level(number).unwrap();
            assert!(validate(level).is_ok(), "level {} failed validation", number);
        }
    }

    #[test]
    fn test_boss_levels() {
        let warden = catalog_level(5).unwrap().boss.as_ref().unwrap();
        assert_eq!(warden.kind, BossKind::Warden);
        assert_eq!(warden.health, 500);
        assert!(catalog_level(5).unwrap().platforms.is_empty());

        let tyrant = catalog_level(10).unwrap().boss.as_ref().unwrap();
        assert_eq!(tyrant.kind, BossKind::Tyrant);
        assert_eq!(tyrant.health, 750);
    }

    #[test]
    fn test_level_one_layout() {
        let level = catalog_level(1).unwrap();
        assert_eq!(level.platforms.len(), 9);
        assert_eq!(level.platforms[0].x, 300.0);
        assert_eq!(level.platforms[0].elevation, 100.0);
        assert!(level
            .platforms
            .iter()
            .any(|p| p.kind == PlatformKind::Win && p.elevation == 900.0));
        assert!(level.enemies.is_empty());
    }

    #[test]
    fn test_patrol_keys_resolve_within_their_level() {
        for number in catalog_level_numbers() {
            let level = catalog_level(number).unwrap();
            for enemy in &level.enemies {
                if enemy.kind != EnemyKind::Patrolling {
                    continue;
                }
                let (px, pe) = (
                    enemy.platform_x.expect("patrolling enemy without platform_x"),
                    enemy.platform_elevation.expect("patrolling enemy without platform_elevation"),
                );
                assert!(
                    level.platforms.iter().any(|p| p.x == px && p.elevation == pe),
                    "level {}: patrol key ({}, {}) has no platform",
                    number,
                    px,
                    pe
                );
            }
        }
    }
}
