//! Gameplay tuning loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use skirmish_core::{EnemyBehavior, InteractionConfig, PlayerAnimations, WorldItemTuning};

use super::{read_file, LoadResult};

/// Tuning document structure for RON files. Every section falls back to
/// the compiled-in defaults when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameTuning {
    pub interaction: InteractionConfig,
    pub world_item: WorldItemTuning,
    pub player_animations: PlayerAnimations,
    pub enemy_behavior: EnemyBehavior,
}

/// Loader for gameplay tuning from RON files.
pub struct TuningLoader;

impl TuningLoader {
    /// Load a tuning document from a RON file.
    pub fn load(path: &Path) -> LoadResult<GameTuning> {
        let content = read_file(path)?;
        ron::from_str(&content).map_err(|e| anyhow::anyhow!("Failed to parse tuning RON: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TUNING_RON: &str = r#"
GameTuning(
    interaction: InteractionConfig(
        drop_offset: (32.0, 0.0),
        throw_offset: (48.0, -10.0),
        throw_impulse: 900.0,
        pickup_range: 120.0,
    ),
    world_item: WorldItemTuning(
        flight_duration: 0.5,
        min_damage_velocity: 250.0,
    ),
)
"#;

    #[test]
    fn loads_tuning_with_partial_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TUNING_RON.as_bytes()).unwrap();

        let tuning = TuningLoader::load(file.path()).unwrap();
        assert_eq!(tuning.interaction.throw_impulse, 900.0);
        assert_eq!(tuning.world_item.flight_duration, 0.5);
        // omitted fields and sections fall back to defaults
        assert_eq!(tuning.world_item.knockback_force, 200.0);
        assert_eq!(tuning.enemy_behavior.attack_range, 60.0);
    }

    #[test]
    fn empty_document_is_all_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"GameTuning()").unwrap();
        let tuning = TuningLoader::load(file.path()).unwrap();
        assert_eq!(tuning.interaction.throw_impulse, 800.0);
    }
}
