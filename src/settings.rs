//! Game settings and tuning
//!
//! Loaded from a JSON file at startup. Missing keys fall back to defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{LaunchEdge, SpawnTuning};

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Launch speed scale for this preset
    pub fn speed_scale(&self) -> f64 {
        match self {
            Difficulty::Easy => 0.8,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.25,
        }
    }

    /// Bomb odds scale for this preset
    pub fn bomb_scale(&self) -> f64 {
        match self {
            Difficulty::Easy => 0.5,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.5,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty preset, applied on top of the raw tuning values
    pub difficulty: Difficulty,

    // === Spawning ===
    pub launch_edge: LaunchEdge,
    pub speed_multiplier: f64,
    pub single_bomb_chance: f64,
    /// Clamped below `single_bomb_chance`
    pub formation_bomb_chance: f64,

    // === Timing ===
    pub spawn_interval_ms: u64,
    pub frame_interval_ms: u64,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Storage ===
    pub leaderboard_path: PathBuf,

    /// Fixed RNG seed (random if absent)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,

            launch_edge: LaunchEdge::Top,
            speed_multiplier: SPEED_MULTIPLIER,
            single_bomb_chance: SINGLE_BOMB_CHANCE,
            formation_bomb_chance: FORMATION_BOMB_CHANCE,

            spawn_interval_ms: SPAWN_INTERVAL_MS,
            frame_interval_ms: FRAME_INTERVAL_MS,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            leaderboard_path: PathBuf::from("highscores.json"),

            seed: None,
        }
    }
}

impl Settings {
    /// Create settings from a difficulty preset
    pub fn from_preset(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Spawn policy with the difficulty preset applied
    pub fn spawn_tuning(&self) -> SpawnTuning {
        let single = (self.single_bomb_chance * self.difficulty.bomb_scale()).clamp(0.0, 1.0);
        let formation = (self.formation_bomb_chance * self.difficulty.bomb_scale()).clamp(0.0, single);
        SpawnTuning {
            launch_edge: self.launch_edge,
            speed_multiplier: (self.speed_multiplier * self.difficulty.speed_scale()).max(0.0),
            single_bomb_chance: single,
            formation_bomb_chance: formation,
        }
    }

    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms.max(1))
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }

    /// Load settings from a JSON file
    ///
    /// A missing file means defaults; a malformed one is reported and ignored.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Failed to parse {}: {e}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No {} found; using default settings", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("Failed to read {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
