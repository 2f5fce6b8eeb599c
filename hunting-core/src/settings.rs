//! Game tuning.
//!
//! Every number that shapes the simulation lives here. All fields have
//! defaults, so a settings file only needs to name what it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Movement limits of one species.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsInfo {
    pub mass: f32,
    pub max_speed: f32,
    pub max_force: f32,
    pub max_idle_speed: f32,
    pub max_idle_force: f32,
    pub friction_k: f32,
}

impl Default for PhysicsInfo {
    fn default() -> Self {
        Self {
            mass: 1.0,
            max_speed: 100.0,
            max_force: 10.0,
            max_idle_speed: 0.0,
            max_idle_force: 0.0,
            friction_k: FRICTION_K,
        }
    }
}

const FRICTION_K: f32 = 0.2;

/// Closest the background grid lines may be drawn.
pub const MIN_GRID_SPACING: f32 = 10.0;

/// Widest neighbour search, in chunks.
pub const MAX_NEIGHBOUR_RADIUS: u32 = 64;

/// Everything that differs between rabbits, wolves, deer and the hunter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeciesSettings {
    pub physics: PhysicsInfo,
    pub radius: f32,
    pub vision_radius: f32,
    /// Seconds a fleeing animal keeps running after the danger is gone.
    pub run_duration: f32,
}

impl Default for SpeciesSettings {
    fn default() -> Self {
        Self {
            physics: PhysicsInfo::default(),
            radius: 5.0,
            vision_radius: 100.0,
            run_duration: 0.0,
        }
    }
}

/// Hit probability for bullets that travelled at most `distance`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShootingRange {
    pub distance: f32,
    pub probability: f32,
}

impl ShootingRange {
    pub const fn new(distance: f32, probability: f32) -> Self {
        Self {
            distance,
            probability,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WolfSettings {
    pub eat_duration: f32,
    pub life_time_without_meal: f32,
}

impl Default for WolfSettings {
    fn default() -> Self {
        Self {
            eat_duration: 5.0,
            life_time_without_meal: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeerSettings {
    /// Radius within which another deer counts as "right here".
    pub nearby_radius: f32,
    pub max_search_speed: f32,
    pub min_group: usize,
}

impl Default for DeerSettings {
    fn default() -> Self {
        Self {
            nearby_radius: 70.0,
            max_search_speed: 30.0,
            min_group: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HunterSettings {
    pub moving_force: f32,
    pub ammunition: u32,
    /// Seconds between two shots.
    pub reload: f32,
    /// Distance a bullet covers per simulation step.
    pub bullet_speed: f32,
    pub bullet_radius: f32,
    /// Animals closer than this to a flying bullet get scared.
    pub scare_radius: f32,
    /// Seconds between getting scared and running away.
    pub scare_delay: f32,
    /// How much the ranges shrink when the hunter moves at full speed.
    pub ranges_delta: f32,
    pub shooting_ranges: Vec<ShootingRange>,
    pub gun_width: f32,
    pub gun_height: f32,
}

impl Default for HunterSettings {
    fn default() -> Self {
        Self {
            moving_force: 100.0,
            ammunition: 20,
            reload: 2.0,
            bullet_speed: 10.0,
            bullet_radius: 2.0,
            scare_radius: 1000.0,
            scare_delay: 1.0,
            ranges_delta: 60.0,
            shooting_ranges: vec![
                ShootingRange::new(200.0, 1.0),
                ShootingRange::new(210.0, 0.8),
                ShootingRange::new(225.0, 0.3),
                ShootingRange::new(270.0, 0.1),
                ShootingRange::new(360.0, 0.01),
            ],
            gun_width: 6.0,
            gun_height: 25.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Population {
    pub rabbits: usize,
    pub wolves: usize,
    pub deer: usize,
}

impl Default for Population {
    fn default() -> Self {
        Self {
            rabbits: 20,
            wolves: 10,
            deer: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallSettings {
    pub trigger_distance: f32,
    pub max_push: f32,
}

impl Default for WallSettings {
    fn default() -> Self {
        Self {
            trigger_distance: 60.0,
            max_push: 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugOverlay {
    pub vision_circle: bool,
    pub idle_target: bool,
    pub velocity_vector: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// World size as a multiple of the window size.
    pub world_scale: f32,
    /// Visible area as a multiple of the window size.
    pub camera_scale: f32,
    pub world_speed: f32,
    pub population: Population,

    pub rabbit: SpeciesSettings,
    pub wolf: SpeciesSettings,
    pub deer: SpeciesSettings,
    pub hunter: SpeciesSettings,

    pub wolf_behaviour: WolfSettings,
    pub deer_behaviour: DeerSettings,
    pub hunter_behaviour: HunterSettings,
    pub walls: WallSettings,

    /// Side of one spatial index chunk, in world units.
    pub chunk_size: u32,
    /// Neighbour search radius, in chunks.
    pub neighbour_radius: u32,
    pub grid_spacing: f32,

    pub debug: DebugOverlay,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            world_scale: 4.0,
            camera_scale: 1.5,
            world_speed: 1.0,
            population: Population::default(),

            rabbit: SpeciesSettings {
                physics: PhysicsInfo {
                    mass: 1.0,
                    max_speed: 200.0,
                    max_force: 20.0,
                    max_idle_speed: 50.0,
                    max_idle_force: 1.0,
                    friction_k: FRICTION_K,
                },
                radius: 4.0,
                vision_radius: 200.0,
                run_duration: 35.0,
            },
            wolf: SpeciesSettings {
                physics: PhysicsInfo {
                    mass: 3.0,
                    max_speed: 150.0,
                    max_force: 100.0,
                    max_idle_speed: 20.0,
                    max_idle_force: 6.0,
                    friction_k: FRICTION_K,
                },
                radius: 8.0,
                vision_radius: 190.0,
                run_duration: 5.0,
            },
            deer: SpeciesSettings {
                physics: PhysicsInfo {
                    mass: 10.0,
                    max_speed: 130.0,
                    max_force: 50.0,
                    max_idle_speed: 40.0,
                    max_idle_force: 23.0,
                    friction_k: FRICTION_K,
                },
                radius: 10.0,
                vision_radius: 200.0,
                run_duration: 25.0,
            },
            hunter: SpeciesSettings {
                physics: PhysicsInfo {
                    mass: 8.0,
                    max_speed: 80.0,
                    max_force: 100.0,
                    max_idle_speed: 0.0,
                    max_idle_force: 0.0,
                    friction_k: 0.65,
                },
                radius: 8.0,
                vision_radius: 260.0,
                run_duration: 0.0,
            },

            wolf_behaviour: WolfSettings::default(),
            deer_behaviour: DeerSettings::default(),
            hunter_behaviour: HunterSettings::default(),
            walls: WallSettings::default(),

            chunk_size: 50,
            neighbour_radius: 12,
            grid_spacing: 150.0,

            debug: DebugOverlay::default(),
        }
    }
}

impl GameSettings {
    /// Read and validate a JSON settings file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let raw = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&raw)?;
        tracing::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_json(raw: &str) -> Result<Self, SettingsError> {
        let settings: GameSettings = serde_json::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        positive("world_scale", self.world_scale)?;
        positive("camera_scale", self.camera_scale)?;
        positive("world_speed", self.world_speed)?;
        if !(self.grid_spacing >= MIN_GRID_SPACING && self.grid_spacing.is_finite()) {
            return Err(SettingsError::Invalid(format!(
                "grid_spacing must be at least {MIN_GRID_SPACING}, got {}",
                self.grid_spacing
            )));
        }

        for (name, species) in [
            ("rabbit", &self.rabbit),
            ("wolf", &self.wolf),
            ("deer", &self.deer),
            ("hunter", &self.hunter),
        ] {
            positive(&format!("{name}.physics.mass"), species.physics.mass)?;
            positive(&format!("{name}.physics.max_speed"), species.physics.max_speed)?;
            positive(&format!("{name}.physics.max_force"), species.physics.max_force)?;
            positive(&format!("{name}.radius"), species.radius)?;
            positive(&format!("{name}.vision_radius"), species.vision_radius)?;
            if species.physics.friction_k < 0.0 {
                return Err(SettingsError::Invalid(format!(
                    "{name}.physics.friction_k must not be negative"
                )));
            }
        }

        if self.chunk_size == 0 {
            return Err(SettingsError::Invalid("chunk_size must be at least 1".into()));
        }
        if self.neighbour_radius > MAX_NEIGHBOUR_RADIUS {
            return Err(SettingsError::Invalid(format!(
                "neighbour_radius must be at most {MAX_NEIGHBOUR_RADIUS}, got {}",
                self.neighbour_radius
            )));
        }

        let hunter = &self.hunter_behaviour;
        positive("hunter_behaviour.bullet_speed", hunter.bullet_speed)?;
        if hunter.reload < 0.0 {
            return Err(SettingsError::Invalid(
                "hunter_behaviour.reload must not be negative".into(),
            ));
        }

        let ranges = &hunter.shooting_ranges;
        if ranges.is_empty() {
            return Err(SettingsError::Invalid(
                "hunter_behaviour.shooting_ranges must not be empty".into(),
            ));
        }
        if ranges.windows(2).any(|pair| pair[0].distance > pair[1].distance) {
            return Err(SettingsError::Invalid(
                "hunter_behaviour.shooting_ranges must be sorted by distance".into(),
            ));
        }
        if let Some(bad) = ranges
            .iter()
            .find(|r| !(0.0..=1.0).contains(&r.probability))
        {
            return Err(SettingsError::Invalid(format!(
                "shooting range probability {} is outside [0, 1]",
                bad.probability
            )));
        }

        Ok(())
    }

    /// Furthest distance a bullet may travel.
    pub fn max_shooting_distance(&self) -> f32 {
        self.hunter_behaviour
            .shooting_ranges
            .last()
            .map(|r| r.distance)
            .unwrap_or(0.0)
    }
}

fn positive(name: &str, value: f32) -> Result<(), SettingsError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(SettingsError::Invalid(format!("{name} must be positive, got {value}")))
    }
}
