//! Scenario configuration, loaded from a YAML file.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tank_core::Vec2;
use tank_nav::{NavConfig, Obstacle, ObstacleWorld};

/// One simulated match: the map, the bot, and whoever is shooting at it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Edge length of the square map
    #[serde(default = "default_world_size")]
    pub world_size: f32,

    #[serde(default = "default_obstacles")]
    pub obstacles: Vec<Obstacle>,

    #[serde(default)]
    pub nav: NavConfig,

    /// Ticks to simulate unless overridden on the command line
    #[serde(default = "default_ticks")]
    pub ticks: u64,

    /// Seconds per tick
    #[serde(default = "default_dt")]
    pub dt: f32,

    #[serde(default)]
    pub tank: TankConfig,

    /// Hostile shooter; `null` for an empty field
    #[serde(default = "default_enemy")]
    pub enemy: Option<EnemyConfig>,

    /// Friendly tanks standing still on the map
    #[serde(default)]
    pub allies: Vec<Vec2>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TankConfig {
    #[serde(default = "default_team")]
    pub team: Team,

    #[serde(default = "default_spawn")]
    pub spawn: Vec2,

    #[serde(default = "default_goal")]
    pub goal: Vec2,

    /// World units per second
    #[serde(default = "default_tank_speed")]
    pub speed: f32,

    /// Seconds between two shots
    #[serde(default = "default_reload_time")]
    pub reload_time: f32,

    /// Seconds added to the firing timer when a shot is held back
    #[serde(default = "default_shot_delay")]
    pub shot_delay: f32,

    /// Seconds a dead tank waits before respawning
    #[serde(default = "default_respawn_time")]
    pub respawn_time: f32,

    /// Flag carried from the start
    #[serde(default)]
    pub flag: Option<FlagConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    #[serde(default = "default_enemy_position")]
    pub position: Vec2,

    #[serde(default = "default_enemy_reload")]
    pub reload_time: f32,

    #[serde(default = "default_shot_speed")]
    pub shot_speed: f32,

    /// Distance a shot travels before it expires
    #[serde(default = "default_shot_range")]
    pub shot_range: f32,
}

/// A carried flag. `team: null` is a power-up flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagConfig {
    pub team: Option<Team>,
    pub sticky: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Red,
    Green,
    Blue,
    Purple,
}

fn default_world_size() -> f32 {
    400.0
}
fn default_obstacles() -> Vec<Obstacle> {
    vec![
        Obstacle::new(Vec2::new(0.0, 0.0), Vec2::new(30.0, 30.0), 10.0),
        Obstacle::new(Vec2::new(-90.0, 60.0), Vec2::new(10.0, 50.0), 10.0),
        Obstacle::new(Vec2::new(90.0, -60.0), Vec2::new(10.0, 50.0), 10.0),
        Obstacle::new(Vec2::new(60.0, 110.0), Vec2::new(40.0, 5.0), 6.0).raised(5.0),
    ]
}
fn default_ticks() -> u64 {
    1_200
}
fn default_dt() -> f32 {
    0.05
}
fn default_team() -> Team {
    Team::Red
}
fn default_spawn() -> Vec2 {
    Vec2::new(-150.0, -150.0)
}
fn default_goal() -> Vec2 {
    Vec2::new(150.0, 150.0)
}
fn default_tank_speed() -> f32 {
    25.0
}
fn default_reload_time() -> f32 {
    3.5
}
fn default_shot_delay() -> f32 {
    0.1
}
fn default_respawn_time() -> f32 {
    5.0
}
fn default_enemy() -> Option<EnemyConfig> {
    Some(EnemyConfig::default())
}
fn default_enemy_position() -> Vec2 {
    Vec2::new(150.0, -150.0)
}
fn default_enemy_reload() -> f32 {
    4.0
}
fn default_shot_speed() -> f32 {
    100.0
}
fn default_shot_range() -> f32 {
    350.0
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            world_size: default_world_size(),
            obstacles: default_obstacles(),
            nav: NavConfig::default(),
            ticks: default_ticks(),
            dt: default_dt(),
            tank: TankConfig::default(),
            enemy: default_enemy(),
            allies: Vec::new(),
        }
    }
}

impl Default for TankConfig {
    fn default() -> Self {
        Self {
            team: default_team(),
            spawn: default_spawn(),
            goal: default_goal(),
            speed: default_tank_speed(),
            reload_time: default_reload_time(),
            shot_delay: default_shot_delay(),
            respawn_time: default_respawn_time(),
            flag: None,
        }
    }
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            position: default_enemy_position(),
            reload_time: default_enemy_reload(),
            shot_speed: default_shot_speed(),
            shot_range: default_shot_range(),
        }
    }
}

impl BotConfig {
    /// Load from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Load from `path` if given, otherwise the built-in scenario
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.world_size.is_finite() && self.world_size > 0.0) {
            bail!("world_size must be positive, got {}", self.world_size);
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            bail!("dt must be positive, got {}", self.dt);
        }
        if !(self.tank.speed.is_finite() && self.tank.speed >= 0.0) {
            bail!("tank.speed must be non-negative, got {}", self.tank.speed);
        }
        if let Some(enemy) = &self.enemy {
            if !(enemy.reload_time > 0.0 && enemy.shot_speed > 0.0 && enemy.shot_range > 0.0) {
                bail!("enemy reload_time, shot_speed and shot_range must be positive");
            }
        }
        self.nav.validate().context("invalid nav config")?;
        Ok(())
    }

    pub fn world(&self) -> ObstacleWorld {
        self.obstacles
            .iter()
            .cloned()
            .fold(ObstacleWorld::new(self.world_size), ObstacleWorld::with_obstacle)
    }
}
