use std::time::Duration;

use bevy::prelude::*;

pub const CUBE_SIZE: f32 = 10.0;
pub const WALL_THICKNESS: f32 = 0.1;
pub const BALL_RADIUS: f32 = 0.8;
pub const BALL_MASS: f32 = 1.0;
pub const BALL_COUNT: usize = 16;
pub const CAMERA_START_Z: f32 = 20.0;

const SEED_VAR: &str = "POOLCUBE_SEED";

#[derive(Resource, Clone, Debug)]
pub struct ToySettings {
    pub gravity: f32,
    pub solver_iterations: usize,
    pub fixed_timestep: f32,
    pub max_substeps: u32,
    pub ccd: bool,
    pub rotation_speed: f32,
    pub max_angular_velocity: f32, // rad/s, per axis
    pub spin_damping: f32,         // per frame while not dragging, 1.0 = none
    pub wheel_zoom_rate: f32,
    pub pinch_zoom_rate: f32,
    pub zoom_range: Vec2, // min, max camera distance
    pub tap_max_duration: Duration,
    pub tap_slop: f32,
    pub running: bool,
    pub show_help: bool,
    pub seed: Option<u64>,
}

impl Default for ToySettings {
    fn default() -> Self {
        Self {
            gravity: -30.0,
            solver_iterations: 20,
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 20,
            ccd: true,
            rotation_speed: 0.1,
            max_angular_velocity: 10.0,
            spin_damping: 1.0,
            wheel_zoom_rate: 0.01,
            pinch_zoom_rate: 0.1,
            zoom_range: Vec2::new(6.0, 100.0),
            tap_max_duration: Duration::from_millis(200),
            tap_slop: 4.0,
            running: true,
            show_help: true,
            seed: None,
        }
    }
}

impl ToySettings {
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Ok(raw) = std::env::var(SEED_VAR) {
            settings.seed = parse_seed(&raw);
        }
        settings
    }
}

fn parse_seed(raw: &str) -> Option<u64> {
    match raw.trim().parse::<u64>() {
        Ok(seed) => {
            info!("using ball placement seed {seed}");
            Some(seed)
        }
        Err(err) => {
            warn!("ignoring {SEED_VAR}={raw:?}: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_toy_tuning() {
        let s = ToySettings::default();
        assert_eq!(s.gravity, -30.0);
        assert_eq!(s.solver_iterations, 20);
        assert_eq!(s.max_substeps, 20);
        assert_eq!(s.tap_max_duration, Duration::from_millis(200));
        assert_eq!(s.spin_damping, 1.0);
        assert!(s.seed.is_none());
    }

    #[test]
    fn seed_parsing_accepts_numbers_only() {
        assert_eq!(parse_seed(" 42 "), Some(42));
        assert_eq!(parse_seed("forty-two"), None);
        assert_eq!(parse_seed("-1"), None);
    }
}
