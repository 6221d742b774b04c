//! Gameplay tuning.
//!
//! Two fixed profiles: a standard playfield for roomy terminals and a compact
//! one for small windows. All physics run in logical playfield units, so the
//! feel of the game does not depend on how many cells the terminal has.

use std::time::Duration;

/// Longest player name accepted on the name entry screen.
pub const NAME_MAX_CHARS: usize = 15;

/// Which tuning profile to run. Picked once at startup from the terminal
/// size and kept for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Standard,
    Compact,
}

impl Profile {
    /// Picks a profile from the terminal's pixel grid (two pixels per cell
    /// row). Small windows get the compact playfield.
    pub fn for_terminal(pixel_width: usize, pixel_height: usize) -> Profile {
        if pixel_width >= 64 && pixel_height >= 96 {
            Profile::Standard
        } else {
            Profile::Compact
        }
    }
}

/// All gameplay tuning in one place. Distances are logical playfield pixels,
/// speeds are per frame, intervals are wall-clock time.
#[derive(Debug, Clone)]
pub struct Config {
    pub width: f32,
    pub height: f32,
    pub gravity: f32,
    pub flap_speed: f32,
    pub pipe_speed: f32,
    pub pipe_gap: f32,
    pub pipe_width: f32,
    pub pipe_cap_height: f32,
    pub spawn_interval: Duration,
    pub spawn_margin: f32,
    pub bird_size: f32,
    pub bird_x: f32,
    pub ground_height: f32,
    pub ground_speed: f32,
    pub effect_rise: f32,
    pub effect_fade: f32,
    pub view_fill: f32,
}

impl Config {
    pub fn for_profile(profile: Profile) -> Config {
        match profile {
            Profile::Standard => Config::standard(),
            Profile::Compact => Config::compact(),
        }
    }

    pub fn standard() -> Config {
        Config {
            width: 480.0,
            height: 720.0,
            gravity: 0.5,
            flap_speed: -8.0,
            pipe_speed: 2.0,
            pipe_gap: 180.0,
            pipe_width: 52.0,
            pipe_cap_height: 24.0,
            spawn_interval: Duration::from_millis(1800),
            spawn_margin: 50.0,
            bird_size: 30.0,
            bird_x: 50.0,
            ground_height: 100.0,
            ground_speed: 2.0,
            effect_rise: 2.0,
            effect_fade: 0.02,
            view_fill: 0.85,
        }
    }

    /// Slower, tighter variant for small terminals. Obstacle and bird sizes
    /// scale with the playfield, the rest carries over from standard.
    pub fn compact() -> Config {
        let width = 320.0;
        let height = 568.0;
        Config {
            width,
            height,
            gravity: 0.4,
            flap_speed: -6.0,
            pipe_speed: 1.5,
            pipe_gap: height * 0.25,
            pipe_width: width * 0.15,
            spawn_interval: Duration::from_millis(2000),
            bird_size: width * 0.10,
            bird_x: width * 0.20,
            view_fill: 1.0,
            ..Config::standard()
        }
    }

    /// Top edge of the scrolling ground band.
    pub fn ground_y(&self) -> f32 {
        self.height - self.ground_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_profile_numbers() {
        let c = Config::standard();
        assert_eq!(c.width, 480.0);
        assert_eq!(c.height, 720.0);
        assert_eq!(c.gravity, 0.5);
        assert_eq!(c.flap_speed, -8.0);
        assert_eq!(c.pipe_gap, 180.0);
        assert_eq!(c.spawn_interval, Duration::from_millis(1800));
        assert_eq!(c.ground_y(), 620.0);
    }

    #[test]
    fn compact_scales_with_playfield() {
        let c = Config::compact();
        assert_eq!(c.pipe_gap, c.height * 0.25);
        assert_eq!(c.pipe_width, c.width * 0.15);
        assert_eq!(c.bird_size, c.width * 0.10);
        assert_eq!(c.bird_x, c.width * 0.20);
        assert_eq!(c.ground_height, 100.0);
        assert_eq!(c.pipe_cap_height, 24.0);
        assert_eq!(c.spawn_interval, Duration::from_millis(2000));
    }

    #[test]
    fn profile_picked_from_pixel_grid() {
        assert_eq!(Profile::for_terminal(64, 96), Profile::Standard);
        assert_eq!(Profile::for_terminal(63, 96), Profile::Compact);
        assert_eq!(Profile::for_terminal(64, 95), Profile::Compact);
        assert_eq!(Profile::for_terminal(240, 144), Profile::Standard);
    }
}
