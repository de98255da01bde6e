/*
 * Game Parameters Module
 *
 * This module defines the GameParams struct holding every tunable of the
 * game: board size, population, movement and interaction radii, terrain
 * generation and the display toggles. Parameters load from an optional JSON
 * file and can be edited live through the UI; a ParamSnapshot taken before
 * the edits tells which of them need the world or the terrain rebuilt.
 */

use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// Each octave doubles the lattice resolution
pub const MAX_OCTAVES: u32 = 8;
pub const MAX_LATTICE_SIZE: usize = 64;
// Cells per side of the finest octave; bounds the terrain's memory
pub const MAX_FINEST_CELLS: usize = 1024;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameParams {
    // Board
    pub half_extent: f32,

    // Population
    pub good_count: usize,
    pub bad_count: usize,
    pub tree_count: usize,
    pub box_slots: usize,

    // Movement and interaction
    pub agent_step: f32,
    pub jitter: f32,
    pub capture_radius: f32,
    pub tree_hit_radius: f32,
    pub tree_click_radius: f32,
    pub kill_radius: f32,
    pub tick_ms: u64,

    // Terrain
    pub seed: u64,
    pub water_level: f32,
    pub lattice_size: usize,
    pub octaves: u32,

    // Display toggles
    pub show_debug: bool,
    pub pause_simulation: bool,
    pub draw_terrain: bool,
}

// The fields whose edits invalidate the world or the terrain
#[derive(Clone, Debug, PartialEq)]
pub struct ParamSnapshot {
    good_count: usize,
    bad_count: usize,
    tree_count: usize,
    box_slots: usize,
    water_level: f32,
}

/// What a round of UI edits requires the app to rebuild.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParamChanges {
    pub reset_world: bool,
    pub terrain_changed: bool,
}

impl Default for GameParams {
    fn default() -> Self {
        Self {
            half_extent: 1.0,
            good_count: 12,
            bad_count: 12,
            tree_count: 30,
            box_slots: 6,
            agent_step: 0.004,
            jitter: 0.002,
            capture_radius: 0.03,
            tree_hit_radius: 0.04,
            tree_click_radius: 0.05,
            kill_radius: 0.04,
            tick_ms: 33,
            seed: 0x5eed,
            water_level: 0.35,
            lattice_size: 8,
            octaves: 4,
            show_debug: false,
            pause_simulation: false,
            draw_terrain: true,
        }
    }
}

impl GameParams {
    /// Reads, parses and validates a JSON parameter file. Missing fields
    /// keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let params: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        params.validate()?;
        log::info!("loaded game parameters from {}", path.display());
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("half_extent", self.half_extent),
            ("agent_step", self.agent_step),
            ("capture_radius", self.capture_radius),
            ("tree_hit_radius", self.tree_hit_radius),
            ("tree_click_radius", self.tree_click_radius),
            ("kill_radius", self.kill_radius),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::invalid(field, format!("must be positive, got {value}")));
            }
        }
        if !(self.jitter.is_finite() && self.jitter >= 0.0) {
            return Err(ConfigError::invalid("jitter", format!("must not be negative, got {}", self.jitter)));
        }
        if !(0.0..=1.0).contains(&self.water_level) {
            return Err(ConfigError::invalid(
                "water_level",
                format!("must lie in [0, 1], got {}", self.water_level),
            ));
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::invalid("tick_ms", "must be at least 1"));
        }
        if self.lattice_size == 0 || self.lattice_size > MAX_LATTICE_SIZE {
            return Err(ConfigError::invalid(
                "lattice_size",
                format!("must lie in 1..={MAX_LATTICE_SIZE}, got {}", self.lattice_size),
            ));
        }
        if self.octaves == 0 || self.octaves > MAX_OCTAVES {
            return Err(ConfigError::invalid(
                "octaves",
                format!("must lie in 1..={MAX_OCTAVES}, got {}", self.octaves),
            ));
        }
        let finest = self.lattice_size << (self.octaves - 1);
        if finest > MAX_FINEST_CELLS {
            return Err(ConfigError::invalid(
                "lattice_size",
                format!(
                    "{} doubled over {} octaves gives {finest} cells, more than {MAX_FINEST_CELLS}",
                    self.lattice_size, self.octaves
                ),
            ));
        }
        Ok(())
    }

    // Get parameter ranges for UI sliders
    pub fn get_count_range() -> RangeInclusive<usize> {
        0..=200
    }

    pub fn get_box_slot_range() -> RangeInclusive<usize> {
        1..=32
    }

    pub fn get_step_range() -> RangeInclusive<f32> {
        0.0005..=0.05
    }

    pub fn get_jitter_range() -> RangeInclusive<f32> {
        0.0..=0.02
    }

    pub fn get_radius_range() -> RangeInclusive<f32> {
        0.005..=0.25
    }

    pub fn get_water_level_range() -> RangeInclusive<f32> {
        0.0..=1.0
    }

    pub fn get_tick_ms_range() -> RangeInclusive<u64> {
        5..=500
    }
}

impl ParamSnapshot {
    // Take a snapshot of current parameter values for change detection
    pub fn take(params: &GameParams) -> Self {
        Self {
            good_count: params.good_count,
            bad_count: params.bad_count,
            tree_count: params.tree_count,
            box_slots: params.box_slots,
            water_level: params.water_level,
        }
    }

    pub fn detect_changes(&self, params: &GameParams) -> ParamChanges {
        let population_changed = params.good_count != self.good_count
            || params.bad_count != self.bad_count
            || params.tree_count != self.tree_count
            || params.box_slots != self.box_slots;
        let terrain_changed = params.water_level != self.water_level;

        ParamChanges {
            // Water moved, so spawn positions on land are stale too
            reset_world: population_changed || terrain_changed,
            terrain_changed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("dudes-params-{}-{name}.json", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn defaults_validate() {
        assert!(GameParams::default().validate().is_ok());
    }

    #[test]
    fn finest_allowed_lattice_validates() {
        let params = GameParams {
            lattice_size: MAX_FINEST_CELLS >> (MAX_OCTAVES - 1),
            octaves: MAX_OCTAVES,
            ..GameParams::default()
        };
        assert!(params.validate().is_ok());
    }

    #[rstest]
    #[case::zero_step(GameParams { agent_step: 0.0, ..GameParams::default() }, "agent_step")]
    #[case::negative_kill(GameParams { kill_radius: -0.1, ..GameParams::default() }, "kill_radius")]
    #[case::nan_extent(GameParams { half_extent: f32::NAN, ..GameParams::default() }, "half_extent")]
    #[case::negative_jitter(GameParams { jitter: -0.01, ..GameParams::default() }, "jitter")]
    #[case::water_above_one(GameParams { water_level: 1.5, ..GameParams::default() }, "water_level")]
    #[case::zero_tick(GameParams { tick_ms: 0, ..GameParams::default() }, "tick_ms")]
    #[case::empty_lattice(GameParams { lattice_size: 0, ..GameParams::default() }, "lattice_size")]
    #[case::no_octaves(GameParams { octaves: 0, ..GameParams::default() }, "octaves")]
    #[case::too_many_octaves(GameParams { octaves: MAX_OCTAVES + 1, ..GameParams::default() }, "octaves")]
    #[case::huge_lattice(GameParams { lattice_size: 1 << 20, octaves: MAX_OCTAVES, ..GameParams::default() }, "lattice_size")]
    #[case::finest_octave_too_fine(GameParams { lattice_size: MAX_LATTICE_SIZE, octaves: MAX_OCTAVES, ..GameParams::default() }, "lattice_size")]
    fn validate_rejects(#[case] params: GameParams, #[case] expected: &str) {
        match params.validate() {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected Invalid({expected}), got {other:?}"),
        }
    }

    #[test]
    fn load_fills_missing_fields_with_defaults() {
        let path = write_temp("partial", r#"{ "good_count": 3, "water_level": 0.5 }"#);
        let params = GameParams::load(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(params.good_count, 3);
        assert_eq!(params.water_level, 0.5);
        assert_eq!(params.bad_count, GameParams::default().bad_count);
    }

    #[test]
    fn load_reports_parse_errors() {
        let path = write_temp("broken", "{ good_count: ");
        let err = GameParams::load(&path).unwrap_err();
        fs::remove_file(&path).ok();

        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn load_reports_missing_file() {
        let path = std::env::temp_dir().join("dudes-params-does-not-exist.json");
        assert!(matches!(GameParams::load(&path), Err(ConfigError::Read { .. })));
    }

    #[test]
    fn load_validates_contents() {
        let path = write_temp("invalid", r#"{ "tick_ms": 0 }"#);
        let err = GameParams::load(&path).unwrap_err();
        fs::remove_file(&path).ok();

        assert!(matches!(err, ConfigError::Invalid { field: "tick_ms", .. }));
    }

    #[test]
    fn change_detection_tracks_population_and_water() {
        let mut params = GameParams::default();
        let snapshot = ParamSnapshot::take(&params);
        assert_eq!(snapshot.detect_changes(&params), ParamChanges::default());

        params.agent_step = 0.01;
        params.show_debug = true;
        assert_eq!(snapshot.detect_changes(&params), ParamChanges::default());

        params.good_count += 1;
        assert_eq!(
            snapshot.detect_changes(&params),
            ParamChanges { reset_world: true, terrain_changed: false }
        );

        let snapshot = ParamSnapshot::take(&params);
        params.water_level = 0.6;
        assert_eq!(
            snapshot.detect_changes(&params),
            ParamChanges { reset_world: true, terrain_changed: true }
        );
    }
}
