/*
 * Application Module
 *
 * This module defines the main application model and the update loop.
 * The simulation runs on a fixed timestep: frame time accumulates and the
 * world ticks once per `tick_ms`, with a cap on catch-up ticks so a stalled
 * frame cannot snowball.
 */

use std::sync::OnceLock;
use std::time::{Duration, Instant};

use nannou::prelude::*;
use nannou_egui::Egui;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::camera::Camera;
use crate::debug::DebugInfo;
use crate::entity::EntityKind;
use crate::input;
use crate::params::GameParams;
use crate::renderer::{self, TerrainTiles};
use crate::terrain::Terrain;
use crate::ui;
use crate::world::World;

pub const MAX_TICKS_PER_FRAME: usize = 8;
const WINDOW_WIDTH: u32 = 1366;
const WINDOW_HEIGHT: u32 = 768;

// nannou's model callback is a plain fn, so launch settings go through here
static LAUNCH_PARAMS: OnceLock<GameParams> = OnceLock::new();

pub struct Model {
    pub world: World,
    pub params: GameParams,
    pub terrain: Terrain,
    pub terrain_tiles: TerrainTiles,
    pub egui: Egui,
    pub debug_info: DebugInfo,
    pub camera: Camera,
    pub mouse_position: Vec2,
    pub rng: StdRng,
    pub fullscreen: bool,
    // Fixed timestep variables
    pub tick_accumulator: Duration,
    pub last_update_time: Instant,
}

/// Runs the game window until it is closed.
pub fn run(params: GameParams) {
    if LAUNCH_PARAMS.set(params).is_err() {
        log::warn!("game already launched; keeping the first parameters");
    }
    nannou::app(model).update(update).run();
}

// Initialize the model
fn model(app: &App) -> Model {
    let window_id = match app
        .new_window()
        .title("Dudes and Trees")
        .size(WINDOW_WIDTH, WINDOW_HEIGHT)
        .view(renderer::view)
        .mouse_moved(input::mouse_moved)
        .mouse_pressed(input::mouse_pressed)
        .mouse_released(input::mouse_released)
        .mouse_wheel(input::mouse_wheel)
        .key_pressed(input::key_pressed)
        .raw_event(input::raw_window_event)
        .build()
    {
        Ok(id) => id,
        Err(err) => {
            log::error!("failed to open the game window: {err:?}");
            std::process::exit(1);
        }
    };

    let Some(window) = app.window(window_id) else {
        log::error!("game window closed during startup");
        std::process::exit(1);
    };
    let egui = Egui::from_window(&window);

    let params = LAUNCH_PARAMS.get().cloned().unwrap_or_default();
    let terrain = Terrain::new(&params);
    let terrain_tiles = TerrainTiles::new(&terrain);
    let mut rng = StdRng::seed_from_u64(params.seed);
    let world = World::spawn(&params, &terrain, &mut rng);

    let mut camera = Camera::new(params.half_extent);
    camera.fit(window.rect());

    let debug_info = DebugInfo {
        water_fraction: terrain.water_fraction(64),
        ..DebugInfo::default()
    };

    log::info!(
        "starting: {} agents, {} trees, {} box slots, {:.0}% water",
        world.count_live(EntityKind::Good) + world.count_live(EntityKind::Bad),
        world.count_live(EntityKind::Tree),
        params.box_slots,
        debug_info.water_fraction * 100.0
    );

    Model {
        world,
        params,
        terrain,
        terrain_tiles,
        egui,
        debug_info,
        camera,
        mouse_position: Vec2::ZERO,
        rng,
        fullscreen: false,
        tick_accumulator: Duration::ZERO,
        last_update_time: Instant::now(),
    }
}

// Update the model
fn update(app: &App, model: &mut Model, update: Update) {
    model.debug_info.fps = app.fps();
    model.debug_info.frame_time = update.since_last;
    model.egui.set_elapsed_time(update.since_start);

    let actions = ui::update_ui(&mut model.egui, &mut model.params, &model.world, &model.debug_info);

    if actions.changes.terrain_changed {
        rebuild_terrain(model);
    }
    if actions.reset_requested || actions.changes.reset_world {
        reset_world(model);
    }

    let current_time = Instant::now();
    let frame_time = current_time.duration_since(model.last_update_time);
    model.last_update_time = current_time;

    model.debug_info.ticks_this_frame = 0;
    if model.params.pause_simulation {
        // Don't bank time while paused
        model.tick_accumulator = Duration::ZERO;
        return;
    }

    model.tick_accumulator += frame_time;
    run_ticks(model);
}

fn run_ticks(model: &mut Model) {
    let step = Duration::from_millis(model.params.tick_ms.max(1));
    let mut ticks = 0;

    while model.tick_accumulator >= step {
        if ticks == MAX_TICKS_PER_FRAME {
            log::debug!("tick budget exhausted, dropping {:?} of backlog", model.tick_accumulator);
            model.tick_accumulator = Duration::ZERO;
            break;
        }

        let report = model.world.tick(&model.params, &model.terrain, &mut model.rng);
        if !report.captures.is_empty() {
            log::info!(
                "tick {}: {} capture(s), score {}",
                model.world.tick_count,
                report.captures.len(),
                model.world.score
            );
        }
        model.debug_info.captures_last_tick = report.captures.len();

        model.tick_accumulator -= step;
        ticks += 1;
    }

    model.debug_info.ticks_this_frame = ticks;
}

pub(crate) fn reset_world(model: &mut Model) {
    model.world.reset(&model.params, &model.terrain, &mut model.rng);
    model.debug_info.last_click = None;
    model.tick_accumulator = Duration::ZERO;
}

fn rebuild_terrain(model: &mut Model) {
    model.terrain = Terrain::new(&model.params);
    model.terrain_tiles = TerrainTiles::new(&model.terrain);
    model.debug_info.water_fraction = model.terrain.water_fraction(64);
    log::info!(
        "water level {:.2}: {:.0}% of the board under water",
        model.params.water_level,
        model.debug_info.water_fraction * 100.0
    );
}
