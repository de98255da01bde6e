/*
 * UI Module
 *
 * This module builds the egui control panel (tunable parameters, score and
 * statistics) and draws the on-screen debug overlay. Parameter change
 * detection lives in ParamSnapshot; the panel only reports what it saw.
 */

use nannou::prelude::*;
use nannou_egui::{egui, Egui};

use crate::debug::DebugInfo;
use crate::entity::EntityKind;
use crate::params::{GameParams, ParamChanges, ParamSnapshot};
use crate::world::World;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UiActions {
    pub reset_requested: bool,
    pub changes: ParamChanges,
}

// Update the UI and report what the app must rebuild
pub fn update_ui(egui: &mut Egui, params: &mut GameParams, world: &World, debug_info: &DebugInfo) -> UiActions {
    let mut reset_requested = false;

    let snapshot = ParamSnapshot::take(params);

    let ctx = egui.begin_frame();

    egui::Window::new("Game Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.heading(format!("Score: {}", world.score));

            ui.collapsing("Population", |ui| {
                ui.add(egui::Slider::new(&mut params.good_count, GameParams::get_count_range()).text("Good guys"));
                ui.add(egui::Slider::new(&mut params.bad_count, GameParams::get_count_range()).text("Bad guys"));
                ui.add(egui::Slider::new(&mut params.tree_count, GameParams::get_count_range()).text("Trees"));
                ui.add(egui::Slider::new(&mut params.box_slots, GameParams::get_box_slot_range()).text("Box slots"));

                if ui.button("Reset World").clicked() {
                    reset_requested = true;
                }
            });

            ui.collapsing("Movement", |ui| {
                ui.add(egui::Slider::new(&mut params.agent_step, GameParams::get_step_range()).text("Step"));
                ui.add(egui::Slider::new(&mut params.jitter, GameParams::get_jitter_range()).text("Jitter"));
                ui.add(egui::Slider::new(&mut params.tick_ms, GameParams::get_tick_ms_range()).text("Tick (ms)"));
            });

            ui.collapsing("Interaction Radii", |ui| {
                ui.add(egui::Slider::new(&mut params.capture_radius, GameParams::get_radius_range()).text("Capture"));
                ui.add(egui::Slider::new(&mut params.tree_hit_radius, GameParams::get_radius_range()).text("Tree hit"));
                ui.add(egui::Slider::new(&mut params.tree_click_radius, GameParams::get_radius_range()).text("Tree click"));
                ui.add(egui::Slider::new(&mut params.kill_radius, GameParams::get_radius_range()).text("Kill"));
            });

            ui.collapsing("Terrain", |ui| {
                ui.add(egui::Slider::new(&mut params.water_level, GameParams::get_water_level_range()).text("Water level"));
                ui.checkbox(&mut params.draw_terrain, "Draw terrain (Z)");
                ui.label(format!("Under water: {:.0}%", debug_info.water_fraction * 100.0));
            });

            ui.collapsing("Statistics", |ui| {
                let stats = &world.stats;
                ui.label(format!("Good guys alive: {}", world.count_live(EntityKind::Good)));
                ui.label(format!("Bad guys alive: {}", world.count_live(EntityKind::Bad)));
                ui.label(format!("Live boxes: {}", world.count_live(EntityKind::Box)));
                ui.separator();
                ui.label(format!("Captures (good / bad): {} / {}", stats.good_captures, stats.bad_captures));
                ui.label(format!("Killed (good / bad): {} / {}", stats.good_killed, stats.bad_killed));
                ui.label(format!("Boxes placed: {} ({} inert)", stats.boxes_placed, stats.inert_placements));
                ui.label(format!("Rejected clicks: {}", stats.rejected_clicks));
                ui.label(format!("Ticks: {}", world.tick_count));
            });

            ui.checkbox(&mut params.show_debug, "Show Debug Info (D)");
            ui.checkbox(&mut params.pause_simulation, "Pause Simulation (V)");
        });

    UiActions {
        reset_requested,
        changes: snapshot.detect_changes(params),
    }
}

// Draw debug information on the screen
pub fn draw_debug_info(draw: &Draw, debug_info: &DebugInfo, world: &World, window_rect: Rect, camera_zoom: f32) {
    let margin = 20.0;
    let line_height = 20.0;

    let debug_texts = [
        format!("FPS: {:.1}", debug_info.fps),
        format!("Frame time: {:.2} ms", debug_info.frame_time.as_secs_f64() * 1000.0),
        format!("Ticks this frame: {}", debug_info.ticks_this_frame),
        format!("Captures last tick: {}", debug_info.captures_last_tick),
        format!("Entities: {}", world.entities.len()),
        format!("Last click: {}", debug_info.last_click_summary()),
        format!("Zoom: {:.0} px/unit", camera_zoom),
    ];

    let panel_width = 320.0;
    let panel_height = line_height * debug_texts.len() as f32 + margin;
    draw.rect()
        .x_y(window_rect.right() - panel_width / 2.0, window_rect.top() - panel_height / 2.0)
        .w_h(panel_width, panel_height)
        .color(rgba(0.0, 0.0, 0.0, 0.7));

    let text_x = window_rect.right() - panel_width / 2.0;
    let text_y = window_rect.top() - margin;
    for (i, text) in debug_texts.iter().enumerate() {
        draw.text(text)
            .x_y(text_x, text_y - i as f32 * line_height)
            .w(panel_width - margin)
            .left_justify()
            .color(WHITE)
            .font_size(14);
    }
}
