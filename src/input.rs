/*
 * Input Module
 *
 * This module handles user input for the game.
 *
 * Mouse:
 * - Left click: pick the board pixel under the cursor and resolve the click
 *   (place a box, kill agents)
 * - Right drag: pan the camera
 * - Wheel: zoom
 *
 * Keyboard:
 * - Escape: quit
 * - F: toggle fullscreen
 * - Z: toggle terrain drawing
 * - V: pause / resume the simulation
 * - D: toggle the debug overlay
 * - R: reset the world
 */

use nannou::prelude::*;
use nannou::winit::event::{MouseButton, MouseScrollDelta, TouchPhase};

use crate::app::{self, Model};
use crate::picking::PickPass;

// Mouse moved event handler
pub fn mouse_moved(_app: &App, model: &mut Model, pos: Point2) {
    if model.camera.is_panning() {
        model.camera.pan_to(pos);
    }
    model.mouse_position = pos;
}

// Mouse pressed event handler
pub fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    // Clicks on the control panel belong to egui
    if model.egui.ctx().is_pointer_over_area() {
        return;
    }

    match button {
        MouseButton::Left => click_board(app, model),
        MouseButton::Right => model.camera.begin_pan(model.mouse_position),
        _ => {}
    }
}

fn click_board(app: &App, model: &mut Model) {
    let window_rect = app.window_rect();
    let world_pos = model.camera.screen_to_world(model.mouse_position, window_rect);

    let pick = PickPass::new(&model.terrain).pick(world_pos);
    let outcome = model.world.resolve_click(pick, &model.params, &model.terrain);
    model.debug_info.last_click = Some(outcome);
}

// Mouse released event handler
pub fn mouse_released(_app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Right {
        model.camera.end_pan();
    }
}

// Mouse wheel event handler for zooming
pub fn mouse_wheel(app: &App, model: &mut Model, delta: MouseScrollDelta, _phase: TouchPhase) {
    let window_rect = app.window_rect();
    match delta {
        MouseScrollDelta::LineDelta(_, y) => {
            model.camera.zoom_at(y, model.mouse_position, window_rect);
        }
        MouseScrollDelta::PixelDelta(pos) => {
            // Trackpads report pixels; treat 50 of them as one notch
            model.camera.zoom_at(pos.y as f32 / 50.0, model.mouse_position, window_rect);
        }
    }
}

// Keyboard toggles
pub fn key_pressed(app: &App, model: &mut Model, key: Key) {
    match key {
        Key::Escape => {
            log::info!("quit requested, final score {}", model.world.score);
            app.quit();
        }
        Key::F => {
            model.fullscreen = !model.fullscreen;
            app.main_window().set_fullscreen(model.fullscreen);
        }
        Key::Z => model.params.draw_terrain = !model.params.draw_terrain,
        Key::V => {
            model.params.pause_simulation = !model.params.pause_simulation;
            log::debug!("simulation paused: {}", model.params.pause_simulation);
        }
        Key::D => model.params.show_debug = !model.params.show_debug,
        Key::R => app::reset_world(model),
        _ => {}
    }
}

// Pass raw window events through to egui
pub fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}
