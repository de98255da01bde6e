/*
 * Renderer Module
 *
 * This module draws the game: terrain tiles, the board outline, entities,
 * the score and the optional debug overlay. Terrain colors are shaded once
 * into a tile cache and only rebuilt when the terrain changes. Water tiles
 * shimmer with the tick count, so the water stands still while paused.
 */

use nannou::prelude::*;
use std::f32::consts::TAU;

use crate::app::Model;
use crate::entity::EntityKind;
use crate::terrain::Terrain;
use crate::ui;

pub const TERRAIN_TILES_PER_SIDE: usize = 48;
// Ticks per shimmer cycle (about three seconds at the default tick)
pub const SHIMMER_PERIOD: u64 = 90;
const SHIMMER_AMPLITUDE: f32 = 0.08;

pub struct TerrainTile {
    pub centre: Vec2,
    pub color: Rgba,
    pub water: bool,
}

pub struct TerrainTiles {
    pub per_side: usize,
    pub tile_size: f32,
    // Row by row from the bottom-left
    pub tiles: Vec<TerrainTile>,
}

impl TerrainTiles {
    pub fn new(terrain: &Terrain) -> Self {
        let per_side = TERRAIN_TILES_PER_SIDE;
        let half_extent = terrain.half_extent();
        let tile_size = 2.0 * half_extent / per_side as f32;

        let mut tiles = Vec::with_capacity(per_side * per_side);
        for j in 0..per_side {
            for i in 0..per_side {
                let centre = vec2(
                    -half_extent + (i as f32 + 0.5) * tile_size,
                    -half_extent + (j as f32 + 0.5) * tile_size,
                );
                tiles.push(TerrainTile {
                    centre,
                    color: terrain_color(terrain, centre),
                    water: terrain.is_water(centre),
                });
            }
        }

        Self {
            per_side,
            tile_size,
            tiles,
        }
    }
}

fn terrain_color(terrain: &Terrain, pos: Vec2) -> Rgba {
    let height = terrain.height(pos);
    let level = terrain.water_level();
    if height < level {
        // Deeper water is darker
        let depth = if level > 0.0 { (level - height) / level } else { 0.0 };
        rgba(0.1, 0.25 + 0.25 * (1.0 - depth), 0.5 + 0.4 * (1.0 - depth), 1.0)
    } else {
        let rise = if level < 1.0 { (height - level) / (1.0 - level) } else { 0.0 };
        rgba(0.25 + 0.35 * rise, 0.45 + 0.15 * rise, 0.15 + 0.3 * rise, 1.0)
    }
}

// Brightness ripple travelling diagonally across the water
pub fn shimmer(color: Rgba, pos: Vec2, tick: u64) -> Rgba {
    let cycle = (tick % SHIMMER_PERIOD) as f32 / SHIMMER_PERIOD as f32;
    let phase = cycle * TAU + (pos.x + pos.y) * 6.0;
    let gain = 1.0 + SHIMMER_AMPLITUDE * phase.sin();
    rgba(
        (color.red * gain).min(1.0),
        (color.green * gain).min(1.0),
        (color.blue * gain).min(1.0),
        color.alpha,
    )
}

// Render the model
pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(BLACK);

    let window_rect = app.window_rect();
    let camera = &model.camera;

    if model.params.draw_terrain {
        let size = model.terrain_tiles.tile_size * camera.zoom;
        let tick = model.world.tick_count;
        for tile in &model.terrain_tiles.tiles {
            let screen = camera.world_to_screen(tile.centre, window_rect);
            let color = if tile.water {
                shimmer(tile.color, tile.centre, tick)
            } else {
                tile.color
            };
            // Tiles slightly overlap to hide seams
            draw.rect().xy(screen).w_h(size + 1.0, size + 1.0).color(color);
        }
    }

    // Board outline
    let half = model.params.half_extent;
    let bottom_left = camera.world_to_screen(vec2(-half, -half), window_rect);
    let top_right = camera.world_to_screen(vec2(half, half), window_rect);
    let board = Rect::from_corners(bottom_left, top_right);
    draw.rect()
        .xy(board.xy())
        .wh(board.wh())
        .no_fill()
        .stroke_weight(1.0)
        .stroke(rgba(0.6, 0.6, 0.6, 1.0));

    // Boxes under trees under agents
    for kind in [EntityKind::Box, EntityKind::Tree, EntityKind::Good, EntityKind::Bad] {
        for entity in model.world.entities.iter().filter(|e| e.kind == kind) {
            entity.draw(&draw, camera, window_rect);
        }
    }

    draw.text(&format!("Score: {}", model.world.score))
        .x_y(0.0, window_rect.top() - 20.0)
        .color(WHITE)
        .font_size(20);

    if model.params.pause_simulation {
        draw.text("PAUSED")
            .x_y(0.0, window_rect.top() - 44.0)
            .color(YELLOW)
            .font_size(16);
    }

    if model.params.show_debug {
        // Kill and tree-click radii around the cursor
        let cursor = model.mouse_position;
        draw.ellipse()
            .xy(cursor)
            .radius(model.params.kill_radius * camera.zoom)
            .no_fill()
            .stroke(RED)
            .stroke_weight(1.0);
        draw.ellipse()
            .xy(cursor)
            .radius(model.params.tree_click_radius * camera.zoom)
            .no_fill()
            .stroke(GREEN)
            .stroke_weight(1.0);

        ui::draw_debug_info(&draw, &model.debug_info, &model.world, window_rect, camera.zoom);
    }

    if let Err(err) = draw.to_frame(app, &frame) {
        log::warn!("failed to draw frame: {err:?}");
    }
    if let Err(err) = model.egui.draw_to_frame(&frame) {
        log::warn!("failed to draw UI: {err:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::GameParams;

    #[test]
    fn tiles_cover_the_board() {
        let terrain = Terrain::new(&GameParams::default());
        let tiles = TerrainTiles::new(&terrain);
        assert_eq!(tiles.tiles.len(), TERRAIN_TILES_PER_SIDE * TERRAIN_TILES_PER_SIDE);

        let covered = tiles.tile_size * tiles.per_side as f32;
        assert!((covered - 2.0 * terrain.half_extent()).abs() < 1e-4);
    }

    #[test]
    fn water_and_land_tiles_differ() {
        let terrain = Terrain::new(&GameParams { water_level: 0.5, ..GameParams::default() });
        let tiles = TerrainTiles::new(&terrain);
        let (wet, dry): (Vec<&TerrainTile>, Vec<&TerrainTile>) = tiles.tiles.iter().partition(|tile| tile.water);
        if let (Some(water), Some(land)) = (wet.first(), dry.first()) {
            // Water is bluer than green; land the other way round
            assert!(water.color.blue > water.color.green);
            assert!(land.color.green > land.color.blue);
        }
    }

    #[test]
    fn shimmer_repeats_each_period() {
        let base = rgba(0.1, 0.4, 0.7, 1.0);
        let pos = vec2(0.3, -0.2);
        let first = shimmer(base, pos, 7);
        let again = shimmer(base, pos, 7 + SHIMMER_PERIOD);
        assert_eq!(first, again);
    }

    #[test]
    fn shimmer_moves_with_ticks_and_stays_close_to_base() {
        let base = rgba(0.1, 0.4, 0.7, 1.0);
        let pos = vec2(0.0, 0.0);
        let frames: Vec<Rgba> = (0..SHIMMER_PERIOD).map(|tick| shimmer(base, pos, tick)).collect();
        assert!(frames.iter().any(|c| (c.blue - frames[0].blue).abs() > 0.01));
        for c in &frames {
            assert!((c.blue - base.blue).abs() <= base.blue * SHIMMER_AMPLITUDE + 1e-6);
            assert_eq!(c.alpha, 1.0);
        }
    }
}
