/*
 * Picking Module
 *
 * Color-coded picking. The pick pass shades every board pixel with a color
 * that encodes where on the board it is and what surface it shows; a click
 * reads back one pixel and decodes it. The background clears to black, which
 * decodes as off-board.
 *
 * Channel layout:
 * - r: board x quantised into PICK_CELLS cells
 * - g: board y quantised into PICK_CELLS cells
 * - b: surface tag (SURFACE_GROUND or SURFACE_WATER)
 */

use nannou::prelude::*;

use crate::terrain::Terrain;

pub const PICK_CELLS: u32 = 256;
pub const SURFACE_GROUND: u8 = 1;
pub const SURFACE_WATER: u8 = 2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PickColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl PickColor {
    pub const CLEAR: PickColor = PickColor { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Pick {
    OffBoard,
    Board { position: Vec2, water: bool },
}

// Board coordinate -> cell index in 0..PICK_CELLS
#[inline]
fn quantise(coord: f32, half_extent: f32) -> u8 {
    let unit = (coord + half_extent) / (2.0 * half_extent);
    let cell = (unit * PICK_CELLS as f32).floor();
    cell.clamp(0.0, (PICK_CELLS - 1) as f32) as u8
}

// Cell index -> board coordinate of the cell centre
#[inline]
fn dequantise(cell: u8, half_extent: f32) -> f32 {
    -half_extent + (cell as f32 + 0.5) / PICK_CELLS as f32 * 2.0 * half_extent
}

/// The pick shader: the color the pick pass writes for the pixel showing
/// `world_pos`.
pub fn shade(world_pos: Vec2, terrain: &Terrain) -> PickColor {
    let half_extent = terrain.half_extent();
    if world_pos.x.abs() > half_extent || world_pos.y.abs() > half_extent {
        return PickColor::CLEAR;
    }

    let surface = if terrain.is_water(world_pos) {
        SURFACE_WATER
    } else {
        SURFACE_GROUND
    };
    PickColor::new(quantise(world_pos.x, half_extent), quantise(world_pos.y, half_extent), surface)
}

pub fn decode(color: PickColor, half_extent: f32) -> Pick {
    let water = match color.b {
        SURFACE_GROUND => false,
        SURFACE_WATER => true,
        _ => return Pick::OffBoard,
    };

    Pick::Board {
        position: vec2(dequantise(color.r, half_extent), dequantise(color.g, half_extent)),
        water,
    }
}

/// Screen-space pick target: maps a window pixel to the world position the
/// camera shows there and shades it.
pub struct PickPass<'a> {
    pub terrain: &'a Terrain,
}

impl<'a> PickPass<'a> {
    pub fn new(terrain: &'a Terrain) -> Self {
        Self { terrain }
    }

    pub fn read_pixel(&self, world_pos: Vec2) -> PickColor {
        shade(world_pos, self.terrain)
    }

    pub fn pick(&self, world_pos: Vec2) -> Pick {
        let color = self.read_pixel(world_pos);
        let pick = decode(color, self.terrain.half_extent());
        log::trace!("pick at {:?}: {:?} -> {:?}", world_pos, color, pick);
        pick
    }
}
