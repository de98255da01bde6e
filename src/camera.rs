/*
 * Camera Module
 *
 * View onto the board. Zoom is screen pixels per board unit; the centre is a
 * board point and never leaves the board, so some of the board is always in
 * view however far the player pans.
 */

use nannou::prelude::*;

pub const DEFAULT_ZOOM: f32 = 300.0;
pub const MIN_ZOOM: f32 = 50.0;
pub const MAX_ZOOM: f32 = 5000.0;

// Zoom factor per wheel notch
const ZOOM_PER_NOTCH: f32 = 1.1;
// Fraction of the shorter window side the fitted board takes up
const FIT_MARGIN: f32 = 0.95;

pub struct Camera {
    pub centre: Vec2,
    pub zoom: f32,
    half_extent: f32,
    // Cursor at the last pan update; Some while the pan button is held
    pan_anchor: Option<Vec2>,
}

impl Camera {
    pub fn new(half_extent: f32) -> Self {
        Self {
            centre: Vec2::ZERO,
            zoom: DEFAULT_ZOOM,
            half_extent,
            pan_anchor: None,
        }
    }

    /// Centres the board and zooms until it fills the shorter window side.
    pub fn fit(&mut self, window_rect: Rect) {
        let side = window_rect.w().min(window_rect.h());
        self.centre = Vec2::ZERO;
        self.zoom = (side * FIT_MARGIN / (2.0 * self.half_extent)).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn world_to_screen(&self, point: Vec2, window_rect: Rect) -> Vec2 {
        (point - self.centre) * self.zoom + window_rect.xy()
    }

    pub fn screen_to_world(&self, point: Vec2, window_rect: Rect) -> Vec2 {
        (point - window_rect.xy()) / self.zoom + self.centre
    }

    /// Zooms by `notches` wheel steps (positive zooms in), keeping the board
    /// point under `cursor` in place.
    pub fn zoom_at(&mut self, notches: f32, cursor: Vec2, window_rect: Rect) {
        let anchor = self.screen_to_world(cursor, window_rect);
        self.zoom = (self.zoom * ZOOM_PER_NOTCH.powf(notches)).clamp(MIN_ZOOM, MAX_ZOOM);
        self.centre = anchor - (cursor - window_rect.xy()) / self.zoom;
        self.keep_on_board();
    }

    pub fn begin_pan(&mut self, cursor: Vec2) {
        self.pan_anchor = Some(cursor);
    }

    // The board follows the cursor
    pub fn pan_to(&mut self, cursor: Vec2) {
        if let Some(last) = self.pan_anchor {
            self.centre -= (cursor - last) / self.zoom;
            self.keep_on_board();
            self.pan_anchor = Some(cursor);
        }
    }

    pub fn end_pan(&mut self) {
        self.pan_anchor = None;
    }

    pub fn is_panning(&self) -> bool {
        self.pan_anchor.is_some()
    }

    fn keep_on_board(&mut self) {
        let limit = Vec2::splat(self.half_extent);
        self.centre = self.centre.clamp(-limit, limit);
    }
}
