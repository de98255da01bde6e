/*
 * Terrain Module
 *
 * Seeded value-noise heightfield covering the square board. Each octave is a
 * lattice of random heights twice as fine as the previous one, sampled with
 * smoothstep bilinear interpolation and weighted by half the previous
 * amplitude. The sum is normalised to [0, 1]; anything below the water level
 * is water.
 */

use nannou::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::params::{GameParams, MAX_FINEST_CELLS, MAX_LATTICE_SIZE, MAX_OCTAVES};

pub struct Terrain {
    half_extent: f32,
    water_level: f32,
    octaves: Vec<Lattice>,
    total_amplitude: f32,
}

// One octave: (cells + 1)^2 corner heights in [0, 1]
struct Lattice {
    cells: usize,
    heights: Vec<f32>,
    amplitude: f32,
}

impl Lattice {
    fn new(cells: usize, amplitude: f32, rng: &mut StdRng) -> Self {
        let side = cells + 1;
        let heights = (0..side * side).map(|_| rng.gen::<f32>()).collect();
        Self {
            cells,
            heights,
            amplitude,
        }
    }

    #[inline]
    fn corner(&self, x: usize, y: usize) -> f32 {
        self.heights[y * (self.cells + 1) + x]
    }

    // Sample at normalised coordinates u, v in [0, 1]
    fn sample(&self, u: f32, v: f32) -> f32 {
        let fx = u * self.cells as f32;
        let fy = v * self.cells as f32;
        let x0 = (fx.floor() as usize).min(self.cells - 1);
        let y0 = (fy.floor() as usize).min(self.cells - 1);
        let tx = smoothstep(fx - x0 as f32);
        let ty = smoothstep(fy - y0 as f32);

        let bottom = lerp(self.corner(x0, y0), self.corner(x0 + 1, y0), tx);
        let top = lerp(self.corner(x0, y0 + 1), self.corner(x0 + 1, y0 + 1), tx);
        lerp(bottom, top, ty)
    }
}

#[inline]
fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

impl Terrain {
    /// Builds the heightfield. `params` is expected to have passed
    /// [`GameParams::validate`].
    pub fn new(params: &GameParams) -> Self {
        let mut rng = StdRng::seed_from_u64(params.seed);
        let octave_count = params.octaves.min(MAX_OCTAVES);
        let mut octaves = Vec::with_capacity(octave_count as usize);
        let mut amplitude = 1.0;
        let mut total_amplitude = 0.0;

        let base = params.lattice_size.clamp(1, MAX_LATTICE_SIZE);
        for octave in 0..octave_count {
            let cells = base
                .checked_shl(octave)
                .map_or(MAX_FINEST_CELLS, |cells| cells.min(MAX_FINEST_CELLS));
            octaves.push(Lattice::new(cells, amplitude, &mut rng));
            total_amplitude += amplitude;
            amplitude *= 0.5;
        }

        log::debug!(
            "terrain: seed {:#x}, {} octaves, base lattice {}",
            params.seed,
            octaves.len(),
            params.lattice_size
        );

        Self {
            half_extent: params.half_extent,
            water_level: params.water_level,
            octaves,
            total_amplitude,
        }
    }

    pub fn half_extent(&self) -> f32 {
        self.half_extent
    }

    pub fn water_level(&self) -> f32 {
        self.water_level
    }

    // Off-board positions sample the nearest board edge
    pub fn height(&self, pos: Vec2) -> f32 {
        if self.total_amplitude <= 0.0 {
            return 0.0;
        }

        let size = self.half_extent * 2.0;
        let u = ((pos.x + self.half_extent) / size).clamp(0.0, 1.0);
        let v = ((pos.y + self.half_extent) / size).clamp(0.0, 1.0);

        let sum: f32 = self
            .octaves
            .iter()
            .map(|lattice| lattice.sample(u, v) * lattice.amplitude)
            .sum();
        (sum / self.total_amplitude).clamp(0.0, 1.0)
    }

    pub fn is_water(&self, pos: Vec2) -> bool {
        self.height(pos) < self.water_level
    }

    /// Fraction of the board under water, estimated on a `samples` x
    /// `samples` grid.
    pub fn water_fraction(&self, samples: usize) -> f32 {
        if samples == 0 {
            return 0.0;
        }
        let step = self.half_extent * 2.0 / samples as f32;
        let mut wet = 0;
        for j in 0..samples {
            for i in 0..samples {
                let pos = vec2(
                    -self.half_extent + (i as f32 + 0.5) * step,
                    -self.half_extent + (j as f32 + 0.5) * step,
                );
                if self.is_water(pos) {
                    wet += 1;
                }
            }
        }
        wet as f32 / (samples * samples) as f32
    }
}
