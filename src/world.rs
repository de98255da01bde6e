/*
 * World Module
 *
 * This module defines the World struct: the flat entity list, the signed
 * score and the running statistics. The tick lives in `simulation.rs` and
 * click handling in `click.rs`; both mutate the world in place.
 */

use nannou::prelude::*;
use rand::Rng;

use crate::entity::{Entity, EntityKind};
use crate::params::GameParams;
use crate::terrain::Terrain;

// Tries per entity to land on dry ground before accepting water
pub const SPAWN_ATTEMPTS: usize = 16;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub good_captures: u32,
    pub bad_captures: u32,
    pub good_killed: u32,
    pub bad_killed: u32,
    pub boxes_placed: u32,
    pub inert_placements: u32,
    pub rejected_clicks: u32,
}

#[derive(Clone, Debug, Default)]
pub struct World {
    pub entities: Vec<Entity>,
    pub score: i32,
    pub tick_count: u64,
    pub stats: Stats,
    // Placement sequence counter; boxes remember the value they were placed at
    pub(crate) placements: u64,
}

impl World {
    /// An empty world. Tests and tools build their own layouts with
    /// [`World::push`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Populates a fresh world from `params`: agents and trees on random
    /// land positions, every box slot dead and unplaced.
    pub fn spawn<R: Rng + ?Sized>(params: &GameParams, terrain: &Terrain, rng: &mut R) -> Self {
        let mut world = Self::new();
        world.populate(params, terrain, rng);
        world
    }

    pub fn reset<R: Rng + ?Sized>(&mut self, params: &GameParams, terrain: &Terrain, rng: &mut R) {
        *self = Self::spawn(params, terrain, rng);
        log::info!(
            "world reset: {} good, {} bad, {} trees, {} box slots",
            params.good_count,
            params.bad_count,
            params.tree_count,
            params.box_slots
        );
    }

    fn populate<R: Rng + ?Sized>(&mut self, params: &GameParams, terrain: &Terrain, rng: &mut R) {
        let total = params.tree_count + params.good_count + params.bad_count + params.box_slots;
        self.entities.reserve(total);

        // Trees first so the list reads obstacles, agents, targets
        let groups = [
            (EntityKind::Tree, params.tree_count),
            (EntityKind::Good, params.good_count),
            (EntityKind::Bad, params.bad_count),
        ];
        for (kind, count) in groups {
            for _ in 0..count {
                let pos = random_land_position(terrain, params.half_extent, rng);
                self.push(Entity::new(kind, pos.extend(terrain.height(pos))));
            }
        }

        for _ in 0..params.box_slots {
            self.push(Entity::box_slot());
        }
    }

    pub fn push(&mut self, entity: Entity) -> usize {
        self.entities.push(entity);
        self.entities.len() - 1
    }

    pub fn count_live(&self, kind: EntityKind) -> usize {
        self.entities
            .iter()
            .filter(|e| e.kind == kind && !e.dead)
            .count()
    }

    pub fn count_dead(&self, kind: EntityKind) -> usize {
        self.entities
            .iter()
            .filter(|e| e.kind == kind && e.dead)
            .count()
    }

    // Linear scan; ties keep the lower index
    pub fn nearest_live_box(&self, pos: Vec2) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, entity) in self.entities.iter().enumerate() {
            if !entity.is_live_box() {
                continue;
            }
            let d = entity.position().distance_squared(pos);
            if best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((i, d));
            }
        }
        best.map(|(i, _)| i)
    }

    pub fn tree_positions(&self) -> Vec<Vec2> {
        self.entities
            .iter()
            .filter(|e| e.is_tree() && !e.dead)
            .map(Entity::position)
            .collect()
    }

    pub(crate) fn next_placement(&mut self) -> u64 {
        self.placements += 1;
        self.placements
    }
}

fn random_land_position<R: Rng + ?Sized>(terrain: &Terrain, half_extent: f32, rng: &mut R) -> Vec2 {
    let mut pos = Vec2::ZERO;
    for _ in 0..SPAWN_ATTEMPTS {
        pos = vec2(
            rng.gen_range(-half_extent..=half_extent),
            rng.gen_range(-half_extent..=half_extent),
        );
        if !terrain.is_water(pos) {
            break;
        }
    }
    pos
}
