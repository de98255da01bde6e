/*
 * Entity Module
 *
 * This module defines the Entity struct shared by every object on the board:
 * good guys, bad guys, trees and boxes. Only good and bad guys move; trees
 * are fixed obstacles and boxes are capture targets that clicks relocate.
 */

use std::f32::consts::TAU;

use nannou::prelude::*;
use rand::Rng;

use crate::camera::Camera;
use crate::ENTITY_SIZE;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Good,
    Bad,
    Tree,
    Box,
}

impl EntityKind {
    #[inline]
    pub fn is_agent(self) -> bool {
        matches!(self, EntityKind::Good | EntityKind::Bad)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    /// x and y on the board plane, z the terrain height underneath
    pub location: Vec3,
    pub kind: EntityKind,
    pub dead: bool,
    /// Placement sequence number of a box slot; `None` until first placed
    pub placed_at: Option<u64>,
}

impl Entity {
    pub fn new(kind: EntityKind, location: Vec3) -> Self {
        Self {
            location,
            kind,
            dead: false,
            placed_at: None,
        }
    }

    // Box slots start dead and unplaced, parked at the origin
    pub fn box_slot() -> Self {
        Self {
            location: Vec3::ZERO,
            kind: EntityKind::Box,
            dead: true,
            placed_at: None,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.location.truncate()
    }

    #[inline]
    pub fn set_position(&mut self, pos: Vec2) {
        self.location.x = pos.x;
        self.location.y = pos.y;
    }

    #[inline]
    pub fn distance_to(&self, pos: Vec2) -> f32 {
        self.position().distance(pos)
    }

    #[inline]
    pub fn is_live_agent(&self) -> bool {
        self.kind.is_agent() && !self.dead
    }

    #[inline]
    pub fn is_live_box(&self) -> bool {
        self.kind == EntityKind::Box && !self.dead
    }

    #[inline]
    pub fn is_tree(&self) -> bool {
        self.kind == EntityKind::Tree
    }

    // Step toward `target`, never past it, then add uniform jitter per axis
    pub fn step_toward<R: Rng + ?Sized>(&mut self, target: Vec2, step: f32, jitter: f32, rng: &mut R) {
        let pos = self.position();
        let offset = target - pos;
        let step = step.min(offset.length());
        let heading = offset.normalize_or_zero();
        let wobble = if jitter > 0.0 {
            vec2(rng.gen_range(-jitter..=jitter), rng.gen_range(-jitter..=jitter))
        } else {
            Vec2::ZERO
        };
        self.set_position(pos + heading * step + wobble);
    }

    // Step of length `step` in a uniformly random direction
    pub fn step_random<R: Rng + ?Sized>(&mut self, step: f32, rng: &mut R) {
        let angle = rng.gen_range(0.0..TAU);
        let heading = vec2(angle.cos(), angle.sin());
        self.set_position(self.position() + heading * step);
    }

    // Push out to exactly `radius` from `obstacle` if inside it.
    // Returns whether a push happened.
    pub fn repel_from(&mut self, obstacle: Vec2, radius: f32) -> bool {
        let pos = self.position();
        let offset = pos - obstacle;
        let distance = offset.length();
        if distance >= radius {
            return false;
        }

        let away = if distance > 0.0 { offset / distance } else { Vec2::X };
        self.set_position(obstacle + away * radius);
        true
    }

    // Clamp onto the board; returns whether the entity was outside
    pub fn clamp_to_board(&mut self, half_extent: f32) -> bool {
        let pos = self.position();
        let clamped = pos.clamp(Vec2::splat(-half_extent), Vec2::splat(half_extent));
        if clamped == pos {
            return false;
        }
        self.set_position(clamped);
        true
    }

    pub fn color(&self) -> Rgba {
        let (r, g, b) = match (self.kind, self.dead) {
            (EntityKind::Good, false) => (0.2, 0.6, 1.0),
            (EntityKind::Bad, false) => (1.0, 0.25, 0.2),
            (EntityKind::Good | EntityKind::Bad, true) => (0.35, 0.35, 0.35),
            (EntityKind::Tree, _) => (0.05, 0.4, 0.1),
            (EntityKind::Box, false) => (1.0, 0.85, 0.2),
            // Inert or captured box
            (EntityKind::Box, true) => (0.55, 0.45, 0.3),
        };
        rgba(r, g, b, 1.0)
    }

    // Draw the entity
    pub fn draw(&self, draw: &Draw, camera: &Camera, window_rect: Rect) {
        // Never-placed slots have nothing to show
        if self.kind == EntityKind::Box && self.placed_at.is_none() {
            return;
        }

        let screen_pos = camera.world_to_screen(self.position(), window_rect);
        let size = ENTITY_SIZE * camera.zoom;

        match self.kind {
            EntityKind::Good | EntityKind::Bad if self.dead => {
                // Corpse: a flat cross
                let arm = size * 0.6;
                for (a, b) in [(vec2(-arm, -arm), vec2(arm, arm)), (vec2(-arm, arm), vec2(arm, -arm))] {
                    draw.line()
                        .start(screen_pos + a)
                        .end(screen_pos + b)
                        .weight(2.0)
                        .color(self.color());
                }
            }
            EntityKind::Good | EntityKind::Bad => {
                draw.ellipse()
                    .xy(screen_pos)
                    .radius(size * 0.5)
                    .color(self.color());
            }
            EntityKind::Tree => {
                draw.tri()
                    .points(
                        screen_pos + vec2(0.0, size),
                        screen_pos + vec2(-size * 0.6, -size * 0.5),
                        screen_pos + vec2(size * 0.6, -size * 0.5),
                    )
                    .color(self.color());
            }
            EntityKind::Box => {
                let rect = draw.rect().xy(screen_pos).w_h(size, size);
                if self.dead {
                    rect.no_fill().stroke_weight(1.5).stroke(self.color());
                } else {
                    rect.color(self.color());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;

    fn agent_at(x: f32, y: f32) -> Entity {
        Entity::new(EntityKind::Good, vec3(x, y, 0.0))
    }

    #[test]
    fn only_good_and_bad_are_agents() {
        assert!(EntityKind::Good.is_agent());
        assert!(EntityKind::Bad.is_agent());
        assert!(!EntityKind::Tree.is_agent());
        assert!(!EntityKind::Box.is_agent());
    }

    #[test]
    fn box_slot_starts_dead_and_unplaced() {
        let slot = Entity::box_slot();
        assert!(slot.dead);
        assert!(slot.placed_at.is_none());
        assert!(!slot.is_live_box());
    }

    #[test]
    fn step_toward_without_jitter_moves_exactly_one_step() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut agent = agent_at(0.0, 0.0);
        agent.step_toward(vec2(1.0, 0.0), 0.1, 0.0, &mut rng);
        assert_relative_eq!(agent.position().x, 0.1, epsilon = 1e-6);
        assert_relative_eq!(agent.position().y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn step_toward_stops_on_a_close_target() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut agent = agent_at(0.2, 0.0);
        agent.step_toward(vec2(0.23, 0.0), 0.05, 0.0, &mut rng);
        assert_relative_eq!(agent.position().x, 0.23, epsilon = 1e-6);
        assert_relative_eq!(agent.position().y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn step_toward_jitter_stays_bounded() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let mut agent = agent_at(0.0, 0.0);
            agent.step_toward(vec2(0.0, 1.0), 0.1, 0.01, &mut rng);
            let pos = agent.position();
            assert!(pos.x.abs() <= 0.01 + 1e-6);
            assert!((pos.y - 0.1).abs() <= 0.01 + 1e-6);
        }
    }

    #[test]
    fn step_random_has_fixed_length() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut agent = agent_at(0.2, 0.2);
        agent.step_random(0.05, &mut rng);
        assert_relative_eq!(agent.distance_to(vec2(0.2, 0.2)), 0.05, epsilon = 1e-5);
    }

    #[rstest]
    #[case::inside(vec2(0.01, 0.0), true, vec2(0.05, 0.0))]
    #[case::on_centre(vec2(0.0, 0.0), true, vec2(0.05, 0.0))]
    #[case::outside(vec2(0.0, 0.2), false, vec2(0.0, 0.2))]
    fn repel_pushes_to_radius(#[case] start: Vec2, #[case] pushed: bool, #[case] expected: Vec2) {
        let mut agent = agent_at(start.x, start.y);
        assert_eq!(agent.repel_from(Vec2::ZERO, 0.05), pushed);
        assert_relative_eq!(agent.position().x, expected.x, epsilon = 1e-6);
        assert_relative_eq!(agent.position().y, expected.y, epsilon = 1e-6);
    }

    #[rstest]
    #[case(vec2(1.5, 0.0), true, vec2(1.0, 0.0))]
    #[case(vec2(-2.0, -3.0), true, vec2(-1.0, -1.0))]
    #[case(vec2(0.5, -0.5), false, vec2(0.5, -0.5))]
    fn clamp_keeps_entity_on_board(#[case] start: Vec2, #[case] clamped: bool, #[case] expected: Vec2) {
        let mut agent = agent_at(start.x, start.y);
        assert_eq!(agent.clamp_to_board(1.0), clamped);
        assert_eq!(agent.position(), expected);
    }
}
