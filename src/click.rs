/*
 * Click Module
 *
 * Resolves a decoded pick against the world. In order:
 * 1. Off-board clicks are rejected and change nothing else
 * 2. A tree close to the click makes the new box inert
 * 3. Every living agent close to the click is killed
 * 4. The most recently placed dead box slot moves to the click and comes
 *    alive, unless the click hit water or a tree
 */

use nannou::prelude::*;

use crate::entity::EntityKind;
use crate::params::GameParams;
use crate::picking::Pick;
use crate::terrain::Terrain;
use crate::world::World;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InertReason {
    Water,
    NearTree,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    Live(usize),
    Inert { index: usize, reason: InertReason },
    NoFreeSlot,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    Rejected,
    Resolved {
        kills: Vec<usize>,
        placement: Placement,
        score_delta: i32,
    },
}

impl World {
    pub fn resolve_click(&mut self, pick: Pick, params: &GameParams, terrain: &Terrain) -> ClickOutcome {
        let (position, water) = match pick {
            Pick::Board { position, water }
                if position.x.abs() <= params.half_extent && position.y.abs() <= params.half_extent =>
            {
                (position, water)
            }
            _ => {
                self.stats.rejected_clicks += 1;
                log::debug!("click rejected: {:?}", pick);
                return ClickOutcome::Rejected;
            }
        };

        let near_tree = self
            .entities
            .iter()
            .any(|e| e.is_tree() && !e.dead && e.distance_to(position) < params.tree_click_radius);

        let (kills, score_delta) = self.kill_near(position, params.kill_radius);

        let placement = match self.reusable_box_slot() {
            Some(index) => {
                let stamp = self.next_placement();
                let slot = &mut self.entities[index];
                slot.location = position.extend(terrain.height(position));
                slot.placed_at = Some(stamp);

                let inert = if water {
                    Some(InertReason::Water)
                } else if near_tree {
                    Some(InertReason::NearTree)
                } else {
                    None
                };
                slot.dead = inert.is_some();
                self.stats.boxes_placed += 1;

                match inert {
                    Some(reason) => {
                        self.stats.inert_placements += 1;
                        Placement::Inert { index, reason }
                    }
                    None => Placement::Live(index),
                }
            }
            None => Placement::NoFreeSlot,
        };

        log::debug!(
            "click at ({:.3}, {:.3}): {:?}, {} killed, score {}",
            position.x,
            position.y,
            placement,
            kills.len(),
            self.score
        );

        ClickOutcome::Resolved {
            kills,
            placement,
            score_delta,
        }
    }

    // Kill every living agent within `radius`; bad guys are worth +1, good
    // guys cost 1
    fn kill_near(&mut self, position: Vec2, radius: f32) -> (Vec<usize>, i32) {
        let mut kills = Vec::new();
        let mut delta = 0;

        for (i, entity) in self.entities.iter_mut().enumerate() {
            if !entity.is_live_agent() || entity.distance_to(position) >= radius {
                continue;
            }
            entity.dead = true;
            match entity.kind {
                EntityKind::Bad => {
                    delta += 1;
                    self.stats.bad_killed += 1;
                }
                _ => {
                    delta -= 1;
                    self.stats.good_killed += 1;
                }
            }
            kills.push(i);
        }

        self.score += delta;
        (kills, delta)
    }

    // The dead box placed most recently; never-placed slots rank oldest and
    // ties keep the lowest index
    fn reusable_box_slot(&self) -> Option<usize> {
        let mut best: Option<(usize, Option<u64>)> = None;
        for (i, entity) in self.entities.iter().enumerate() {
            if entity.kind != EntityKind::Box || !entity.dead {
                continue;
            }
            if best.map_or(true, |(_, stamp)| entity.placed_at > stamp) {
                best = Some((i, entity.placed_at));
            }
        }
        best.map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use rstest::{fixture, rstest};

    struct Setup {
        params: GameParams,
        terrain: Terrain,
    }

    #[fixture]
    fn setup() -> Setup {
        let params = GameParams::default();
        let terrain = Terrain::new(&params);
        Setup { params, terrain }
    }

    fn land(position: Vec2) -> Pick {
        Pick::Board { position, water: false }
    }

    fn world_with_slots(slots: usize) -> World {
        let mut world = World::new();
        for _ in 0..slots {
            world.push(Entity::box_slot());
        }
        world
    }

    #[rstest]
    #[case::off_board_pick(Pick::OffBoard)]
    #[case::outside_extent(land(vec2(1.2, 0.0)))]
    fn off_board_clicks_change_nothing(setup: Setup, #[case] pick: Pick) {
        let mut world = world_with_slots(2);
        world.push(Entity::new(EntityKind::Good, vec3(0.0, 0.0, 0.0)));
        let before = world.entities.clone();

        let outcome = world.resolve_click(pick, &setup.params, &setup.terrain);

        assert_eq!(outcome, ClickOutcome::Rejected);
        assert_eq!(world.entities, before);
        assert_eq!(world.score, 0);
        assert_eq!(world.stats.rejected_clicks, 1);
    }

    #[rstest]
    fn click_on_open_land_places_live_box(setup: Setup) {
        let mut world = world_with_slots(1);
        let outcome = world.resolve_click(land(vec2(0.5, -0.25)), &setup.params, &setup.terrain);

        assert_eq!(
            outcome,
            ClickOutcome::Resolved { kills: vec![], placement: Placement::Live(0), score_delta: 0 }
        );
        let slot = &world.entities[0];
        assert!(slot.is_live_box());
        assert_eq!(slot.position(), vec2(0.5, -0.25));
        assert_eq!(slot.location.z, setup.terrain.height(vec2(0.5, -0.25)));
        assert_eq!(slot.placed_at, Some(1));
    }

    #[rstest]
    fn click_in_water_places_inert_box(setup: Setup) {
        let mut world = world_with_slots(1);
        let pick = Pick::Board { position: vec2(0.1, 0.1), water: true };

        let outcome = world.resolve_click(pick, &setup.params, &setup.terrain);

        let placement = Placement::Inert { index: 0, reason: InertReason::Water };
        assert_eq!(outcome, ClickOutcome::Resolved { kills: vec![], placement, score_delta: 0 });
        assert!(world.entities[0].dead);
        assert!(world.entities[0].placed_at.is_some());
        assert_eq!(world.stats.inert_placements, 1);
    }

    #[rstest]
    fn click_near_tree_places_inert_box(setup: Setup) {
        let mut world = world_with_slots(1);
        world.push(Entity::new(EntityKind::Tree, vec3(0.0, 0.0, 0.0)));
        let near = vec2(setup.params.tree_click_radius * 0.5, 0.0);

        let outcome = world.resolve_click(land(near), &setup.params, &setup.terrain);

        let placement = Placement::Inert { index: 0, reason: InertReason::NearTree };
        assert_eq!(outcome, ClickOutcome::Resolved { kills: vec![], placement, score_delta: 0 });
        assert!(world.entities[0].dead);
    }

    #[rstest]
    #[case::bad_guy(EntityKind::Bad, 1)]
    #[case::good_guy(EntityKind::Good, -1)]
    fn click_on_agent_kills_it(setup: Setup, #[case] kind: EntityKind, #[case] delta: i32) {
        let mut world = world_with_slots(1);
        let victim = world.push(Entity::new(kind, vec3(0.2, 0.2, 0.0)));
        let bystander = world.push(Entity::new(kind, vec3(0.6, 0.6, 0.0)));

        let outcome = world.resolve_click(land(vec2(0.21, 0.2)), &setup.params, &setup.terrain);

        match outcome {
            ClickOutcome::Resolved { kills, placement, score_delta } => {
                assert_eq!(kills, vec![victim]);
                assert_eq!(score_delta, delta);
                // The box still lands
                assert_eq!(placement, Placement::Live(0));
            }
            ClickOutcome::Rejected => panic!("click should resolve"),
        }
        assert!(world.entities[victim].dead);
        assert!(!world.entities[bystander].dead);
        assert_eq!(world.score, delta);
    }

    #[rstest]
    fn dead_agents_are_not_killed_twice(setup: Setup) {
        let mut world = world_with_slots(2);
        world.push(Entity::new(EntityKind::Bad, vec3(0.0, 0.0, 0.0)));

        world.resolve_click(land(Vec2::ZERO), &setup.params, &setup.terrain);
        world.resolve_click(land(Vec2::ZERO), &setup.params, &setup.terrain);

        assert_eq!(world.score, 1);
        assert_eq!(world.stats.bad_killed, 1);
    }

    #[rstest]
    fn most_recently_placed_dead_box_is_reused(setup: Setup) {
        let mut world = world_with_slots(3);

        // Fill two slots, then let the first one die
        world.resolve_click(land(vec2(-0.5, 0.0)), &setup.params, &setup.terrain);
        world.resolve_click(land(vec2(0.5, 0.0)), &setup.params, &setup.terrain);
        assert!(world.entities[0].is_live_box());
        assert!(world.entities[1].is_live_box());

        world.entities[0].dead = true;
        world.entities[1].dead = true;
        // Slot 1 was placed last, slot 2 never: slot 1 wins
        let outcome = world.resolve_click(land(vec2(0.0, 0.5)), &setup.params, &setup.terrain);
        assert!(matches!(outcome, ClickOutcome::Resolved { placement: Placement::Live(1), .. }));
        assert_eq!(world.entities[1].position(), vec2(0.0, 0.5));
    }

    #[rstest]
    fn unplaced_slots_fill_in_index_order(setup: Setup) {
        let mut world = world_with_slots(3);
        for expected in 0..3 {
            let outcome = world.resolve_click(land(vec2(0.1 * expected as f32, 0.0)), &setup.params, &setup.terrain);
            assert!(matches!(
                outcome,
                ClickOutcome::Resolved { placement: Placement::Live(i), .. } if i == expected
            ));
        }
    }

    #[rstest]
    fn inert_box_is_reused_by_next_click(setup: Setup) {
        let mut world = world_with_slots(2);
        let water = Pick::Board { position: vec2(0.3, 0.3), water: true };
        world.resolve_click(water, &setup.params, &setup.terrain);

        let outcome = world.resolve_click(land(vec2(-0.3, 0.3)), &setup.params, &setup.terrain);

        assert!(matches!(outcome, ClickOutcome::Resolved { placement: Placement::Live(0), .. }));
        assert_eq!(world.entities[0].position(), vec2(-0.3, 0.3));
        assert!(world.entities[1].placed_at.is_none());
    }

    #[rstest]
    fn all_slots_live_means_no_placement(setup: Setup) {
        let mut world = world_with_slots(1);
        world.resolve_click(land(vec2(0.0, 0.0)), &setup.params, &setup.terrain);

        let outcome = world.resolve_click(land(vec2(0.4, 0.4)), &setup.params, &setup.terrain);

        assert_eq!(
            outcome,
            ClickOutcome::Resolved { kills: vec![], placement: Placement::NoFreeSlot, score_delta: 0 }
        );
        assert_eq!(world.entities[0].position(), vec2(0.0, 0.0));
    }
}
