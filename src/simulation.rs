/*
 * Simulation Module
 *
 * One fixed-interval tick of the game. Every living good or bad guy, in list
 * order:
 * 1. Heads for the nearest live box (plus jitter) and captures it when close
 *    enough, or wanders randomly when no box is live
 * 2. Is pushed out of any tree it walked into
 * 3. Is clamped back onto the board
 *
 * When the push and the clamp disagree (a tree at the board edge, or trees
 * overlapping each other) the agent moves to the nearest on-board point
 * clear of every tree. Boxed in with no such point nearby, it stays where it
 * started the tick.
 *
 * A capture kills the box immediately, so later agents in the same tick no
 * longer see it: the first capture wins.
 */

use nannou::prelude::*;
use rand::Rng;

use crate::entity::EntityKind;
use crate::params::GameParams;
use crate::terrain::Terrain;
use crate::world::World;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capture {
    pub agent: usize,
    pub target: usize,
    pub team: EntityKind,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub captures: Vec<Capture>,
    pub score_delta: i32,
    pub tree_hits: usize,
    pub clamped: usize,
}

impl World {
    pub fn tick<R: Rng + ?Sized>(&mut self, params: &GameParams, terrain: &Terrain, rng: &mut R) -> TickReport {
        self.tick_count += 1;
        let mut report = TickReport::default();

        let trees = self.tree_positions();

        for i in 0..self.entities.len() {
            if !self.entities[i].is_live_agent() {
                continue;
            }

            let here = self.entities[i].position();
            match self.nearest_live_box(here) {
                Some(target) => {
                    let goal = self.entities[target].position();
                    let agent = &mut self.entities[i];
                    agent.step_toward(goal, params.agent_step, params.jitter, rng);

                    if agent.distance_to(goal) < params.capture_radius {
                        let team = agent.kind;
                        self.entities[target].dead = true;
                        let delta = capture_score(team);
                        self.score += delta;
                        report.score_delta += delta;
                        match team {
                            EntityKind::Good => self.stats.good_captures += 1,
                            _ => self.stats.bad_captures += 1,
                        }
                        log::debug!(
                            "tick {}: {:?} guy #{} captured box #{} (score {})",
                            self.tick_count,
                            team,
                            i,
                            target,
                            self.score
                        );
                        report.captures.push(Capture { agent: i, target, team });
                    }
                }
                None => self.entities[i].step_random(params.agent_step, rng),
            }

            let agent = &mut self.entities[i];
            let stepped = agent.position();
            for &tree in &trees {
                if agent.repel_from(tree, params.tree_hit_radius) {
                    report.tree_hits += 1;
                }
            }

            if agent.clamp_to_board(params.half_extent) {
                report.clamped += 1;
            }

            if !clear_of_trees(agent.position(), &trees, params.tree_hit_radius) {
                match free_position(stepped, &trees, params.tree_hit_radius, params.half_extent) {
                    Some(pos) => agent.set_position(pos),
                    None => {
                        log::debug!("tick {}: guy #{} boxed in by trees", self.tick_count, i);
                        agent.set_position(here);
                    }
                }
            }

            agent.location.z = terrain.height(agent.position());
        }

        report
    }
}

// Slack for positions placed exactly on a tree's hit circle
const CLEARANCE_EPSILON: f32 = 1e-5;

fn clear_of_trees(pos: Vec2, trees: &[Vec2], radius: f32) -> bool {
    trees.iter().all(|tree| tree.distance(pos) >= radius - CLEARANCE_EPSILON)
}

// Nearest on-board point to `pos` at least `radius` from every tree, taken
// from the corners of the free region: radial exits from each tree, where a
// tree's circle meets a board edge, and where two circles cross.
fn free_position(pos: Vec2, trees: &[Vec2], radius: f32, half_extent: f32) -> Option<Vec2> {
    let reach = radius + CLEARANCE_EPSILON;
    let nearby: Vec<Vec2> = trees
        .iter()
        .copied()
        .filter(|tree| tree.distance(pos) < 3.0 * reach)
        .collect();

    let mut candidates = Vec::new();
    for (n, &tree) in nearby.iter().enumerate() {
        let away = (pos - tree).try_normalize().unwrap_or(Vec2::X);
        candidates.push(tree + away * reach);

        for edge in [-half_extent, half_extent] {
            let dx = edge - tree.x;
            if dx.abs() < reach {
                let dy = (reach * reach - dx * dx).sqrt();
                candidates.push(vec2(edge, tree.y + dy));
                candidates.push(vec2(edge, tree.y - dy));
            }
            let dy = edge - tree.y;
            if dy.abs() < reach {
                let dx = (reach * reach - dy * dy).sqrt();
                candidates.push(vec2(tree.x + dx, edge));
                candidates.push(vec2(tree.x - dx, edge));
            }
        }

        for &other in &nearby[n + 1..] {
            let gap = other - tree;
            let d = gap.length();
            if d <= 0.0 || d >= 2.0 * reach {
                continue;
            }
            let mid = tree + gap * 0.5;
            let across = (reach * reach - d * d * 0.25).sqrt();
            let perp = gap.perp() / d;
            candidates.push(mid + perp * across);
            candidates.push(mid - perp * across);
        }
    }

    candidates
        .into_iter()
        .filter(|c| c.x.abs() <= half_extent && c.y.abs() <= half_extent)
        .filter(|&c| clear_of_trees(c, trees, radius))
        .min_by(|a, b| a.distance_squared(pos).total_cmp(&b.distance_squared(pos)))
}

// Good guys score for their team; bad guys only deny the box
fn capture_score(team: EntityKind) -> i32 {
    match team {
        EntityKind::Good => 1,
        _ => 0,
    }
}
