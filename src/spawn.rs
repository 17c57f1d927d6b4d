//! Spawn controller: releases a level's shuffled enemy queue.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::arena::EntityId;
use crate::config::Rules;
use crate::entities::{Archetype, Facing, Unit};
use crate::geometry::too_close;
use crate::movement::touches;
use crate::world::World;

/// Expand a roster into one tag per enemy and shuffle it once.
pub fn build_queue(roster: [u32; 4], rng: &mut impl Rng) -> Vec<Archetype> {
    let mut queue: Vec<Archetype> = Archetype::ALL
        .iter()
        .zip(roster)
        .flat_map(|(&kind, count)| std::iter::repeat(kind).take(count as usize))
        .collect();
    queue.shuffle(rng);
    queue
}

/// A candidate may only appear when it is not too close to any live unit.
///
/// The radius test alone lets a tall enemy land on the corner of a shorter
/// tank, so boxes that would touch are rejected as well.
pub fn spawn_is_safe(world: &World, candidate: &Unit) -> bool {
    let rect = candidate.bounds();
    !world.live_units().any(|(_, u)| {
        let existing = u.bounds();
        too_close(&existing, &rect) || touches(&existing, &rect)
    })
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Spawner {
    queue: Vec<Archetype>,
    cursor: usize,
}

impl Spawner {
    pub fn new(queue: Vec<Archetype>) -> Spawner {
        Spawner { queue, cursor: 0 }
    }

    pub fn for_roster(roster: [u32; 4], rng: &mut impl Rng) -> Spawner {
        Spawner::new(build_queue(roster, rng))
    }

    pub fn queue(&self) -> &[Archetype] {
        &self.queue
    }

    /// How many enemies have been released so far.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.queue.len() - self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.queue.len()
    }

    /// Try to release the next queued enemy.
    ///
    /// Nothing happens when the queue is spent or the live-enemy cap is
    /// reached. Otherwise a spawn point and facing are drawn at random and
    /// `is_safe` decides; a rejected attempt leaves the cursor in place so
    /// the same archetype is retried next tick.
    pub fn try_release<R, F>(
        &mut self,
        world: &mut World,
        rules: &Rules,
        rng: &mut R,
        is_safe: F,
    ) -> Option<EntityId>
    where
        R: Rng,
        F: Fn(&World, &Unit) -> bool,
    {
        let archetype = *self.queue.get(self.cursor)?;
        if world.enemy_count() >= rules.max_enemies {
            return None;
        }
        let &(x, y) = rules.spawn_points.choose(rng)?;
        let facing = Facing::from_index(rng.gen_range(0..4));
        let unit = Unit::enemy(archetype, facing, x, y);
        if !is_safe(world, &unit) {
            return None;
        }

        let id = world.add_unit(unit);
        self.cursor += 1;
        debug!(
            "spawned {:?} at ({}, {}), {} left in queue",
            archetype,
            x,
            y,
            self.remaining()
        );
        Some(id)
    }
}
