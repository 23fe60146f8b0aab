use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::contact::{BodyPair, CollisionResult};
use crate::core::types::BodyId;

/// Begin/end notification for a pair of bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionEvent {
    Started(BodyPair),
    Ended(BodyPair),
}

/// Tracks which pairs are touching across steps.
///
/// Only bodies re-tested this step can end a contact: a pair where neither
/// body was updated is assumed to still be touching.
#[derive(Debug, Default, Clone)]
pub struct ContactTracker {
    active: HashSet<BodyPair>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(
        &mut self,
        updated: &HashSet<BodyId>,
        results: &[CollisionResult],
    ) -> Vec<CollisionEvent> {
        let current: HashSet<BodyPair> = results.iter().map(|result| result.pair).collect();
        let mut events = Vec::new();

        // Walk `results` rather than the set so event order follows detection order.
        let mut seen = HashSet::with_capacity(current.len());
        for result in results {
            if seen.insert(result.pair) && !self.active.contains(&result.pair) {
                events.push(CollisionEvent::Started(result.pair));
            }
        }

        let mut ended: Vec<BodyPair> = self
            .active
            .iter()
            .filter(|pair| !current.contains(pair))
            .filter(|pair| updated.contains(&pair.first()) || updated.contains(&pair.second()))
            .copied()
            .collect();
        ended.sort();

        for pair in ended {
            self.active.remove(&pair);
            events.push(CollisionEvent::Ended(pair));
        }

        self.active.extend(current);
        events
    }

    /// Ends every contact involving `id`, e.g. when the body is destroyed.
    pub fn forget(&mut self, id: BodyId) -> Vec<CollisionEvent> {
        let mut ended: Vec<BodyPair> = self
            .active
            .iter()
            .filter(|pair| pair.contains(id))
            .copied()
            .collect();
        ended.sort();

        ended
            .into_iter()
            .map(|pair| {
                self.active.remove(&pair);
                CollisionEvent::Ended(pair)
            })
            .collect()
    }

    pub fn is_active(&self, pair: BodyPair) -> bool {
        self.active.contains(&pair)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}
