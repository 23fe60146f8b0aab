use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, Result};

/// Name of the group every mask starts in.
pub const DEFAULT_COLLISION_GROUP: &str = "default";

/// Identifier of a collision group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub u16);

impl GroupId {
    pub const DEFAULT: GroupId = GroupId(0);
}

/// Named collision groups and a symmetric matrix of which groups collide.
#[derive(Debug, Clone)]
pub struct CollisionGroups {
    names: Vec<String>,
    ids: HashMap<String, GroupId>,
    // Row-major; grows by one row and column per group.
    matrix: Vec<Vec<bool>>,
}

impl Default for CollisionGroups {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionGroups {
    pub fn new() -> Self {
        let mut groups = Self {
            names: Vec::new(),
            ids: HashMap::new(),
            matrix: Vec::new(),
        };
        groups.push_group(DEFAULT_COLLISION_GROUP.to_owned());
        groups
    }

    /// Creates a group that collides with every existing group.
    pub fn create_group(&mut self, name: &str) -> Result<GroupId> {
        if self.ids.contains_key(name) {
            return Err(PhysicsError::DuplicateGroup(name.to_owned()));
        }

        let id = self.push_group(name.to_owned());
        debug!("Created collision group '{name}' with id {}", id.0);
        Ok(id)
    }

    fn push_group(&mut self, name: String) -> GroupId {
        let id = GroupId(self.names.len() as u16);
        for row in &mut self.matrix {
            row.push(true);
        }
        self.matrix.push(vec![true; self.names.len() + 1]);
        self.ids.insert(name.clone(), id);
        self.names.push(name);
        id
    }

    pub fn set_collidable(&mut self, group_a: &str, group_b: &str, collidable: bool) -> Result<()> {
        let a = self.require(group_a)?;
        let b = self.require(group_b)?;

        self.matrix[a.0 as usize][b.0 as usize] = collidable;
        self.matrix[b.0 as usize][a.0 as usize] = collidable;
        debug!(
            "Collision group '{group_a}' is {} collidable with '{group_b}'",
            if collidable { "now" } else { "no longer" }
        );
        Ok(())
    }

    /// Unknown ids are treated as non-colliding.
    pub fn is_collidable(&self, a: GroupId, b: GroupId) -> bool {
        self.matrix
            .get(a.0 as usize)
            .and_then(|row| row.get(b.0 as usize))
            .copied()
            .unwrap_or(false)
    }

    pub fn group_id(&self, name: &str) -> Option<GroupId> {
        self.ids.get(name).copied()
    }

    pub fn group_name(&self, id: GroupId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }

    pub fn contains(&self, id: GroupId) -> bool {
        (id.0 as usize) < self.names.len()
    }

    pub fn require(&self, name: &str) -> Result<GroupId> {
        self.group_id(name)
            .ok_or_else(|| PhysicsError::UnknownGroup(name.to_owned()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_group_exists_and_collides_with_itself() {
        let groups = CollisionGroups::new();
        assert_eq!(groups.group_id(DEFAULT_COLLISION_GROUP), Some(GroupId::DEFAULT));
        assert!(groups.is_collidable(GroupId::DEFAULT, GroupId::DEFAULT));
    }

    #[test]
    fn new_groups_collide_with_everything_until_disabled() {
        let mut groups = CollisionGroups::new();
        let players = groups.create_group("players").expect("fresh group");
        let pickups = groups.create_group("pickups").expect("fresh group");

        assert!(groups.is_collidable(players, pickups));
        assert!(groups.is_collidable(pickups, GroupId::DEFAULT));

        groups
            .set_collidable("players", "pickups", false)
            .expect("both groups exist");
        assert!(!groups.is_collidable(players, pickups));
        assert!(!groups.is_collidable(pickups, players));
        assert!(groups.is_collidable(players, players));
    }

    #[test]
    fn duplicate_and_unknown_groups_are_errors() {
        let mut groups = CollisionGroups::new();
        groups.create_group("walls").expect("fresh group");

        assert_eq!(
            groups.create_group("walls"),
            Err(PhysicsError::DuplicateGroup("walls".into()))
        );
        assert_eq!(
            groups.set_collidable("walls", "ghosts", false),
            Err(PhysicsError::UnknownGroup("ghosts".into()))
        );
        assert!(!groups.is_collidable(GroupId(0), GroupId(42)));
    }

    #[test]
    fn names_round_trip_through_ids() {
        let mut groups = CollisionGroups::new();
        let id = groups.create_group("enemies").expect("fresh group");
        assert_eq!(groups.group_name(id), Some("enemies"));
        assert_eq!(groups.len(), 2);
    }
}
