//! Pawn identifiers and the pawn registry

use crate::LudoError;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Simple integer ID for pawns
///
/// IDs are dense and assigned in registration order, so they double as
/// indices into the registry. Pawns are never removed during a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PawnId(u32);

impl PawnId {
    pub fn new(id: u32) -> Self {
        PawnId(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PawnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Central storage for pawns
///
/// Backed by a Vec so iteration follows registration order. Scans that
/// take "the first match" (capture detection, deploys) are therefore
/// deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityStore<T> {
    entities: Vec<T>,
}

impl<T> EntityStore<T> {
    pub fn new() -> Self {
        EntityStore { entities: Vec::new() }
    }

    /// Append an entity and return its ID
    pub fn push(&mut self, entity: T) -> PawnId {
        let id = PawnId::new(self.entities.len() as u32);
        self.entities.push(entity);
        id
    }

    /// Get an entity by ID
    pub fn get(&self, id: PawnId) -> Result<&T> {
        self.entities
            .get(id.index())
            .ok_or(LudoError::PawnNotFound(id.as_u32()))
    }

    /// Get a mutable reference to an entity
    pub fn get_mut(&mut self, id: PawnId) -> Result<&mut T> {
        self.entities
            .get_mut(id.index())
            .ok_or(LudoError::PawnNotFound(id.as_u32()))
    }

    pub fn contains(&self, id: PawnId) -> bool {
        id.index() < self.entities.len()
    }

    /// Iterate over all entities with their IDs
    pub fn iter(&self) -> impl Iterator<Item = (PawnId, &T)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(idx, e)| (PawnId::new(idx as u32), e))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PawnId, &mut T)> {
        self.entities
            .iter_mut()
            .enumerate()
            .map(|(idx, e)| (PawnId::new(idx as u32), e))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
