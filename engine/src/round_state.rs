use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::effect::Effect;
use crate::entity::Entity;
use crate::error::{Result, TrackerError};

/// One immutable snapshot of the encounter at a given round.
///
/// Every transition takes `&self` and hands back a fresh snapshot, so a value
/// pushed onto the undo history can never be reached by later mutations.
/// Free-standing effects live in `effects`, keyed by the round they end on;
/// afflictions bound to an entity live on that entity instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    pub round: u64,
    #[serde(default)]
    pub entities: IndexMap<String, Entity>,
    #[serde(default)]
    pub effects: BTreeMap<u64, Vec<Effect>>,
}

impl Default for RoundState {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundState {
    pub fn new() -> Self {
        Self {
            round: 1,
            entities: IndexMap::new(),
            effects: BTreeMap::new(),
        }
    }

    /// Expiry round for something lasting `num_rounds` from now. The extra
    /// round guarantees it survives at least one full step.
    fn end_round_after(&self, num_rounds: u64) -> u64 {
        self.round.saturating_add(num_rounds).saturating_add(1)
    }

    pub fn add_entity(&self, name: &str, hp: u64) -> Result<RoundState> {
        if self.entities.contains_key(name) {
            return Err(TrackerError::DuplicateEntity(name.to_string()));
        }
        let mut next = self.clone();
        next.entities.insert(name.to_string(), Entity::new(name, hp));
        debug!(entity = name, hp, "entity added");
        Ok(next)
    }

    pub fn delete_entity(&self, name: &str) -> Result<RoundState> {
        if !self.entities.contains_key(name) {
            return Err(TrackerError::UnknownEntity(name.to_string()));
        }
        let mut next = self.clone();
        next.entities.shift_remove(name);
        debug!(entity = name, "entity deleted");
        Ok(next)
    }

    /// Apply `amount` damage. The returned flag is true when the entity died
    /// and has been removed from the snapshot.
    pub fn damage_entity(&self, name: &str, amount: u64) -> Result<(RoundState, bool)> {
        let Some(entity) = self.entities.get(name) else {
            return Err(TrackerError::UnknownEntity(name.to_string()));
        };
        let mut damaged = entity.clone();
        damaged.damage = damaged.damage.saturating_add(amount);

        let mut next = self.clone();
        if damaged.is_dead() {
            next.entities.shift_remove(name);
            info!(entity = name, damage = damaged.damage, hp = damaged.hp, "entity died");
            return Ok((next, true));
        }
        debug!(entity = name, damage = damaged.damage, hp = damaged.hp, "entity damaged");
        next.entities.insert(name.to_string(), damaged);
        Ok((next, false))
    }

    pub fn afflict_entity(&self, name: &str, num_rounds: u64, description: &str) -> Result<RoundState> {
        let Some(entity) = self.entities.get(name) else {
            return Err(TrackerError::UnknownEntity(name.to_string()));
        };
        let end_round = self.end_round_after(num_rounds);
        let afflicted = entity.afflict(end_round, num_rounds, description);
        let mut next = self.clone();
        next.entities.insert(name.to_string(), afflicted);
        debug!(entity = name, end_round, "affliction added");
        Ok(next)
    }

    /// Schedule an effect that is not tied to any entity.
    pub fn add_effect(&self, num_rounds: u64, description: &str) -> RoundState {
        let end_round = self.end_round_after(num_rounds);
        let mut next = self.clone();
        next.effects
            .entry(end_round)
            .or_default()
            .push(Effect::new(description, num_rounds, end_round));
        debug!(end_round, "effect scheduled");
        next
    }

    /// Re-base the round counter to 1, shifting every expiry by the same
    /// amount so relative timing is unchanged.
    pub fn normalize(&self) -> RoundState {
        let offset = self.round.saturating_sub(1);
        let entities = self
            .entities
            .iter()
            .map(|(name, entity)| (name.clone(), entity.normalize(offset)))
            .collect();

        let mut effects: BTreeMap<u64, Vec<Effect>> = BTreeMap::new();
        for effect in self.effects.values().flatten() {
            let normalized = effect.normalize(offset);
            effects.entry(normalized.end_round).or_default().push(normalized);
        }

        debug!(from_round = self.round, offset, "round counter normalized");
        RoundState {
            round: 1,
            entities,
            effects,
        }
    }

    /// Advance by `num_rounds`, dropping everything that ends at or before the
    /// new round. Entity messages come first, then free-standing effects.
    pub fn step(&self, num_rounds: u64) -> (RoundState, Vec<String>) {
        let round = self.round.saturating_add(num_rounds);
        let mut messages = Vec::new();

        let mut entities = IndexMap::with_capacity(self.entities.len());
        for (name, entity) in &self.entities {
            let (stepped, msgs) = entity.step(round);
            entities.insert(name.clone(), stepped);
            messages.extend(msgs);
        }

        let mut effects: BTreeMap<u64, Vec<Effect>> = BTreeMap::new();
        for (&end_round, scheduled) in &self.effects {
            for effect in scheduled {
                let (expired, msg) = effect.step(round);
                if expired {
                    messages.push(msg);
                } else {
                    effects.entry(end_round).or_default().push(effect.clone());
                }
            }
        }

        for msg in &messages {
            info!(round, "{}", msg);
        }
        debug!(from_round = self.round, round, expired = messages.len(), "stepped");
        (
            RoundState {
                round,
                entities,
                effects,
            },
            messages,
        )
    }

    /// All free-standing effects, in expiry order.
    pub fn scheduled_effects(&self) -> impl Iterator<Item = &Effect> {
        self.effects.values().flatten()
    }
}

impl fmt::Display for RoundState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-Round: {}-", self.round)?;
        write!(f, "Entities:")?;
        let mut entity_lines: Vec<String> =
            self.entities.values().map(|e| format!(" {}", e)).collect();
        entity_lines.sort();
        for line in entity_lines {
            write!(f, "\n{}", line)?;
        }
        write!(f, "\nEffects:")?;
        let mut effect_lines: Vec<String> =
            self.scheduled_effects().map(|e| format!(" {}", e)).collect();
        effect_lines.sort();
        for line in effect_lines {
            write!(f, "\n{}", line)?;
        }
        Ok(())
    }
}
