use std::fmt;

use serde::{Deserialize, Serialize};

use crate::effect::Effect;

/// A named combatant. Removed from its snapshot once `damage >= hp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub hp: u64,
    /// Cumulative damage taken.
    pub damage: u64,
    #[serde(default)]
    pub afflictions: Vec<Effect>,
}

impl Entity {
    pub fn new(name: impl Into<String>, hp: u64) -> Self {
        Self {
            name: name.into(),
            hp,
            damage: 0,
            afflictions: Vec::new(),
        }
    }

    pub fn is_dead(&self) -> bool {
        self.damage >= self.hp
    }

    /// Advance to `round`: afflictions that are over are dropped and reported
    /// in insertion order, the rest carry over unchanged.
    pub fn step(&self, round: u64) -> (Entity, Vec<String>) {
        let mut messages = Vec::new();
        let mut afflictions = Vec::with_capacity(self.afflictions.len());
        for affliction in &self.afflictions {
            let (expired, msg) = affliction.step(round);
            if expired {
                messages.push(msg);
            } else {
                afflictions.push(affliction.clone());
            }
        }
        let entity = Entity {
            name: self.name.clone(),
            hp: self.hp,
            damage: self.damage,
            afflictions,
        };
        (entity, messages)
    }

    pub fn normalize(&self, offset: u64) -> Entity {
        Entity {
            name: self.name.clone(),
            hp: self.hp,
            damage: self.damage,
            afflictions: self.afflictions.iter().map(|a| a.normalize(offset)).collect(),
        }
    }

    /// Attach an affliction ending at `until`. The entity name is appended to
    /// the description so expiry messages say who it belonged to.
    pub fn afflict(&self, until: u64, duration: u64, description: &str) -> Entity {
        let mut entity = self.clone();
        entity.afflictions.push(Effect::new(
            format!("{} ({})", description, self.name),
            duration,
            until,
        ));
        entity
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | HP:{}, Damage:{}, Afflictions:",
            self.name, self.hp, self.damage
        )?;
        let mut lines: Vec<String> = self
            .afflictions
            .iter()
            .map(|a| format!("  {}", a))
            .collect();
        lines.sort();
        for line in lines {
            write!(f, "\n{}", line)?;
        }
        Ok(())
    }
}
