//! Joins characters to their origin planet.
//!
//! Resolution never fails: a character without an origin reference, or with
//! one that points outside the fetched planet list, is paired with
//! [`Planet::unknown`].

use crate::models::{Character, Planet};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;

static UNKNOWN_PLANET: LazyLock<Planet> = LazyLock::new(Planet::unknown);

/// Planet id to planet, built once per load cycle.
#[derive(Debug, Clone, Default)]
pub struct PlanetLookup {
    by_id: HashMap<i32, Planet>,
}

impl PlanetLookup {
    /// Duplicate ids keep the last planet seen.
    #[must_use]
    pub fn new<'a>(planets: impl IntoIterator<Item = &'a Planet>) -> Self {
        let by_id = planets
            .into_iter()
            .map(|planet| (planet.id, planet.clone()))
            .collect();
        Self { by_id }
    }

    #[must_use]
    pub fn get(&self, id: i32) -> Option<&Planet> {
        self.by_id.get(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// The fetched planet the character's origin points at, if any.
    #[must_use]
    pub fn find_origin(&self, character: &Character) -> Option<&Planet> {
        character
            .origin_planet_id
            .and_then(|id| self.by_id.get(&id))
    }

    /// The character's effective origin planet.
    #[must_use]
    pub fn resolve(&self, character: &Character) -> &Planet {
        self.find_origin(character).unwrap_or(&*UNKNOWN_PLANET)
    }
}

/// A character paired with its resolved origin planet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    pub character: Character,
    pub planet: Planet,
    /// False when `planet` is the sentinel stand-in.
    pub resolved: bool,
}

impl RosterEntry {
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.resolved
    }
}

/// Pairs every character with its origin planet, preserving input order.
#[must_use]
pub fn join(characters: &[Character], lookup: &PlanetLookup) -> Vec<RosterEntry> {
    characters
        .iter()
        .map(|character| match lookup.find_origin(character) {
            Some(planet) => RosterEntry {
                character: character.clone(),
                planet: planet.clone(),
                resolved: true,
            },
            None => RosterEntry {
                character: character.clone(),
                planet: UNKNOWN_PLANET.clone(),
                resolved: false,
            },
        })
        .collect()
}

/// Render-ready snapshot of one load cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Roster {
    pub entries: Vec<RosterEntry>,
    pub planets: Vec<Planet>,
}

impl Roster {
    #[must_use]
    pub fn build(characters: &[Character], planets: &[Planet]) -> Self {
        let lookup = PlanetLookup::new(planets);
        Self {
            entries: join(characters, &lookup),
            planets: planets.to_vec(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Characters whose origin resolved to `planet_id`, in roster order.
    pub fn residents(&self, planet_id: i32) -> impl Iterator<Item = &Character> {
        self.entries
            .iter()
            .filter(move |entry| entry.resolved && entry.planet.id == planet_id)
            .map(|entry| &entry.character)
    }

    /// Entries that fell back to the unknown planet.
    pub fn unresolved(&self) -> impl Iterator<Item = &RosterEntry> {
        self.entries.iter().filter(|entry| !entry.is_resolved())
    }
}
