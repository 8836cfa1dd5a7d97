use std::collections::HashSet;

use crate::{types::Game, world::store_config::StoreConfig};

/// Respawn delay applied to new players unless configured otherwise, in milliseconds.
pub const DEFAULT_PLAYER_RESPAWN: u32 = 8000;

/// An item every new player starts with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DefaultItem {
    pub base_id: u32,
    pub count: u32,
    pub condition: f64,
    pub equipped: bool,
    pub silent: bool,
    pub stick: bool,
}

/// The Pip-Boy and its glove, worn from the start in both games.
pub const DEFAULT_PLAYER_ITEMS: [DefaultItem; 2] = [
    DefaultItem {
        base_id: 0x0001_5038,
        count: 1,
        condition: 100.0,
        equipped: true,
        silent: true,
        stick: true,
    },
    DefaultItem {
        base_id: 0x0002_5B83,
        count: 1,
        condition: 100.0,
        equipped: true,
        silent: true,
        stick: true,
    },
];

const FALLOUT3_ACTOR_VALUES: [(u8, f64); 11] = [
    (0x05, 5.0), // strength
    (0x06, 5.0), // perception
    (0x07, 5.0), // endurance
    (0x08, 5.0), // charisma
    (0x09, 5.0), // intelligence
    (0x0A, 5.0), // agility
    (0x0B, 5.0), // luck
    (0x0C, 75.0), // action points
    (0x0D, 200.0), // carry weight
    (0x0E, 5.0), // critical chance
    (0x10, 200.0), // health
];

const NEW_VEGAS_ACTOR_VALUES: [(u8, f64); 11] = [
    (0x05, 5.0),
    (0x06, 5.0),
    (0x07, 5.0),
    (0x08, 5.0),
    (0x09, 5.0),
    (0x0A, 5.0),
    (0x0B, 5.0),
    (0x0C, 80.0),
    (0x0D, 200.0),
    (0x0E, 5.0),
    (0x10, 200.0),
];

/// Actor values a new player starts with, by actor value index.
pub fn default_actor_values(game: Game) -> &'static [(u8, f64)] {
    match game {
        Game::Fallout3 => &FALLOUT3_ACTOR_VALUES,
        Game::NewVegas => &NEW_VEGAS_ACTOR_VALUES,
    }
}

/// Process-wide player settings kept by the server's store, independent of
/// any single Player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerDefaults {
    respawn: u32,
    spawn_cell: u32,
    base_ids: HashSet<u32>,
}

impl PlayerDefaults {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            respawn: config.player_respawn,
            spawn_cell: config.player_spawn_cell,
            base_ids: HashSet::new(),
        }
    }

    pub fn respawn(&self) -> u32 {
        self.respawn
    }

    pub fn spawn_cell(&self) -> u32 {
        self.spawn_cell
    }

    /// Every base id a player has been created with or rebased to.
    pub fn base_ids(&self) -> &HashSet<u32> {
        &self.base_ids
    }

    pub fn set_respawn(&mut self, respawn: u32) {
        self.respawn = respawn;
    }

    pub fn set_spawn_cell(&mut self, cell: u32) {
        self.spawn_cell = cell;
    }

    pub(crate) fn register_base(&mut self, base_id: u32) {
        self.base_ids.insert(base_id);
    }
}
