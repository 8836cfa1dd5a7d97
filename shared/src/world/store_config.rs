use crate::types::{Game, HostType};

cfg_if! {
    if #[cfg(feature = "server")] {
        use crate::world::player_defaults::DEFAULT_PLAYER_RESPAWN;
    }
}

/// Contains Config properties which will be used by the EntityStore
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// The game variant selected at bootstrap
    pub game: Game,
    /// The side this store runs on; selects the half of the id space used
    /// for locally created entities
    pub host_type: HostType,
    /// Initial process-wide respawn delay for players, in milliseconds
    #[cfg(feature = "server")]
    pub player_respawn: u32,
    /// Initial process-wide spawn cell for players
    #[cfg(feature = "server")]
    pub player_spawn_cell: u32,
}

impl StoreConfig {
    pub fn new(game: Game) -> Self {
        Self {
            game,
            ..Self::default()
        }
    }

    /// Config for a client-side store.
    pub fn client(game: Game) -> Self {
        Self {
            game,
            host_type: HostType::Client,
            ..Self::default()
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            game: Game::NewVegas,
            host_type: HostType::Server,
            #[cfg(feature = "server")]
            player_respawn: DEFAULT_PLAYER_RESPAWN,
            #[cfg(feature = "server")]
            player_spawn_cell: 0,
        }
    }
}
