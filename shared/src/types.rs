use vault_serde::SerdeErr;

/// Which game the mod is attached to. Supplied by process bootstrap before
/// the store is used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Game {
    Fallout3 = 0x01,
    NewVegas = 0x02,
}

impl TryFrom<u8> for Game {
    type Error = SerdeErr;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(Game::Fallout3),
            0x02 => Ok(Game::NewVegas),
            _ => Err(SerdeErr::InvalidTag {
                what: "game",
                value: value as u64,
            }),
        }
    }
}

/// Which side of the connection a store lives on. Each side assigns
/// NetworkIds from its own half of the id space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostType {
    Server,
    Client,
}

impl HostType {
    pub fn invert(self) -> Self {
        match self {
            HostType::Server => HostType::Client,
            HostType::Client => HostType::Server,
        }
    }
}
