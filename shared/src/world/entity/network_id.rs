use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use vault_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::types::HostType;

// ids assigned by clients have the top bit set
const CLIENT_ID_BIT: u64 = 1 << 63;

// NetworkId
/// Process-wide handle for an entity. The only reference external code may
/// hold across calls; `0` is reserved for "no entity".
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord, Default)]
pub struct NetworkId(u64);

impl NetworkId {
    pub const NONE: NetworkId = NetworkId(0);

    pub fn from_u64(value: u64) -> Self {
        NetworkId(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }

    pub fn is_none(&self) -> bool {
        self.0 == 0
    }

    pub fn is_some(&self) -> bool {
        self.0 != 0
    }

    /// The side that assigned this id.
    pub fn host_type(&self) -> HostType {
        if self.0 & CLIENT_ID_BIT == 0 {
            HostType::Server
        } else {
            HostType::Client
        }
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serde for NetworkId {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.0.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(NetworkId(u64::de(reader)?))
    }

    fn bit_length(&self) -> u32 {
        64
    }
}

// NetworkIdGenerator
/// Hands out strictly increasing ids from the half of the id space owned by
/// one [`HostType`], so an id is never reused for the lifetime of the
/// process and never collides with an id assigned by the other side.
pub struct NetworkIdGenerator {
    host_type: HostType,
    next: AtomicU64,
}

impl NetworkIdGenerator {
    pub fn new(host_type: HostType) -> Self {
        let first = match host_type {
            HostType::Server => 1,
            HostType::Client => CLIENT_ID_BIT,
        };
        Self {
            host_type,
            next: AtomicU64::new(first),
        }
    }

    pub fn host_type(&self) -> HostType {
        self.host_type
    }

    pub fn generate(&self) -> NetworkId {
        let value = self.next.fetch_add(1, Ordering::Relaxed);
        let id = NetworkId(value);
        if value == u64::MAX || id.host_type() != self.host_type {
            panic!("NetworkIdGenerator exhausted the {:?} id space", self.host_type);
        }
        id
    }

    /// Ensures ids generated from now on are greater than `id`, if `id`
    /// belongs to this generator's half of the id space.
    pub fn reserve_past(&self, id: NetworkId) {
        if id.host_type() == self.host_type {
            self.next.fetch_max(id.0.saturating_add(1), Ordering::Relaxed);
        }
    }
}
