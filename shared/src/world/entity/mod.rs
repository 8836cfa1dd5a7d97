pub mod actor;
pub mod container;
pub mod entity;
pub mod error;
pub mod item;
pub mod network_id;
pub mod object;
pub mod player;
pub mod reference;
pub mod window;
