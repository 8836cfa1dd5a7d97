pub mod change_sink;
pub mod entity;
pub mod entity_store;
pub mod item_list;
pub mod lock;
pub mod store_config;
pub mod template;

cfg_if! {
    if #[cfg(feature = "server")] {
        pub mod player_defaults;
    }
}
