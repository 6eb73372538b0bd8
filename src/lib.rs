pub mod config;
pub mod mac;
pub mod server;
pub mod trigger;
pub mod wol;
