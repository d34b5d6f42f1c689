pub mod config;
pub mod identity;
pub mod room;

pub use config::{handle_config_command, ConfigCommands};
pub use identity::{handle_identity_command, IdentityCommands};
pub use room::{handle_room_command, RoomCommands};
