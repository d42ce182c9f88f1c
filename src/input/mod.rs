pub mod command;

pub use command::{map_key, Command};
