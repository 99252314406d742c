pub mod atomic;
pub mod autosave;
pub mod board_io;
pub mod config_io;
pub mod lock;
pub mod logging;
pub mod paths;
pub mod session;
