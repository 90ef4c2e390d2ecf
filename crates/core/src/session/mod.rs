//! Session lifecycle

pub mod controller;
pub mod ports;
pub mod state;

pub use controller::SessionController;
pub use ports::{Navigator, ResponseCachePort};
pub use state::{InvalidTransition, SessionEvent, SessionMachine};
