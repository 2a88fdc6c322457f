//! OBS WebSocket controller

mod controller;

pub use controller::*;
