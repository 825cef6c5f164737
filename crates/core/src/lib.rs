#![forbid(unsafe_code)]

pub mod model;
pub mod navigation;
pub mod session;
pub mod shuffle;

pub use session::{ReviewSession, SessionAction};
pub use shuffle::shuffle;
