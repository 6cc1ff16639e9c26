pub mod control;
pub use control::{AdjustableIntControl, IntControl, Listener};

pub mod mcu;
pub use mcu::{Panel, SharedPanel};

pub mod midi;
