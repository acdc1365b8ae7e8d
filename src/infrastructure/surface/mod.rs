//! Toast surface infrastructure module

mod null;
mod terminal;

pub use null::NullSurface;
pub use terminal::TerminalSurface;
