//! Configuration storage infrastructure module

mod xdg;

pub use xdg::XdgConfigStore;
