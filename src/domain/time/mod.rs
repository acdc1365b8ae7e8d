//! Time domain module

mod duration;

pub use duration::{
    Duration, DEFAULT_NATIVE_TIMEOUT_MILLIS, DEFAULT_SIMULATE_INTERVAL_SECS, DEFAULT_TOAST_MILLIS,
};
