#![forbid(unsafe_code)]

#[cfg(feature = "global")]
pub mod global;
#[cfg(feature = "http")]
pub mod http;
#[cfg(feature = "logging")]
pub mod logging;
#[cfg(feature = "signal")]
pub mod signal;
