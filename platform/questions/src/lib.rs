#![forbid(unsafe_code)]

pub mod api;
pub mod config;
pub mod database;
pub mod global;
pub mod projection;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;
