pub mod api;
pub mod config;
pub mod core;
pub mod middleware;
pub mod service;

#[cfg(test)]
pub(crate) mod test_helpers;
