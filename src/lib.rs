//! Pageflip library exports for testing

pub mod core;
pub mod fetch;
pub mod overlay;
pub mod tui;

#[cfg(test)]
pub mod test_support;
