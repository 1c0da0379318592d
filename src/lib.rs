//! heartchat library exports for testing

pub mod core;
pub mod effects;
pub mod exchange;
pub mod tui;

#[cfg(test)]
pub mod test_support;
