//! Testing utilities and harness for Lazyview

pub mod test_renderer;
pub mod test_rule;

pub use test_renderer::*;
pub use test_rule::*;
