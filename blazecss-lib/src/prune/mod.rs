//! Liveness analysis over the stylesheet: rule filtering, dependency
//! closure for fonts and animations, and cleanup of emptied containers.

pub mod animations;
pub mod cleanup;
pub mod fonts;
pub mod oracle;
pub mod rule_filter;
