//! BlazeCSS: removes the CSS a concrete HTML document does not use.
//!
//! The HTML is parsed with html5ever into a small DOM, the CSS with
//! lightningcss. Style rules whose selectors match nothing are dropped, then
//! `@keyframes` and `@font-face` blocks nothing refers to anymore, then
//! `@media` blocks left empty.

pub mod blaze_generate;
pub mod config;
pub mod dom;
pub mod error;
pub mod parser;
pub mod prune;
pub mod style;

pub use blaze_generate::{generate, reduce_stylesheet, Generated, PruneReport};
pub use config::{FontMatchPolicy, ReduceConfig};
pub use error::BlazeError;
