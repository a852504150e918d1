//! The items of a CPython contributor box and the tooling around them.
//!
//! The `devbox` binary builds on this library:
//! - [`catalog::default_catalog`] lists every item in creation order
//! - [`items`] holds the items that do more than clone or download
//! - [`coverage`] and [`regrtest`] drive a built interpreter

pub mod catalog;
pub mod coverage;
pub mod items;
pub mod regrtest;

pub use catalog::default_catalog;
