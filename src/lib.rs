//! Eased scrolling of a viewport towards an element.
//!
//! [`animation`] holds the easing math, [`scroll`] drives it one frame at a
//! time against anything implementing [`viewport::Viewport`], and [`page`]
//! provides an in-memory document to scroll.

pub mod animation;
pub mod config;
pub mod page;
pub mod scroll;
pub mod viewport;
