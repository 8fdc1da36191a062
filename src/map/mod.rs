//! Map rendering.
//!
//! This module provides the OpenStreetMap tile source, the static hazard
//! overlays, the fly-to animation, and the map view that ties them to the
//! location selector.

pub mod fly;
pub mod overlays;
pub mod tiles;
pub mod view;

pub use view::MapView;
