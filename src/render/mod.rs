//! Szenen-Schnittstelle und engine-unabhängige Referenz-Szene.

pub mod adapter;
pub mod geometry;
pub mod picking;
pub mod retained;

pub use adapter::{
    EdgeDesc, GridLineDesc, LayerDesc, LayerHandle, NodeDesc, PickResult, PrimitiveHandle,
    SceneError, SceneGraphAdapter, SceneHandle,
};
pub use geometry::{build_grid, build_grid_line, LineGeometry};
pub use retained::{DrawItem, Geometry, LayerState, PrimitiveState, RetainedScene};
