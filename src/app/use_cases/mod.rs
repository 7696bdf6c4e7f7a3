//! Use-Cases der Application-Layer-Orchestrierung.

pub mod camera;
pub mod labels;
pub mod layers;
pub mod map_io;
pub mod selection;
pub mod viewport;
