//! Projection collaborators and PNG raster output for planetgen.

mod projection;
mod render;

pub use projection::{Equirectangular, Orthographic, Projection, Stereographic};
pub use render::render_to_image;
