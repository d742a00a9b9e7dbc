mod face;
mod grid_index;
mod handles;
mod line_side_info;
mod mesh;
pub(crate) mod mesh_operations;
pub(crate) mod removal;
mod vertex_set;

pub(crate) mod math;

pub use grid_index::GridIndex;
pub use handles::FixedFaceHandle;
pub use line_side_info::LineSideInfo;
pub use math::{classify, Circle, EPS, VORONOI_RAY_LENGTH_FACTOR};
pub(crate) use mesh::Mesh;
pub(crate) use vertex_set::VertexSet;
