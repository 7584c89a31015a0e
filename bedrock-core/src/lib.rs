pub mod error;
pub mod mesh;
pub mod obj;
pub mod transform;

pub use error::{LineFault, MeshError, MeshResult};
pub use mesh::{FaceElement, Group, Mesh, Normal, Polygon, Position, TexCoord};
pub use obj::{parse_obj, parse_obj_str};
pub use transform::{TransformOptions, apply_transforms};
