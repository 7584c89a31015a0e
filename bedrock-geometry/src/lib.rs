pub mod builder;
pub mod convert;
pub mod node;
pub mod printer;

pub use builder::{FORMAT_VERSION, GeometryDescription, ROOT_BONE, build_geometry};
pub use convert::{ConvertOptions, convert, convert_mesh, model_name_for};
pub use node::Node;
pub use printer::to_pretty_string;
