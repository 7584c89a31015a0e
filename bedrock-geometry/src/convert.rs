use crate::builder::{GeometryDescription, build_geometry};
use crate::node::Node;
use crate::printer::to_pretty_string;
use bedrock_core::{Mesh, MeshResult, TransformOptions, apply_transforms, parse_obj_str};
use log::info;
use std::path::Path;
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub transform: TransformOptions,
    pub description: GeometryDescription,
}

/// Transform a parsed mesh and build its geometry document.
pub fn convert_mesh(mut mesh: Mesh, name: &str, options: &ConvertOptions) -> Node {
    apply_transforms(&mut mesh, &options.transform);
    build_geometry(&mesh, name, &options.description)
}

/// Full pipeline: parse OBJ source, transform, build and pretty-print.
///
/// Nothing is produced if any line fails to parse.
pub fn convert(source: &str, name: &str, options: &ConvertOptions) -> MeshResult<String> {
    let start = Instant::now();
    let mesh = parse_obj_str(source)?;
    info!(
        "Parsed {} groups, {} polygons in {:.2}ms",
        mesh.groups.len(),
        mesh.polygon_count(),
        start.elapsed().as_secs_f32() * 1000.0
    );

    let build_start = Instant::now();
    let root = convert_mesh(mesh, name, options);
    let text = to_pretty_string(&root);
    info!(
        "Built geometry.{} ({} bytes) in {:.2}ms",
        name,
        text.len(),
        build_start.elapsed().as_secs_f32() * 1000.0
    );
    Ok(text)
}

/// Model name used when none is given: the input's file name.
pub fn model_name_for(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
