use crate::node::Node;
use bedrock_core::{Group, Mesh, Polygon};
use log::debug;
use std::collections::HashMap;

pub const FORMAT_VERSION: &str = "1.8.0";
pub const ROOT_BONE: &str = "root";

/// Header values of the emitted geometry.
///
/// Texture size and visible bounds are placeholders; they are not derived
/// from the mesh or its textures.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryDescription {
    pub format_version: String,
    pub texture_width: u32,
    pub texture_height: u32,
    pub visible_bounds_width: u32,
    pub visible_bounds_height: u32,
}

impl Default for GeometryDescription {
    fn default() -> Self {
        Self {
            format_version: FORMAT_VERSION.to_string(),
            texture_width: 1,
            texture_height: 1,
            visible_bounds_width: 1,
            visible_bounds_height: 1,
        }
    }
}

/// Build the geometry document: a `root` bone followed by one bone per group.
pub fn build_geometry(mesh: &Mesh, name: &str, description: &GeometryDescription) -> Node {
    let mut bones = Vec::with_capacity(mesh.groups.len() + 1);
    bones.push(Node::object([("name", Node::from(ROOT_BONE))]));
    bones.extend(mesh.groups.iter().map(|group| build_bone(mesh, group)));

    let geometry = Node::object([
        ("texturewidth", Node::from(description.texture_width)),
        ("textureheight", Node::from(description.texture_height)),
        ("visible_bounds_width", Node::from(description.visible_bounds_width)),
        ("visible_bounds_height", Node::from(description.visible_bounds_height)),
        ("bones", Node::Array(bones)),
    ]);

    Node::object([
        ("format_version".to_string(), Node::from(description.format_version.as_str())),
        (format!("geometry.{name}"), geometry),
    ])
}

fn build_bone(mesh: &Mesh, group: &Group) -> Node {
    let mut poly_mesh = PolyMeshBuilder::default();
    for polygon in &group.polygons {
        poly_mesh.add_polygon(mesh, polygon);
    }
    debug!(
        "Bone {}: {} polys, {} positions, {} normals, {} uvs",
        group.name,
        poly_mesh.polys.len(),
        poly_mesh.positions.len(),
        poly_mesh.normals.len(),
        poly_mesh.uvs.len()
    );

    Node::object([
        ("name", Node::from(group.name.as_str())),
        ("parent", Node::from(ROOT_BONE)),
        ("pivot", Node::integers(&[0, 0, 0])),
        ("poly_mesh", poly_mesh.into_node()),
    ])
}

/// Per-bone attribute tables. Entries are shared by value, so two source
/// indices holding the same coordinates map to one local slot.
#[derive(Default)]
struct PolyMeshBuilder {
    positions: AttributeTable<3>,
    normals: AttributeTable<3>,
    uvs: AttributeTable<2>,
    polys: Vec<Node>,
}

impl PolyMeshBuilder {
    fn add_polygon(&mut self, mesh: &Mesh, polygon: &Polygon) {
        let mut face_normal = None;
        let mut corners = Vec::with_capacity(4);

        for element in &polygon.elements {
            let position = self
                .positions
                .intern(Some(element.position), mesh.position(element.position).to_array());
            let uv = self
                .uvs
                .intern(Some(element.tex_coord), mesh.tex_coord(element.tex_coord).to_array());
            let normal = match element.normal {
                Some(index) => self.normals.intern(Some(index), mesh.normal(index).to_array()),
                None => {
                    let normal = *face_normal.get_or_insert_with(|| mesh.face_normal(polygon));
                    self.normals.intern(None, normal.to_array())
                }
            };
            corners.push([position, normal, uv]);
        }

        // Bedrock polys are always quads; triangles repeat their second corner.
        if corners.len() == 3 {
            corners.push(corners[1]);
        }

        self.polys.push(Node::Array(
            corners
                .iter()
                .map(|corner| Node::Array(corner.iter().map(|&i| Node::Integer(i as i64)).collect()))
                .collect(),
        ));
    }

    fn into_node(self) -> Node {
        Node::object([
            ("positions", self.positions.into_node()),
            ("normals", self.normals.into_node()),
            ("uvs", self.uvs.into_node()),
            ("polys", Node::Array(self.polys)),
        ])
    }
}

/// Value-deduplicated table of float tuples.
///
/// A source index that was already interned maps straight to its slot.
/// Otherwise lookups use the components' bit patterns with `-0.0` folded
/// onto `0.0`, which is exactly float `==`. Tuples containing NaN never
/// compare equal by value, so only a repeated source index reuses their slot.
struct AttributeTable<const N: usize> {
    values: Vec<[f32; N]>,
    by_source: HashMap<usize, usize>,
    by_value: HashMap<[u32; N], usize>,
}

impl<const N: usize> Default for AttributeTable<N> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            by_source: HashMap::new(),
            by_value: HashMap::new(),
        }
    }
}

impl<const N: usize> AttributeTable<N> {
    /// Local slot for `value`, read from source index `source` when it has one.
    fn intern(&mut self, source: Option<usize>, value: [f32; N]) -> usize {
        if let Some(slot) = source.and_then(|index| self.by_source.get(&index).copied()) {
            return slot;
        }
        let key = canonical_key(value);
        let slot = match key.as_ref().and_then(|k| self.by_value.get(k).copied()) {
            Some(slot) => slot,
            None => {
                let slot = self.values.len();
                self.values.push(value);
                if let Some(key) = key {
                    self.by_value.insert(key, slot);
                }
                slot
            }
        };
        if let Some(index) = source {
            self.by_source.insert(index, slot);
        }
        slot
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn into_node(self) -> Node {
        Node::Array(self.values.iter().map(|v| Node::floats(v)).collect())
    }
}

fn canonical_key<const N: usize>(value: [f32; N]) -> Option<[u32; N]> {
    if value.iter().any(|c| c.is_nan()) {
        return None;
    }
    Some(value.map(|c| if c == 0.0 { 0 } else { c.to_bits() }))
}
