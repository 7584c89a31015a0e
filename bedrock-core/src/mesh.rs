use glam::{Vec2, Vec3};

/// Vertex position. Compared by exact component equality.
pub type Position = Vec3;
/// Vertex normal, either read from the file or synthesized from a face.
pub type Normal = Vec3;
/// Texture coordinate `(u, v)`.
pub type TexCoord = Vec2;

/// Name of the group that collects faces seen before any `g`/`o` marker.
pub const DEFAULT_GROUP_NAME: &str = "unnamed";

/// One corner of a face. All indices are 1-based into the mesh tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceElement {
    pub position: usize,
    pub tex_coord: usize,
    pub normal: Option<usize>,
}

impl FaceElement {
    pub fn new(position: usize, tex_coord: usize, normal: Option<usize>) -> Self {
        Self {
            position,
            tex_coord,
            normal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub elements: Vec<FaceElement>,
}

impl Polygon {
    pub fn new(elements: Vec<FaceElement>) -> Self {
        Self { elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn is_triangle(&self) -> bool {
        self.elements.len() == 3
    }

    /// Turns this triangle into a quad by splicing in the corner of the
    /// adjacent triangle. The reversal restores a consistent winding.
    pub(crate) fn repair_to_quad(&mut self, element: FaceElement) {
        self.elements.insert(2, element);
        self.elements.reverse();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub name: String,
    pub polygons: Vec<Polygon>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            polygons: Vec::new(),
        }
    }
}

/// Index-referencing mesh as read from an OBJ file.
///
/// Attribute tables are global and kept in file order; groups only hold
/// polygons whose elements point into those tables.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub positions: Vec<Position>,
    pub normals: Vec<Normal>,
    pub tex_coords: Vec<TexCoord>,
    pub groups: Vec<Group>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self, index: usize) -> Position {
        self.positions[index - 1]
    }

    pub fn normal(&self, index: usize) -> Normal {
        self.normals[index - 1]
    }

    pub fn tex_coord(&self, index: usize) -> TexCoord {
        self.tex_coords[index - 1]
    }

    pub fn polygon_count(&self) -> usize {
        self.groups.iter().map(|g| g.polygons.len()).sum()
    }

    /// Unnormalized face normal `(B - A) x (C - A)` from the first three
    /// corners of `polygon`.
    pub fn face_normal(&self, polygon: &Polygon) -> Normal {
        let a = self.position(polygon.elements[0].position);
        let b = self.position(polygon.elements[1].position);
        let c = self.position(polygon.elements[2].position);
        (b - a).cross(c - a)
    }

    /// Normal of `element`, synthesized from `polygon` when the file gave none.
    pub fn resolve_normal(&self, element: &FaceElement, polygon: &Polygon) -> Normal {
        match element.normal {
            Some(index) => self.normal(index),
            None => self.face_normal(polygon),
        }
    }

    /// Whether two face elements describe the same corner: every attribute
    /// either shares an index or references an equal value.
    pub fn elements_equivalent(
        &self,
        a: &FaceElement,
        a_polygon: &Polygon,
        b: &FaceElement,
        b_polygon: &Polygon,
    ) -> bool {
        if a.position != b.position && self.position(a.position) != self.position(b.position) {
            return false;
        }
        if a.tex_coord != b.tex_coord && self.tex_coord(a.tex_coord) != self.tex_coord(b.tex_coord)
        {
            return false;
        }
        a.normal == b.normal
            || self.resolve_normal(a, a_polygon) == self.resolve_normal(b, b_polygon)
    }
}
