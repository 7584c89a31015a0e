use crate::mesh::Mesh;
use log::debug;

/// Geometric adjustments applied between parsing and model building.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformOptions {
    /// Negate every position's Y. Useful for models authored Y-down.
    pub invert_y: bool,
    /// Swap the 2nd and 3rd element of every polygon. This reorders the
    /// corners (flipping winding); it does not touch coordinate axes.
    pub swizzle_winding: bool,
    /// Replace every texture `v` with `1 - v`.
    pub flip_texture: bool,
    pub scale: f32,
    pub translate_y: f32,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            invert_y: false,
            swizzle_winding: false,
            flip_texture: false,
            scale: 1.0,
            translate_y: 0.0,
        }
    }
}

/// Run every enabled transform in order: Y inversion, scale and
/// translation, winding swizzle, texture flip.
pub fn apply_transforms(mesh: &mut Mesh, options: &TransformOptions) {
    debug!("Applying transforms: {:?}", options);
    if options.invert_y {
        invert_y(mesh);
    }
    scale_and_translate(mesh, options.scale, options.translate_y);
    if options.swizzle_winding {
        swizzle_winding(mesh);
    }
    if options.flip_texture {
        flip_texture_v(mesh);
    }
}

pub fn invert_y(mesh: &mut Mesh) {
    for position in &mut mesh.positions {
        position.y = -position.y;
    }
}

/// `x *= scale; y = y * scale + translate_y; z *= scale`.
pub fn scale_and_translate(mesh: &mut Mesh, scale: f32, translate_y: f32) {
    for position in &mut mesh.positions {
        position.x *= scale;
        position.y = position.y * scale + translate_y;
        position.z *= scale;
    }
}

pub fn swizzle_winding(mesh: &mut Mesh) {
    for polygon in mesh.groups.iter_mut().flat_map(|g| g.polygons.iter_mut()) {
        if polygon.len() > 2 {
            polygon.elements.swap(1, 2);
        }
    }
}

pub fn flip_texture_v(mesh: &mut Mesh) {
    for tex_coord in &mut mesh.tex_coords {
        tex_coord.y = 1.0 - tex_coord.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{FaceElement, Group, Polygon};
    use glam::{Vec2, Vec3};

    fn single_vertex(x: f32, y: f32, z: f32) -> Mesh {
        Mesh {
            positions: vec![Vec3::new(x, y, z)],
            ..Mesh::default()
        }
    }

    #[test]
    fn defaults_leave_mesh_untouched() {
        let mut mesh = single_vertex(1.5, -2.0, 3.25);
        mesh.tex_coords.push(Vec2::new(0.25, 0.75));
        let before = mesh.clone();
        apply_transforms(&mut mesh, &TransformOptions::default());
        assert_eq!(mesh, before);
    }

    #[test]
    fn invert_then_scale_then_translate() {
        let mut mesh = single_vertex(1.0, 2.0, 3.0);
        let options = TransformOptions {
            invert_y: true,
            scale: 2.0,
            translate_y: 1.0,
            ..TransformOptions::default()
        };
        apply_transforms(&mut mesh, &options);
        assert_eq!(mesh.positions[0], Vec3::new(2.0, -3.0, 6.0));
    }

    #[test]
    fn translate_only_moves_y() {
        let mut mesh = single_vertex(1.0, 2.0, 3.0);
        scale_and_translate(&mut mesh, 1.0, 5.0);
        assert_eq!(mesh.positions[0], Vec3::new(1.0, 7.0, 3.0));
    }

    #[test]
    fn swizzle_swaps_second_and_third_elements() {
        let corner = |i| FaceElement::new(i, i, None);
        let mut mesh = Mesh::default();
        let mut group = Group::new("g");
        group.polygons.push(Polygon::new(vec![corner(1), corner(2), corner(3)]));
        group
            .polygons
            .push(Polygon::new(vec![corner(1), corner(2), corner(3), corner(4)]));
        mesh.groups.push(group);

        swizzle_winding(&mut mesh);

        let order = |p: &Polygon| p.elements.iter().map(|e| e.position).collect::<Vec<_>>();
        assert_eq!(order(&mesh.groups[0].polygons[0]), vec![1, 3, 2]);
        assert_eq!(order(&mesh.groups[0].polygons[1]), vec![1, 3, 2, 4]);
    }

    #[test]
    fn flip_texture_mirrors_v_only() {
        let mut mesh = Mesh {
            tex_coords: vec![Vec2::new(0.25, 0.25), Vec2::new(1.0, 0.0)],
            ..Mesh::default()
        };
        flip_texture_v(&mut mesh);
        assert_eq!(mesh.tex_coords, vec![Vec2::new(0.25, 0.75), Vec2::new(1.0, 1.0)]);
    }
}
