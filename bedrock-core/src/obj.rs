//! Line-oriented reader for the Wavefront OBJ subset the converter accepts.
//!
//! Recognised directives are `v`, `vn`, `vt`, `g`, `o` and `f`. Everything
//! else is skipped. Adjacent triangles that share an edge are folded back
//! into the quad they were split from while faces are read.

use crate::error::{LineFault, MeshError, MeshResult};
use crate::mesh::{DEFAULT_GROUP_NAME, FaceElement, Group, Mesh, Polygon};
use glam::{Vec2, Vec3};
use log::{debug, trace};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Parse OBJ source text.
pub fn parse_obj_str(source: &str) -> MeshResult<Mesh> {
    parse_obj(source.lines())
}

/// Parse OBJ lines into a [`Mesh`]. Fails on the first malformed line.
///
/// A UTF-8 byte-order mark at the start of the first line is skipped.
pub fn parse_obj<'a, I>(lines: I) -> MeshResult<Mesh>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut parser = ObjParser::new();
    for (i, line) in lines.into_iter().enumerate() {
        let line = match i {
            0 => line.strip_prefix(BYTE_ORDER_MARK).unwrap_or(line),
            _ => line,
        };
        parser
            .parse_line(line)
            .map_err(|fault| MeshError::MalformedLine {
                line: i + 1,
                content: line.trim().to_string(),
                fault,
            })?;
    }
    Ok(parser.finish())
}

struct ObjParser {
    // Attribute tables only; groups are kept apart so polygons can be
    // mutated while the tables are read.
    mesh: Mesh,
    groups: Vec<Group>,
    active: usize,
    quads_repaired: usize,
}

impl ObjParser {
    fn new() -> Self {
        Self {
            mesh: Mesh::new(),
            groups: vec![Group::new(DEFAULT_GROUP_NAME)],
            active: 0,
            quads_repaired: 0,
        }
    }

    fn parse_line(&mut self, line: &str) -> Result<(), LineFault> {
        let mut tokens = line.split_whitespace();
        let Some(directive) = tokens.next() else {
            return Ok(());
        };
        if directive.starts_with('#') {
            return Ok(());
        }
        let fields: Vec<&str> = tokens.collect();

        match directive {
            "v" => {
                let [x, y, z] = parse_triple("v", &fields)?;
                self.mesh.positions.push(Vec3::new(x, y, z));
            }
            "vn" => {
                let [x, y, z] = parse_triple("vn", &fields)?;
                self.mesh.normals.push(Vec3::new(x, y, z));
            }
            "vt" => {
                if fields.len() < 2 {
                    return Err(LineFault::WrongArity {
                        directive: "vt",
                        expected: "2 or 3",
                        found: fields.len(),
                    });
                }
                // The optional w component is dropped.
                let u = parse_float(fields[0])?;
                let v = parse_float(fields[1])?;
                self.mesh.tex_coords.push(Vec2::new(u, v));
            }
            "g" | "o" => {
                let name = fields.first().ok_or_else(|| LineFault::MissingGroupName {
                    directive: directive.to_string(),
                })?;
                debug!("Starting group {}", name);
                self.groups.push(Group::new(*name));
                self.active = self.groups.len() - 1;
            }
            "f" => {
                if !(3..=4).contains(&fields.len()) {
                    return Err(LineFault::FaceArity {
                        found: fields.len(),
                    });
                }
                let elements = fields
                    .iter()
                    .map(|token| self.parse_face_element(token))
                    .collect::<Result<Vec<_>, _>>()?;
                self.add_polygon(Polygon::new(elements));
            }
            other => trace!("Ignoring `{}` directive", other),
        }
        Ok(())
    }

    fn parse_face_element(&self, token: &str) -> Result<FaceElement, LineFault> {
        let invalid = || LineFault::InvalidFaceReference {
            token: token.to_string(),
        };
        let parts: Vec<&str> = token.split('/').collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(invalid());
        }
        let parse_index = |part: &str| part.parse::<i64>().map_err(|_| invalid());

        let position = check_index("position", parse_index(parts[0])?, self.mesh.positions.len())?;
        let tex_coord = check_index(
            "texture coordinate",
            parse_index(parts[1])?,
            self.mesh.tex_coords.len(),
        )?;
        let normal = match parts.get(2) {
            Some(part) => Some(check_index(
                "normal",
                parse_index(part)?,
                self.mesh.normals.len(),
            )?),
            None => None,
        };
        Ok(FaceElement::new(position, tex_coord, normal))
    }

    fn add_polygon(&mut self, polygon: Polygon) {
        let group = &mut self.groups[self.active];
        let corner = match group.polygons.last() {
            Some(previous) if previous.is_triangle() => {
                let previous_only = distinct_except(&self.mesh, previous, &polygon);
                let new_only = distinct_except(&self.mesh, &polygon, previous);
                match (previous_only.as_slice(), new_only.as_slice()) {
                    ([_], [corner]) => Some(*corner),
                    _ => None,
                }
            }
            _ => None,
        };

        match (corner, group.polygons.last_mut()) {
            (Some(corner), Some(previous)) => {
                previous.repair_to_quad(corner);
                self.quads_repaired += 1;
            }
            _ => group.polygons.push(polygon),
        }
    }

    fn finish(mut self) -> Mesh {
        // Faces placed before any group marker keep the default group alive.
        if self.groups[0].polygons.is_empty() {
            self.groups.remove(0);
        }
        self.mesh.groups = self.groups;
        debug!(
            "Parsed {} positions, {} normals, {} uvs, {} groups, {} polygons ({} quads repaired)",
            self.mesh.positions.len(),
            self.mesh.normals.len(),
            self.mesh.tex_coords.len(),
            self.mesh.groups.len(),
            self.mesh.polygon_count(),
            self.quads_repaired
        );
        self.mesh
    }
}

/// Elements of `from` with no equivalent in `other`, each kept once.
fn distinct_except(mesh: &Mesh, from: &Polygon, other: &Polygon) -> Vec<FaceElement> {
    let mut result: Vec<FaceElement> = Vec::new();
    for element in &from.elements {
        let shared = other
            .elements
            .iter()
            .any(|o| mesh.elements_equivalent(element, from, o, other));
        let seen = result
            .iter()
            .any(|r| mesh.elements_equivalent(element, from, r, from));
        if !shared && !seen {
            result.push(*element);
        }
    }
    result
}

fn parse_float(token: &str) -> Result<f32, LineFault> {
    token.parse::<f32>().map_err(|_| LineFault::InvalidNumber {
        token: token.to_string(),
    })
}

fn parse_triple(directive: &'static str, fields: &[&str]) -> Result<[f32; 3], LineFault> {
    if fields.len() != 3 {
        return Err(LineFault::WrongArity {
            directive,
            expected: "3",
            found: fields.len(),
        });
    }
    Ok([
        parse_float(fields[0])?,
        parse_float(fields[1])?,
        parse_float(fields[2])?,
    ])
}

fn check_index(attribute: &'static str, index: i64, count: usize) -> Result<usize, LineFault> {
    if index < 1 || index as u64 > count as u64 {
        return Err(LineFault::IndexOutOfRange {
            attribute,
            index,
            count,
        });
    }
    Ok(index as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
";

    fn positions_of(polygon: &Polygon) -> Vec<usize> {
        polygon.elements.iter().map(|e| e.position).collect()
    }

    #[test]
    fn parses_attributes_and_groups() {
        let mesh = parse_obj_str(
            "# exported\n\
             o body\n\
             v 1 2 3\n\
             vn 0 1 0\n\
             vt 0.25 0.75 0.0\n\
             \n\
             g head\n\
             v 4 5 6\n",
        )
        .unwrap();

        assert_eq!(mesh.positions, vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)]);
        assert_eq!(mesh.normals, vec![Vec3::new(0.0, 1.0, 0.0)]);
        assert_eq!(mesh.tex_coords, vec![Vec2::new(0.25, 0.75)]);
        let names: Vec<&str> = mesh.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["body", "head"]);
    }

    #[test]
    fn leading_byte_order_mark_is_skipped() {
        let mesh = parse_obj_str("\u{feff}o body\nv 1 2 3\n").unwrap();
        assert_eq!(mesh.groups[0].name, "body");

        let mesh = parse_obj_str("\u{feff}v 9 9 9\nv 0 0 0\n").unwrap();
        assert_eq!(mesh.positions, vec![Vec3::new(9.0, 9.0, 9.0), Vec3::ZERO]);
    }

    #[test]
    fn ignores_unknown_directives_and_comments() {
        let mesh = parse_obj_str("mtllib box.mtl\nusemtl red\ns off\n   # indented comment\n#v 1 2\n").unwrap();
        assert_eq!(mesh, Mesh::new());
    }

    #[test]
    fn faces_before_any_marker_land_in_default_group() {
        let mesh = parse_obj_str(&format!("{SQUARE}f 1/1 2/2 3/3\n")).unwrap();
        assert_eq!(mesh.groups.len(), 1);
        assert_eq!(mesh.groups[0].name, DEFAULT_GROUP_NAME);
    }

    #[test]
    fn face_normal_reference_is_optional() {
        let mesh = parse_obj_str(&format!("{SQUARE}vn 0 0 1\nf 1/1/1 2/2 3/3/1\n")).unwrap();
        let elements = &mesh.groups[0].polygons[0].elements;
        assert_eq!(elements[0], FaceElement::new(1, 1, Some(1)));
        assert_eq!(elements[1], FaceElement::new(2, 2, None));
        assert_eq!(elements[2], FaceElement::new(3, 3, Some(1)));
    }

    #[test]
    fn adjacent_triangles_are_repaired_into_a_quad() {
        let mesh = parse_obj_str(&format!("{SQUARE}g square\nf 1/1 2/2 3/3\nf 1/1 3/3 4/4\n")).unwrap();
        let polygons = &mesh.groups[0].polygons;
        assert_eq!(polygons.len(), 1);
        assert_eq!(positions_of(&polygons[0]), vec![3, 4, 2, 1]);
    }

    #[test]
    fn repair_matches_shared_corners_by_value() {
        // Corners 5 and 6 duplicate corners 1 and 3 under new indices.
        let source = format!("{SQUARE}v 0 0 0\nv 1 1 0\ng square\nf 1/1 2/2 3/3\nf 5/1 6/3 4/4\n");
        let mesh = parse_obj_str(&source).unwrap();
        let polygons = &mesh.groups[0].polygons;
        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].len(), 4);
        assert_eq!(polygons[0].elements[1], FaceElement::new(4, 4, None));
    }

    #[test]
    fn repair_resolves_missing_normal_through_face_normal() {
        // The second triangle omits normals; its face normal equals vn 1.
        let source = format!("{SQUARE}vn 0 0 1\ng square\nf 1/1/1 2/2/1 3/3/1\nf 1/1 3/3 4/4\n");
        let mesh = parse_obj_str(&source).unwrap();
        let polygons = &mesh.groups[0].polygons;
        assert_eq!(polygons.len(), 1);
        assert_eq!(positions_of(&polygons[0]), vec![3, 4, 2, 1]);
        assert_eq!(polygons[0].elements[1], FaceElement::new(4, 4, None));
        assert_eq!(polygons[0].elements[0], FaceElement::new(3, 3, Some(1)));
    }

    #[test]
    fn repair_rejects_mismatched_synthesized_normal() {
        let source = format!("{SQUARE}vn 0 0 -1\ng square\nf 1/1/1 2/2/1 3/3/1\nf 1/1 3/3 4/4\n");
        let mesh = parse_obj_str(&source).unwrap();
        assert_eq!(mesh.groups[0].polygons.len(), 2);
    }

    #[test]
    fn triangles_sharing_one_corner_stay_apart() {
        let source = format!("{SQUARE}v 2 0 0\nv 2 1 0\ng fan\nf 1/1 2/2 3/3\nf 3/3 5/2 6/3\n");
        let mesh = parse_obj_str(&source).unwrap();
        assert_eq!(mesh.groups[0].polygons.len(), 2);
    }

    #[test]
    fn repaired_quad_is_not_extended_again() {
        let source = format!(
            "{SQUARE}g strip\nf 1/1 2/2 3/3\nf 1/1 3/3 4/4\nf 1/1 3/3 4/4\n"
        );
        let mesh = parse_obj_str(&source).unwrap();
        let polygons = &mesh.groups[0].polygons;
        assert_eq!(polygons.len(), 2);
        assert_eq!(polygons[0].len(), 4);
        assert_eq!(polygons[1].len(), 3);
    }

    #[test]
    fn repair_does_not_cross_group_boundaries() {
        let source = format!("{SQUARE}g a\nf 1/1 2/2 3/3\ng b\nf 1/1 3/3 4/4\n");
        let mesh = parse_obj_str(&source).unwrap();
        assert_eq!(mesh.groups.len(), 2);
        assert!(mesh.groups.iter().all(|g| g.polygons[0].is_triangle()));
    }

    #[test]
    fn native_quads_are_kept() {
        let mesh = parse_obj_str(&format!("{SQUARE}o quad\nf 1/1 2/2 3/3 4/4\n")).unwrap();
        assert_eq!(positions_of(&mesh.groups[0].polygons[0]), vec![1, 2, 3, 4]);
    }

    #[test]
    fn rejects_wrong_vertex_arity() {
        let err = parse_obj_str("v 1 2\n").unwrap_err();
        assert_eq!(err.line(), 1);
        assert_eq!(
            *err.fault(),
            LineFault::WrongArity {
                directive: "v",
                expected: "3",
                found: 2
            }
        );
        assert!(parse_obj_str("vn 1 2 3 4\n").is_err());
        assert!(parse_obj_str("vt 1\n").is_err());
    }

    #[test]
    fn rejects_unparsable_numbers() {
        let err = parse_obj_str("v 0 0 0\nv 1 x 0\n").unwrap_err();
        assert_eq!(err.line(), 2);
        assert_eq!(
            *err.fault(),
            LineFault::InvalidNumber {
                token: "x".to_string()
            }
        );
    }

    #[test]
    fn rejects_face_arity_outside_three_and_four() {
        let err = parse_obj_str(&format!("{SQUARE}f 1/1 2/2\n")).unwrap_err();
        assert_eq!(*err.fault(), LineFault::FaceArity { found: 2 });
        let err = parse_obj_str(&format!("{SQUARE}v 2 2 2\nf 1/1 2/2 3/3 4/4 5/1\n")).unwrap_err();
        assert_eq!(*err.fault(), LineFault::FaceArity { found: 5 });
    }

    #[test]
    fn rejects_missing_texture_reference() {
        let err = parse_obj_str(&format!("{SQUARE}f 1 2 3\n")).unwrap_err();
        assert!(matches!(err.fault(), LineFault::InvalidFaceReference { .. }));
        let err = parse_obj_str(&format!("{SQUARE}f 1//1 2//1 3//1\n")).unwrap_err();
        assert!(matches!(err.fault(), LineFault::InvalidFaceReference { .. }));
    }

    #[test]
    fn rejects_out_of_range_indices() {
        let err = parse_obj_str(&format!("{SQUARE}f 1/1 2/2 9/3\n")).unwrap_err();
        assert_eq!(err.line(), 9);
        assert_eq!(
            *err.fault(),
            LineFault::IndexOutOfRange {
                attribute: "position",
                index: 9,
                count: 4
            }
        );
        assert!(parse_obj_str(&format!("{SQUARE}f 0/1 2/2 3/3\n")).is_err());
        assert!(parse_obj_str(&format!("{SQUARE}f 1/1/1 2/2/1 3/3/1\n")).is_err());
    }

    #[test]
    fn rejects_unnamed_group_marker() {
        let err = parse_obj_str("g\n").unwrap_err();
        assert_eq!(
            *err.fault(),
            LineFault::MissingGroupName {
                directive: "g".to_string()
            }
        );
    }

    #[test]
    fn error_reports_offending_line() {
        let err = parse_obj_str("v 0 0 0\n\nf  1/1 oops 2/2\n").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("line 3"), "{message}");
        assert!(message.contains("f  1/1 oops 2/2"), "{message}");
    }
}
