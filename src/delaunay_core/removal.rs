use super::face::{Face, AB, BC, CA};
use super::math::is_convex;
use super::mesh::Mesh;
use super::FixedFaceHandle;
use crate::Point2;

/// Returns `true` if any face around the vertex `p` is a ghost face.
///
/// `start` must be a face with corner `p`.
pub fn is_on_hull(mesh: &Mesh, p: Point2<f64>, start: FixedFaceHandle) -> bool {
    mesh.fan(p, start)
        .into_iter()
        .any(|handle| mesh[handle].ghost)
}

/// The faces touched by a vertex removal.
#[derive(Debug, Clone, Default)]
pub(crate) struct RemovalResult {
    pub removed_faces: Vec<FixedFaceHandle>,
    pub added_faces: Vec<FixedFaceHandle>,
}

/// Removes the inner vertex `p` and fills the hole by ear clipping.
///
/// `start` must be a real face with corner `p` and `p` must not lie on the convex hull.
pub fn remove_inner_vertex(
    mesh: &mut Mesh,
    p: Point2<f64>,
    start: FixedFaceHandle,
) -> RemovalResult {
    let removed_faces = mesh.fan(p, start);

    // The fan runs counterclockwise, so does the hole's border.
    let mut polygon: Vec<Point2<f64>> = removed_faces
        .iter()
        .map(|handle| {
            let face = &mesh[*handle];
            let index = face
                .corner_index(p)
                .expect("Fan face does not contain the removed vertex. This is a bug.");
            face.corner(index + 1)
        })
        .collect();

    let mut new_faces = Vec::with_capacity(polygon.len() - 2);
    while polygon.len() > 3 {
        let ear = find_ear(&polygon, p)
            .expect("Could not find an ear while removing a vertex. This is a bug.");
        let n = polygon.len();
        new_faces.push(Face::new_triangle(
            polygon[ear],
            polygon[(ear + 1) % n],
            polygon[(ear + 2) % n],
        ));
        polygon.remove((ear + 1) % n);
    }
    new_faces.push(Face::new_triangle(polygon[0], polygon[1], polygon[2]));

    let added_faces: Vec<_> = new_faces.into_iter().map(|face| mesh.insert(face)).collect();

    // Connect the border of the hole
    for removed in &removed_faces {
        let face = &mesh[*removed];
        let outer_slot = face
            .corner_index(p)
            .map(|index| (index + 1) % 3)
            .expect("Fan face does not contain the removed vertex. This is a bug.");
        let (from, to) = face.edge(outer_slot);
        let outer = face.neighbor(outer_slot);

        let (added, slot) = added_faces
            .iter()
            .find_map(|added| mesh[*added].edge_slot(from, to).map(|slot| (*added, slot)))
            .expect("Hole border is not covered by a new face. This is a bug.");
        mesh[added].set_neighbor(slot, outer);
        mesh[outer].switch_neighbor(*removed, added);
    }

    // Connect the new faces among each other
    for (i, first) in added_faces.iter().enumerate() {
        for second in &added_faces[i + 1..] {
            for slot in [AB, BC, CA] {
                let (from, to) = mesh[*first].edge(slot);
                if let Some(other_slot) = mesh[*second].edge_slot(from, to) {
                    mesh[*first].set_neighbor(slot, *second);
                    mesh[*second].set_neighbor(other_slot, *first);
                }
            }
        }
    }

    for removed in &removed_faces {
        mesh.remove(*removed);
    }

    RemovalResult {
        removed_faces,
        added_faces,
    }
}

/// Finds `i` such that the polygon points `i`, `i + 1`, `i + 2` form an ear.
///
/// An ear is convex, does not contain the removed vertex `p` and has no other polygon point
/// in its circumcircle. If no such ear exists, the circumcircle criterion is dropped.
fn find_ear(polygon: &[Point2<f64>], p: Point2<f64>) -> Option<usize> {
    let n = polygon.len();
    let is_ear = |i: usize, check_circumcircle: bool| {
        let (p1, p2, p3) = (polygon[i], polygon[(i + 1) % n], polygon[(i + 2) % n]);
        if !is_convex(p1, p2, p3) {
            return false;
        }

        let face = Face::new_triangle(p1, p2, p3);
        // The last diagonal of a quadrilateral hole may run through p
        let covers_p = if n == 4 {
            face.contains_point(p) && !face.on_boundary(p)
        } else {
            face.contains_point(p)
        };
        if covers_p {
            return false;
        }

        if check_circumcircle {
            !face.inside_circumcircle(polygon)
        } else {
            !face.circumcircle().is_degenerate()
        }
    };

    (0..n)
        .find(|i| is_ear(*i, true))
        .or_else(|| (0..n).find(|i| is_ear(*i, false)))
}
