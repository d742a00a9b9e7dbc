use super::face::{Face, AB, BC, CA};
use super::math::classify;
use super::mesh::Mesh;
use super::FixedFaceHandle;
use crate::{LineSideInfo, Point2};

/// The ghost faces of a triangulation whose vertices all lie on one line.
///
/// The chain's vertices are sorted lexicographically from `first_point` to `last_point`. Every
/// chain edge is bordered by two ghost faces, one for each side of the line. `first_face` and
/// `last_face` are the ghost faces at both ends of the chain that are directed from
/// `last_point` towards `first_point`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CollinearChain {
    pub first_point: Point2<f64>,
    pub last_point: Point2<f64>,
    pub first_face: FixedFaceHandle,
    pub last_face: FixedFaceHandle,
}

/// Creates the two ghost faces bracketing the first edge.
pub fn create_slab(mesh: &mut Mesh, p1: Point2<f64>, p2: Point2<f64>) -> CollinearChain {
    let (smaller, bigger) = if p1.approx_greater(p2) {
        (p2, p1)
    } else {
        (p1, p2)
    };

    let first = mesh.insert(Face::new_ghost(bigger, smaller));
    let twin = mesh.insert(Face::new_ghost(smaller, bigger));
    for (face, other) in [(first, twin), (twin, first)] {
        let face = &mut mesh[face];
        face.set_ab(other);
        face.set_bc(other);
        face.set_ca(other);
    }

    CollinearChain {
        first_point: smaller,
        last_point: bigger,
        first_face: first,
        last_face: first,
    }
}

/// Inserts a point lying on the chain's line.
///
/// `side` must be the classification of `p` relative to `first_point -> last_point`.
pub fn insert_collinear(
    mesh: &mut Mesh,
    chain: &mut CollinearChain,
    p: Point2<f64>,
    side: LineSideInfo,
) {
    match side {
        LineSideInfo::BeforeStart => {
            let first = chain.first_face;
            let first_twin = mesh[first].ab();
            let face = mesh.insert(Face::new_ghost(chain.first_point, p));
            let twin = mesh.insert(Face::new_ghost(p, chain.first_point));

            mesh[face].set_ab(twin);
            mesh[twin].set_ab(face);
            mesh[face].set_bc(twin);
            mesh[twin].set_ca(face);
            mesh[face].set_ca(first);
            mesh[first].set_bc(face);
            mesh[twin].set_bc(first_twin);
            mesh[first_twin].set_ca(twin);

            chain.first_face = face;
            chain.first_point = p;
        }
        LineSideInfo::AfterEnd => {
            let last = chain.last_face;
            let last_twin = mesh[last].ab();
            let face = mesh.insert(Face::new_ghost(p, chain.last_point));
            let twin = mesh.insert(Face::new_ghost(chain.last_point, p));

            mesh[face].set_ab(twin);
            mesh[twin].set_ab(face);
            mesh[face].set_bc(last);
            mesh[last].set_ca(face);
            mesh[face].set_ca(twin);
            mesh[twin].set_bc(face);
            mesh[twin].set_ca(last_twin);
            mesh[last_twin].set_bc(twin);

            chain.last_face = face;
            chain.last_point = p;
        }
        LineSideInfo::OnSegment => {
            let mut split = chain.first_face;
            while p.approx_greater(mesh[split].a) {
                split = mesh[split].ca();
            }

            // `split` is the ghost (right, left) with left < p < right. It is shortened to
            // (right, p), the new ghost (p, left) takes over the remaining part.
            let left = mesh[split].b;
            let face = mesh.insert(Face::new_ghost(p, left));
            let twin = mesh.insert(Face::new_ghost(left, p));
            let split_twin = mesh[split].ab();
            mesh[split].b = p;
            mesh[split_twin].a = p;

            mesh[face].set_ab(twin);
            mesh[twin].set_ab(face);

            let split_bc = mesh[split].bc();
            mesh[face].set_bc(split_bc);
            mesh[split_bc].set_ca(face);
            mesh[face].set_ca(split);
            mesh[split].set_bc(face);

            // Read after the updates above, the twin's neighbor may just have changed.
            let split_twin_ca = mesh[split_twin].ca();
            mesh[twin].set_ca(split_twin_ca);
            mesh[split_twin_ca].set_bc(twin);
            mesh[twin].set_bc(split_twin);
            mesh[split_twin].set_ca(twin);

            if chain.first_face == split {
                chain.first_face = face;
            }
        }
        LineSideInfo::Left | LineSideInfo::Right => {
            panic!("Inserting a point off the line as collinear point. This is a bug.")
        }
    }
}

/// Inserts `p` which lies in the region of the ghost face `ghost`.
///
/// Returns a real face with corner `c == p`. Walking along `ca` links from this face visits
/// every new face incident to `p`.
pub fn extend_outside(mesh: &mut Mesh, ghost: FixedFaceHandle, p: Point2<f64>) -> FixedFaceHandle {
    let face = &mesh[ghost];
    if classify(p, face.a, face.b).is_on_segment() && !mesh[face.ab()].ghost {
        return split_hull_edge(mesh, ghost, p);
    }

    let ccw = extend_ccw(mesh, ghost, p);
    let cw = extend_cw(mesh, ghost, p);
    mesh[ccw].set_bc(cw);
    mesh[cw].set_ca(ccw);
    mesh[cw].ab()
}

fn extend_ccw(mesh: &mut Mesh, mut current: FixedFaceHandle, p: Point2<f64>) -> FixedFaceHandle {
    loop {
        mesh[current].make_real(p);
        let next = mesh[current].ca();
        let next_face = &mesh[next];
        if !classify(p, next_face.a, next_face.b).is_left_or_on_segment() {
            let new_ghost = mesh.insert(Face::new_ghost(mesh[current].a, p));
            mesh[new_ghost].set_ab(current);
            mesh[current].set_ca(new_ghost);
            mesh[new_ghost].set_ca(next);
            mesh[next].set_bc(new_ghost);
            return new_ghost;
        }
        current = next;
    }
}

fn extend_cw(mesh: &mut Mesh, mut current: FixedFaceHandle, p: Point2<f64>) -> FixedFaceHandle {
    loop {
        mesh[current].make_real(p);
        let next = mesh[current].bc();
        let next_face = &mesh[next];
        if !classify(p, next_face.a, next_face.b).is_left_or_on_segment() {
            let new_ghost = mesh.insert(Face::new_ghost(p, mesh[current].b));
            mesh[new_ghost].set_ab(current);
            mesh[current].set_bc(new_ghost);
            mesh[new_ghost].set_bc(next);
            mesh[next].set_ca(new_ghost);
            return new_ghost;
        }
        current = next;
    }
}

/// Splits a hull edge at `p`, which lies on the edge of `ghost`.
///
/// The real face behind the edge is replaced by two real faces and one new ghost face is
/// created. No zero area face is created.
pub fn split_hull_edge(mesh: &mut Mesh, ghost: FixedFaceHandle, p: Point2<f64>) -> FixedFaceHandle {
    // The ghost runs y -> x, its real neighbor contains the edge x -> y and the corner z.
    let (y, x) = (mesh[ghost].a, mesh[ghost].b);
    let hull_face = mesh[ghost].ab();
    let ghost_at_x = mesh[ghost].bc();
    let ghost_at_y = mesh[ghost].ca();

    let slot = mesh[hull_face]
        .edge_slot(x, y)
        .expect("Hull face does not border its ghost. This is a bug.");
    let z = mesh[hull_face].corner(slot + 2);
    let across_yz = mesh[hull_face].neighbor((slot + 1) % 3);
    let across_zx = mesh[hull_face].neighbor((slot + 2) % 3);

    let upper = mesh.insert(Face::from_ccw(y, z, p));
    let new_ghost = mesh.insert(Face::new_ghost(y, p));

    let mut lower = Face::from_ccw(z, x, p);
    lower.set_ab(across_zx);
    lower.set_bc(ghost);
    lower.set_ca(upper);
    mesh[hull_face] = lower;

    mesh[upper].set_ab(across_yz);
    mesh[upper].set_bc(hull_face);
    mesh[upper].set_ca(new_ghost);
    mesh[across_yz].switch_neighbor(hull_face, upper);

    mesh[ghost].a = p;
    mesh[ghost].set_ca(new_ghost);
    debug_assert_eq!(mesh[ghost].bc(), ghost_at_x);

    mesh[new_ghost].set_ab(upper);
    mesh[new_ghost].set_bc(ghost);
    mesh[new_ghost].set_ca(ghost_at_y);
    mesh[ghost_at_y].set_bc(new_ghost);

    hull_face
}

/// Inserts `p` into the real face `face`.
///
/// `p` may also lie slightly outside of `face`, on the line of a hull edge but beyond its end
/// point. The point is then added as new hull vertex with [extend_outside].
///
/// Returns a face with corner `c == p`, like [extend_outside].
pub fn extend_inside(mesh: &mut Mesh, face: FixedFaceHandle, p: Point2<f64>) -> FixedFaceHandle {
    for slot in [AB, BC, CA] {
        let neighbor = mesh[face].neighbor(slot);
        let (from, to) = mesh[face].edge(slot);
        if mesh[neighbor].ghost && classify(p, to, from).is_on_segment() {
            return split_hull_edge(mesh, neighbor, p);
        }
    }

    if !mesh[face].contains_point(p) {
        if let Some(ghost) = ghost_behind_hull_vertex(mesh, face, p) {
            return extend_outside(mesh, ghost, p);
        }
    }

    let old = mesh[face].clone();
    let h1 = mesh.insert(Face::from_ccw(old.c, old.a, p));
    let h2 = mesh.insert(Face::from_ccw(old.b, old.c, p));

    mesh[h1].set_ab(old.ca());
    mesh[h1].set_bc(face);
    mesh[h1].set_ca(h2);
    mesh[h2].set_ab(old.bc());
    mesh[h2].set_bc(h1);
    mesh[h2].set_ca(face);
    mesh[old.ca()].switch_neighbor(face, h1);
    mesh[old.bc()].switch_neighbor(face, h2);

    let inner = &mut mesh[face];
    inner.c = p;
    inner.init_circumcircle();
    inner.set_bc(h2);
    inner.set_ca(h1);
    face
}

// Returns the ghost of the hull edge of `face` that `p` lies behind. `p` must be on the edge's
// line past one of its end points. Of two candidates, the edge with `p` further on its outer
// side wins, the new face built on it has a positive area.
fn ghost_behind_hull_vertex(
    mesh: &Mesh,
    face: FixedFaceHandle,
    p: Point2<f64>,
) -> Option<FixedFaceHandle> {
    let mut result = None;
    let mut best = 0.0;
    for slot in [AB, BC, CA] {
        let neighbor = mesh[face].neighbor(slot);
        if !mesh[neighbor].ghost {
            continue;
        }
        let (from, to) = mesh[face].edge(slot);
        let side = classify(p, from, to);
        if side.is_on_line() && !side.is_on_segment() {
            let orientation = to.sub(from).cross(p.sub(from));
            if orientation < best {
                best = orientation;
                result = Some(neighbor);
            }
        }
    }
    result
}

/// Restores the Delaunay property around a new vertex.
///
/// `start` must be a face returned by [extend_inside] or [extend_outside]. Every face checked
/// is appended to `changed`. Returns the number of flips.
pub fn legalize_fan(
    mesh: &mut Mesh,
    start: FixedFaceHandle,
    changed: &mut Vec<FixedFaceHandle>,
) -> usize {
    let mut flips = 0;
    let mut current = start;
    loop {
        flips += legalize_face(mesh, current, changed);
        current = mesh[current].ca();
        if current == start || mesh[current].ghost {
            return flips;
        }
    }
}

/// Flips the far edge `a - b` of `face` until it is locally Delaunay.
///
/// Faces created by a flip are checked again. Uses an explicit stack.
fn legalize_face(
    mesh: &mut Mesh,
    face: FixedFaceHandle,
    changed: &mut Vec<FixedFaceHandle>,
) -> usize {
    let mut flips = 0;
    let mut stack = vec![face];

    while let Some(t) = stack.pop() {
        changed.push(t);
        let u = mesh[t].ab();
        let (ta, tb, apex) = (mesh[t].a, mesh[t].b, mesh[t].c);
        if mesh[u].ghost || !mesh[u].circumcircle().contains(apex) {
            continue;
        }

        // u contains the edge tb -> ta and the opposite corner x.
        let start = mesh[u]
            .corner_index(ta)
            .expect("Faces to flip do not share an edge. This is a bug.");
        let x = mesh[u].corner(start + 1);
        let across_ta_x = mesh[u].neighbor(start);
        let across_x_tb = mesh[u].neighbor((start + 1) % 3);
        let across_tb_apex = mesh[t].bc();

        let mut flipped = Face::from_ccw(x, tb, apex);
        flipped.set_ab(across_x_tb);
        flipped.set_bc(across_tb_apex);
        flipped.set_ca(t);
        let v = mesh.insert(flipped);

        mesh[across_x_tb].switch_neighbor(u, v);
        mesh[across_tb_apex].switch_neighbor(t, v);

        let t_face = &mut mesh[t];
        t_face.b = x;
        t_face.init_circumcircle();
        t_face.set_ab(across_ta_x);
        t_face.set_bc(v);
        mesh[across_ta_x].switch_neighbor(u, t);

        mesh.remove(u);
        flips += 1;

        stack.push(v);
        stack.push(t);
    }
    flips
}
