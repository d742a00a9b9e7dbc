/// Describes where a point lies relative to a directed edge.
///
/// Created by [classify](crate::classify). All variants are determined with a fixed
/// tolerance ([EPS](crate::EPS)): a point whose signed distance to the edge's line is within
/// the tolerance is considered to lie on the line and is further classified by its projection
/// onto the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineSideInfo {
    /// The point lies on the line, between the edge's start and end point (inclusive).
    OnSegment,
    /// The point lies strictly on the left side of the edge.
    Left,
    /// The point lies strictly on the right side of the edge.
    Right,
    /// The point lies on the line, before the edge's start point.
    BeforeStart,
    /// The point lies on the line, behind the edge's end point.
    AfterEnd,
}

impl LineSideInfo {
    /// Returns `true` if the point lies strictly on the left side.
    pub fn is_on_left_side(self) -> bool {
        self == LineSideInfo::Left
    }

    /// Returns `true` if the point lies strictly on the right side.
    pub fn is_on_right_side(self) -> bool {
        self == LineSideInfo::Right
    }

    /// Returns `true` if the point lies on the (infinite) line through the edge.
    pub fn is_on_line(self) -> bool {
        matches!(
            self,
            LineSideInfo::OnSegment | LineSideInfo::BeforeStart | LineSideInfo::AfterEnd
        )
    }

    /// Returns `true` if the point lies on the edge itself.
    pub fn is_on_segment(self) -> bool {
        self == LineSideInfo::OnSegment
    }

    /// Returns `true` if the point lies strictly left of the edge or on the edge itself.
    ///
    /// An edge fulfilling this "sees" the point: hull extension continues over such edges.
    pub fn is_left_or_on_segment(self) -> bool {
        matches!(self, LineSideInfo::Left | LineSideInfo::OnSegment)
    }
}
