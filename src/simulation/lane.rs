//! Lane geometry for the four-way junction
//!
//! Four fixed lanes meet at the world center: eastbound and westbound on
//! the horizontal axis, southbound and northbound on the vertical axis.
//! Geometry is computed once from the world dimensions and never changes.

use super::types::{Axis, LaneId, Vec2};

/// Perpendicular offset of each lane center from the world midpoint
pub const LANE_CENTER_OFFSET: f32 = 34.0;

/// How far lanes extend past the visible bounds on each end,
/// so vehicles spawn and exit just offscreen
pub const LANE_OVERRUN: f32 = 60.0;

/// Stop line sits this far before the lane midpoint
const STOP_LINE_SETBACK: f32 = 70.0;

/// Half-span of the intersection conflict zone along a lane
const INTERSECTION_HALF_SPAN: f32 = 45.0;

/// One directional traffic path with fixed geometry and a signal group
#[derive(Debug, Clone)]
pub struct Lane {
    pub id: LaneId,
    pub axis: Axis,
    pub signal_group: Axis,
    pub start: Vec2,
    pub end: Vec2,
    /// Unit direction vector from start to end
    pub dir: Vec2,
    pub length: f32,
    /// Where vehicles hold for a red signal, measured from lane start
    pub stop_line_s: f32,
    /// Where the intersection conflict zone begins
    pub intersection_start_s: f32,
    /// Where the intersection conflict zone ends
    pub intersection_end_s: f32,
}

impl Lane {
    fn new(id: LaneId, axis: Axis, start: Vec2, end: Vec2) -> Self {
        let length = start.distance(&end);
        let dir = Vec2::new((end.x - start.x) / length, (end.y - start.y) / length);

        Self {
            id,
            axis,
            signal_group: axis,
            start,
            end,
            dir,
            length,
            stop_line_s: length / 2.0 - STOP_LINE_SETBACK,
            intersection_start_s: length / 2.0 - INTERSECTION_HALF_SPAN,
            intersection_end_s: length / 2.0 + INTERSECTION_HALF_SPAN,
        }
    }

    /// World point at an s-coordinate along this lane
    pub fn point_at(&self, s: f32) -> Vec2 {
        Vec2::new(self.start.x + self.dir.x * s, self.start.y + self.dir.y * s)
    }

    /// Heading of this lane in radians
    pub fn heading(&self) -> f32 {
        self.dir.y.atan2(self.dir.x)
    }
}

/// Build the four lanes of the junction from the world dimensions.
///
/// Deterministic, called once; the returned order matches `LaneId::ALL`.
pub fn build_lanes(width: f32, height: f32) -> [Lane; 4] {
    let cx = width / 2.0;
    let cy = height / 2.0;

    [
        Lane::new(
            LaneId::Eastbound,
            Axis::Horizontal,
            Vec2::new(-LANE_OVERRUN, cy - LANE_CENTER_OFFSET),
            Vec2::new(width + LANE_OVERRUN, cy - LANE_CENTER_OFFSET),
        ),
        Lane::new(
            LaneId::Westbound,
            Axis::Horizontal,
            Vec2::new(width + LANE_OVERRUN, cy + LANE_CENTER_OFFSET),
            Vec2::new(-LANE_OVERRUN, cy + LANE_CENTER_OFFSET),
        ),
        Lane::new(
            LaneId::Southbound,
            Axis::Vertical,
            Vec2::new(cx + LANE_CENTER_OFFSET, -LANE_OVERRUN),
            Vec2::new(cx + LANE_CENTER_OFFSET, height + LANE_OVERRUN),
        ),
        Lane::new(
            LaneId::Northbound,
            Axis::Vertical,
            Vec2::new(cx - LANE_CENTER_OFFSET, height + LANE_OVERRUN),
            Vec2::new(cx - LANE_CENTER_OFFSET, -LANE_OVERRUN),
        ),
    ]
}
