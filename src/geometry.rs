//! Line rasterization, vector projection and world/screen transforms.

use glam::{IVec2, Vec2};

/// Bresenham walk from `start` to `end`, both endpoints included.
///
/// The iterator is finite and `Clone`, so a walk can be restarted by cloning
/// it before consumption.
#[derive(Debug, Clone)]
pub struct LinePixels {
    current: IVec2,
    end: IVec2,
    // Error terms in i64: saturated far endpoints would overflow i32.
    dx: i64,
    dy: i64,
    sx: i32,
    sy: i32,
    err: i64,
    done: bool,
}

impl LinePixels {
    pub fn new(start: IVec2, end: IVec2) -> Self {
        let dx = (i64::from(end.x) - i64::from(start.x)).abs();
        let dy = (i64::from(end.y) - i64::from(start.y)).abs();
        Self {
            current: start,
            end,
            dx,
            dy,
            sx: if start.x < end.x { 1 } else { -1 },
            sy: if start.y < end.y { 1 } else { -1 },
            err: dx - dy,
            done: false,
        }
    }
}

impl Iterator for LinePixels {
    type Item = IVec2;

    fn next(&mut self) -> Option<IVec2> {
        if self.done {
            return None;
        }
        let pixel = self.current;
        if pixel == self.end {
            self.done = true;
            return Some(pixel);
        }
        let e2 = 2 * self.err;
        if e2 > -self.dy {
            self.err -= self.dy;
            self.current.x += self.sx;
        }
        if e2 < self.dx {
            self.err += self.dx;
            self.current.y += self.sy;
        }
        Some(pixel)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        // Chebyshev distance to the end, plus the current pixel.
        let dx = (i64::from(self.end.x) - i64::from(self.current.x)).abs();
        let dy = (i64::from(self.end.y) - i64::from(self.current.y)).abs();
        let remaining = dx.max(dy) as usize + 1;
        (remaining, Some(remaining))
    }
}

/// Pixels on the segment between two points, floored to the pixel grid.
pub fn rasterize_line(start: Vec2, end: Vec2) -> LinePixels {
    LinePixels::new(start.floor().as_ivec2(), end.floor().as_ivec2())
}

/// Projection of `a` onto `b`. `None` when `b` has zero length.
pub fn project(a: Vec2, b: Vec2) -> Option<Vec2> {
    let denom = b.length_squared();
    if denom <= f32::EPSILON || !denom.is_finite() {
        return None;
    }
    Some(b * (a.dot(b) / denom))
}

/// Point `distance` away from `origin` along `angle` (radians).
pub fn ray_endpoint(origin: Vec2, distance: f32, angle: f32) -> Vec2 {
    origin + Vec2::from_angle(angle) * distance
}

/// World ⇄ screen mapping derived from the camera.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewTransform {
    /// Screen position of the world origin.
    pub offset: Vec2,
}

impl ViewTransform {
    pub fn new(offset: Vec2) -> Self {
        Self { offset }
    }

    pub fn world_to_screen(&self, point: Vec2) -> Vec2 {
        point + self.offset
    }

    pub fn screen_to_world(&self, point: Vec2) -> Vec2 {
        point - self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn walk(a: (i32, i32), b: (i32, i32)) -> Vec<IVec2> {
        LinePixels::new(IVec2::new(a.0, a.1), IVec2::new(b.0, b.1)).collect()
    }

    #[test]
    fn single_pixel_line() {
        assert_eq!(walk((3, 4), (3, 4)), vec![IVec2::new(3, 4)]);
    }

    #[test]
    fn horizontal_line_is_inclusive() {
        let pixels = walk((0, 0), (4, 0));
        assert_eq!(pixels.len(), 5);
        assert_eq!(pixels.first(), Some(&IVec2::new(0, 0)));
        assert_eq!(pixels.last(), Some(&IVec2::new(4, 0)));
    }

    #[test]
    fn shallow_line_matches_reference_walk() {
        // Reference tie-breaking for (0,0) -> (5,2).
        let expected = [(0, 0), (1, 0), (2, 1), (3, 1), (4, 2), (5, 2)];
        let expected: Vec<IVec2> = expected.iter().map(|&(x, y)| IVec2::new(x, y)).collect();
        assert_eq!(walk((0, 0), (5, 2)), expected);
    }

    #[rstest]
    #[case((0, 0), (7, 3))]
    #[case((2, -5), (-6, 9))]
    #[case((10, 10), (10, -4))]
    #[case((-3, 1), (4, 1))]
    #[case((0, 0), (5, 5))]
    fn reversed_walk_visits_same_pixels(#[case] a: (i32, i32), #[case] b: (i32, i32)) {
        let mut forward = walk(a, b);
        let mut backward = walk(b, a);
        assert_eq!(forward.len(), backward.len());
        forward.sort_by_key(|p| (p.x, p.y));
        backward.sort_by_key(|p| (p.x, p.y));
        assert_eq!(forward, backward);
    }

    #[test]
    fn cloned_walk_restarts() {
        let line = LinePixels::new(IVec2::ZERO, IVec2::new(6, -2));
        let first: Vec<_> = line.clone().collect();
        let second: Vec<_> = line.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn size_hint_is_exact() {
        let line = LinePixels::new(IVec2::ZERO, IVec2::new(9, 4));
        assert_eq!(line.size_hint().0, line.clone().count());
    }

    #[test]
    fn saturated_endpoint_walks_without_overflow() {
        let mut line = LinePixels::new(IVec2::new(40, 50), IVec2::new(i32::MIN, 5));
        assert_eq!(line.next(), Some(IVec2::new(40, 50)));
        assert_eq!(line.next(), Some(IVec2::new(39, 50)));
        assert_eq!(line.size_hint().0, 2_147_483_648 + 38 + 1);

        let far = rasterize_line(Vec2::new(10.5, 10.5), Vec2::new(1e12, -1e12));
        let first: Vec<IVec2> = far.take(3).collect();
        assert_eq!(first, vec![IVec2::new(10, 10), IVec2::new(11, 9), IVec2::new(12, 8)]);
    }

    #[test]
    fn projection_onto_axis() {
        let p = project(Vec2::new(3.0, 4.0), Vec2::new(0.0, 2.0)).unwrap();
        assert_relative_eq!(p.x, 0.0);
        assert_relative_eq!(p.y, 4.0);
    }

    #[test]
    fn projection_onto_zero_is_none() {
        assert!(project(Vec2::new(1.0, 1.0), Vec2::ZERO).is_none());
    }

    #[rstest]
    #[case(Vec2::new(0.0, 0.0), Vec2::new(400.0, -100.0))]
    #[case(Vec2::new(-12.5, 3.25), Vec2::new(0.0, 0.0))]
    #[case(Vec2::new(1e6, -1e6), Vec2::new(-812.0, 37.5))]
    fn view_transform_round_trips(#[case] p: Vec2, #[case] offset: Vec2) {
        let view = ViewTransform::new(offset);
        let back = view.world_to_screen(view.screen_to_world(p));
        assert_relative_eq!(back.x, p.x, max_relative = 1e-6);
        assert_relative_eq!(back.y, p.y, max_relative = 1e-6);
    }

    #[test]
    fn ray_endpoint_points_along_angle() {
        let end = ray_endpoint(Vec2::new(10.0, 10.0), 5.0, std::f32::consts::FRAC_PI_2);
        assert_relative_eq!(end.x, 10.0, epsilon = 1e-5);
        assert_relative_eq!(end.y, 15.0, epsilon = 1e-5);
    }
}
