//! Smooth paths through control points.
//!
//! [`build`] turns an ordered list of points into a Catmull-Rom spline
//! expressed as cubic Bezier segments, the form vector renderers consume
//! directly. The curve passes through every input point and has a continuous
//! tangent at each of them.
//!
//! ```
//! use glam::Vec2;
//! use morphgen::spline::{build, PathCommand};
//!
//! let square = [
//!     Vec2::new(0.0, 0.0),
//!     Vec2::new(10.0, 0.0),
//!     Vec2::new(10.0, 10.0),
//!     Vec2::new(0.0, 10.0),
//! ];
//! let path = build(&square, 1.0, true);
//! assert_eq!(path.commands()[0], PathCommand::MoveTo(Vec2::ZERO));
//! assert_eq!(path.commands().last(), Some(&PathCommand::Close));
//! ```

use std::fmt::{self, Write as _};

use glam::Vec2;

use crate::params::ParamRange;

/// Valid tension values. 1.0 is a standard Catmull-Rom spline, 0.0 collapses
/// every segment to a straight line.
pub const TENSION: ParamRange = ParamRange::new(0.0, 2.0);

/// One drawing command with absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Vec2),
    CubicTo { ctrl1: Vec2, ctrl2: Vec2, to: Vec2 },
    LineTo(Vec2),
    Close,
}

impl PathCommand {
    /// Where the pen ends up after this command, if it moves.
    pub fn end_point(&self) -> Option<Vec2> {
        match *self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(p),
            PathCommand::CubicTo { to, .. } => Some(to),
            PathCommand::Close => None,
        }
    }

    /// Every coordinate the command carries, control points included.
    pub fn points(&self) -> impl Iterator<Item = Vec2> {
        let (points, len) = match *self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => ([p; 3], 1),
            PathCommand::CubicTo { ctrl1, ctrl2, to } => ([ctrl1, ctrl2, to], 3),
            PathCommand::Close => ([Vec2::ZERO; 3], 0),
        };
        points.into_iter().take(len)
    }
}

/// Ordered list of [`PathCommand`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn move_to(&mut self, p: Vec2) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(p));
        self
    }

    pub fn cubic_to(&mut self, ctrl1: Vec2, ctrl2: Vec2, to: Vec2) -> &mut Self {
        self.commands.push(PathCommand::CubicTo { ctrl1, ctrl2, to });
        self
    }

    pub fn line_to(&mut self, p: Vec2) -> &mut Self {
        self.commands.push(PathCommand::LineTo(p));
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.commands.last(), Some(PathCommand::Close))
    }

    /// First `MoveTo` coordinate.
    pub fn start_point(&self) -> Option<Vec2> {
        self.commands.iter().find_map(|c| match c {
            PathCommand::MoveTo(p) => Some(*p),
            _ => None,
        })
    }

    /// Where the pen is before any trailing `Close`.
    pub fn end_point(&self) -> Option<Vec2> {
        self.commands.iter().rev().find_map(PathCommand::end_point)
    }

    /// Axis-aligned bounds of every coordinate, control points included.
    pub fn bounds(&self) -> Option<(Vec2, Vec2)> {
        let mut points = self.commands.iter().flat_map(PathCommand::points);
        let first = points.next()?;
        Some(points.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }

    /// SVG path data with `precision` decimals.
    pub fn to_svg(&self, precision: usize) -> String {
        let mut out = String::new();
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            // Writing into a String cannot fail.
            let _ = match *command {
                PathCommand::MoveTo(p) => {
                    write!(out, "M {:.*} {:.*}", precision, p.x, precision, p.y)
                }
                PathCommand::LineTo(p) => {
                    write!(out, "L {:.*} {:.*}", precision, p.x, precision, p.y)
                }
                PathCommand::CubicTo { ctrl1, ctrl2, to } => write!(
                    out,
                    "C {:.*} {:.*}, {:.*} {:.*}, {:.*} {:.*}",
                    precision, ctrl1.x, precision, ctrl1.y,
                    precision, ctrl2.x, precision, ctrl2.y,
                    precision, to.x, precision, to.y,
                ),
                PathCommand::Close => write!(out, "Z"),
            };
        }
        out
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_svg(2))
    }
}

/// Build a Catmull-Rom spline through `points`.
///
/// Closed paths wrap neighbor lookups around the ends and finish with
/// [`PathCommand::Close`]; open paths clamp lookups to the first and last
/// point. No points gives an empty path.
pub fn build(points: &[Vec2], tension: f32, closed: bool) -> Path {
    let mut path = Path::new();
    let n = points.len();
    if n == 0 {
        return path;
    }

    let tension = TENSION.clamp(tension);
    let at = |i: isize| -> Vec2 {
        let index = if closed {
            i.rem_euclid(n as isize) as usize
        } else {
            i.clamp(0, n as isize - 1) as usize
        };
        points[index]
    };

    path.move_to(points[0]);

    let segments = if closed { n } else { n - 1 };
    for i in 0..segments as isize {
        let p0 = at(i - 1);
        let p1 = at(i);
        let p2 = at(i + 1);
        let p3 = at(i + 2);

        let ctrl1 = p1 + (p2 - p0) / 6.0 * tension;
        let ctrl2 = p2 - (p3 - p1) / 6.0 * tension;
        path.cubic_to(ctrl1, ctrl2, p2);
    }

    if closed {
        path.close();
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ]
    }

    #[test]
    fn test_empty_input() {
        assert!(build(&[], 1.0, true).is_empty());
        assert!(build(&[], 1.0, false).is_empty());
    }

    #[test]
    fn test_closed_square() {
        let path = build(&square(), 1.0, true);
        assert_eq!(path.len(), 6);
        assert_eq!(path.start_point(), Some(Vec2::ZERO));
        assert_eq!(path.end_point(), Some(Vec2::ZERO));
        assert!(path.is_closed());
    }

    #[test]
    fn test_closed_square_control_points() {
        let path = build(&square(), 1.0, true);
        match path.commands()[1] {
            PathCommand::CubicTo { ctrl1, ctrl2, to } => {
                // p0 = (0,10), p1 = (0,0), p2 = (10,0), p3 = (10,10)
                assert!(ctrl1.abs_diff_eq(Vec2::new(10.0 / 6.0, -10.0 / 6.0), 1e-5));
                assert!(ctrl2.abs_diff_eq(Vec2::new(10.0 - 10.0 / 6.0, -10.0 / 6.0), 1e-5));
                assert_eq!(to, Vec2::new(10.0, 0.0));
            }
            other => panic!("expected cubic, got {other:?}"),
        }
    }

    #[test]
    fn test_open_path() {
        let path = build(&square(), 1.0, false);
        assert_eq!(path.len(), 4);
        assert!(!path.is_closed());
        assert_eq!(path.end_point(), Some(Vec2::new(0.0, 10.0)));
    }

    #[test]
    fn test_passes_through_every_point() {
        let points = vec![
            Vec2::new(3.0, 1.0),
            Vec2::new(7.0, 4.0),
            Vec2::new(2.0, 9.0),
            Vec2::new(-4.0, 5.0),
            Vec2::new(-1.0, -2.0),
        ];
        let path = build(&points, 1.0, true);
        let anchors: Vec<Vec2> = path
            .commands()
            .iter()
            .filter_map(PathCommand::end_point)
            .collect();
        for p in &points {
            assert!(anchors.contains(p));
        }
    }

    #[test]
    fn test_tangent_continuity() {
        let points = vec![
            Vec2::new(3.0, 1.0),
            Vec2::new(7.0, 4.0),
            Vec2::new(2.0, 9.0),
            Vec2::new(-4.0, 5.0),
        ];
        let path = build(&points, 1.0, true);
        let cubics: Vec<(Vec2, Vec2, Vec2)> = path
            .commands()
            .iter()
            .filter_map(|c| match *c {
                PathCommand::CubicTo { ctrl1, ctrl2, to } => Some((ctrl1, ctrl2, to)),
                _ => None,
            })
            .collect();

        // The incoming and outgoing handles at each joint are collinear and equal length.
        for i in 0..cubics.len() {
            let (_, in_handle, joint) = cubics[i];
            let (out_handle, _, _) = cubics[(i + 1) % cubics.len()];
            assert!((joint - in_handle).abs_diff_eq(out_handle - joint, 1e-4));
        }
    }

    #[test]
    fn test_zero_tension_is_polyline() {
        let path = build(&square(), 0.0, false);
        match path.commands()[1] {
            PathCommand::CubicTo { ctrl1, ctrl2, to } => {
                assert_eq!(ctrl1, Vec2::ZERO);
                assert_eq!(ctrl2, to);
            }
            other => panic!("expected cubic, got {other:?}"),
        }
    }

    #[test]
    fn test_svg_output() {
        let mut path = build(&[Vec2::ZERO, Vec2::new(10.0, 0.0)], 1.0, false);
        path.line_to(Vec2::new(10.0, 5.0)).close();
        let svg = path.to_string();
        assert!(svg.starts_with("M 0.00 0.00 C "));
        assert!(svg.ends_with("L 10.00 5.00 Z"));
    }

    #[test]
    fn test_bounds() {
        let path = build(&square(), 1.0, true);
        let (min, max) = path.bounds().unwrap();
        let overshoot = 10.0 / 6.0 + 1e-4;
        assert!(min.x >= -overshoot && min.y >= -overshoot);
        assert!(max.x <= 10.0 + overshoot && max.y <= 10.0 + overshoot);
        assert!(Path::new().bounds().is_none());
    }

    #[test]
    fn test_bounds_include_control_points() {
        let mut path = Path::new();
        path.move_to(Vec2::ZERO)
            .cubic_to(Vec2::new(-5.0, 2.0), Vec2::new(3.0, 9.0), Vec2::ONE)
            .close();

        assert_eq!(path.bounds(), Some((Vec2::new(-5.0, 0.0), Vec2::new(3.0, 9.0))));
        assert_eq!(PathCommand::Close.points().count(), 0);
        assert_eq!(PathCommand::LineTo(Vec2::X).points().collect::<Vec<_>>(), [Vec2::X]);
    }
}
