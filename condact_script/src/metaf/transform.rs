//! The 7-number affine transform an `EmbedNav` reference may carry.
//!
//! `{a b c d e f g}` maps a waypoint `(x, y)` to `(a·x + b·y + e,
//! c·x + d·y + f)` and `z` to `g + z`. Application is deferred until the
//! whole document has parsed, because the referenced route may not be
//! declared yet when the transform is read.

use condact_data::{NavRoute, Point};

use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub(super) struct NavTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
    pub g: f64,
}

impl NavTransform {
    /// Parse the braced field's inner text.
    pub fn parse(text: &str, line: usize) -> Result<Self, ParseError> {
        let mut nums = Vec::with_capacity(7);
        for word in text.split_whitespace() {
            let value: f64 = word.parse().map_err(|_| ParseError::Value {
                line,
                expected: "a transform number",
                actual: word.to_string(),
            })?;
            nums.push(value);
        }
        if nums.len() != 7 {
            return Err(ParseError::Value {
                line,
                expected: "7 transform numbers",
                actual: text.to_string(),
            });
        }
        Ok(Self {
            a: nums[0],
            b: nums[1],
            c: nums[2],
            d: nums[3],
            e: nums[4],
            f: nums[5],
            g: nums[6],
        })
    }

    pub fn apply_point(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.b * p.y + self.e,
            self.c * p.x + self.d * p.y + self.f,
            self.g + p.z,
        )
    }

    /// A fresh route with every waypoint moved; the input is untouched.
    /// Follow routes have no geometry and pass through as clones.
    pub fn apply_route(&self, route: &NavRoute) -> NavRoute {
        match route.nodes() {
            Some(nodes) => route.with_nodes(
                nodes
                    .iter()
                    .map(|node| node.at_point(self.apply_point(node.point())))
                    .collect(),
            ),
            None => route.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use condact_data::NavNode;

    #[test]
    fn identity_with_offset_shifts_points() {
        let t = NavTransform::parse("1 0 0 1 10 20 5", 1).unwrap();
        assert_eq!(t.apply_point(Point::new(0.0, 0.0, 0.0)), Point::new(10.0, 20.0, 5.0));
    }

    #[test]
    fn apply_route_leaves_original_alone() {
        let route = NavRoute::Circular(vec![NavNode::Point(Point::new(1.0, 1.0, 0.0))]);
        let t = NavTransform::parse("0 -1 1 0 0 0 0", 1).unwrap();
        let moved = t.apply_route(&route);
        assert_eq!(route.nodes().unwrap()[0].point(), Point::new(1.0, 1.0, 0.0));
        assert_eq!(moved.nodes().unwrap()[0].point(), Point::new(-1.0, 1.0, 0.0));
    }

    #[test]
    fn wrong_arity_is_rejected() {
        assert!(matches!(
            NavTransform::parse("1 2 3", 4),
            Err(ParseError::Value { line: 4, .. })
        ));
    }
}
