use kiddo::KdTree;
use kiddo::SquaredEuclidean;

/// Which marker layer a hovered sample belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverAxis {
    Current,
    Power,
}

/// KD-tree over the on-screen sample markers of both axes, for
/// nearest-marker hover lookup.
pub struct HoverTree {
    tree: KdTree<f64, 2>,
    empty: bool,
}

impl HoverTree {
    /// Build from screen positions of the current and power markers.
    /// Non-finite positions are skipped. Items encode `index * 2 + axis`.
    pub fn build(current_markers: &[[f64; 2]], power_markers: &[[f64; 2]]) -> Self {
        let mut tree: KdTree<f64, 2> = KdTree::new();

        for (i, p) in current_markers.iter().enumerate() {
            if p[0].is_finite() && p[1].is_finite() {
                tree.add(p, (i * 2) as u64);
            }
        }
        for (i, p) in power_markers.iter().enumerate() {
            if p[0].is_finite() && p[1].is_finite() {
                tree.add(p, (i * 2 + 1) as u64);
            }
        }

        let empty = tree.size() == 0;
        Self { tree, empty }
    }

    /// Nearest marker to (qx, qy) as (sample_index, axis, distance).
    pub fn nearest(&self, qx: f64, qy: f64) -> Option<(usize, HoverAxis, f64)> {
        if self.empty {
            return None;
        }
        let result = self.tree.nearest_one::<SquaredEuclidean>(&[qx, qy]);
        let item = result.item as usize;
        let axis = if item % 2 == 0 { HoverAxis::Current } else { HoverAxis::Power };
        Some((item / 2, axis, result.distance.sqrt()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_marker() {
        let current = [[10.0, 10.0], [50.0, 12.0], [90.0, 40.0]];
        let power = [[10.0, 200.0], [50.0, 120.0], [90.0, 100.0]];
        let tree = HoverTree::build(&current, &power);

        let (idx, axis, dist) = tree.nearest(52.0, 12.0).unwrap();
        assert_eq!((idx, axis), (1, HoverAxis::Current));
        assert!((dist - 2.0).abs() < 1e-9);

        let (idx, axis, _) = tree.nearest(88.0, 105.0).unwrap();
        assert_eq!((idx, axis), (2, HoverAxis::Power));
    }

    #[test]
    fn test_empty_tree() {
        let tree = HoverTree::build(&[[f64::NAN, 1.0]], &[]);
        assert!(tree.nearest(0.0, 0.0).is_none());
    }
}
