use eframe::egui::{Vec2, vec2};

const NODE_CAPACITY: usize = 4;
const MAX_DEPTH: usize = 8;

#[derive(Clone, Copy, Debug)]
pub(crate) struct QuadRect {
    pub(crate) center: Vec2,
    pub(crate) half: Vec2,
}

impl QuadRect {
    pub(crate) fn new(center: Vec2, half: Vec2) -> Self {
        Self { center, half }
    }

    fn min(self) -> Vec2 {
        self.center - self.half
    }

    fn max(self) -> Vec2 {
        self.center + self.half
    }

    pub(crate) fn intersects(self, other: QuadRect) -> bool {
        (self.center.x - other.center.x).abs() <= self.half.x + other.half.x
            && (self.center.y - other.center.y).abs() <= self.half.y + other.half.y
    }

    pub(crate) fn intersects_circle(self, center: Vec2, radius: f32) -> bool {
        let min = self.min();
        let max = self.max();
        let closest = vec2(center.x.clamp(min.x, max.x), center.y.clamp(min.y, max.y));
        (center - closest).length_sq() <= radius * radius
    }

    fn contains_circle(self, center: Vec2, radius: f32) -> bool {
        let min = self.min();
        let max = self.max();
        center.x - radius >= min.x
            && center.x + radius <= max.x
            && center.y - radius >= min.y
            && center.y + radius <= max.y
    }

    fn quadrant(self, which: usize) -> QuadRect {
        let quarter = self.half * 0.5;
        let offset = match which {
            0 => vec2(-quarter.x, -quarter.y),
            1 => vec2(quarter.x, -quarter.y),
            2 => vec2(-quarter.x, quarter.y),
            _ => vec2(quarter.x, quarter.y),
        };

        QuadRect {
            center: self.center + offset,
            half: quarter,
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) struct QuadItem {
    pub(crate) index: usize,
    pub(crate) center: Vec2,
    pub(crate) radius: f32,
}

pub(crate) struct QuadTree {
    bounds: QuadRect,
    depth: usize,
    items: Vec<QuadItem>,
    children: Option<Box<[QuadTree; 4]>>,
}

#[derive(Clone, Copy)]
pub struct QuadtreeCell {
    pub center: Vec2,
    pub half: Vec2,
    pub depth: usize,
    pub is_leaf: bool,
}

impl QuadTree {
    pub(crate) fn new(bounds: QuadRect) -> Self {
        Self::node(bounds, 0)
    }

    fn node(bounds: QuadRect, depth: usize) -> Self {
        Self {
            bounds,
            depth,
            items: Vec::new(),
            children: None,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
        self.children = None;
    }

    pub(crate) fn insert(&mut self, item: QuadItem) -> bool {
        if !self.bounds.intersects_circle(item.center, item.radius) {
            return false;
        }

        if self.children.is_none() {
            if self.items.len() < NODE_CAPACITY || self.depth >= MAX_DEPTH {
                self.items.push(item);
                return true;
            }
            self.subdivide();
        }

        if let Some(children) = self.children.as_mut() {
            for child in children.iter_mut() {
                if child.bounds.contains_circle(item.center, item.radius) {
                    return child.insert(item);
                }
            }
        }

        // Straddles a quadrant boundary; keep it at this level.
        self.items.push(item);
        true
    }

    fn subdivide(&mut self) {
        let depth = self.depth + 1;
        self.children = Some(Box::new([
            Self::node(self.bounds.quadrant(0), depth),
            Self::node(self.bounds.quadrant(1), depth),
            Self::node(self.bounds.quadrant(2), depth),
            Self::node(self.bounds.quadrant(3), depth),
        ]));
    }

    pub(crate) fn query_range(&self, range: QuadRect, out: &mut Vec<usize>) {
        if !self.bounds.intersects(range) {
            return;
        }

        for item in &self.items {
            if range.intersects_circle(item.center, item.radius) {
                out.push(item.index);
            }
        }

        if let Some(children) = &self.children {
            for child in children.iter() {
                child.query_range(range, out);
            }
        }
    }

    pub(crate) fn collect_cells(&self, out: &mut Vec<QuadtreeCell>) {
        out.push(QuadtreeCell {
            center: self.bounds.center,
            half: self.bounds.half,
            depth: self.depth,
            is_leaf: self.children.is_none(),
        });

        if let Some(children) = &self.children {
            for child in children.iter() {
                child.collect_cells(out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_tree(extent: f32) -> QuadTree {
        QuadTree::new(QuadRect::new(vec2(extent, extent), vec2(extent, extent)))
    }

    fn lcg(seed: &mut u64) -> f32 {
        *seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((*seed >> 40) as f32) / (1u64 << 24) as f32
    }

    mod quad_rect {
        use super::*;

        #[test]
        fn intersects_overlapping_rects() {
            let a = QuadRect::new(vec2(0.0, 0.0), vec2(10.0, 10.0));
            let b = QuadRect::new(vec2(15.0, 0.0), vec2(10.0, 10.0));
            assert!(a.intersects(b));
        }

        #[test]
        fn rejects_disjoint_rects() {
            let a = QuadRect::new(vec2(0.0, 0.0), vec2(10.0, 10.0));
            let b = QuadRect::new(vec2(50.0, 0.0), vec2(10.0, 10.0));
            assert!(!a.intersects(b));
        }

        #[test]
        fn circle_touching_an_edge_intersects() {
            let rect = QuadRect::new(vec2(0.0, 0.0), vec2(10.0, 10.0));
            assert!(rect.intersects_circle(vec2(14.0, 0.0), 5.0));
            assert!(!rect.intersects_circle(vec2(16.0, 0.0), 5.0));
        }

        #[test]
        fn circle_near_a_corner_uses_true_distance() {
            let rect = QuadRect::new(vec2(0.0, 0.0), vec2(10.0, 10.0));
            // Corner is at (10, 10); center (13, 14) is exactly 5 away.
            assert!(rect.intersects_circle(vec2(13.0, 14.0), 5.0));
            assert!(!rect.intersects_circle(vec2(13.0, 14.0), 4.9));
        }

        #[test]
        fn contains_circle_requires_full_enclosure() {
            let rect = QuadRect::new(vec2(0.0, 0.0), vec2(10.0, 10.0));
            assert!(rect.contains_circle(vec2(0.0, 0.0), 10.0));
            assert!(!rect.contains_circle(vec2(6.0, 0.0), 5.0));
        }

        #[test]
        fn quadrants_partition_the_rect() {
            let rect = QuadRect::new(vec2(20.0, 20.0), vec2(20.0, 20.0));
            let quads = [
                rect.quadrant(0),
                rect.quadrant(1),
                rect.quadrant(2),
                rect.quadrant(3),
            ];
            for quad in quads {
                assert_eq!(quad.half, vec2(10.0, 10.0));
            }
            assert_eq!(quads[0].center, vec2(10.0, 10.0));
            assert_eq!(quads[3].center, vec2(30.0, 30.0));
        }
    }

    mod insert {
        use super::*;

        #[test]
        fn accepts_items_inside_the_bounds() {
            let mut tree = unit_tree(50.0);
            assert!(tree.insert(QuadItem {
                index: 0,
                center: vec2(20.0, 20.0),
                radius: 5.0,
            }));
        }

        #[test]
        fn rejects_items_outside_the_bounds() {
            let mut tree = unit_tree(50.0);
            assert!(!tree.insert(QuadItem {
                index: 0,
                center: vec2(200.0, 200.0),
                radius: 5.0,
            }));
        }

        #[test]
        fn subdivides_past_capacity() {
            let mut tree = unit_tree(50.0);
            for index in 0..NODE_CAPACITY + 1 {
                let offset = index as f32 * 3.0;
                assert!(tree.insert(QuadItem {
                    index,
                    center: vec2(10.0 + offset, 10.0),
                    radius: 1.0,
                }));
            }
            assert!(tree.children.is_some());
        }

        #[test]
        fn straddling_item_stays_at_the_parent() {
            let mut tree = unit_tree(50.0);
            for index in 0..NODE_CAPACITY {
                tree.insert(QuadItem {
                    index,
                    center: vec2(10.0, 10.0 + index as f32),
                    radius: 1.0,
                });
            }
            // Sits on the vertical midline, so no child can fully contain it.
            assert!(tree.insert(QuadItem {
                index: NODE_CAPACITY,
                center: vec2(50.0, 25.0),
                radius: 4.0,
            }));
            assert!(tree.children.is_some());
            assert!(tree.items.iter().any(|item| item.index == NODE_CAPACITY));
        }
    }

    mod query_range {
        use super::*;

        #[test]
        fn finds_items_overlapping_the_range() {
            let mut tree = unit_tree(50.0);
            tree.insert(QuadItem {
                index: 0,
                center: vec2(10.0, 10.0),
                radius: 4.0,
            });
            tree.insert(QuadItem {
                index: 1,
                center: vec2(90.0, 90.0),
                radius: 4.0,
            });

            let mut out = Vec::new();
            tree.query_range(QuadRect::new(vec2(12.0, 12.0), vec2(5.0, 5.0)), &mut out);
            assert_eq!(out, vec![0]);
        }

        #[test]
        fn finds_large_items_whose_circle_reaches_the_range() {
            let mut tree = unit_tree(50.0);
            tree.insert(QuadItem {
                index: 0,
                center: vec2(30.0, 30.0),
                radius: 25.0,
            });

            let mut out = Vec::new();
            // Range is far from the center but inside the circle's reach.
            tree.query_range(QuadRect::new(vec2(52.0, 30.0), vec2(2.0, 2.0)), &mut out);
            assert_eq!(out, vec![0]);
        }

        #[test]
        fn full_boundary_query_returns_every_item_exactly_once() {
            let extent = 200.0;
            let mut tree = unit_tree(extent);
            let mut seed = 7u64;
            let count = 300;
            for index in 0..count {
                let center = vec2(lcg(&mut seed) * extent * 2.0, lcg(&mut seed) * extent * 2.0);
                let radius = 1.0 + lcg(&mut seed) * 12.0;
                assert!(tree.insert(QuadItem {
                    index,
                    center,
                    radius,
                }));
            }

            let mut out = Vec::new();
            tree.query_range(QuadRect::new(vec2(extent, extent), vec2(extent, extent)), &mut out);
            assert_eq!(out.len(), count);
            out.sort_unstable();
            out.dedup();
            assert_eq!(out.len(), count);
        }

        #[test]
        fn dense_clusters_never_lose_items() {
            let mut tree = unit_tree(100.0);
            let count = 64;
            for index in 0..count {
                assert!(tree.insert(QuadItem {
                    index,
                    center: vec2(3.0, 3.0),
                    radius: 0.5,
                }));
            }

            let mut out = Vec::new();
            tree.query_range(QuadRect::new(vec2(100.0, 100.0), vec2(100.0, 100.0)), &mut out);
            assert_eq!(out.len(), count);
        }
    }

    mod clear {
        use super::*;

        #[test]
        fn drops_items_and_children() {
            let mut tree = unit_tree(50.0);
            for index in 0..NODE_CAPACITY * 3 {
                tree.insert(QuadItem {
                    index,
                    center: vec2(5.0 + index as f32 * 5.0, 40.0),
                    radius: 1.0,
                });
            }
            assert!(tree.children.is_some());

            tree.clear();
            assert!(tree.children.is_none());
            let mut out = Vec::new();
            tree.query_range(QuadRect::new(vec2(50.0, 50.0), vec2(50.0, 50.0)), &mut out);
            assert!(out.is_empty());
        }
    }
}
