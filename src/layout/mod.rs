mod percent;
mod physics;
mod quadtree;
mod size;

use std::collections::HashSet;

use eframe::egui::{Vec2, vec2};

use crate::data::MentionRecord;
use crate::util::stable_pair;

use percent::sentiment_percentages;
pub use quadtree::QuadtreeCell;
use quadtree::{QuadItem, QuadRect, QuadTree};
use size::bubble_radius;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub title_height: f32,
}

impl Viewport {
    pub fn focal_point(self) -> Vec2 {
        // Biased below the title so the cluster hangs under the heading.
        vec2(
            self.width * 0.5,
            self.title_height + (self.height - self.title_height) * 0.4,
        )
    }

    pub(crate) fn play_region(self) -> QuadRect {
        QuadRect::new(
            vec2(self.width * 0.5, (self.title_height + self.height) * 0.5),
            vec2(self.width * 0.5, (self.height - self.title_height) * 0.5),
        )
    }

    fn play_min_dimension(self) -> f32 {
        self.width.min(self.height - self.title_height)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SentimentSplit {
    pub positive: u32,
    pub neutral: u32,
    pub negative: u32,
}

#[derive(Clone, Debug)]
pub struct Bubble {
    pub topic: String,
    pub magnitude: u64,
    pub split: SentimentSplit,
    pub radius: f32,
    pub pos: Vec2,
    pub vel: Vec2,
}

#[derive(Clone, Copy, Debug)]
pub struct PhysicsConfig {
    pub damping: f32,
    pub base_pull: f32,
    pub large_far_pull: f32,
    pub large_near_pull: f32,
    pub escape_gain: f32,
    pub large_ratio: f32,
    pub anchor_fraction: f32,
    pub spacing: f32,
    pub repulsion: f32,
    pub query_reach: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            base_pull: 0.0015,
            large_far_pull: 0.006,
            large_near_pull: 0.003,
            escape_gain: 1.5,
            large_ratio: 0.6,
            anchor_fraction: 0.25,
            spacing: 4.0,
            repulsion: 0.18,
            query_reach: 3.0,
        }
    }
}

#[derive(Default)]
struct PhysicsScratch {
    neighbors: Vec<usize>,
    seen_pairs: HashSet<(usize, usize)>,
}

pub struct LayoutSession {
    viewport: Viewport,
    bubbles: Vec<Bubble>,
    hovered: Option<String>,
    config: PhysicsConfig,
    tree: QuadTree,
    scratch: PhysicsScratch,
}

impl LayoutSession {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            bubbles: Vec::new(),
            hovered: None,
            config: PhysicsConfig::default(),
            tree: QuadTree::new(viewport.play_region()),
            scratch: PhysicsScratch::default(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Replaces the whole batch. Kinematic state does not survive a batch
    /// swap; every bubble respawns near the focal point.
    pub fn set_records(&mut self, records: &[MentionRecord]) {
        self.bubbles = records
            .iter()
            .map(|record| {
                let magnitude = record.magnitude();
                let (positive, neutral, negative) = sentiment_percentages(
                    record.positive,
                    record.neutral,
                    record.negative,
                    magnitude,
                );
                Bubble {
                    topic: record.topic.clone(),
                    magnitude,
                    split: SentimentSplit {
                        positive,
                        neutral,
                        negative,
                    },
                    radius: bubble_radius(magnitude, self.viewport.width),
                    pos: Vec2::ZERO,
                    vel: Vec2::ZERO,
                }
            })
            .collect();

        self.respawn();

        if let Some(hovered) = &self.hovered
            && !self.bubbles.iter().any(|bubble| &bubble.topic == hovered)
        {
            self.hovered = None;
        }
    }

    /// Resize barrier: radii are derived from the new width and the batch is
    /// respawned rather than reconciled with in-flight kinematics.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.tree = QuadTree::new(viewport.play_region());
        for bubble in &mut self.bubbles {
            bubble.radius = bubble_radius(bubble.magnitude, viewport.width);
        }
        self.respawn();
    }

    pub fn respawn(&mut self) {
        let focal = self.viewport.focal_point();
        let spread = vec2(
            self.viewport.width * 0.35,
            (self.viewport.height - self.viewport.title_height) * 0.35,
        );
        for bubble in &mut self.bubbles {
            let (jx, jy) = stable_pair(&bubble.topic);
            bubble.pos = focal + vec2(jx * spread.x, jy * spread.y);
            bubble.vel = vec2(jy, -jx) * 0.4;
        }
    }

    /// One integration tick: rebuild the spatial index from current
    /// positions, then run the physics pass over it.
    pub fn step(&mut self) {
        self.tree.clear();
        for (index, bubble) in self.bubbles.iter().enumerate() {
            self.tree.insert(QuadItem {
                index,
                center: bubble.pos,
                radius: bubble.radius,
            });
        }

        physics::step(
            &mut self.bubbles,
            &self.tree,
            self.viewport,
            self.config,
            &mut self.scratch,
        );
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub fn set_hovered(&mut self, topic: Option<&str>) {
        self.hovered = topic.map(str::to_owned);
    }

    pub fn hovered(&self) -> Option<&Bubble> {
        let hovered = self.hovered.as_deref()?;
        self.bubbles.iter().find(|bubble| bubble.topic == hovered)
    }

    pub fn config_mut(&mut self) -> &mut PhysicsConfig {
        &mut self.config
    }

    /// Cells of the index as built by the most recent `step`.
    pub fn quadtree_cells(&self, out: &mut Vec<QuadtreeCell>) {
        out.clear();
        self.tree.collect_cells(out);
    }
}
