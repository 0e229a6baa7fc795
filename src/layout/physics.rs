use eframe::egui::{Vec2, vec2};

use super::quadtree::{QuadRect, QuadTree};
use super::{Bubble, PhysicsConfig, PhysicsScratch, Viewport};

pub(super) fn step(
    bubbles: &mut [Bubble],
    tree: &QuadTree,
    viewport: Viewport,
    config: PhysicsConfig,
    scratch: &mut PhysicsScratch,
) {
    if bubbles.is_empty() {
        return;
    }

    let focal = viewport.focal_point();
    let anchor_radius = viewport.play_min_dimension() * config.anchor_fraction;
    let mut max_radius = 0.0f32;
    for bubble in bubbles.iter() {
        max_radius = max_radius.max(bubble.radius);
    }

    for bubble in bubbles.iter_mut() {
        bubble.vel *= config.damping;
        bubble.pos += bubble.vel;
        bounce(bubble, viewport);
        attract(bubble, focal, anchor_radius, max_radius, config);
    }

    separate(bubbles, tree, config, scratch);
}

fn bounce(bubble: &mut Bubble, viewport: Viewport) {
    let min_x = bubble.radius;
    let max_x = viewport.width - bubble.radius;
    if bubble.pos.x < min_x {
        bubble.pos.x = min_x;
        bubble.vel.x = -bubble.vel.x;
    } else if bubble.pos.x > max_x {
        bubble.pos.x = max_x;
        bubble.vel.x = -bubble.vel.x;
    }

    let min_y = viewport.title_height + bubble.radius;
    let max_y = viewport.height - bubble.radius;
    if bubble.pos.y < min_y {
        bubble.pos.y = min_y;
        bubble.vel.y = -bubble.vel.y;
    } else if bubble.pos.y > max_y {
        bubble.pos.y = max_y;
        bubble.vel.y = -bubble.vel.y;
    }
}

fn attract(
    bubble: &mut Bubble,
    focal: Vec2,
    anchor_radius: f32,
    max_radius: f32,
    config: PhysicsConfig,
) {
    let to_focal = focal - bubble.pos;
    let is_large = max_radius > 0.0 && bubble.radius / max_radius >= config.large_ratio;

    let pull = if is_large {
        let distance = to_focal.length();
        if distance > anchor_radius {
            // The farther a dominant bubble escapes, the harder it is reeled
            // back in.
            let overshoot = (distance - anchor_radius) / anchor_radius.max(1.0);
            config.large_far_pull * (1.0 + overshoot * config.escape_gain)
        } else {
            config.large_near_pull
        }
    } else {
        config.base_pull
    };

    bubble.vel += to_focal * pull;
}

fn separate(
    bubbles: &mut [Bubble],
    tree: &QuadTree,
    config: PhysicsConfig,
    scratch: &mut PhysicsScratch,
) {
    let PhysicsScratch {
        neighbors,
        seen_pairs,
    } = scratch;
    seen_pairs.clear();

    for index in 0..bubbles.len() {
        let center = bubbles[index].pos;
        let reach = bubbles[index].radius * config.query_reach;

        neighbors.clear();
        tree.query_range(QuadRect::new(center, vec2(reach, reach)), neighbors);

        for &other in neighbors.iter() {
            if other == index {
                continue;
            }

            let key = if index < other {
                (index, other)
            } else {
                (other, index)
            };
            if !seen_pairs.insert(key) {
                continue;
            }

            let delta = bubbles[index].pos - bubbles[other].pos;
            let distance_sq = delta.length_sq();
            if distance_sq <= f32::EPSILON {
                // Coincident centers have no separation axis; skip the pair.
                continue;
            }

            let distance = distance_sq.sqrt();
            let min_distance = bubbles[index].radius + bubbles[other].radius + config.spacing;
            if distance >= min_distance {
                continue;
            }

            let push = delta * ((min_distance - distance) * config.repulsion / distance);
            bubbles[index].vel += push;
            bubbles[other].vel -= push;
        }
    }
}
