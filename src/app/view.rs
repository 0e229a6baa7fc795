use std::f32::consts::TAU;

use eframe::egui::{
    self, Align2, Color32, FontId, Painter, Pos2, Rect, Sense, Shape, Stroke, Ui, vec2,
};

use crate::layout::{Bubble, QuadtreeCell, SentimentSplit, Viewport};
use crate::util::format_count;

use super::{TITLE_HEIGHT, ViewModel};

const POSITIVE_COLOR: Color32 = Color32::from_rgb(96, 189, 104);
const NEUTRAL_COLOR: Color32 = Color32::from_rgb(125, 135, 147);
const NEGATIVE_COLOR: Color32 = Color32::from_rgb(219, 99, 88);

impl ViewModel {
    pub(super) fn draw_canvas(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
        let painter = ui.painter_at(rect);

        painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

        let viewport = Viewport {
            width: rect.width(),
            height: rect.height(),
            title_height: TITLE_HEIGHT,
        };
        if viewport_changed(self.session.viewport(), viewport) {
            self.session.set_viewport(viewport);
        }

        if !self.paused {
            self.session.step();
            ui.ctx().request_repaint();
        }

        painter.text(
            rect.left_top() + vec2(16.0, TITLE_HEIGHT * 0.5),
            Align2::LEFT_CENTER,
            format!(
                "{} — {} topics, {} mentions",
                self.dataset.name,
                self.dataset.topic_count(),
                format_count(self.dataset.total_mentions()),
            ),
            FontId::proportional(20.0),
            Color32::from_gray(235),
        );
        painter.line_segment(
            [
                Pos2::new(rect.left(), rect.top() + TITLE_HEIGHT),
                Pos2::new(rect.right(), rect.top() + TITLE_HEIGHT),
            ],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(90, 100, 112, 90)),
        );

        let hovered_topic = response
            .hover_pos()
            .and_then(|pointer| hovered_topic(self.session.bubbles(), rect, pointer));
        self.session.set_hovered(hovered_topic.as_deref());
        if hovered_topic.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        if self.show_quadtree_overlay {
            self.session.quadtree_cells(&mut self.overlay_cells);
            draw_quadtree_overlay(&painter, rect, &self.overlay_cells);
        }

        // Largest bubbles first so small ones stay visible on top.
        self.draw_order.clear();
        self.draw_order.extend(0..self.session.bubbles().len());
        let bubbles = self.session.bubbles();
        self.draw_order
            .sort_by(|a, b| bubbles[*b].radius.total_cmp(&bubbles[*a].radius));

        for &index in &self.draw_order {
            let bubble = &bubbles[index];
            let center = rect.left_top() + bubble.pos;
            let is_hovered = hovered_topic.as_deref() == Some(bubble.topic.as_str());

            draw_sentiment_disk(&painter, center, bubble.radius, bubble.split);
            painter.circle_stroke(
                center,
                bubble.radius,
                Stroke::new(
                    if is_hovered { 2.2 } else { 1.0 },
                    if is_hovered {
                        Color32::from_gray(240)
                    } else {
                        Color32::from_rgba_unmultiplied(15, 15, 15, 190)
                    },
                ),
            );

            if bubble.radius >= 26.0 {
                painter.text(
                    center - vec2(0.0, 7.0),
                    Align2::CENTER_CENTER,
                    &bubble.topic,
                    FontId::proportional(12.0),
                    Color32::from_gray(245),
                );
                painter.text(
                    center + vec2(0.0, 8.0),
                    Align2::CENTER_CENTER,
                    format_count(bubble.magnitude),
                    FontId::proportional(11.0),
                    Color32::from_gray(210),
                );
            } else if bubble.radius >= 17.0 {
                painter.text(
                    center,
                    Align2::CENTER_CENTER,
                    &bubble.topic,
                    FontId::proportional(10.0),
                    Color32::from_gray(240),
                );
            }
        }

        if let Some(bubble) = self.session.hovered() {
            let split = bubble.split;
            painter.text(
                rect.left_bottom() + vec2(10.0, -10.0),
                Align2::LEFT_BOTTOM,
                format!(
                    "{}  |  {} mentions  |  {}% positive · {}% neutral · {}% negative",
                    bubble.topic,
                    format_count(bubble.magnitude),
                    split.positive,
                    split.neutral,
                    split.negative,
                ),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }
    }
}

fn viewport_changed(current: Viewport, next: Viewport) -> bool {
    (current.width - next.width).abs() > 0.5 || (current.height - next.height).abs() > 0.5
}

fn hovered_topic(bubbles: &[Bubble], rect: Rect, pointer: Pos2) -> Option<String> {
    bubbles
        .iter()
        .filter_map(|bubble| {
            let center = rect.left_top() + bubble.pos;
            let distance = center.distance(pointer);
            if distance <= bubble.radius {
                Some((bubble, distance))
            } else {
                None
            }
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(bubble, _distance)| bubble.topic.clone())
}

fn draw_sentiment_disk(painter: &Painter, center: Pos2, radius: f32, split: SentimentSplit) {
    let slices = [
        (split.positive, POSITIVE_COLOR),
        (split.neutral, NEUTRAL_COLOR),
        (split.negative, NEGATIVE_COLOR),
    ];

    let mut start_angle = -TAU / 4.0;
    for (percent, color) in slices {
        if percent == 0 {
            continue;
        }
        if percent == 100 {
            painter.circle_filled(center, radius, color);
            return;
        }

        let mut sweep = percent as f32 / 100.0 * TAU;
        // Sectors wider than a quarter turn are not convex; draw in chunks.
        while sweep > 1e-3 {
            let chunk = sweep.min(TAU / 4.0);
            draw_sector(painter, center, radius, start_angle, chunk, color);
            start_angle += chunk;
            sweep -= chunk;
        }
    }
}

fn draw_sector(
    painter: &Painter,
    center: Pos2,
    radius: f32,
    start_angle: f32,
    sweep: f32,
    color: Color32,
) {
    let steps = ((sweep / TAU * 64.0).ceil() as usize).max(2);
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for step in 0..=steps {
        let angle = start_angle + sweep * (step as f32 / steps as f32);
        points.push(center + vec2(angle.cos(), angle.sin()) * radius);
    }
    painter.add(Shape::convex_polygon(points, color, Stroke::NONE));
}

fn draw_quadtree_overlay(painter: &Painter, rect: Rect, cells: &[QuadtreeCell]) {
    for cell in cells {
        let min = rect.left_top() + (cell.center - cell.half);
        let max = rect.left_top() + (cell.center + cell.half);

        let alpha = if cell.is_leaf { 110 } else { 55 };
        let line_width = (1.4_f32 - (cell.depth as f32 * 0.12_f32)).clamp(0.45_f32, 1.4_f32);
        let stroke = Stroke::new(
            line_width,
            Color32::from_rgba_unmultiplied(106, 198, 255, alpha),
        );

        painter.line_segment([min, Pos2::new(max.x, min.y)], stroke);
        painter.line_segment([Pos2::new(max.x, min.y), max], stroke);
        painter.line_segment([max, Pos2::new(min.x, max.y)], stroke);
        painter.line_segment([Pos2::new(min.x, max.y), min], stroke);
    }
}
