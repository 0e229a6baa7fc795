use eframe::egui::{self, Slider, Ui};

use crate::util::format_count;

use super::ViewModel;

impl ViewModel {
    pub(super) fn controls_panel(
        &mut self,
        ui: &mut Ui,
        dataset_path: Option<&str>,
        reload_requested: &mut bool,
        is_reloading: bool,
    ) {
        ui.add_space(6.0);
        ui.heading("mention bubbles");
        ui.label(format!(
            "{} topics · {} mentions",
            self.dataset.topic_count(),
            format_count(self.dataset.total_mentions()),
        ));
        ui.separator();

        ui.checkbox(&mut self.paused, "Pause simulation");
        ui.checkbox(&mut self.show_quadtree_overlay, "Quadtree overlay");
        if ui.button("Respawn bubbles").clicked() {
            self.session.respawn();
        }
        ui.separator();

        ui.label("Physics");
        let config = self.session.config_mut();
        ui.add(Slider::new(&mut config.damping, 0.6..=0.98).text("damping"));
        ui.add(
            Slider::new(&mut config.base_pull, 0.0..=0.01)
                .fixed_decimals(4)
                .text("center pull"),
        );
        ui.add(Slider::new(&mut config.repulsion, 0.0..=0.6).text("repulsion"));
        ui.add(Slider::new(&mut config.spacing, 0.0..=16.0).text("spacing"));
        ui.separator();

        if let Some(path) = dataset_path {
            ui.label(egui::RichText::new(path).small().weak());
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(!is_reloading, egui::Button::new("Reload dataset"))
                    .clicked()
                {
                    *reload_requested = true;
                }
                if is_reloading {
                    ui.spinner();
                }
            });
        } else {
            ui.label(
                egui::RichText::new("built-in sample dataset")
                    .small()
                    .weak(),
            );
        }
    }
}
