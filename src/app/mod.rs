use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};

use crate::data::{MentionSet, load_mention_set, sample_mention_set};
use crate::layout::{LayoutSession, QuadtreeCell, Viewport};

mod controls;
mod view;

// Band reserved at the top of the canvas for the dataset heading; the
// play area starts below it.
const TITLE_HEIGHT: f32 = 64.0;

pub struct BubbleApp {
    dataset_path: Option<String>,
    state: AppState,
    reload_rx: Option<Receiver<Result<MentionSet, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<MentionSet, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    dataset: MentionSet,
    session: LayoutSession,
    paused: bool,
    show_quadtree_overlay: bool,
    overlay_cells: Vec<QuadtreeCell>,
    draw_order: Vec<usize>,
}

impl ViewModel {
    fn new(dataset: MentionSet) -> Self {
        // Placeholder viewport; the first frame applies the real canvas size.
        let mut session = LayoutSession::new(Viewport {
            width: 1280.0,
            height: 820.0,
            title_height: TITLE_HEIGHT,
        });
        session.set_records(&dataset.records);

        Self {
            dataset,
            session,
            paused: false,
            show_quadtree_overlay: false,
            overlay_cells: Vec::new(),
            draw_order: Vec::new(),
        }
    }

    fn show(
        &mut self,
        ctx: &Context,
        dataset_path: Option<&str>,
        reload_requested: &mut bool,
        is_reloading: bool,
    ) {
        egui::SidePanel::left("controls")
            .default_width(230.0)
            .show(ctx, |ui| {
                self.controls_panel(ui, dataset_path, reload_requested, is_reloading);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_canvas(ui);
        });
    }
}

impl BubbleApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, dataset_path: Option<String>) -> Self {
        let state = Self::start_load(dataset_path.clone());
        Self {
            dataset_path,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(dataset_path: Option<String>) -> Receiver<Result<MentionSet, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = match &dataset_path {
                Some(path) => load_mention_set(path).map_err(|error| format!("{error:#}")),
                None => Ok(sample_mention_set()),
            };
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(dataset_path: Option<String>) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(dataset_path),
        }
    }
}

impl eframe::App for BubbleApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(dataset) => AppState::Ready(Box::new(ViewModel::new(dataset))),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading mention dataset...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load mention dataset");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.dataset_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(
                    ctx,
                    self.dataset_path.as_deref(),
                    &mut reload_requested,
                    is_reloading,
                );

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.dataset_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(dataset) => AppState::Ready(Box::new(ViewModel::new(dataset))),
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
