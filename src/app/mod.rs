use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use log::{error, info};
use venom_atlas::{ChartConfig, ItemId, ItemRepository, Session};

mod chart;
mod render_utils;
mod ui;

type LoadResult = Result<ItemRepository, String>;

pub struct VenomAtlasApp {
    data_path: PathBuf,
    config: ChartConfig,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    session: Session,
    /// Search box contents; the session only sees it through commands.
    search: String,
    /// Item whose tooltip is open.
    selected: Option<Selection>,
    show_help: bool,
    /// "Click for more info" hint, shown until the first item click.
    show_hint: bool,
}

/// A tooltip only lives as long as the frame it was opened on.
struct Selection {
    id: ItemId,
    revision: u64,
}

impl VenomAtlasApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, data_path: PathBuf, config: ChartConfig) -> Self {
        let state = Self::start_load(data_path.clone());
        Self {
            data_path,
            config,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(data_path: PathBuf) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = ItemRepository::load(&data_path).map_err(|error| {
                error!(
                    "event=dataset_load_failed path={} error={error}",
                    data_path.display()
                );
                format!("{}: {error}", data_path.display())
            });
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(data_path: PathBuf) -> AppState {
        info!("event=dataset_load_started path={}", data_path.display());
        AppState::Loading {
            rx: Self::spawn_load(data_path),
        }
    }

    fn ready(&self, repository: ItemRepository) -> AppState {
        AppState::Ready(Box::new(ViewModel::new(
            Arc::new(repository),
            self.config.clone(),
        )))
    }
}

impl eframe::App for VenomAtlasApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => {
                        transition = Some(result);
                    }
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(Err("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading snake dataset...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                let mut retry = false;
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the snake dataset");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    retry = ui.button("Retry").clicked();
                });
                if retry {
                    self.state = Self::start_load(self.data_path.clone());
                    return;
                }
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.data_path, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.data_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => transition = Some(result),
                        Err(TryRecvError::Empty) => {
                            ctx.request_repaint();
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(Err("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(result) = transition {
            self.reload_rx = None;
            self.state = match result {
                Ok(repository) => self.ready(repository),
                Err(error) => AppState::Error(error),
            };
        }
    }
}
