use std::path::Path;
use std::sync::Arc;

use eframe::egui::{self, Align, Context, Layout};
use venom_atlas::{ChartConfig, ItemRepository, Session};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn new(repository: Arc<ItemRepository>, config: ChartConfig) -> Self {
        Self {
            session: Session::new(repository, config),
            search: String::new(),
            selected: None,
            show_help: false,
            show_hint: true,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        data_path: &Path,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("venom-atlas");
                    ui.separator();
                    ui.label(format!("dataset: {}", data_path.display()));
                    ui.label(format!("snakes: {}", self.session.repository().len()));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload dataset"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.toggle_value(&mut self.show_help, "Help");
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!(
                            "visible: {}",
                            self.session.frame().points.len()
                        ));
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading snake dataset...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_chart(ui);
            }
        });

        egui::Window::new("How to read the chart")
            .open(&mut self.show_help)
            .default_width(380.0)
            .show(ctx, |ui| {
                ui.strong("Terminology");
                ui.label(
                    "LD50: amount of venom required to kill half of the test population. \
                     A smaller amount means a more potent venom.",
                );
                ui.label(
                    "Venom yield: dry weight of venom a snake injects in a single bite.",
                );
                ui.add_space(6.0);
                ui.strong("How to use");
                ui.label(
                    "Toggle snake families on the left. The max yield and LD50 sliders set \
                     the axis limits, so bigger values reveal more snakes. Type a name to \
                     search, hover a snake to isolate it from its neighbors and click it \
                     for details.",
                );
            });
    }
}
