use eframe::egui::{self, Key, RichText, Ui};
use venom_atlas::{Axis, Command};

use super::super::ViewModel;
use super::super::render_utils::category_color;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Filters");
        ui.separator();
        ui.add_space(4.0);

        self.draw_search(ui);
        ui.separator();

        ui.label("Families")
            .on_hover_text("Snakes from any enabled family are shown.");
        let categories = self.session.config().categories.clone();
        ui.horizontal_wrapped(|ui| {
            for category in categories {
                let mut enabled = self.session.category_enabled(&category);
                let label = RichText::new(&category).color(category_color(&category));
                if ui.toggle_value(&mut enabled, label).changed() {
                    self.session.dispatch(Command::ToggleCategory(category));
                }
            }
        });

        ui.separator();

        for axis in Axis::ALL {
            let (low, high) = self.session.config().limit_ranges.get(axis);
            let mut value = self.session.limit(axis);
            let slider = ui
                .add(
                    egui::Slider::new(&mut value, low..=high)
                        .step_by(1.0)
                        .clamping(egui::SliderClamping::Never)
                        .text(format!("Max {} ({})", axis.label(), axis.unit())),
                )
                .on_hover_text("Sets the axis maximum and hides snakes above it.");
            if slider.changed() {
                self.session
                    .dispatch(Command::SetAxisLimit { axis, max: value });
            }
        }
    }

    fn draw_search(&mut self, ui: &mut Ui) {
        ui.label("Search by common name");
        let mut clear = false;
        let response = ui
            .horizontal(|ui| {
                let response = ui.text_edit_singleline(&mut self.search);
                let has_name_filter = !self.session.search().query.is_empty();
                clear = ui
                    .add_enabled(
                        has_name_filter || !self.search.is_empty(),
                        egui::Button::new("Clear"),
                    )
                    .clicked();
                response
            })
            .inner
            .on_hover_text("Type to list matching snakes; press Enter to filter by the text.");

        if clear {
            self.search.clear();
            self.session.dispatch(Command::ClearSearch);
            return;
        }

        if response.changed() {
            self.session
                .dispatch(Command::SearchInput(self.search.clone()));
        }
        if response.lost_focus() && ui.input(|input| input.key_pressed(Key::Enter)) {
            self.session
                .dispatch(Command::SubmitSearch(self.search.clone()));
        }

        let suggestions = self.session.search().suggestions.clone();
        if suggestions.is_empty() {
            return;
        }

        let mut picked = None;
        egui::Frame::group(ui.style()).show(ui, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("search_suggestions")
                .max_height(220.0)
                .show(ui, |ui| {
                    for id in &suggestions {
                        let Some(item) = self.session.repository().get(id) else {
                            continue;
                        };
                        let label = RichText::new(&item.display_name)
                            .color(category_color(&item.category));
                        if ui
                            .selectable_label(false, label)
                            .on_hover_text(item.id.as_str())
                            .clicked()
                        {
                            picked = Some(id.clone());
                        }
                    }
                });
        });

        if let Some(id) = picked {
            self.session.dispatch(Command::PickSuggestion(id));
            self.search = self.session.search().query.clone();
        }
    }
}
