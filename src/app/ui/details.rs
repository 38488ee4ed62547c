use eframe::egui::{self, RichText, Ui};
use venom_atlas::util::format_measure;
use venom_atlas::{Axis, Clause, Combinator, EmptyOrPolicy, Item, SizeTier};

use super::super::ViewModel;
use super::super::render_utils::{category_color, label_color};

fn clause_text(clause: &Clause) -> String {
    match clause {
        Clause::AxisAtMost { axis, max } => {
            format!("{} <= {}", axis.label(), format_measure(*max, axis.unit()))
        }
        Clause::CategoryIs(category) => format!("family is {category}"),
        Clause::NameEquals(name) => format!("name is \"{name}\""),
        Clause::NameContains(phrase) => format!("name contains \"{phrase}\""),
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Snake Details");
        ui.add_space(6.0);

        let shown = self
            .session
            .focus()
            .map(|focus| focus.id.as_str())
            .or(self.selected.as_ref().map(|selection| selection.id.as_str()))
            .and_then(|id| self.session.repository().get(id));
        match shown {
            Some(item) => Self::draw_item(ui, item),
            None => {
                ui.label("Hover a snake to isolate it, click it to pin its card.");
            }
        }

        ui.separator();
        ui.label(RichText::new("Icon size").strong());
        let extents = self.session.mapper().extents();
        for tier in [SizeTier::Small, SizeTier::Medium, SizeTier::Large] {
            ui.label(format!(
                "{}  ->  {}px icon",
                tier.legend(),
                extents.extent(tier)
            ));
        }

        ui.separator();
        ui.label(RichText::new("Active filters").strong());
        let registry = self.session.registry();
        let mut any_group = false;
        for (_, entry) in registry.iter() {
            let group = match entry.combinator {
                Combinator::And => "all",
                Combinator::Or => {
                    any_group = true;
                    "any"
                }
            };
            ui.label(format!("{group}: {}", clause_text(&entry.clause)));
        }
        if !any_group {
            ui.label(match registry.policy() {
                EmptyOrPolicy::RejectAll => "any: (no family enabled, nothing shown)",
                EmptyOrPolicy::PassAll => "any: (no family enabled, all families shown)",
            });
        }

        let excluded = self.session.repository().excluded();
        if !excluded.is_empty() {
            ui.separator();
            egui::CollapsingHeader::new(format!("Skipped records ({})", excluded.len()))
                .id_salt("skipped_records")
                .show(ui, |ui| {
                    for record in excluded {
                        ui.small(format!("{}: {}", record.id, record.reason));
                    }
                });
        }
    }

    fn draw_item(ui: &mut Ui, item: &Item) {
        ui.label(
            RichText::new(&item.display_name)
                .strong()
                .color(label_color(&item.category)),
        );
        ui.small(RichText::new(&item.id).italics());
        ui.add_space(6.0);

        ui.label(
            RichText::new(format!("Family: {}", item.category))
                .color(category_color(&item.category)),
        );
        for axis in Axis::ALL {
            ui.label(format!(
                "{}: {}",
                axis.label(),
                format_measure(item.metric(axis), axis.unit())
            ));
        }
        ui.label(format!("Maximum size: {}", format_measure(item.size_class, "cm")));

        let details = &item.details;
        for (label, value) in [
            ("Dentition", &details.dentition),
            ("Delivery", &details.method),
            ("Injection", &details.injection),
            ("Tested on", &details.tested_on),
        ] {
            if !value.is_empty() {
                ui.label(format!("{label}: {value}"));
            }
        }
    }
}
