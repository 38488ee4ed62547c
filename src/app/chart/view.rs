use eframe::egui::{self, Align2, Color32, FontId, Painter, Sense, Stroke, Ui, pos2, vec2};
use venom_atlas::util::format_measure;
use venom_atlas::{Axis, SizeTier};

use super::super::ViewModel;
use super::super::render_utils::{
    AXIS_COLOR, Viewport, blend_color, category_color, draw_arrow, draw_background, label_color,
    with_opacity,
};

fn tick_label(value: f64) -> String {
    if value == 0.0 {
        "~0.01".to_owned()
    } else {
        value.to_string()
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_chart(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());
        let painter = ui.painter_at(rect);
        let viewport = {
            let config = self.session.config();
            Viewport::fit(rect, config.width, config.height)
        };

        self.drop_stale_selection();
        let hovered = self.hovered_item(response.hover_pos(), viewport);
        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }
        self.sync_focus(hovered.as_ref());
        if response.clicked_by(egui::PointerButton::Primary) {
            self.handle_chart_click(response.interact_pointer_pos(), hovered, viewport);
        }

        let vertical = self
            .session
            .mapper()
            .vertical_scale(&self.session.frame().domains);
        let y_ticks = vertical
            .ticks(5)
            .into_iter()
            .filter(|tick| *tick >= 0.0)
            .collect::<Vec<_>>();
        let grid_rows = y_ticks
            .iter()
            .map(|tick| viewport.to_screen(0.0, vertical.apply(*tick)).y)
            .collect::<Vec<_>>();

        draw_background(&painter, viewport, &grid_rows);
        self.draw_axes(&painter, viewport, &y_ticks);

        if self.session.frame().is_empty() {
            painter.text(
                viewport.to_screen(self.session.config().width / 2.0, 180.0),
                Align2::CENTER_CENTER,
                "No snakes match the current filters.",
                FontId::proportional(viewport.scaled(14.0)),
                Color32::from_gray(90),
            );
        } else {
            self.draw_points(ui, &painter, viewport);
            if self.show_hint {
                painter.text(
                    viewport.to_screen(110.0, 110.0),
                    Align2::LEFT_BOTTOM,
                    "Click for more info!",
                    FontId::proportional(viewport.scaled(14.0)),
                    AXIS_COLOR,
                );
            }
        }

        self.draw_tooltip(&painter, viewport);
    }

    fn draw_axes(&self, painter: &Painter, viewport: Viewport, y_ticks: &[f64]) {
        let config = self.session.config();
        let (width, height, baseline) = (config.width, config.height, config.baseline);
        let stroke = Stroke::new(viewport.scaled(1.0).max(1.0), AXIS_COLOR);
        let head = viewport.scaled(8.0);

        draw_arrow(
            painter,
            viewport.to_screen(100.0, baseline),
            viewport.to_screen(width - 5.0, baseline),
            stroke,
            head,
        );
        let center_x = width / 2.0;
        draw_arrow(
            painter,
            viewport.to_screen(center_x, baseline),
            viewport.to_screen(center_x, 35.0),
            stroke,
            head,
        );

        let vertical = self
            .session
            .mapper()
            .vertical_scale(&self.session.frame().domains);
        let tick_font = FontId::proportional(viewport.scaled(10.0));
        for &tick in y_ticks {
            let at = viewport.to_screen(center_x, vertical.apply(tick));
            painter.line_segment([at - vec2(viewport.scaled(6.0), 0.0), at], stroke);
            painter.text(
                at - vec2(viewport.scaled(9.0), 0.0),
                Align2::RIGHT_CENTER,
                tick_label(tick),
                tick_font.clone(),
                AXIS_COLOR,
            );
        }

        painter.text(
            viewport.to_screen(12.0, baseline),
            Align2::LEFT_BOTTOM,
            "TOXICITY",
            FontId::proportional(viewport.scaled(24.0)),
            AXIS_COLOR,
        );
        painter.text(
            viewport.to_screen(12.0, baseline + 2.0),
            Align2::LEFT_TOP,
            format!("BASED ON {} IN {}", Axis::MetricA.label(), Axis::MetricA.unit()),
            FontId::proportional(viewport.scaled(10.0)),
            AXIS_COLOR,
        );
        painter.text(
            viewport.to_screen(center_x, 25.0),
            Align2::CENTER_BOTTOM,
            Axis::MetricB.label().to_uppercase(),
            FontId::proportional(viewport.scaled(24.0)),
            AXIS_COLOR,
        );

        let midpoint = format_measure(
            self.session.limit(Axis::MetricA) / 2.0,
            Axis::MetricA.unit(),
        );
        for (x, text) in [
            (width / 4.0, format!("LD50 > {midpoint}")),
            (width - width / 4.0, format!("LD50 < {midpoint}")),
        ] {
            painter.text(
                viewport.to_screen(x, height - 3.0),
                Align2::CENTER_BOTTOM,
                text,
                FontId::proportional(viewport.scaled(11.0)),
                AXIS_COLOR,
            );
        }
    }

    fn draw_points(&self, ui: &Ui, painter: &Painter, viewport: Viewport) {
        let frame = self.session.frame();
        let transition = self.session.config().transition_secs;
        let focused = self.session.focus().map(|focus| focus.id.as_str());

        // Focused item is painted last so it sits above its neighbors.
        let draw_order = frame
            .points
            .iter()
            .filter(|point| Some(point.id()) != focused)
            .chain(frame.points.iter().filter(|point| Some(point.id()) == focused));

        for point in draw_order {
            if !point.has_finite_center() {
                continue;
            }

            let id = point.id();
            let opacity = self.session.opacity(id);
            let scale = ui.ctx().animate_value_with_time(
                ui.make_persistent_id(("point-scale", id)),
                self.session.scale(id),
                transition,
            );

            let center = viewport.to_screen(point.x, point.y);
            let radius = viewport.scaled(point.extent) * scale * 0.5;
            let base = category_color(&point.item.category);

            painter.circle_filled(center, radius * 0.78, with_opacity(base, opacity));
            painter.circle_stroke(
                center,
                radius,
                Stroke::new(
                    match point.tier {
                        SizeTier::Small => 1.0,
                        SizeTier::Medium => 1.6,
                        SizeTier::Large => 2.2,
                    } * viewport.fit.max(0.6),
                    with_opacity(blend_color(base, Color32::BLACK, 0.2), opacity),
                ),
            );
            painter.text(
                center + vec2(radius + viewport.scaled(3.0), 0.0),
                Align2::LEFT_CENTER,
                &point.item.display_name,
                FontId::proportional(viewport.scaled(9.0) * scale),
                with_opacity(label_color(&point.item.category), opacity),
            );
        }
    }

    fn draw_tooltip(&self, painter: &Painter, viewport: Viewport) {
        let Some(layout) = self.tooltip_layout(viewport) else {
            return;
        };
        let Some(item) = self.session.repository().get(&layout.id) else {
            return;
        };

        painter.rect(
            layout.body,
            viewport.scaled(4.0),
            Color32::from_rgb(255, 253, 246),
            Stroke::new(1.0, AXIS_COLOR),
            egui::StrokeKind::Inside,
        );

        let close_stroke = Stroke::new(1.2, AXIS_COLOR);
        let close = layout.close;
        painter.line_segment([close.left_top(), close.right_bottom()], close_stroke);
        painter.line_segment([close.right_top(), close.left_bottom()], close_stroke);

        let pad = viewport.scaled(6.0);
        let line_height = viewport.scaled(11.0);
        let mut cursor = layout.body.left_top() + vec2(pad, pad);
        painter.text(
            cursor,
            Align2::LEFT_TOP,
            &item.display_name,
            FontId::proportional(viewport.scaled(11.0)),
            label_color(&item.category),
        );
        cursor.y += line_height * 1.5;

        let rows = [
            ("Binomial:", item.id.clone()),
            ("Family:", item.category.clone()),
            (
                "LD50:",
                format_measure(item.metric_a, Axis::MetricA.unit()),
            ),
            (
                "Venom yield:",
                format_measure(item.metric_b, Axis::MetricB.unit()),
            ),
            ("Maximum size:", format_measure(item.size_class, "cm")),
            ("Dentition type:", item.details.dentition.clone()),
        ];
        let font = FontId::proportional(viewport.scaled(8.5));
        let value_x = cursor.x + viewport.scaled(62.0);
        for (label, value) in rows {
            painter.text(cursor, Align2::LEFT_TOP, label, font.clone(), AXIS_COLOR);
            painter.text(
                pos2(value_x, cursor.y),
                Align2::LEFT_TOP,
                value,
                font.clone(),
                Color32::from_gray(20),
            );
            cursor.y += line_height;
        }
    }
}
