use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2, pos2, vec2};

pub(super) const CHART_BACKGROUND: Color32 = Color32::from_rgb(246, 242, 232);
pub(super) const AXIS_COLOR: Color32 = Color32::from_rgb(40, 40, 40);

/// Uniform fit of the fixed chart coordinate space into a screen rect.
#[derive(Clone, Copy, Debug)]
pub(super) struct Viewport {
    pub(super) origin: Pos2,
    pub(super) fit: f32,
    pub(super) size: Vec2,
}

impl Viewport {
    pub(super) fn fit(rect: Rect, width: f64, height: f64) -> Self {
        let size = vec2(width as f32, height as f32);
        let fit = (rect.width() / size.x)
            .min(rect.height() / size.y)
            .max(0.05);
        let origin = rect.center() - size * fit * 0.5;

        Self { origin, fit, size }
    }

    pub(super) fn to_screen(self, x: f64, y: f64) -> Pos2 {
        self.origin + vec2(x as f32, y as f32) * self.fit
    }

    pub(super) fn to_chart(self, screen: Pos2) -> (f64, f64) {
        let chart = (screen - self.origin) / self.fit;
        (chart.x as f64, chart.y as f64)
    }

    pub(super) fn chart_rect(self) -> Rect {
        Rect::from_min_size(self.origin, self.size * self.fit)
    }

    pub(super) fn scaled(self, length: f64) -> f32 {
        length as f32 * self.fit
    }
}

pub(super) fn category_color(category: &str) -> Color32 {
    match category {
        "Elapidae" => Color32::from_rgb(196, 58, 49),
        "Viperidae" => Color32::from_rgb(201, 128, 36),
        "Colubridae" => Color32::from_rgb(62, 128, 74),
        "Atractaspididae" => Color32::from_rgb(86, 82, 160),
        _ => Color32::from_rgb(110, 110, 110),
    }
}

pub(super) fn label_color(category: &str) -> Color32 {
    blend_color(category_color(category), Color32::BLACK, 0.35)
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    let opacity = opacity.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        color.r(),
        color.g(),
        color.b(),
        (color.a() as f32 * opacity) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, viewport: Viewport, grid_rows: &[f32]) {
    let rect = viewport.chart_rect();
    painter.rect_filled(rect, 4.0, CHART_BACKGROUND);

    for &y in grid_rows {
        painter.line_segment(
            [pos2(rect.left(), y), pos2(rect.right(), y)],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 28)),
        );
    }
}

/// Straight line ending in a filled arrowhead at `end`.
pub(super) fn draw_arrow(painter: &Painter, start: Pos2, end: Pos2, stroke: Stroke, head: f32) {
    painter.line_segment([start, end], stroke);

    let direction = (end - start).normalized();
    if !direction.x.is_finite() || !direction.y.is_finite() {
        return;
    }
    let normal = vec2(-direction.y, direction.x);
    let base = end - direction * head;
    painter.add(eframe::egui::Shape::convex_polygon(
        vec![end, base + normal * head * 0.5, base - normal * head * 0.5],
        stroke.color,
        Stroke::NONE,
    ));
}
