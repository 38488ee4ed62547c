use eframe::egui::{Pos2, Rect, vec2};
use venom_atlas::{Command, ItemId, Outcome};

use super::super::render_utils::Viewport;
use super::super::{Selection, ViewModel};
use super::CLOSE_BOX;

pub(in crate::app) struct TooltipLayout {
    pub(in crate::app) id: ItemId,
    pub(in crate::app) body: Rect,
    pub(in crate::app) close: Rect,
}

impl ViewModel {
    /// Item under the pointer; overlapping items resolve to the nearest
    /// center. Hit boxes follow the focus scale.
    pub(in crate::app) fn hovered_item(
        &self,
        pointer: Option<Pos2>,
        viewport: Viewport,
    ) -> Option<ItemId> {
        let (x, y) = viewport.to_chart(pointer?);
        self.session
            .frame()
            .points
            .iter()
            .filter(|point| point.has_finite_center())
            .filter_map(|point| {
                let half = point.extent * f64::from(self.session.scale(point.id())) / 2.0;
                let inside = (x - point.x).abs() <= half && (y - point.y).abs() <= half;
                inside.then(|| (point, (x - point.x).hypot(y - point.y)))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(point, _)| point.item.id.clone())
    }

    /// Forwards hover changes to the session as focus commands.
    pub(in crate::app) fn sync_focus(&mut self, hovered: Option<&ItemId>) -> bool {
        let current = self.session.focus().map(|focus| &focus.id);
        if current == hovered {
            return false;
        }

        let command = match hovered {
            Some(id) => Command::FocusEntered(id.clone()),
            None => Command::FocusLeft,
        };
        self.session.dispatch(command) == Outcome::FocusChanged
    }

    pub(in crate::app) fn tooltip_layout(&self, viewport: Viewport) -> Option<TooltipLayout> {
        let selection = self.selected.as_ref()?;
        let placement = self.session.tooltip_for(&selection.id)?;
        let (width, height) = self.session.config().tooltip_size;

        let body = Rect::from_min_size(
            viewport.to_screen(placement.x, placement.y),
            vec2(viewport.scaled(width), viewport.scaled(height)),
        );
        let inset = viewport.scaled(6.0);
        let side = viewport.scaled(CLOSE_BOX);
        let close = Rect::from_min_size(
            body.right_top() + vec2(-inset - side, inset),
            vec2(side, side),
        );

        Some(TooltipLayout {
            id: selection.id.clone(),
            body,
            close,
        })
    }

    /// Tooltips close when the frame they were opened on is replaced.
    pub(in crate::app) fn drop_stale_selection(&mut self) {
        let revision = self.session.frame().revision;
        if self
            .selected
            .as_ref()
            .is_some_and(|selection| selection.revision != revision)
        {
            self.selected = None;
        }
    }

    pub(in crate::app) fn handle_chart_click(
        &mut self,
        click: Option<Pos2>,
        hovered: Option<ItemId>,
        viewport: Viewport,
    ) {
        let Some(click) = click else {
            return;
        };

        if let Some(layout) = self.tooltip_layout(viewport) {
            if layout.close.expand(2.0).contains(click) {
                self.selected = None;
                return;
            }
            if layout.body.contains(click) {
                return;
            }
        }

        if let Some(id) = hovered {
            self.show_hint = false;
            self.selected = Some(Selection {
                id,
                revision: self.session.frame().revision,
            });
        }
    }
}
