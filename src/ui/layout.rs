use ratatui::layout::{Constraint, Direction, Layout as RatatuiLayout, Rect};

use crate::wizard::Viewport;

pub struct Layout;

impl Layout {
    /// The drawable area: the wizard's last known viewport, clipped to the
    /// frame. Falls back to the frame before the first resize event.
    pub fn surface(frame_area: Rect, viewport: Viewport) -> Rect {
        if viewport.width == 0 || viewport.height == 0 {
            return frame_area;
        }
        Rect::new(
            frame_area.x,
            frame_area.y,
            viewport.width.min(frame_area.width),
            viewport.height.min(frame_area.height),
        )
    }

    pub fn centered_box(area: Rect, width: u16, height: u16) -> Rect {
        let horizontal = RatatuiLayout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(width.min(area.width)),
                Constraint::Fill(1),
            ])
            .split(area);

        let vertical = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(height.min(area.height)),
                Constraint::Fill(1),
            ])
            .split(horizontal[1]);

        vertical[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_box_is_centered_and_clipped() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = Layout::centered_box(area, 60, 20);
        assert_eq!(rect, Rect::new(20, 10, 60, 20));

        let clipped = Layout::centered_box(Rect::new(0, 0, 30, 10), 60, 20);
        assert_eq!(clipped.width, 30);
        assert_eq!(clipped.height, 10);
    }

    #[test]
    fn surface_follows_viewport() {
        let frame = Rect::new(0, 0, 200, 60);
        assert_eq!(Layout::surface(frame, Viewport::default()), frame);
        assert_eq!(
            Layout::surface(frame, Viewport { width: 80, height: 24 }),
            Rect::new(0, 0, 80, 24)
        );
    }
}
