mod layout;
mod render;
mod theme;

pub use layout::Layout;
pub use render::{progress_bar, render};
pub use theme::Theme;

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph},
};

use crate::wizard::Wizard;

const MIN_BOX_WIDTH: u16 = 50;

/// Draw the current screen centered on the wizard's viewport.
pub fn draw(frame: &mut Frame, wizard: &Wizard) {
    frame.render_widget(Clear, frame.area());

    let area = Layout::surface(frame.area(), wizard.viewport);
    let text = render(wizard);

    // Borders plus padding: 6 columns, 4 rows
    let width = (text.width() as u16).saturating_add(6).max(MIN_BOX_WIDTH);
    let height = (text.height() as u16).saturating_add(4);
    let rect = Layout::centered_box(area, width, height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(wizard.theme.border_style())
        .padding(Padding::new(2, 2, 1, 1));

    frame.render_widget(Paragraph::new(text).block(block), rect);
}
