use super::Frame;
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

const PROMPT: &str = "> ";

/// Render the command line and place the cursor after the input.
///
pub fn prompt(frame: &mut Frame, size: Rect, input: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::active_block_border_style())
        .title(Span::styled(
            "command · help · ctrl-c quits",
            styling::active_block_title_style(),
        ));
    let inner = block.inner(size);
    let line = Line::from(vec![
        Span::styled(PROMPT, styling::muted_text_style()),
        Span::styled(input.to_owned(), styling::normal_text_style()),
    ]);
    frame.render_widget(Paragraph::new(line).block(block), size);

    let column = (PROMPT.len() + input.chars().count()) as u16;
    if inner.width > 0 && inner.height > 0 {
        frame.set_cursor(inner.x + column.min(inner.width - 1), inner.y);
    }
}

/// Render the reply of the last command.
///
pub fn output(frame: &mut Frame, size: Rect, text: &str) {
    let style = if text.starts_with("error:") {
        styling::error_text_style()
    } else {
        styling::normal_text_style()
    };
    let lines: Vec<Line> = text
        .lines()
        .map(|line| Line::from(Span::styled(line.to_owned(), style)))
        .collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::normal_block_border_style());
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, size);
}
