mod all;
mod calendar;
mod detail;
mod list;
mod prompt;
mod rows;
mod sheet;
mod status;

use super::*;
use calendar::calendar;
use detail::detail;
use list::list;
use prompt::{output, prompt};
use sheet::sheet;
use status::status;

pub use all::all as render;

#[cfg(test)]
mod testing {
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::Terminal;

    /// Draw onto a `width` x `height` test terminal and return its buffer.
    ///
    pub fn draw<F>(width: u16, height: u16, render: F) -> Buffer
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(render).unwrap();
        terminal.backend().buffer().clone()
    }

    /// Screen rows as text with trailing blanks removed.
    ///
    pub fn rows(buffer: &Buffer) -> Vec<String> {
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| {
                let line: String = row.iter().map(|cell| cell.symbol()).collect();
                line.trim_end().to_owned()
            })
            .collect()
    }

    /// Index of the first row containing `text`.
    ///
    pub fn row_of(rows: &[String], text: &str) -> usize {
        rows.iter()
            .position(|row| row.contains(text))
            .unwrap_or_else(|| panic!("'{}' not on screen:\n{}", text, rows.join("\n")))
    }
}
