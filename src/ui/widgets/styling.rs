use crate::state::SyncStatus;
use ratatui::style::{Color, Modifier, Style};

/// Return the border style for the focused pane.
///
pub fn active_block_border_style() -> Style {
    Style::default().fg(Color::Cyan)
}

/// Return the border style for secondary blocks.
///
pub fn normal_block_border_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Return the title style for active blocks.
///
pub fn active_block_title_style() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

/// Return the style for normal text.
///
pub fn normal_text_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn muted_text_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn done_text_style() -> Style {
    muted_text_style().add_modifier(Modifier::CROSSED_OUT)
}

pub fn time_text_style() -> Style {
    Style::default().fg(Color::Cyan)
}

/// Return the style for today's date wherever it appears.
///
pub fn today_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

pub fn selected_day_style() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}

/// Return the style of the sync indicator.
///
pub fn sync_style(status: SyncStatus) -> Style {
    let color = match status {
        SyncStatus::Idle => Color::DarkGray,
        SyncStatus::Loading | SyncStatus::Syncing => Color::Yellow,
        SyncStatus::Synced => Color::Green,
        SyncStatus::Error => Color::Red,
    };
    Style::default().fg(color)
}

pub fn error_text_style() -> Style {
    Style::default().fg(Color::Red)
}
