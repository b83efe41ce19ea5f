//! Single-line input field for new task titles

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use tui_input::Input;
use unicode_width::UnicodeWidthStr;

use crate::tui::styles::Theme;

/// Renders `prompt` followed by the input value.
///
/// While focused the character under the cursor is drawn in inverse video and
/// the value scrolls horizontally to keep the cursor visible. Unfocused and
/// empty, the placeholder is shown instead.
pub fn render_text_field(
    frame: &mut Frame,
    area: Rect,
    prompt: &str,
    input: &Input,
    is_focused: bool,
    placeholder: &str,
    theme: &Theme,
) {
    let prompt_width = (prompt.width() as u16 + 1).min(area.width);
    let [prompt_area, value_area] =
        Layout::horizontal([Constraint::Length(prompt_width), Constraint::Min(0)]).areas(area);

    let prompt_style = if is_focused {
        Style::default().fg(theme.accent).bold()
    } else {
        Style::default().fg(theme.dimmed)
    };
    frame.render_widget(Paragraph::new(Span::styled(prompt, prompt_style)), prompt_area);

    let value = input.value();
    if value.is_empty() && !is_focused {
        frame.render_widget(
            Paragraph::new(Span::styled(placeholder, Style::default().fg(theme.hint))),
            value_area,
        );
        return;
    }

    let value_style = Style::default().fg(theme.text);
    if !is_focused {
        frame.render_widget(
            Paragraph::new(Span::styled(value, value_style)),
            value_area,
        );
        return;
    }

    // Leave one column for the cursor block past the end of the text.
    let scroll = input.visual_scroll(value_area.width.saturating_sub(1) as usize);
    let cursor = input.cursor();
    let cursor_style = Style::default().fg(theme.background).bg(theme.accent);

    let before: String = value.chars().take(cursor).collect();
    let at_cursor: String = value
        .chars()
        .nth(cursor)
        .map(String::from)
        .unwrap_or_else(|| " ".to_string());
    let after: String = value.chars().skip(cursor + 1).collect();

    let line = Line::from(vec![
        Span::styled(before, value_style),
        Span::styled(at_cursor, cursor_style),
        Span::styled(after, value_style),
    ]);
    frame.render_widget(
        Paragraph::new(line).scroll((0, scroll as u16)),
        value_area,
    );
}
