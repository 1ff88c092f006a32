use super::centered_rect_fixed;
use crate::theme::{Palette, ThemePreference};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};

/// Result of the theme dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemePickerResult {
    /// User picked an option
    Select(ThemePreference),
    /// User closed the dropdown without choosing
    Cancel,
}

/// Dropdown listing the three theme options
#[derive(Debug, Clone)]
pub struct ThemePicker {
    /// Option currently under the cursor
    selected: usize,

    /// Preference in effect when the dropdown opened
    active: ThemePreference,
}

impl ThemePicker {
    pub fn new(active: ThemePreference) -> Self {
        let selected = ThemePreference::ALL
            .iter()
            .position(|t| *t == active)
            .unwrap_or(0);
        Self { selected, active }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ThemePickerResult> {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
                self.selected = (self.selected + 1) % ThemePreference::ALL.len();
                None
            }
            KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => {
                let len = ThemePreference::ALL.len();
                self.selected = (self.selected + len - 1) % len;
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => Some(ThemePickerResult::Select(
                ThemePreference::ALL[self.selected],
            )),
            KeyCode::Char('d') => Some(ThemePickerResult::Select(ThemePreference::Dark)),
            KeyCode::Char('l') => Some(ThemePickerResult::Select(ThemePreference::Light)),
            KeyCode::Char('s') => Some(ThemePickerResult::Select(ThemePreference::System)),
            KeyCode::Esc | KeyCode::Char('t') | KeyCode::Char('q') => {
                Some(ThemePickerResult::Cancel)
            }
            _ => None,
        }
    }

    pub fn render(&self, frame: &mut Frame, palette: &Palette) {
        let area = centered_rect_fixed(26, 5, frame.area());
        frame.render_widget(Clear, area);

        let items: Vec<ListItem> = ThemePreference::ALL
            .iter()
            .map(|t| {
                let check = if *t == self.active { " ✓" } else { "" };
                ListItem::new(Line::from(vec![
                    Span::raw(format!(" {} {}", t.icon(), t.label())),
                    Span::styled(check, Style::default().fg(palette.success)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(" Theme ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(palette.accent)),
            )
            .style(Style::default().fg(palette.fg))
            .highlight_style(
                Style::default()
                    .bg(palette.highlight_bg)
                    .fg(palette.highlight_fg)
                    .add_modifier(Modifier::BOLD),
            );

        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(picker: &mut ThemePicker, code: KeyCode) -> Option<ThemePickerResult> {
        picker.handle_key(KeyEvent::new(code, crossterm::event::KeyModifiers::NONE))
    }

    #[test]
    fn test_opens_on_active_option() {
        let mut picker = ThemePicker::new(ThemePreference::System);
        assert_eq!(
            press(&mut picker, KeyCode::Enter),
            Some(ThemePickerResult::Select(ThemePreference::System))
        );
    }

    #[test]
    fn test_cursor_wraps() {
        let mut picker = ThemePicker::new(ThemePreference::System);
        assert!(press(&mut picker, KeyCode::Down).is_none());
        assert_eq!(
            press(&mut picker, KeyCode::Enter),
            Some(ThemePickerResult::Select(ThemePreference::Dark))
        );
        press(&mut picker, KeyCode::Up);
        press(&mut picker, KeyCode::Up);
        assert_eq!(
            press(&mut picker, KeyCode::Enter),
            Some(ThemePickerResult::Select(ThemePreference::Light))
        );
    }

    #[test]
    fn test_shortcuts_and_cancel() {
        let mut picker = ThemePicker::new(ThemePreference::Dark);
        assert_eq!(
            press(&mut picker, KeyCode::Char('l')),
            Some(ThemePickerResult::Select(ThemePreference::Light))
        );
        assert_eq!(press(&mut picker, KeyCode::Esc), Some(ThemePickerResult::Cancel));
    }
}
