use ratatui::style::Color;

/// Display preference chosen in the theme dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ThemePreference {
    Dark,
    Light,
    #[default]
    System,
}

impl ThemePreference {
    pub const ALL: [ThemePreference; 3] = [Self::Dark, Self::Light, Self::System];

    pub fn label(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
            Self::System => "System",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Dark => "🌙",
            Self::Light => "☀️",
            Self::System => "💻",
        }
    }
}

/// Colours every page draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub fg: Color,
    pub muted: Color,
    pub accent: Color,
    pub highlight_bg: Color,
    pub highlight_fg: Color,
    pub border: Color,
    pub rating: Color,
    pub error: Color,
    pub success: Color,
    pub link: Color,
}

impl Palette {
    pub const DARK: Palette = Palette {
        fg: Color::White,
        muted: Color::DarkGray,
        accent: Color::Cyan,
        highlight_bg: Color::DarkGray,
        highlight_fg: Color::White,
        border: Color::DarkGray,
        rating: Color::Yellow,
        error: Color::Red,
        success: Color::Green,
        link: Color::Blue,
    };

    pub const LIGHT: Palette = Palette {
        fg: Color::Black,
        muted: Color::Gray,
        accent: Color::Blue,
        highlight_bg: Color::Gray,
        highlight_fg: Color::Black,
        border: Color::Gray,
        rating: Color::Rgb(176, 112, 0),
        error: Color::Red,
        success: Color::Green,
        link: Color::Blue,
    };
}

/// In-memory theme state; lasts for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    preference: ThemePreference,
    system_is_light: bool,
}

impl ThemeStore {
    pub fn new(preference: ThemePreference) -> Self {
        let system_is_light = std::env::var("COLORFGBG")
            .map(|v| colorfgbg_is_light(&v))
            .unwrap_or(false);
        Self {
            preference,
            system_is_light,
        }
    }

    pub fn preference(&self) -> ThemePreference {
        self.preference
    }

    pub fn set(&mut self, preference: ThemePreference) {
        tracing::debug!(theme = preference.label(), "theme changed");
        self.preference = preference;
    }

    pub fn palette(&self) -> Palette {
        let light = match self.preference {
            ThemePreference::Dark => false,
            ThemePreference::Light => true,
            ThemePreference::System => self.system_is_light,
        };
        if light { Palette::LIGHT } else { Palette::DARK }
    }
}

/// `COLORFGBG` is `"fg;bg"` (sometimes `"fg;x;bg"`); backgrounds 7 and 15 are light.
fn colorfgbg_is_light(value: &str) -> bool {
    value
        .rsplit(';')
        .next()
        .and_then(|bg| bg.trim().parse::<u8>().ok())
        .is_some_and(|bg| bg == 7 || bg == 15)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorfgbg_parsing() {
        assert!(colorfgbg_is_light("0;15"));
        assert!(colorfgbg_is_light("0;default;7"));
        assert!(!colorfgbg_is_light("15;0"));
        assert!(!colorfgbg_is_light("garbage"));
    }

    #[test]
    fn test_explicit_preference_overrides_system() {
        let mut store = ThemeStore {
            preference: ThemePreference::System,
            system_is_light: true,
        };
        assert_eq!(store.palette(), Palette::LIGHT);
        store.set(ThemePreference::Dark);
        assert_eq!(store.preference(), ThemePreference::Dark);
        assert_eq!(store.palette(), Palette::DARK);
    }

    #[test]
    fn test_labels_and_icons() {
        let labels: Vec<_> = ThemePreference::ALL.iter().map(|t| t.label()).collect();
        assert_eq!(labels, vec!["Dark", "Light", "System"]);
        assert_eq!(ThemePreference::Dark.icon(), "🌙");
    }
}
