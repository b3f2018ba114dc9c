use ratatui::style::{Color, Modifier, Style};

use crate::model::UiConfig;

/// Colors for the TUI, keyed by role. Any role can be overridden from
/// `[ui.colors]` in config.toml.
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    /// Panel titles and prompt input
    pub title: Color,
    /// Focused borders, scrollbar thumb, prompt labels
    pub accent: Color,
    /// Completed todos, unfocused borders, scrollbar track, hints
    pub muted: Color,
    pub error: Color,
    /// Confirmation questions
    pub question: Color,
    pub success: Color,
    pub selection_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x1A, 0x1B, 0x26),
            text: Color::Rgb(0xC0, 0xCA, 0xF5),
            title: Color::Rgb(0xFF, 0xFF, 0xFF),
            accent: Color::Rgb(0xFF, 0x9E, 0x64),
            muted: Color::Rgb(0x56, 0x5F, 0x89),
            error: Color::Rgb(0xF7, 0x76, 0x8E),
            question: Color::Rgb(0xE0, 0xAF, 0x68),
            success: Color::Rgb(0x9E, 0xCE, 0x6A),
            selection_bg: Color::Rgb(0x33, 0x46, 0x7C),
        }
    }
}

/// `#RRGGBB` or the short `#RGB` form
fn parse_color(value: &str) -> Option<Color> {
    let digits = value.strip_prefix('#')?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let rgb = u32::from_str_radix(digits, 16).ok()?;
    match digits.len() {
        6 => Some(Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)),
        3 => {
            let expand = |n: u32| (n & 0xF) as u8 * 0x11;
            Some(Color::Rgb(expand(rgb >> 8), expand(rgb >> 4), expand(rgb)))
        }
        _ => None,
    }
}

impl Theme {
    /// Default theme with the overrides from `[ui.colors]` applied.
    /// Unknown roles and unparseable colors are logged and skipped.
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();
        for (role, value) in &ui.colors {
            let Some(color) = parse_color(value) else {
                log::warn!("ignoring color {} = {:?}: expected #RRGGBB", role, value);
                continue;
            };
            let slot = match role.as_str() {
                "background" => &mut theme.background,
                "text" => &mut theme.text,
                "title" => &mut theme.title,
                "accent" => &mut theme.accent,
                "muted" => &mut theme.muted,
                "error" => &mut theme.error,
                "question" => &mut theme.question,
                "success" => &mut theme.success,
                "selection_bg" => &mut theme.selection_bg,
                _ => {
                    log::warn!("unknown theme color {:?}", role);
                    continue;
                }
            };
            *slot = color;
        }
        theme
    }

    /// Plain foreground on the theme background
    pub fn fg(&self, color: Color) -> Style {
        Style::default().fg(color).bg(self.background)
    }

    /// Style for the highlighted todo row
    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.title)
            .bg(self.selection_bg)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    }

    /// Style for an unselected todo row
    pub fn todo(&self, completed: bool) -> Style {
        if completed {
            self.fg(self.muted).add_modifier(Modifier::CROSSED_OUT)
        } else {
            self.fg(self.text)
        }
    }

    /// Border color for a panel, brighter when it has focus
    pub fn border(&self, active: bool) -> Style {
        self.fg(if active { self.accent } else { self.muted })
    }
}
