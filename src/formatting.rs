use crate::category::CategoryWithCounts;
use terminal_size::{Width, terminal_size};
use yansi::Paint;

/// Color palette for consistent theming
pub struct ColorPalette {
    pub primary: (u8, u8, u8),   // IDs, muted text
    pub secondary: (u8, u8, u8), // Headers, notebook names
    pub timestamp: (u8, u8, u8), // Timestamps
    pub added: (u8, u8, u8),
    pub removed: (u8, u8, u8),
    pub modified: (u8, u8, u8),
}

impl ColorPalette {
    pub const CATPPUCCIN: Self = Self {
        primary: (108, 112, 134),   // Gray
        secondary: (148, 226, 213), // Teal
        timestamp: (137, 180, 250), // Blue
        added: (166, 227, 161),     // Green
        removed: (243, 139, 168),   // Red
        modified: (249, 226, 175),  // Yellow
    };
}

/// Formatting context passed through rendering pipeline
pub struct FormatContext {
    pub use_color: bool,
    pub palette: ColorPalette,
}

impl FormatContext {
    pub fn new(use_color: bool) -> Self {
        Self { use_color, palette: ColorPalette::CATPPUCCIN }
    }

    fn paint(&self, text: &str, (r, g, b): (u8, u8, u8), bold: bool) -> String {
        if !self.use_color {
            return text.to_string();
        }
        let painted = Paint::rgb(text, r, g, b);
        if bold { painted.bold().to_string() } else { painted.to_string() }
    }

    pub fn format_id(&self, id: &str) -> String {
        self.paint(id, self.palette.primary, false)
    }

    pub fn format_header(&self, text: &str) -> String {
        self.paint(text, self.palette.secondary, true)
    }

    pub fn format_timestamp(&self, ts: &str) -> String {
        self.paint(ts, self.palette.timestamp, false)
    }

    /// Color a diff line by its `+`, `-` or `~` marker.
    pub fn format_diff_line(&self, line: &str) -> String {
        let color = match line.chars().next() {
            Some('+') => self.palette.added,
            Some('-') => self.palette.removed,
            Some('~') => self.palette.modified,
            _ => return line.to_string(),
        };
        self.paint(line, color, false)
    }

    /// One indented line of the notebook tree.
    pub fn format_notebook_row(&self, entry: &CategoryWithCounts) -> String {
        let cat = &entry.category;
        format!(
            "{}{} ({}/{}) {}",
            "  ".repeat(cat.level),
            self.format_header(&cat.name),
            entry.direct_count,
            entry.total_count,
            self.format_id(&cat.id)
        )
    }
}

/// Width of the attached terminal, or 100 columns when not a tty.
pub fn terminal_columns() -> usize {
    terminal_size().map(|(Width(w), _)| w as usize).unwrap_or(100)
}

/// Truncate text to a width, appending an ellipsis when needed.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    let len = text.chars().count();
    if len <= max_width {
        return text.to_string();
    }
    if max_width == 1 {
        return "…".to_string();
    }
    let mut out =
        text.chars().take(max_width.saturating_sub(1)).collect::<String>();
    out.push('…');
    out
}

/// First non-empty line of `text`, or `[empty]`.
pub fn preview_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("[empty]")
        .to_string()
}
