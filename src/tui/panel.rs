/// Cursor state of the todo panel.
///
/// Both cursors are 1-based positions into the full sorted todo list.
/// Setters don't check bounds: callers keep `highlighted` within
/// `1..=len` (or 0 for an empty list) and `first_visible` such that the
/// highlighted row is on screen, see [`PanelState::clamp_to`] and
/// [`PanelState::scroll_into_view`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelState {
    pub highlighted: usize,
    pub first_visible: usize,
    /// Message of the todo highlighted during the last focused render
    pub last_saved_message: Option<String>,
    /// Item rows painted by the last render
    pub viewport_capacity: usize,
}

impl Default for PanelState {
    fn default() -> Self {
        PanelState {
            highlighted: 0,
            first_visible: 1,
            last_saved_message: None,
            viewport_capacity: 0,
        }
    }
}

impl PanelState {
    pub fn set_highlighted(&mut self, n: usize) {
        self.highlighted = n;
    }

    pub fn shift_highlighted(&mut self, delta: isize) {
        self.highlighted = self.highlighted.saturating_add_signed(delta);
    }

    pub fn set_first_visible(&mut self, n: usize) {
        self.first_visible = n;
    }

    pub fn shift_first_visible(&mut self, delta: isize) {
        self.first_visible = self.first_visible.saturating_add_signed(delta);
    }

    /// Row of the highlighted item relative to the first visible one
    pub fn relative_highlight_position(&self) -> isize {
        self.highlighted as isize - self.first_visible as isize
    }

    /// Pull the highlight back into `1..=len` (0 when empty)
    pub fn clamp_to(&mut self, len: usize) {
        if len == 0 {
            self.highlighted = 0;
            self.first_visible = 1;
        } else {
            self.highlighted = self.highlighted.clamp(1, len);
            self.first_visible = self.first_visible.clamp(1, len);
        }
    }

    /// Shift `first_visible` so the highlighted row is inside a viewport of
    /// `capacity` rows.
    pub fn scroll_into_view(&mut self, capacity: usize) {
        if capacity == 0 || self.highlighted == 0 {
            return;
        }
        let rel = self.relative_highlight_position();
        if rel < 0 {
            self.shift_first_visible(rel);
        } else if rel >= capacity as isize {
            self.shift_first_visible(rel - capacity as isize + 1);
        }
    }
}
