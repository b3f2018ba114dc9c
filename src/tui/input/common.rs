use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map a base key to its US-layout shifted symbol.
/// Returns None if the key is not a shiftable symbol (or is already shifted).
fn shift_symbol(c: char) -> Option<char> {
    match c {
        '1' => Some('!'),
        '8' => Some('*'),
        '-' => Some('_'),
        '=' => Some('+'),
        ',' => Some('<'),
        '.' => Some('>'),
        '/' => Some('?'),
        _ => None,
    }
}

/// Normalize key events from terminals using the kitty keyboard protocol.
///
/// Kitty sends `Char('g') + SHIFT` for `G` and `Char('=') + SHIFT` for `+`.
/// Afterwards letters are uppercase and symbols are shifted with SHIFT
/// dropped, so handlers can match on the character alone.
pub(super) fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code
        && key.modifiers.contains(KeyModifiers::SHIFT)
    {
        if c.is_ascii_lowercase() {
            key.code = KeyCode::Char(c.to_ascii_uppercase());
        } else if let Some(shifted) = shift_symbol(c) {
            key.code = KeyCode::Char(shifted);
            key.modifiers.remove(KeyModifiers::SHIFT);
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shifted(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::SHIFT)
    }

    #[test]
    fn kitty_letters_are_uppercased() {
        assert_eq!(normalize_key(shifted('g')).code, KeyCode::Char('G'));
    }

    #[test]
    fn kitty_symbols_are_shifted() {
        let key = normalize_key(shifted('='));
        assert_eq!(key.code, KeyCode::Char('+'));
        assert_eq!(key.modifiers, KeyModifiers::NONE);
        assert_eq!(normalize_key(shifted('.')).code, KeyCode::Char('>'));
    }

    #[test]
    fn plain_keys_untouched() {
        let key = KeyEvent::new(KeyCode::Char('+'), KeyModifiers::NONE);
        assert_eq!(normalize_key(key), key);
    }
}
