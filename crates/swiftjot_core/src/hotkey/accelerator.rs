//! Accelerator text (`Ctrl+Alt+J`) to hotkey config.

use crate::model::settings::HotkeyConfig;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Named keys: (display name, lowercase aliases, virtual key code).
const NAMED_KEYS: &[(&str, &[&str], u32)] = &[
    ("Space", &["space"], 0x20),
    ("Enter", &["enter", "return"], 0x0D),
    ("Tab", &["tab"], 0x09),
    ("Backspace", &["backspace", "back"], 0x08),
    ("Insert", &["insert", "ins"], 0x2D),
    ("Delete", &["delete", "del"], 0x2E),
    ("Home", &["home"], 0x24),
    ("End", &["end"], 0x23),
    ("PageUp", &["pageup", "pgup"], 0x21),
    ("PageDown", &["pagedown", "pgdn"], 0x22),
    ("Up", &["up", "arrowup"], 0x26),
    ("Down", &["down", "arrowdown"], 0x28),
    ("Left", &["left", "arrowleft"], 0x25),
    ("Right", &["right", "arrowright"], 0x27),
    ("`", &["`", "~", "oemtilde", "backquote"], 0xC0),
    ("-", &["-", "oemminus", "minus"], 0xBD),
    ("=", &["=", "oemplus", "equal"], 0xBB),
    ("[", &["[", "oemopenbrackets", "bracketleft"], 0xDB),
    ("]", &["]", "oemclosebrackets", "bracketright"], 0xDD),
    (";", &[";", "oemsemicolon", "semicolon"], 0xBA),
    ("'", &["'", "oemquotes", "quote"], 0xDE),
    (",", &[",", "oemcomma", "comma"], 0xBC),
    (".", &[".", "oemperiod", "period"], 0xBE),
    ("/", &["/", "oemquestion", "slash"], 0xBF),
    ("\\", &["\\", "oempipe", "backslash"], 0xDC),
];

/// Accelerator parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HotkeyParseError {
    Empty,
    UnknownKey(String),
    MissingKey,
    MultipleKeys(String, String),
}

impl Display for HotkeyParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "hotkey text is empty"),
            Self::UnknownKey(value) => write!(f, "unknown key: `{value}`"),
            Self::MissingKey => write!(f, "hotkey needs a non-modifier key"),
            Self::MultipleKeys(first, second) => {
                write!(f, "hotkey has more than one key: `{first}` and `{second}`")
            }
        }
    }
}

impl Error for HotkeyParseError {}

/// Resolves a key name to `(display name, virtual key code)`.
fn resolve_key(name: &str) -> Option<(String, u32)> {
    let lowered = name.trim().to_ascii_lowercase();
    let mut chars = lowered.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        if ch.is_ascii_alphabetic() {
            let upper = ch.to_ascii_uppercase();
            return Some((upper.to_string(), upper as u32));
        }
        if ch.is_ascii_digit() {
            return Some((ch.to_string(), ch as u32));
        }
    }

    // `D0`..`D9` as recorded by key-capture widgets.
    if let Some(digit) = lowered.strip_prefix('d').and_then(single_digit) {
        return Some((digit.to_string(), digit as u32));
    }

    if let Some(number) = lowered
        .strip_prefix('f')
        .and_then(|rest| rest.parse::<u32>().ok())
        .filter(|number| (1..=12).contains(number))
    {
        return Some((format!("F{number}"), 0x70 + number - 1));
    }

    NAMED_KEYS
        .iter()
        .find(|(_, aliases, _)| aliases.contains(&lowered.as_str()))
        .map(|(display, _, code)| (display.to_string(), *code))
}

fn single_digit(value: &str) -> Option<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if ch.is_ascii_digit() => Some(ch),
        _ => None,
    }
}

/// Returns the virtual key code for a key name, case-insensitively.
pub fn virtual_key_code(name: &str) -> Option<u32> {
    resolve_key(name).map(|(_, code)| code)
}

/// Parses `Ctrl+Alt+J`-style text into a hotkey config.
///
/// Modifier aliases: `ctrl|control`, `alt|option`, `shift`,
/// `win|super|meta|cmd`. Exactly one non-modifier key is required.
pub fn parse_accelerator(text: &str) -> Result<HotkeyConfig, HotkeyParseError> {
    if text.trim().is_empty() {
        return Err(HotkeyParseError::Empty);
    }

    let mut config = HotkeyConfig {
        use_ctrl: false,
        use_alt: false,
        use_shift: false,
        use_win: false,
        key_code: 0,
        key_display_name: String::new(),
    };
    let mut key: Option<String> = None;

    for part in text.split('+').map(str::trim).filter(|part| !part.is_empty()) {
        match part.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => config.use_ctrl = true,
            "alt" | "option" => config.use_alt = true,
            "shift" => config.use_shift = true,
            "win" | "super" | "meta" | "cmd" => config.use_win = true,
            _ => {
                let (display, code) = resolve_key(part)
                    .ok_or_else(|| HotkeyParseError::UnknownKey(part.to_string()))?;
                if let Some(existing) = key.replace(part.to_string()) {
                    return Err(HotkeyParseError::MultipleKeys(existing, part.to_string()));
                }
                config.key_code = code;
                config.key_display_name = display;
            }
        }
    }

    if key.is_none() {
        return Err(HotkeyParseError::MissingKey);
    }
    Ok(config)
}
