//! キーコード表現
//!
//! 修飾キー集合と基本キーの組を単一のディスパッチキーとして扱う。
//! crosstermイベントからの変換と、設定ファイル向けの文字列表現を提供。

use crossterm::event::{KeyCode as CrosstermKeyCode, KeyEvent, KeyModifiers as CrosstermModifiers};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 修飾キーの組み合わせ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    /// 修飾キーなし
    pub const NONE: Self = Self { ctrl: false, alt: false, shift: false };
    /// Ctrlのみ
    pub const CTRL: Self = Self { ctrl: true, alt: false, shift: false };
    /// Shiftのみ
    pub const SHIFT: Self = Self { ctrl: false, alt: false, shift: true };
    /// Altのみ
    pub const ALT: Self = Self { ctrl: false, alt: true, shift: false };
    /// Ctrl+Shift
    pub const CTRL_SHIFT: Self = Self { ctrl: true, alt: false, shift: true };
    /// Alt+Shift
    pub const ALT_SHIFT: Self = Self { ctrl: false, alt: true, shift: true };

    pub fn is_empty(&self) -> bool {
        !self.ctrl && !self.alt && !self.shift
    }
}

/// 基本キーコード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
    Esc,
    Unknown,
}

/// キーコード（修飾キー集合 + 基本キー）
///
/// 等価性・ハッシュは構造的。ディスパッチテーブルのキーとして使用する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chord {
    /// 修飾キー
    pub modifiers: Modifiers,
    /// 基本キー
    pub code: KeyCode,
}

impl Chord {
    pub fn new(modifiers: Modifiers, code: KeyCode) -> Self {
        Self { modifiers, code }
    }

    /// 修飾キーなし
    pub fn plain(code: KeyCode) -> Self {
        Self::new(Modifiers::NONE, code)
    }

    /// Shift付き
    pub fn shift(code: KeyCode) -> Self {
        Self::new(Modifiers::SHIFT, code)
    }

    /// Ctrl付き
    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(Modifiers::CTRL, code)
    }

    /// Ctrl+Shift付き
    pub fn ctrl_shift(code: KeyCode) -> Self {
        Self::new(Modifiers::CTRL_SHIFT, code)
    }

    /// Alt+Shift付き
    pub fn alt_shift(code: KeyCode) -> Self {
        Self::new(Modifiers::ALT_SHIFT, code)
    }
}

/// crossterm統合
///
/// * Shift+Tab はターミナルからは `BackTab` として届くため shift+Tab に正規化
/// * Ctrl併用時の英字は端末側の大文字化に依存しないよう小文字へ正規化
impl From<KeyEvent> for Chord {
    fn from(event: KeyEvent) -> Self {
        let mut modifiers = Modifiers {
            ctrl: event.modifiers.contains(CrosstermModifiers::CONTROL),
            alt: event.modifiers.contains(CrosstermModifiers::ALT),
            shift: event.modifiers.contains(CrosstermModifiers::SHIFT),
        };

        let code = match event.code {
            CrosstermKeyCode::Char(c) if modifiers.ctrl => {
                KeyCode::Char(c.to_ascii_lowercase())
            }
            CrosstermKeyCode::Char(c) => KeyCode::Char(c),
            CrosstermKeyCode::Enter => KeyCode::Enter,
            CrosstermKeyCode::Backspace => KeyCode::Backspace,
            CrosstermKeyCode::Delete => KeyCode::Delete,
            CrosstermKeyCode::Tab => KeyCode::Tab,
            CrosstermKeyCode::BackTab => {
                modifiers.shift = true;
                KeyCode::Tab
            }
            CrosstermKeyCode::Up => KeyCode::Up,
            CrosstermKeyCode::Down => KeyCode::Down,
            CrosstermKeyCode::Left => KeyCode::Left,
            CrosstermKeyCode::Right => KeyCode::Right,
            CrosstermKeyCode::Home => KeyCode::Home,
            CrosstermKeyCode::End => KeyCode::End,
            CrosstermKeyCode::PageUp => KeyCode::PageUp,
            CrosstermKeyCode::PageDown => KeyCode::PageDown,
            CrosstermKeyCode::F(n) => KeyCode::F(n),
            CrosstermKeyCode::Esc => KeyCode::Esc,
            _ => KeyCode::Unknown,
        };

        Chord { modifiers, code }
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.ctrl {
            write!(f, "C-")?;
        }
        if self.modifiers.alt {
            write!(f, "M-")?;
        }
        if self.modifiers.shift {
            write!(f, "S-")?;
        }
        match self.code {
            KeyCode::Char(' ') => write!(f, "Space"),
            KeyCode::Char(c) => write!(f, "{}", c),
            KeyCode::Enter => write!(f, "Enter"),
            KeyCode::Backspace => write!(f, "Backspace"),
            KeyCode::Delete => write!(f, "Delete"),
            KeyCode::Tab => write!(f, "Tab"),
            KeyCode::Up => write!(f, "Up"),
            KeyCode::Down => write!(f, "Down"),
            KeyCode::Left => write!(f, "Left"),
            KeyCode::Right => write!(f, "Right"),
            KeyCode::Home => write!(f, "Home"),
            KeyCode::End => write!(f, "End"),
            KeyCode::PageUp => write!(f, "PageUp"),
            KeyCode::PageDown => write!(f, "PageDown"),
            KeyCode::F(n) => write!(f, "F{}", n),
            KeyCode::Esc => write!(f, "Esc"),
            KeyCode::Unknown => write!(f, "Unknown"),
        }
    }
}

/// コードパースエラー
#[derive(Debug, Clone, thiserror::Error)]
pub enum ChordParseError {
    #[error("Unknown key: {0}")]
    UnknownKey(String),

    #[error("Empty chord")]
    Empty,
}

/// 文字列表現からパース
///
/// 書式は `C-`（Ctrl）、`M-`（Alt）、`S-`（Shift）の接頭辞 + キー名。
/// 例: `C-Home`, `S-Tab`, `C-S-Space`, `F12`, `C-a`
impl FromStr for Chord {
    type Err = ChordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ChordParseError::Empty);
        }

        let mut modifiers = Modifiers::NONE;
        let mut remaining = s;

        loop {
            if let Some(rest) = remaining.strip_prefix("C-") {
                modifiers.ctrl = true;
                remaining = rest;
            } else if let Some(rest) = remaining.strip_prefix("M-") {
                modifiers.alt = true;
                remaining = rest;
            } else if let Some(rest) = remaining.strip_prefix("S-") {
                modifiers.shift = true;
                remaining = rest;
            } else {
                break;
            }
        }

        let code = match remaining {
            "" => return Err(ChordParseError::UnknownKey(s.to_string())),
            "Enter" => KeyCode::Enter,
            "Backspace" => KeyCode::Backspace,
            "Delete" => KeyCode::Delete,
            "Tab" => KeyCode::Tab,
            "Up" => KeyCode::Up,
            "Down" => KeyCode::Down,
            "Left" => KeyCode::Left,
            "Right" => KeyCode::Right,
            "Home" => KeyCode::Home,
            "End" => KeyCode::End,
            "PageUp" => KeyCode::PageUp,
            "PageDown" => KeyCode::PageDown,
            "Esc" => KeyCode::Esc,
            "Space" => KeyCode::Char(' '),
            f if f.len() >= 2 && f.starts_with('F') => {
                match f[1..].parse::<u8>() {
                    Ok(n) if (1..=24).contains(&n) => KeyCode::F(n),
                    _ => return Err(ChordParseError::UnknownKey(remaining.to_string())),
                }
            }
            c if c.chars().count() == 1 => {
                KeyCode::Char(c.chars().next().ok_or(ChordParseError::Empty)?)
            }
            _ => return Err(ChordParseError::UnknownKey(remaining.to_string())),
        };

        Ok(Chord { modifiers, code })
    }
}
