//! 編集サーフェス
//!
//! ディスパッチャが束縛される編集対象の識別情報。
//! バッファ本体は外部サービスが所有するため、ここでは識別子と
//! コンテンツ種別のみを保持する。

use serde::{Deserialize, Serialize};
use std::fmt;

/// テキストバッファの識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BufferId(pub u64);

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "buffer#{}", self.0)
    }
}

/// バッファのコンテンツ種別（例: "text", "rust", "markdown"）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentCategory(String);

impl ContentCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// プレーンテキスト種別
    pub fn text() -> Self {
        Self::new("text")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ディスパッチャ1つにつき1つの編集サーフェス
///
/// サーフェスの生存期間 = ディスパッチャの生存期間。複数サーフェス間で
/// 共有される状態はない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSurface {
    buffer: BufferId,
    category: ContentCategory,
}

impl EditSurface {
    pub fn new(buffer: BufferId, category: ContentCategory) -> Self {
        Self { buffer, category }
    }

    pub fn buffer(&self) -> BufferId {
        self.buffer
    }

    pub fn category(&self) -> &ContentCategory {
        &self.category
    }
}
