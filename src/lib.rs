//! keychord - エディタ向けキーコードディスパッチ層
//!
//! 修飾キーと基本キーの組（コード）を編集コマンドへ振り分ける。
//! コマンドの実体はホストが注入する `CommandExecutor` が所有し、
//! 本クレートはルーティングと handled 判定のみを担当する。

// コアモジュール
pub mod chord;
pub mod command;
pub mod dispatcher;
pub mod error;
pub mod surface;

// 公開API
pub use chord::{Chord, ChordParseError, KeyCode, Modifiers};
pub use command::{CommandExecutor, CommandOutcome, Decline, EditorCommand};
pub use dispatcher::{DispatchTable, ExecutorProvider, KeyDownEvent, ShortcutDispatcher};
pub use error::{CommandError, DispatchError, Result};
pub use surface::{BufferId, ContentCategory, EditSurface};
