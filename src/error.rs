//! エラーハンドリングシステム
//!
//! ディスパッチ層全体で使用される統一されたエラー型を定義。
//! 構築時エラーは致命的、イベント処理中のエラーはパススルーへ縮退する。

use thiserror::Error;

/// ディスパッチャ全体のエラー型
#[derive(Error, Debug, Clone)]
pub enum DispatchError {
    /// コマンド実行サービスが取得できない（構築時・致命的）
    #[error("Command service unavailable: {reason}")]
    DependencyUnavailable { reason: String },

    /// コマンド実行エラー
    #[error("Command invocation failed")]
    Command(#[from] CommandError),
}

/// コマンド実行固有のエラー
///
/// `key_down` の内部で捕捉され、イベントは未処理のまま残る（フェイルオープン）。
/// 入力パイプラインを停止させることはない。
#[derive(Error, Debug, Clone)]
pub enum CommandError {
    #[error("Command failed: {message}")]
    Failed { message: String },

    #[error("Editor service disconnected")]
    ServiceDisconnected,
}

impl CommandError {
    /// メッセージ付きの実行エラーを作成
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed { message: message.into() }
    }
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, DispatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependency_unavailable_message_includes_reason() {
        let err = DispatchError::DependencyUnavailable {
            reason: "no language service for surface".to_string(),
        };
        assert!(err.to_string().contains("no language service"));
    }

    #[test]
    fn command_error_converts_into_dispatch_error() {
        let err: DispatchError = CommandError::failed("cursor out of range").into();
        assert!(matches!(err, DispatchError::Command(_)));
    }
}
