//! コマンドシステム
//!
//! 編集コマンドの識別子と、外部コマンド実行サービスへの静的型付き
//! インターフェースを定義。ディスパッチテーブルは enum タグを保持し、
//! 実行時に `CommandExecutor` のメソッドへ解決する。
//! 実行時の名前引きは行わない。

use crate::error::CommandError;
use crate::surface::{BufferId, ContentCategory};
use serde::{Deserialize, Serialize};
use std::fmt;

/// コマンド実行の結果
pub type CommandOutcome = std::result::Result<(), CommandError>;

/// パススルー継続
///
/// コマンドが「このイベントは処理しない」と宣言するための継続。
/// 一度宣言すれば確定し、繰り返し呼んでも結果は変わらない（冪等）。
#[derive(Debug, Default)]
pub struct Decline {
    declined: bool,
}

impl Decline {
    pub fn new() -> Self {
        Self::default()
    }

    /// イベントを処理しないことを宣言する
    pub fn decline(&mut self) {
        self.declined = true;
    }

    pub fn is_declined(&self) -> bool {
        self.declined
    }
}

/// コマンドの種類
///
/// 既定のディスパッチテーブルに登録される編集コマンドの識別子。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditorCommand {
    // カーソル移動
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    LineStart,
    LineEnd,
    LineStartExtendSelection,
    LineEndExtendSelection,
    DocumentStart,
    DocumentEnd,
    SelectAll,

    // コード操作
    GotoDefinition,
    RenameSymbol,
    Cancel,
    ParameterInfo,
    CommitUniqueCompletion,
    PreviousHighlightedReference,
    NextHighlightedReference,

    // 編集操作
    DeleteBackward,
    DeleteForward,
    DeleteWordBackward,
    DeleteWordForward,
    InsertNewline,
    Indent,
    Outdent,
    Paste,
}

impl EditorCommand {
    /// 設定ファイル・ログ向けのコマンド名
    pub fn name(&self) -> &'static str {
        match self {
            EditorCommand::MoveUp => "move-up",
            EditorCommand::MoveDown => "move-down",
            EditorCommand::PageUp => "page-up",
            EditorCommand::PageDown => "page-down",
            EditorCommand::LineStart => "line-start",
            EditorCommand::LineEnd => "line-end",
            EditorCommand::LineStartExtendSelection => "line-start-extend-selection",
            EditorCommand::LineEndExtendSelection => "line-end-extend-selection",
            EditorCommand::DocumentStart => "document-start",
            EditorCommand::DocumentEnd => "document-end",
            EditorCommand::SelectAll => "select-all",
            EditorCommand::GotoDefinition => "goto-definition",
            EditorCommand::RenameSymbol => "rename-symbol",
            EditorCommand::Cancel => "cancel",
            EditorCommand::ParameterInfo => "parameter-info",
            EditorCommand::CommitUniqueCompletion => "commit-unique-completion",
            EditorCommand::PreviousHighlightedReference => "previous-highlighted-reference",
            EditorCommand::NextHighlightedReference => "next-highlighted-reference",
            EditorCommand::DeleteBackward => "delete-backward",
            EditorCommand::DeleteForward => "delete-forward",
            EditorCommand::DeleteWordBackward => "delete-word-backward",
            EditorCommand::DeleteWordForward => "delete-word-forward",
            EditorCommand::InsertNewline => "insert-newline",
            EditorCommand::Indent => "indent",
            EditorCommand::Outdent => "outdent",
            EditorCommand::Paste => "paste",
        }
    }

    /// コマンドを対応する `CommandExecutor` メソッドへ解決して実行
    pub fn invoke(
        self,
        executor: &mut dyn CommandExecutor,
        buffer: BufferId,
        category: &ContentCategory,
        decline: &mut Decline,
    ) -> CommandOutcome {
        match self {
            EditorCommand::MoveUp => executor.move_up(buffer, category, decline),
            EditorCommand::MoveDown => executor.move_down(buffer, category, decline),
            EditorCommand::PageUp => executor.page_up(buffer, category, decline),
            EditorCommand::PageDown => executor.page_down(buffer, category, decline),
            EditorCommand::LineStart => executor.line_start(buffer, category, decline),
            EditorCommand::LineEnd => executor.line_end(buffer, category, decline),
            EditorCommand::LineStartExtendSelection => {
                executor.line_start_extend_selection(buffer, category, decline)
            }
            EditorCommand::LineEndExtendSelection => {
                executor.line_end_extend_selection(buffer, category, decline)
            }
            EditorCommand::DocumentStart => executor.document_start(buffer, category, decline),
            EditorCommand::DocumentEnd => executor.document_end(buffer, category, decline),
            EditorCommand::SelectAll => executor.select_all(buffer, category, decline),
            EditorCommand::GotoDefinition => executor.goto_definition(buffer, category, decline),
            EditorCommand::RenameSymbol => executor.rename_symbol(buffer, category, decline),
            EditorCommand::Cancel => executor.cancel(buffer, category, decline),
            EditorCommand::ParameterInfo => executor.parameter_info(buffer, category, decline),
            EditorCommand::CommitUniqueCompletion => {
                executor.commit_unique_completion(buffer, category, decline)
            }
            EditorCommand::PreviousHighlightedReference => {
                executor.previous_highlighted_reference(buffer, category, decline)
            }
            EditorCommand::NextHighlightedReference => {
                executor.next_highlighted_reference(buffer, category, decline)
            }
            EditorCommand::DeleteBackward => executor.delete_backward(buffer, category, decline),
            EditorCommand::DeleteForward => executor.delete_forward(buffer, category, decline),
            EditorCommand::DeleteWordBackward => {
                executor.delete_word_backward(buffer, category, decline)
            }
            EditorCommand::DeleteWordForward => {
                executor.delete_word_forward(buffer, category, decline)
            }
            EditorCommand::InsertNewline => executor.insert_newline(buffer, category, decline),
            EditorCommand::Indent => executor.indent(buffer, category, decline),
            EditorCommand::Outdent => executor.outdent(buffer, category, decline),
            EditorCommand::Paste => executor.paste(buffer, category, decline),
        }
    }
}

impl fmt::Display for EditorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// デフォルト実装用マクロ
///
/// 未実装コマンドはパススルーを宣言する。アダプタは対応するコマンドの
/// メソッドだけを上書きすればよい。
macro_rules! declining_default {
    ($($method:ident),* $(,)?) => {
        $(
            fn $method(
                &mut self,
                buffer: BufferId,
                category: &ContentCategory,
                decline: &mut Decline,
            ) -> CommandOutcome {
                let _ = (buffer, category);
                decline.decline();
                Ok(())
            }
        )*
    };
}

/// 外部コマンド実行サービスへの静的型付きインターフェース
///
/// コマンドごとに1メソッド。各メソッドは対象バッファ、コンテンツ種別、
/// パススルー継続を受け取る。エラーを返した場合、ディスパッチャは
/// イベントを未処理のまま残す（フェイルオープン）。
///
/// 対応していないコマンドのメソッドを上書きしない場合、既定実装が
/// パススルーを宣言するため、そのキーは下流へ伝播する。
pub trait CommandExecutor {
    declining_default!(
        move_up,
        move_down,
        page_up,
        page_down,
        line_start,
        line_end,
        line_start_extend_selection,
        line_end_extend_selection,
        document_start,
        document_end,
        select_all,
        goto_definition,
        rename_symbol,
        cancel,
        parameter_info,
        commit_unique_completion,
        previous_highlighted_reference,
        next_highlighted_reference,
        delete_backward,
        delete_forward,
        delete_word_backward,
        delete_word_forward,
        insert_newline,
        indent,
        outdent,
        paste,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CommandError;

    struct NoopExecutor;
    impl CommandExecutor for NoopExecutor {}

    struct SelectAllExecutor {
        invoked: Vec<EditorCommand>,
    }

    impl CommandExecutor for SelectAllExecutor {
        fn select_all(
            &mut self,
            _buffer: BufferId,
            _category: &ContentCategory,
            _decline: &mut Decline,
        ) -> CommandOutcome {
            self.invoked.push(EditorCommand::SelectAll);
            Ok(())
        }

        fn rename_symbol(
            &mut self,
            _buffer: BufferId,
            _category: &ContentCategory,
            _decline: &mut Decline,
        ) -> CommandOutcome {
            Err(CommandError::failed("rename service offline"))
        }
    }

    #[test]
    fn test_decline_is_idempotent() {
        let mut decline = Decline::new();
        assert!(!decline.is_declined());
        decline.decline();
        decline.decline();
        assert!(decline.is_declined());
    }

    #[test]
    fn test_default_executor_declines_everything() {
        let mut executor = NoopExecutor;
        let category = ContentCategory::text();
        let mut decline = Decline::new();

        let result =
            EditorCommand::MoveUp.invoke(&mut executor, BufferId(1), &category, &mut decline);
        assert!(result.is_ok());
        assert!(decline.is_declined());
    }

    #[test]
    fn test_invoke_routes_to_overridden_method() {
        let mut executor = SelectAllExecutor { invoked: Vec::new() };
        let category = ContentCategory::text();
        let mut decline = Decline::new();

        EditorCommand::SelectAll
            .invoke(&mut executor, BufferId(1), &category, &mut decline)
            .unwrap();
        assert_eq!(executor.invoked, vec![EditorCommand::SelectAll]);
        assert!(!decline.is_declined());
    }

    #[test]
    fn test_invoke_propagates_executor_error() {
        let mut executor = SelectAllExecutor { invoked: Vec::new() };
        let category = ContentCategory::text();
        let mut decline = Decline::new();

        let result = EditorCommand::RenameSymbol.invoke(
            &mut executor,
            BufferId(1),
            &category,
            &mut decline,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_command_names_match_serde_representation() {
        for command in [
            EditorCommand::MoveUp,
            EditorCommand::LineStartExtendSelection,
            EditorCommand::CommitUniqueCompletion,
            EditorCommand::Paste,
        ] {
            let json = serde_json::to_string(&command).unwrap();
            assert_eq!(json, format!("\"{}\"", command.name()));
        }
    }
}
