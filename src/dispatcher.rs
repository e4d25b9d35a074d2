//! ショートカットディスパッチャ
//!
//! キーダウンイベントを高々1つの束縛コマンドへ振り分ける。
//! 優先順位は (a) 上流で既に処理済みのイベントはそのまま返す、
//! (b) ディスパッチテーブルでコードを引く、の固定順。

use crate::chord::{Chord, KeyCode};
use crate::command::{CommandExecutor, Decline, EditorCommand};
use crate::error::{DispatchError, Result};
use crate::surface::EditSurface;
use crossterm::event::KeyEvent;
use std::collections::HashMap;

/// キーダウン通知
///
/// `(修飾キー集合, キー, handled)` を運ぶ。ディスパッチャの唯一の
/// 観測可能な出力は `handled` フラグの更新。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDownEvent {
    /// 入力されたコード
    pub chord: Chord,
    /// 上流または本ディスパッチャで処理済みか
    pub handled: bool,
}

impl KeyDownEvent {
    /// 未処理のイベントを作成
    pub fn new(chord: Chord) -> Self {
        Self { chord, handled: false }
    }

    /// 上流で処理済みのイベントを作成
    pub fn already_handled(chord: Chord) -> Self {
        Self { chord, handled: true }
    }

    pub fn is_handled(&self) -> bool {
        self.handled
    }
}

impl From<KeyEvent> for KeyDownEvent {
    fn from(event: KeyEvent) -> Self {
        Self::new(event.into())
    }
}

/// ディスパッチテーブル
///
/// コード → コマンド識別子の写像。構築フェーズで登録し、以後は
/// 読み取り専用。同一コードへの再登録は黙って上書きする
/// （後勝ち、衝突は通知しない）。
#[derive(Debug, Clone, Default)]
pub struct DispatchTable {
    bindings: HashMap<Chord, EditorCommand>,
}

impl DispatchTable {
    /// 空のテーブルを作成
    pub fn new() -> Self {
        Self { bindings: HashMap::with_capacity(32) }
    }

    /// 既定の束縛一式を登録したテーブルを作成
    pub fn with_default_bindings() -> Self {
        let mut table = Self::new();
        table.register_default_bindings();
        table
    }

    /// コードへコマンドを束縛（再登録は後勝ち）
    pub fn bind(&mut self, chord: Chord, command: EditorCommand) {
        self.bindings.insert(chord, command);
    }

    /// コードを引く
    pub fn lookup(&self, chord: &Chord) -> Option<EditorCommand> {
        self.bindings.get(chord).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// 既定の束縛
    fn register_default_bindings(&mut self) {
        use EditorCommand::*;

        // カーソル移動
        self.bind(Chord::plain(KeyCode::Up), MoveUp);
        self.bind(Chord::plain(KeyCode::Down), MoveDown);
        self.bind(Chord::plain(KeyCode::PageUp), PageUp);
        self.bind(Chord::plain(KeyCode::PageDown), PageDown);

        self.bind(Chord::plain(KeyCode::Home), LineStart);
        self.bind(Chord::plain(KeyCode::End), LineEnd);
        self.bind(Chord::shift(KeyCode::Home), LineStartExtendSelection);
        self.bind(Chord::shift(KeyCode::End), LineEndExtendSelection);

        self.bind(Chord::ctrl(KeyCode::Home), DocumentStart);
        self.bind(Chord::ctrl(KeyCode::End), DocumentEnd);

        self.bind(Chord::ctrl(KeyCode::Char('a')), SelectAll);

        // コード操作
        self.bind(Chord::plain(KeyCode::F(12)), GotoDefinition);
        self.bind(Chord::plain(KeyCode::F(2)), RenameSymbol);
        self.bind(Chord::plain(KeyCode::Esc), Cancel);
        self.bind(Chord::ctrl_shift(KeyCode::Char(' ')), ParameterInfo);
        self.bind(Chord::ctrl(KeyCode::Char(' ')), CommitUniqueCompletion);

        self.bind(Chord::ctrl_shift(KeyCode::Down), PreviousHighlightedReference);
        self.bind(Chord::ctrl_shift(KeyCode::Up), NextHighlightedReference);

        // 編集操作
        self.bind(Chord::plain(KeyCode::Backspace), DeleteBackward);
        self.bind(Chord::plain(KeyCode::Delete), DeleteForward);
        self.bind(Chord::ctrl(KeyCode::Backspace), DeleteWordBackward);
        self.bind(Chord::ctrl(KeyCode::Delete), DeleteWordForward);

        self.bind(Chord::plain(KeyCode::Enter), InsertNewline);
        self.bind(Chord::plain(KeyCode::Tab), Indent);
        self.bind(Chord::shift(KeyCode::Tab), Outdent);

        self.bind(Chord::ctrl(KeyCode::Char('v')), Paste);

        // TODO: undo/redo は実行契約に繰り返し回数の引数が必要なため未登録。
        // `CommandExecutor` の契約を拡張してから束縛する。
    }
}

/// コマンド実行サービスの供給元
///
/// ホストがサーフェスごとに実行サービスを構築する。取得できない場合は
/// `None` を返し、ディスパッチャの構築が失敗する。
pub trait ExecutorProvider {
    fn executor_for(&self, surface: &EditSurface) -> Option<Box<dyn CommandExecutor>>;
}

/// ショートカットディスパッチャ
///
/// サーフェス1つにつき1インスタンス。テーブルは構築後は不変で、
/// イベント間で保持する状態はない。
pub struct ShortcutDispatcher {
    surface: EditSurface,
    executor: Box<dyn CommandExecutor>,
    table: DispatchTable,
}

impl ShortcutDispatcher {
    /// 新しいディスパッチャを作成
    ///
    /// 実行サービスが取得できない場合は `DependencyUnavailable` を返し、
    /// 部分的に使用可能なディスパッチャは作らない。
    pub fn new(surface: EditSurface, provider: &dyn ExecutorProvider) -> Result<Self> {
        let executor = provider.executor_for(&surface).ok_or_else(|| {
            DispatchError::DependencyUnavailable {
                reason: format!("no command executor for {}", surface.buffer()),
            }
        })?;

        Ok(Self {
            surface,
            executor,
            table: DispatchTable::with_default_bindings(),
        })
    }

    /// キーダウンイベントを処理
    ///
    /// 1. 上流で処理済みなら何もしない
    /// 2. 未束縛のコードはイベントに触れず伝播させる
    /// 3. 束縛コマンドを実行。既定の結果は「処理済み」
    /// 4. パススルー継続が呼ばれた、または実行がエラーを返した場合は
    ///    「未処理」のまま残す（フェイルオープン）
    pub fn key_down(&mut self, event: &mut KeyDownEvent) {
        if event.handled {
            return;
        }

        let Some(command) = self.table.lookup(&event.chord) else {
            log::trace!("unbound chord {} on {}", event.chord, self.surface.buffer());
            return;
        };

        let mut decline = Decline::new();
        let outcome = command.invoke(
            self.executor.as_mut(),
            self.surface.buffer(),
            self.surface.category(),
            &mut decline,
        );

        let handled = match outcome {
            Ok(()) => !decline.is_declined(),
            Err(err) => {
                // 壊れたコマンドはこのキーを食い潰さずパススルーへ縮退
                log::warn!(
                    "command {} failed on {}: {}",
                    command,
                    self.surface.buffer(),
                    err
                );
                false
            }
        };

        event.handled = handled;
    }

    pub fn surface(&self) -> &EditSurface {
        &self.surface
    }

    pub fn table(&self) -> &DispatchTable {
        &self.table
    }
}

impl std::fmt::Debug for ShortcutDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShortcutDispatcher")
            .field("surface", &self.surface)
            .field("bindings", &self.table.len())
            .finish()
    }
}
