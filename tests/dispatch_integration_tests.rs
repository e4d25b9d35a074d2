// dispatch_integration_tests.rs - ディスパッチ統合テスト

use crossterm::event::{KeyCode as CrosstermKeyCode, KeyEvent, KeyModifiers as CrosstermModifiers};
use keychord::{
    BufferId, Chord, CommandExecutor, CommandOutcome, ContentCategory, Decline, DispatchError,
    EditSurface, EditorCommand, ExecutorProvider, KeyCode, KeyDownEvent, ShortcutDispatcher,
};
use std::cell::RefCell;
use std::rc::Rc;

/// select-all は処理し、goto-definition は辞退するフェイクサービス
struct FakeEditorService {
    log: Rc<RefCell<Vec<EditorCommand>>>,
}

impl CommandExecutor for FakeEditorService {
    fn select_all(
        &mut self,
        _buffer: BufferId,
        _category: &ContentCategory,
        _decline: &mut Decline,
    ) -> CommandOutcome {
        self.log.borrow_mut().push(EditorCommand::SelectAll);
        Ok(())
    }

    fn goto_definition(
        &mut self,
        _buffer: BufferId,
        _category: &ContentCategory,
        decline: &mut Decline,
    ) -> CommandOutcome {
        self.log.borrow_mut().push(EditorCommand::GotoDefinition);
        decline.decline();
        Ok(())
    }

    fn paste(
        &mut self,
        buffer: BufferId,
        category: &ContentCategory,
        _decline: &mut Decline,
    ) -> CommandOutcome {
        // 実行契約どおりバッファ識別子と種別が渡ることを確認
        assert_eq!(buffer, BufferId(42));
        assert_eq!(category.as_str(), "rust");
        self.log.borrow_mut().push(EditorCommand::Paste);
        Ok(())
    }
}

struct FakeHost {
    log: Rc<RefCell<Vec<EditorCommand>>>,
}

impl ExecutorProvider for FakeHost {
    fn executor_for(&self, _surface: &EditSurface) -> Option<Box<dyn CommandExecutor>> {
        Some(Box::new(FakeEditorService { log: self.log.clone() }))
    }
}

struct HostWithoutService;

impl ExecutorProvider for HostWithoutService {
    fn executor_for(&self, _surface: &EditSurface) -> Option<Box<dyn CommandExecutor>> {
        None
    }
}

fn rust_surface() -> EditSurface {
    EditSurface::new(BufferId(42), ContentCategory::new("rust"))
}

#[test]
fn test_dispatch_scenario() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let host = FakeHost { log: log.clone() };
    let mut dispatcher = ShortcutDispatcher::new(rust_surface(), &host).unwrap();

    // C-a: select-all が実行され、イベントは消費される
    let mut event = KeyDownEvent::new(Chord::ctrl(KeyCode::Char('a')));
    dispatcher.key_down(&mut event);
    assert!(event.handled);

    // F12: goto-definition は辞退するので未処理のまま
    let mut event = KeyDownEvent::new(Chord::plain(KeyCode::F(12)));
    dispatcher.key_down(&mut event);
    assert!(!event.handled);

    // Z: 未束縛。実行は試行されない
    let mut event = KeyDownEvent::new(Chord::plain(KeyCode::Char('z')));
    dispatcher.key_down(&mut event);
    assert!(!event.handled);

    assert_eq!(
        *log.borrow(),
        vec![EditorCommand::SelectAll, EditorCommand::GotoDefinition]
    );
}

#[test]
fn test_crossterm_event_to_dispatch() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let host = FakeHost { log: log.clone() };
    let mut dispatcher = ShortcutDispatcher::new(rust_surface(), &host).unwrap();

    // 端末イベント C-v がそのまま paste へ到達する
    let key_event = KeyEvent::new(CrosstermKeyCode::Char('v'), CrosstermModifiers::CONTROL);
    let mut event: KeyDownEvent = key_event.into();
    dispatcher.key_down(&mut event);

    assert!(event.handled);
    assert_eq!(*log.borrow(), vec![EditorCommand::Paste]);
}

#[test]
fn test_unimplemented_command_passes_through() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let host = FakeHost { log };
    let mut dispatcher = ShortcutDispatcher::new(rust_surface(), &host).unwrap();

    // FakeEditorService は insert-newline を上書きしていないため、
    // 既定実装がパススルーを宣言する
    let mut event = KeyDownEvent::new(Chord::plain(KeyCode::Enter));
    dispatcher.key_down(&mut event);
    assert!(!event.handled);
}

#[test]
fn test_upstream_priority_over_binding() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let host = FakeHost { log: log.clone() };
    let mut dispatcher = ShortcutDispatcher::new(rust_surface(), &host).unwrap();

    let mut event = KeyDownEvent::already_handled(Chord::ctrl(KeyCode::Char('a')));
    dispatcher.key_down(&mut event);

    assert!(event.handled);
    assert!(log.borrow().is_empty());
}

#[test]
fn test_host_without_service_fails_construction() {
    let result = ShortcutDispatcher::new(rust_surface(), &HostWithoutService);
    match result {
        Err(DispatchError::DependencyUnavailable { reason }) => {
            assert!(reason.contains("buffer#42"));
        }
        other => panic!("expected DependencyUnavailable, got {:?}", other.map(|_| ())),
    }
}
