mod common;

use pretty_assertions::assert_eq;

use common::{brace_indent, EchoEngine, FailEngine, MockEngine, RecordingEngine};
use restyle::config::Settings;
use restyle::editor::{EditableDocument, InMemoryDocument, Selection};
use restyle::options::ResolveContext;
use restyle::reformat::{reformat_selections, reformat_whole, run_reformat, ReformatRequest};
use restyle::report::{ErrorReporter, MemorySurface};

// ============================================================================
// Selection Reformatting
// ============================================================================

#[test]
fn test_caret_inside_open_block_gets_synthetic_brace() {
    // One unmatched `{` above the caret line: the formatter must see a
    // synthetic `{` prefix, and the result must have it stripped again.
    let mut doc = InMemoryDocument::with_selections(
        "int main(){\nreturn 0;\n}",
        vec![Selection::caret(14)],
    );
    let engine = RecordingEngine::default();

    reformat_selections(&mut doc, &engine, "--mode=c").unwrap();

    assert_eq!(engine.inputs.borrow().as_slice(), ["{\nreturn 0;"]);
    assert_eq!(doc.text(), "int main(){\n    return 0;\n}");
}

#[test]
fn test_collapsed_cursor_expands_to_whole_line() {
    let mut doc = InMemoryDocument::with_selections(
        "void f() {\n        x();\n}\n",
        vec![Selection::caret(13)],
    );
    reformat_selections(&mut doc, &MockEngine, "--mode=c").unwrap();
    assert_eq!(doc.text(), "void f() {\n    x();\n}\n");
}

#[test]
fn test_new_selection_spans_replaced_region() {
    let mut doc = InMemoryDocument::with_selections(
        "int main(){\nreturn 0;\n}",
        vec![Selection::caret(14)],
    );
    reformat_selections(&mut doc, &MockEngine, "--mode=c").unwrap();

    let sels = doc.selections();
    assert_eq!(sels.len(), 1);
    // Region started at offset 12 and now holds "    return 0;".
    assert_eq!(sels[0], Selection::new(12, 12 + "    return 0;".len()));
}

#[test]
fn test_reversed_selection_direction_preserved() {
    let mut doc = InMemoryDocument::with_selections(
        "int main(){\nreturn 0;\n}",
        vec![Selection::new(20, 13)],
    );
    reformat_selections(&mut doc, &MockEngine, "--mode=c").unwrap();

    let sels = doc.selections();
    assert!(sels[0].is_reversed());
    assert_eq!(sels[0].begin(), 12);
    assert_eq!(sels[0].end(), 12 + "    return 0;".len());
}

#[test]
fn test_depth_two_selection() {
    let source = "void f() {\n    if (a) {\nb();\n";
    let caret = source.find("b();").unwrap();
    let mut doc = InMemoryDocument::with_selections(source, vec![Selection::caret(caret)]);
    let engine = RecordingEngine::default();

    reformat_selections(&mut doc, &engine, "--mode=c").unwrap();

    // Exactly two synthetic braces, and none leak into the buffer.
    assert_eq!(engine.inputs.borrow().as_slice(), ["{{\nb();"]);
    assert_eq!(doc.text(), "void f() {\n    if (a) {\n        b();\n");
}

#[test]
fn test_negative_depth_formats_raw_region() {
    let source = "}\nint  x;\n";
    let caret = source.find("int").unwrap();
    let mut doc = InMemoryDocument::with_selections(source, vec![Selection::caret(caret)]);
    let engine = RecordingEngine::default();

    reformat_selections(&mut doc, &engine, "--mode=c").unwrap();

    // Depth is -1: no synthetic wrapping at all.
    assert_eq!(engine.inputs.borrow().as_slice(), ["int  x;"]);
}

#[test]
fn test_multiple_selections_processed_in_order() {
    let source = "void f() {\na();\n}\nvoid g() {\nb();\n}\n";
    let first = source.find("a();").unwrap();
    let second = source.find("b();").unwrap();
    let mut doc = InMemoryDocument::with_selections(
        source,
        vec![Selection::caret(first), Selection::caret(second)],
    );

    reformat_selections(&mut doc, &MockEngine, "--mode=c").unwrap();

    assert_eq!(doc.text(), "void f() {\n    a();\n}\nvoid g() {\n    b();\n}\n");

    // Selection set is rebuilt in the original order, each spanning its own
    // replacement, with later regions shifted by the earlier edit.
    let sels = doc.selections();
    assert_eq!(sels.len(), 2);
    let a_start = doc.text().find("    a();").unwrap();
    let b_start = doc.text().find("    b();").unwrap();
    assert_eq!(sels[0], Selection::new(a_start, a_start + "    a();".len()));
    assert_eq!(sels[1], Selection::new(b_start, b_start + "    b();".len()));
}

#[test]
fn test_two_carets_on_one_line_coalesce_into_one_edit() {
    // Both carets widen to the same line, so the region must be formatted
    // and replaced exactly once; a second replace against the already
    // shrunken buffer would read past its end.
    let mut doc = InMemoryDocument::with_selections(
        "{\n        x;",
        vec![Selection::caret(4), Selection::caret(7)],
    );
    let engine = RecordingEngine::default();

    reformat_selections(&mut doc, &engine, "--mode=c").unwrap();

    assert_eq!(engine.inputs.borrow().len(), 1);
    assert_eq!(doc.text(), "{\n    x;");
    assert_eq!(
        doc.selections(),
        vec![Selection::new(2, 2 + "    x;".len())]
    );
}

#[test]
fn test_overlapping_multiline_selections_coalesce() {
    let source = "void f() {\na();\nb();\n}\n";
    let a = source.find("a();").unwrap();
    let b = source.find("b();").unwrap();
    // First selection spans both lines, second sits inside the same span.
    let mut doc = InMemoryDocument::with_selections(
        source,
        vec![Selection::new(a, b + 2), Selection::caret(b)],
    );

    reformat_selections(&mut doc, &MockEngine, "--mode=c").unwrap();

    assert_eq!(doc.text(), "void f() {\n    a();\n    b();\n}\n");
    assert_eq!(doc.selections().len(), 1);
}

#[test]
fn test_selection_failure_leaves_buffer_untouched() {
    let source = "int main(){\nreturn 0;\n}";
    let mut doc = InMemoryDocument::with_selections(source, vec![Selection::caret(14)]);
    let err = reformat_selections(&mut doc, &FailEngine, "--mode=c").unwrap_err();
    assert!(err.to_string().contains("mock engine exploded"));
    assert_eq!(doc.text(), source);
}

// ============================================================================
// Whole-File Reformatting
// ============================================================================

#[test]
fn test_whole_file_reformat() {
    let mut doc = InMemoryDocument::new("int main() {\nint x = 1;\nreturn x;\n}\n");
    let changed = reformat_whole(&mut doc, &MockEngine, "--mode=c").unwrap();
    assert!(changed);
    assert_eq!(
        doc.text(),
        "int main() {\n    int x = 1;\n    return x;\n}\n"
    );
}

#[test]
fn test_whole_file_idempotent() {
    let mut doc = InMemoryDocument::new("void f() {\na();\n}\n");
    reformat_whole(&mut doc, &MockEngine, "--mode=c").unwrap();
    let once = doc.text().to_string();

    // Second run is a no-op patch.
    let changed = reformat_whole(&mut doc, &MockEngine, "--mode=c").unwrap();
    assert!(!changed);
    assert_eq!(doc.text(), once);
}

#[test]
fn test_already_formatted_is_noop() {
    let formatted = brace_indent("void f() {\nx();\n}\n");
    let mut doc = InMemoryDocument::new(formatted.clone());
    let changed = reformat_whole(&mut doc, &MockEngine, "--mode=c").unwrap();
    assert!(!changed);
    assert_eq!(doc.text(), formatted);
}

#[test]
fn test_whole_file_failure_leaves_buffer_untouched() {
    let source = "int  x;\n";
    let mut doc = InMemoryDocument::new(source);
    assert!(reformat_whole(&mut doc, &FailEngine, "--mode=c").is_err());
    assert_eq!(doc.text(), source);
}

// ============================================================================
// Command Boundary
// ============================================================================

fn run_request(
    doc: &mut InMemoryDocument,
    engine: &dyn restyle::engine::FormatEngine,
    syntax: &str,
    selection_only: bool,
    surface: &mut MemorySurface,
) -> bool {
    let settings = Settings::default();
    let mut reporter = ErrorReporter::new("style_error_message", surface);
    let request = ReformatRequest {
        syntax,
        selection_only,
        settings: &settings,
        context: ResolveContext::default(),
    };
    run_reformat(doc, engine, &mut reporter, &request)
}

#[test]
fn test_unmapped_syntax_reports_config_error() {
    let mut doc = InMemoryDocument::new("int x;\n");
    let mut surface = MemorySurface::default();

    let ok = run_request(&mut doc, &EchoEngine, "rust", false, &mut surface);

    assert!(!ok);
    assert!(surface.visible);
    assert!(surface.content.contains("processing options"));
    assert!(surface.content.contains("no formatting mode"));
    // The extra hint line is included.
    assert!(surface.content.contains("* add an entry"));
    assert_eq!(doc.text(), "int x;\n");
}

#[test]
fn test_engine_failure_reported_on_surface() {
    let mut doc = InMemoryDocument::new("int  x;\n");
    let mut surface = MemorySurface::default();

    let ok = run_request(&mut doc, &FailEngine, "c", false, &mut surface);

    assert!(!ok);
    assert!(surface.visible);
    assert!(surface.content.contains("mock engine exploded"));
    assert_eq!(doc.text(), "int  x;\n");
}

#[test]
fn test_successful_request_keeps_surface_hidden() {
    let mut doc = InMemoryDocument::new("void f() {\nx();\n}\n");
    let mut surface = MemorySurface::default();

    let ok = run_request(&mut doc, &MockEngine, "c", false, &mut surface);

    assert!(ok);
    assert!(!surface.visible);
    assert_eq!(doc.text(), "void f() {\n    x();\n}\n");
}

#[test]
fn test_selection_only_request_through_command() {
    let source = "int main(){\nreturn 0;\n}";
    let mut doc = InMemoryDocument::with_selections(source, vec![Selection::caret(14)]);
    let mut surface = MemorySurface::default();

    let ok = run_request(&mut doc, &MockEngine, "c", true, &mut surface);

    assert!(ok);
    assert_eq!(doc.text(), "int main(){\n    return 0;\n}");
}
