//! Integration tests for the ZScript declaration parser.
//!
//! These run whole scripts, includes and all, through the public entry points.


use bumpalo::Bump;
use test_harness::{TestHarness, names, parse_text};
use zscript::prelude::*;

// ============================================================================
// Archive scripts
// ============================================================================

#[test]
fn demo_archive_parses() {
    let harness = TestHarness::new();
    let arena = Bump::new();
    let report = harness.parse(&arena, "zscript.txt");
    harness.assert_success(&report);

    assert_eq!(report.language_version, Some("4.10"));
    assert_eq!(
        names(&report),
        [
            "MAX_MONSTERS",
            "SPAWN_RADIUS",
            "GREETING",
            "EMonsterFlags",
            "ZombieBase",
            "FastZombie",
            "Cyberdemon",
            "MonsterInfo",
            "RocketLauncher2",
            "Recoil",
            "GameHandler",
        ]
    );
    assert_eq!(
        report.included,
        ["constants.zs", "actors/monsters.zs", "Actors/Weapons.zs"]
    );
}

#[test]
fn demo_archive_headers() {
    let harness = TestHarness::new();
    let arena = Bump::new();
    let report = harness.parse(&arena, "zscript.txt");
    harness.assert_success(&report);

    let fast = report.declaration("fastzombie").unwrap();
    assert_eq!(fast.kind, DeclarationKind::Class);
    assert_eq!(fast.parent, Some("ZombieBase"));
    assert_eq!(fast.replaces, Some("ZombieMan"));
    assert_eq!(fast.source_name, "actors/monsters.zs");

    let cyber = report.declaration("Cyberdemon").unwrap();
    assert!(cyber.native);
    assert!(cyber.body.is_empty());

    let info = report.declaration("MonsterInfo").unwrap();
    assert_eq!(info.kind, DeclarationKind::Struct);
    assert_eq!(info.parent, None);

    let handler = report.declaration("GameHandler").unwrap();
    assert_eq!(handler.source_name, "zscript.txt");
}

#[test]
fn demo_archive_bodies_are_balanced() {
    let harness = TestHarness::new();
    let arena = Bump::new();
    let report = harness.parse(&arena, "zscript.txt");
    harness.assert_success(&report);

    for decl in &report.declarations {
        let mut curly = 0i32;
        let mut paren = 0i32;
        for token in decl.body {
            match token.kind {
                zscript::TokenKind::OpenCurly => curly += 1,
                zscript::TokenKind::CloseCurly => curly -= 1,
                zscript::TokenKind::OpenParen => paren += 1,
                zscript::TokenKind::CloseParen => paren -= 1,
                _ => {}
            }
            assert!(curly >= 0 && paren >= 0, "{} closes early", decl.name);
            assert!(!token.is_trivia());
        }
        assert_eq!((curly, paren), (0, 0), "{} is unbalanced", decl.name);
    }
}

#[test]
fn demo_archive_warning_log() {
    let harness = TestHarness::new();
    let arena = Bump::new();
    let report = harness.parse(&arena, "zscript.txt");
    harness.assert_success(&report);

    assert!(report.warnings.iter().any(|w| w == "Found class FastZombie (inherits ZombieBase, replaces ZombieMan)"));
    assert!(report.warnings.iter().any(|w| w == "Found class Cyberdemon (inherits Actor, native)"));
    assert!(report.warnings.iter().any(|w| w == "Found enum EMonsterFlags"));
    assert_eq!(report.warnings.len(), report.declarations.len());
}

#[test]
fn include_cycle_is_a_duplicate() {
    let harness = TestHarness::new();
    let arena = Bump::new();
    let report = harness.parse(&arena, "cycle/a.zs");
    let error = harness.assert_error(&report, ParseErrorKind::DuplicateInclude);
    assert_eq!(error.message, "file \"cycle/a.zs\" is already included");
    assert_eq!(error.source_name.as_deref(), Some("cycle/b.zs"));
    assert_eq!(names(&report), ["CycleA", "CycleB"]);
    assert_eq!(report.included, ["cycle/b.zs"]);
}

#[test]
fn self_include_is_a_duplicate() {
    let harness = TestHarness::new();
    let arena = Bump::new();
    let report = harness.parse(&arena, "errors/self_include.txt");
    let error = harness.assert_error(&report, ParseErrorKind::DuplicateInclude);
    assert_eq!(error.message, "file \"errors/self_include.txt\" is already included");
}

#[test]
fn error_inside_include_stops_the_session() {
    let harness = TestHarness::new();
    let arena = Bump::new();
    let report = harness.parse(&arena, "errors/include_error.zs");
    let error = harness.assert_error(&report, ParseErrorKind::ExpectedBlock);
    assert_eq!(error.source_name.as_deref(), Some("errors/missing_body.zs"));
    assert_eq!(names(&report), ["Before"]);
    assert!(report.error_message().unwrap().starts_with("errors/missing_body.zs: "));
}

#[test]
fn missing_include() {
    let arena = Bump::new();
    let archive = MemoryArchive::new("test.pk3").with_text("zscript.txt", "#include \"nowhere.zs\"");
    let report = zscript::parse_archive(&arena, &archive, "zscript.txt", ParserOptions::default());
    assert!(!report.success);
    let error = report.error.unwrap();
    assert_eq!(error.kind, ParseErrorKind::IncludeFailed);
    assert!(error.message.contains("resource \"nowhere.zs\" not found"));
}

// ============================================================================
// End-to-end scenarios
// ============================================================================

#[test]
fn const_enum_class_scenario() {
    let arena = Bump::new();
    let report = parse_text(
        &arena,
        "const X = 1+2; \n enum E { A, B } \n class Foo : Actor native { }",
    );
    assert!(report.success, "{:?}", report.error_message());
    assert!(report.error.is_none());

    let kinds: Vec<_> = report.declarations.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        [DeclarationKind::Const, DeclarationKind::Enum, DeclarationKind::Class]
    );
    let foo = &report.declarations[2];
    assert_eq!(foo.parent, Some("Actor"));
    assert!(foo.native);
}

#[test]
fn self_including_handler_scenario() {
    let arena = Bump::new();
    let archive = MemoryArchive::new("test.pk3").with_text("a.txt", "#include \"a.txt\"");
    let mut parser = Parser::new(&arena);
    let root = SourceFile::from_text("root.zs", "#include \"a.txt\"");
    let error = parser.parse(root, &mut ArchiveIncludes::new(&archive)).unwrap_err();
    assert_eq!(error.kind, ParseErrorKind::DuplicateInclude);
    assert!(parser.has_error());
}

#[test]
fn missing_class_name_scenario() {
    let harness = TestHarness::new();
    let arena = Bump::new();
    let report = harness.parse(&arena, "errors/missing_name.zs");
    let error = harness.assert_error(&report, ParseErrorKind::ExpectedIdentifier);
    assert!(error.message.starts_with("expected class name"));
}

#[test]
fn missing_body_scenario() {
    let harness = TestHarness::new();
    let arena = Bump::new();
    let report = harness.parse(&arena, "errors/missing_body.zs");
    let error = harness.assert_error(&report, ParseErrorKind::ExpectedBlock);
    assert!(error.message.contains("opening curly brace"));
    assert!(error.message.ends_with("<null>"));
}

// ============================================================================
// Header ordering
// ============================================================================

#[test]
fn header_ordering() {
    let arena = Bump::new();
    assert!(parse_text(&arena, "class Foo : Bar replaces Baz native {}").success);

    let report = parse_text(&arena, "class Foo native : Bar {}");
    assert_eq!(report.error.unwrap().kind, ParseErrorKind::InvalidHeader);

    let report = parse_text(&arena, "class Foo replaces Baz replaces Qux {}");
    assert_eq!(report.error.unwrap().kind, ParseErrorKind::InvalidHeader);
}

#[test]
fn strict_header_option() {
    let arena = Bump::new();
    let source = "class Foo native scope {}";
    let lenient = zscript::parse_source(&arena, "a.zs", source, ParserOptions::default());
    assert!(lenient.success);
    assert_eq!(lenient.warnings.len(), 2);

    let strict = zscript::parse_source(&arena, "a.zs", source, ParserOptions::new().strict_header(true));
    assert_eq!(strict.error.unwrap().kind, ParseErrorKind::InvalidHeader);
}

// ============================================================================
// Delimiters
// ============================================================================

#[test]
fn unmatched_closers() {
    let arena = Bump::new();
    for source in ["const X = 1 );", "const X = 1 };", "class A {} }", ")"] {
        let report = parse_text(&arena, source);
        let error = report.error.unwrap();
        assert_eq!(error.kind, ParseErrorKind::MismatchedDelimiter, "{source}");
        assert!(error.message.contains("closing parenthesis without an opening one"));
    }
}

#[test]
fn unterminated_literals() {
    let arena = Bump::new();
    for source in ["const X = \"open;", "enum E { A = 'b }", "/* never closed"] {
        let report = parse_text(&arena, source);
        assert_eq!(report.error.unwrap().kind, ParseErrorKind::InvalidToken, "{source}");
    }
}

#[test]
fn trailing_semicolon_after_body_is_accepted() {
    let arena = Bump::new();
    let report = parse_text(&arena, "class A {};\nstruct B {};\nenum C {};");
    assert!(report.success, "{:?}", report.error_message());
    assert_eq!(names(&report), ["A", "B", "C"]);
}
