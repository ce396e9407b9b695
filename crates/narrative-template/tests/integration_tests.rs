/*
 * integration_tests.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Integration tests for narrative-template using test fixtures.
 */

use narrative_template::{
    DiagnosticCollector, EvalContext, FileSystemResolver, INCLUDE_NOT_FOUND_SENTINEL,
    TemplateContext, TemplateValue, codes, fill_legacy_placeholders, render_source,
};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};

/// Helper to get the path to test fixtures
fn fixture_path(name: &str) -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest_dir).join("test-fixtures").join(name)
}

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", name))
}

fn grom() -> TemplateContext {
    TemplateContext::new().with(
        "object",
        TemplateValue::map([
            ("id", "npc-1".into()),
            ("name", "Grom".into()),
            (
                "inventory",
                TemplateValue::List(vec![
                    TemplateValue::map([("name", "Axe".into())]),
                    TemplateValue::map([("name", "Bread".into())]),
                ]),
            ),
        ]),
    )
}

async fn render_fixture(name: &str, vars: &TemplateContext) -> (String, DiagnosticCollector) {
    let resolver = FileSystemResolver::new(fixture_path("includes"));
    let source = load_fixture(name);
    let mut diagnostics = DiagnosticCollector::new();
    let output = {
        let mut ctx = EvalContext::new(&mut diagnostics, &resolver).with_max_include_depth(5);
        render_source(&source, name, vars, &mut ctx).await
    };
    (output, diagnostics)
}

#[tokio::test]
async fn test_npc_script_fixture() {
    let (output, diagnostics) = render_fixture("npc.template", &grom()).await;

    assert_eq!(
        output,
        "-- generated for Grom\n\
         local npc = {}\n\
         npc.name = \"Grom\"\n\
         npc.inventory[0] = \"Axe\"\n\
         npc.inventory[1] = \"Bread\"\n\
         return npc\n"
    );
    assert!(diagnostics.is_empty(), "{:?}", diagnostics.summaries());
}

#[tokio::test]
async fn test_broken_fixture_renders_empty() {
    let (output, diagnostics) = render_fixture("broken.template", &grom()).await;

    assert_eq!(output, "");
    assert_eq!(
        diagnostics.summaries(),
        vec!["Template Syntax Error: `{{ if }}` is never closed with `{{ end }}` at broken.template(2,1)"]
    );
}

#[tokio::test]
async fn test_self_including_fixture_is_bounded() {
    let vars = TemplateContext::new();
    let resolver = FileSystemResolver::new(fixture_path("includes"));
    let mut diagnostics = DiagnosticCollector::new();
    let output = {
        let mut ctx = EvalContext::new(&mut diagnostics, &resolver).with_max_include_depth(5);
        render_source("[{{ include \"Loop\" }}]", "main", &vars, &mut ctx).await
    };

    assert_eq!(output, "[]");
    assert_eq!(diagnostics.count_code(codes::RECURSIVE_INCLUDE), 1);
    assert!(diagnostics.has_errors());
}

#[tokio::test]
async fn test_missing_include_on_disk() {
    let resolver = FileSystemResolver::new(fixture_path("includes"));
    let mut diagnostics = DiagnosticCollector::new();
    let output = {
        let mut ctx = EvalContext::new(&mut diagnostics, &resolver);
        render_source("a{{ include \"Footer\" }}b", "main", &grom(), &mut ctx).await
    };

    assert_eq!(output, format!("a{}b", INCLUDE_NOT_FOUND_SENTINEL));
    assert_eq!(
        diagnostics.summaries(),
        vec!["Missing Include Template: include template `Footer` does not exist at main(1,2)"]
    );
}

#[tokio::test]
async fn test_template_without_placeholders_round_trips() {
    let source = "local t = { a = 1 }\n-- no code blocks here\nreturn t\n";
    let resolver = FileSystemResolver::new(fixture_path("includes"));
    let mut diagnostics = DiagnosticCollector::new();
    let output = {
        let mut ctx = EvalContext::new(&mut diagnostics, &resolver);
        render_source(source, "plain", &TemplateContext::new(), &mut ctx).await
    };
    assert_eq!(output, source);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_legacy_fixture() {
    let source = load_fixture("legacy.template");
    let resolver = FileSystemResolver::new(fixture_path("includes"));
    let mut diagnostics = DiagnosticCollector::new();
    let output = {
        let mut ctx = EvalContext::new(&mut diagnostics, &resolver);
        fill_legacy_placeholders(&source, "legacy.template", &grom(), &mut ctx)
    };

    assert_eq!(output, "Npc: Grom ()\n");
    assert_eq!(diagnostics.count_code(codes::UNRESOLVED_PLACEHOLDER), 1);
    assert!(!diagnostics.has_errors());
}
