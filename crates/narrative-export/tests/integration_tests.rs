/*
 * integration_tests.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * End-to-end exports through the service, using test fixtures.
 */

use narrative_export::exporters::{ExportFormat, ExportService};
use narrative_export::model::{
    ExportObject, ExportObjectData, ExportSettings, ExportTemplate, FlexFieldObject, Npc, Project,
    TemplateType,
};
use narrative_export::store::{FileSystemTemplateStore, MemoryTemplateStore, StaticProjectStore, TemplateStore};
use narrative_export::ExportPlaceholderErrorType;
use narrative_template::INCLUDE_NOT_FOUND_SENTINEL;
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn fixture_path(name: &str) -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest_dir).join("test-fixtures").join(name)
}

fn load_grom() -> ExportObjectData {
    let json = std::fs::read_to_string(fixture_path("grom.json")).expect("Failed to load grom.json");
    serde_json::from_str(&json).expect("grom.json is valid export data")
}

fn grom() -> ExportObjectData {
    ExportObjectData::new(ExportObject::Npc(Npc {
        base: FlexFieldObject::new("npc-1", "Grom"),
        ..Default::default()
    }))
}

fn service_with(templates: impl TemplateStore + 'static, settings: ExportSettings) -> ExportService {
    ExportService::new(
        Arc::new(templates),
        Arc::new(StaticProjectStore::new(Project::new("p1", "Demo"), settings)),
    )
}

fn npc_template(code: &str) -> ExportTemplate {
    ExportTemplate::new("p1", TemplateType::ObjectNpc, code)
}

#[tokio::test]
async fn test_hello_grom() {
    let settings = ExportSettings {
        script_extension: "gs".into(),
        ..Default::default()
    };
    let service = service_with(MemoryTemplateStore::new(), settings);

    let result = service
        .export(ExportFormat::Script, Some(&npc_template("Hello {{ object.name }}")), &grom())
        .await
        .unwrap();

    assert_eq!(result.code, "Hello Grom");
    assert_eq!(result.file_extension, "gs");
    assert!(result.errors.is_empty());
}

#[tokio::test]
async fn test_fixture_project_export() {
    let service = service_with(
        FileSystemTemplateStore::new(fixture_path("templates")),
        ExportSettings::default(),
    );

    let result = service
        .export(ExportFormat::Script, None, &load_grom())
        .await
        .unwrap();

    assert_eq!(
        result.code,
        concat!(
            "-- generated by narrative-export\n",
            "Grom (10 HP)\n",
            "- axe (equipped)\n",
            "at 480: Wait(5, \"minutes\")\n",
            "Step_greet[npc_text] next -> Step_ask\n",
            "Step_ask[choice] c1: GetItemCount(\"gold\") >= 10 -> Step_trade; c2: true -> nil;\n",
            "Step_trade[condition] if (GetField(\"npc-1\", \"Health\") > 5 and GetGameTimeMinutes() < 1200) -> Step_deal; else -> Step_greet\n",
            "Step_deal[action] do GiveItemToPlayer(\"axe\", 1)\n",
        )
    );
    assert!(result.errors.is_empty(), "{}", result.diagnostics().render_text());
}

#[tokio::test]
async fn test_repeated_exports_are_identical() {
    let service = service_with(
        FileSystemTemplateStore::new(fixture_path("templates")),
        ExportSettings::default(),
    );
    let data = load_grom();
    let template = npc_template("{{ object.name }} {{ object.unknown }} {{ include \"Nope\" }}");

    let first = service.export(ExportFormat::Script, Some(&template), &data).await.unwrap();
    let second = service.export(ExportFormat::Script, Some(&template), &data).await.unwrap();

    assert_eq!(first.code, second.code);
    assert_eq!(first.errors, second.errors);
    assert_eq!(first.errors.len(), 2);
}

#[tokio::test]
async fn test_json_export_omits_bookkeeping() {
    let service = service_with(MemoryTemplateStore::new(), ExportSettings::default());

    let result = service.export(ExportFormat::Json, None, &load_grom()).await.unwrap();

    assert_eq!(result.file_extension, "json");
    for member in ["project_id", "modified_by", "modified_on"] {
        assert!(!result.code.contains(member), "`{member}` was exported");
    }
    let value: serde_json::Value = serde_json::from_str(&result.code).unwrap();
    assert_eq!(value["fields"][0]["name"], "Health");
    assert_eq!(value["dialog"]["steps"][3]["action"]["kind"], "transfer_item");
}

#[tokio::test]
async fn test_missing_include_yields_sentinel() {
    let service = service_with(MemoryTemplateStore::new(), ExportSettings::default());
    let template = npc_template("a{{ include \"Missing\" }}b{{ include \"Missing\" }}c");

    let result = service.export(ExportFormat::Script, Some(&template), &grom()).await.unwrap();

    assert_eq!(
        result.code,
        format!("a{0}b{0}c", INCLUDE_NOT_FOUND_SENTINEL)
    );
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, ExportPlaceholderErrorType::MissingIncludeTemplate);
}

#[tokio::test]
async fn test_template_without_placeholders_is_unchanged() {
    let service = service_with(MemoryTemplateStore::new(), ExportSettings::default());
    let code = "local x = 1\n-- no placeholders { here }\n";

    let result = service.export(ExportFormat::Script, Some(&npc_template(code)), &grom()).await.unwrap();

    assert_eq!(result.code, code);
    assert!(result.errors.is_empty());
}

#[tokio::test]
async fn test_malformed_template_still_exports() {
    let service = service_with(MemoryTemplateStore::new(), ExportSettings::default());

    for code in ["{{ if object.name }}never closed", "{{ object.name | nope }}", "{{ end }}", "{{"] {
        let result = service
            .export(ExportFormat::Script, Some(&npc_template(code)), &grom())
            .await
            .unwrap();
        assert_eq!(result.code, "", "{code}");
        assert!(
            result
                .errors
                .iter()
                .any(|e| e.kind == ExportPlaceholderErrorType::SyntaxError),
            "{code}: {:?}",
            result.errors
        );
    }
}

#[tokio::test]
async fn test_strict_mode_turns_unresolved_placeholders_into_errors() {
    let template = npc_template("{{ object.nickname }}");

    let lenient = service_with(MemoryTemplateStore::new(), ExportSettings::default())
        .export(ExportFormat::Script, Some(&template), &grom())
        .await
        .unwrap();
    let strict = service_with(
        MemoryTemplateStore::new(),
        ExportSettings {
            strict_mode: true,
            ..Default::default()
        },
    )
    .export(ExportFormat::Script, Some(&template), &grom())
    .await
    .unwrap();

    assert!(!lenient.has_errors());
    assert!(strict.has_errors());
    assert_eq!(lenient.errors, strict.errors);
}

#[tokio::test]
async fn test_language_export_from_template_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("object_npc.template"),
        "Say({{ object.name | langkey }})\n{{ for field in object.field_list }}Say({{ field.value | langkey }})\n{{ end }}",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("language_file.template"),
        "{{ for entry in language_keys }}{{ entry.key }}\t{{ entry.value }}\n{{ end }}",
    )
    .unwrap();
    let settings = ExportSettings {
        language_key_prefix: "Loc".into(),
        language_file_extension: "tsv".into(),
        ..Default::default()
    };
    let service = service_with(FileSystemTemplateStore::new(dir.path()), settings);
    let mut data = load_grom();
    data.dialog = None;

    let result = service
        .export(ExportFormat::LanguageFile, None, &data)
        .await
        .unwrap();

    assert_eq!(result.file_extension, "tsv");
    assert_eq!(
        result.code,
        "Loc_npc_1_name\tGrom\nLoc_f1_value\t10\nLoc_f2_value\tangry\n"
    );
    assert!(result.errors.is_empty(), "{:?}", result.errors);
}
