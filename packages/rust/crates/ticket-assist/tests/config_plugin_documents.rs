#![allow(missing_docs)]

use std::path::Path;

use tempfile::TempDir;
use ticket_assist::{ConfigError, ConfigStore, FileConfigStore, Translations};

fn write_file(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).expect("write plugin document");
}

fn plugin_dir(config: &str, prompts: &str, panels: &str) -> TempDir {
    let tmp = TempDir::new().expect("tempdir");
    write_file(tmp.path(), "config.json", config);
    write_file(tmp.path(), "prompts.json", prompts);
    write_file(tmp.path(), "panels.json", panels);
    tmp
}

#[test]
fn file_store_reads_all_three_documents() {
    let tmp = plugin_dir(
        r#"{
            "apiKey": "sk-live",
            "assistantKey": "asst_live",
            "confidenceThreshold": 0.7,
            "language": "en",
            "staffRoleId": "111",
            "devRoleId": "222",
            "maxIAMessages": "4"
        }"#,
        r#"{"default": "Generic support.", "billing": "Billing support."}"#,
        r#"[
            {"name": "Billing", "options": ["billing", "refunds"], "enableIA": true},
            {"name": "Partners", "options": ["partners"]}
        ]"#,
    );
    let store =
        FileConfigStore::open(tmp.path(), &tmp.path().join("panels.json")).expect("store opens");

    let config = store.assist_config().expect("config");
    assert!(config.enabled);
    assert_eq!(config.language(), "en");
    assert_eq!(config.staff_role_id(), Some("111"));
    assert_eq!(config.dev_role_id(), Some("222"));
    assert_eq!(config.message_limit(), 4);
    assert!(
        config
            .confidence_threshold()
            .is_some_and(|threshold| (threshold - 0.7).abs() < f64::EPSILON)
    );

    let prompts = store.prompts().expect("prompts");
    assert_eq!(prompts.resolve("billing"), "Billing support.");
    assert_eq!(prompts.resolve("refunds"), "Generic support.");

    let panels = store.panels().expect("panels");
    assert!(panels.assistance_enabled_for("refunds"));
    assert!(!panels.assistance_enabled_for("partners"));
    assert!(!panels.assistance_enabled_for("unknown"));
}

#[test]
fn panels_are_read_fresh_on_every_call() {
    let tmp = plugin_dir(
        r#"{"apiKey": "sk", "assistantKey": "asst"}"#,
        r#"{"default": "help"}"#,
        r#"[{"options": ["billing"], "enableIA": false}]"#,
    );
    let store =
        FileConfigStore::open(tmp.path(), &tmp.path().join("panels.json")).expect("store opens");
    assert!(!store.panels().expect("panels").assistance_enabled_for("billing"));

    write_file(
        tmp.path(),
        "panels.json",
        r#"[{"options": ["billing"], "enableIA": true}]"#,
    );
    assert!(store.panels().expect("panels").assistance_enabled_for("billing"));
}

#[test]
fn reload_picks_up_config_changes_and_keeps_old_on_error() {
    let tmp = plugin_dir(
        r#"{"apiKey": "sk", "assistantKey": "asst", "maxIAMessages": 3}"#,
        r#"{"default": "help"}"#,
        "[]",
    );
    let store =
        FileConfigStore::open(tmp.path(), &tmp.path().join("panels.json")).expect("store opens");
    assert_eq!(store.assist_config().expect("config").message_limit(), 3);

    write_file(
        tmp.path(),
        "config.json",
        r#"{"apiKey": "sk", "assistantKey": "asst", "maxIAMessages": 6}"#,
    );
    assert_eq!(store.assist_config().expect("config").message_limit(), 3);
    store.reload().expect("reload succeeds");
    assert_eq!(store.assist_config().expect("config").message_limit(), 6);

    write_file(tmp.path(), "config.json", "{ not json");
    assert!(matches!(store.reload(), Err(ConfigError::Parse { .. })));
    assert_eq!(store.assist_config().expect("config").message_limit(), 6);
}

#[test]
fn missing_default_prompt_is_rejected() {
    let tmp = plugin_dir(
        r#"{"apiKey": "sk", "assistantKey": "asst"}"#,
        r#"{"billing": "Billing support."}"#,
        "[]",
    );
    let error = FileConfigStore::open(tmp.path(), &tmp.path().join("panels.json"))
        .expect_err("default prompt is required");
    assert!(matches!(error, ConfigError::MissingDefaultPrompt { .. }));
}

#[test]
fn missing_config_file_reports_its_path() {
    let tmp = TempDir::new().expect("tempdir");
    let error = FileConfigStore::open(tmp.path(), &tmp.path().join("panels.json"))
        .expect_err("config.json is required");
    match error {
        ConfigError::Read { path, .. } => assert!(path.ends_with("config.json")),
        other => panic!("expected read error, got {other:?}"),
    }
}

#[test]
fn operator_languages_file_replaces_bundled_table() {
    let tmp = TempDir::new().expect("tempdir");
    write_file(
        tmp.path(),
        "languages.json",
        r#"{"de": {"welcome": "Hallo!"}, "fr": {"welcome": "Salut !"}}"#,
    );
    let translations = Translations::load_or_bundled(Some(&tmp.path().join("languages.json")));
    let mut languages: Vec<&str> = translations.languages().collect();
    languages.sort_unstable();
    assert_eq!(languages, vec!["de", "fr"]);

    let fallback = Translations::load_or_bundled(Some(&tmp.path().join("absent.json")));
    assert!(fallback.languages().any(|language| language == "en"));
}
