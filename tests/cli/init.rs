use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, I18N_LIB, stderr, stdout};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    for field in ["includes", "resourceDir", "tableExtension", "translator"] {
        assert!(
            parsed.get(field).is_some(),
            "Config should have '{}' field",
            field
        );
    }
    assert_eq!(parsed["resourceDir"], "src/language");

    // 2-space indentation
    assert!(content.contains("\n  \"includes\""));

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;

    assert!(output.status.success());
    assert!(stdout(&output).contains("Created .loctextrc.json"));
    let content = test.read_file(".loctextrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".loctextrc.json", "{}")?;

    let output = test.command().arg("init").output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains(".loctextrc.json already exists"));
    assert_eq!(test.read_file(".loctextrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;
    test.command().arg("init").output()?;

    test.write_file("src/i18n.ts", I18N_LIB)?;
    test.write_file(
        "src/app.ts",
        "import { I18n } from \"./i18n\";\nconst i18n = new I18n({ en: {} });\ni18n.locText(\"Hi\");\n",
    )?;

    let output = test.sync_command().output()?;
    assert!(
        output.status.success(),
        "Sync should work with initialized config. stderr: {}",
        stderr(&output)
    );
    assert!(test.root().join("src/language/default.en.ts").exists());

    Ok(())
}
