use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, stdout};

const HELLO_APP: &str = r#"import { I18n } from "./i18n";
export const i18n = new I18n({ en: {}, ko: {} });
export const greeting = i18n.locText("Hello");
"#;

const PLACEHOLDER_TABLE: &str = "/* eslint-disable */\n\n/** I18NTABLESYMBOL */\nexport default {\n    \"Hello\": \"Hello\"\n}; /** I18NTABLEEND */\n";

#[test]
fn test_sync_creates_missing_tables() -> Result<()> {
    let test = CliTest::with_app(HELLO_APP)?;

    let output = test.sync_command().output()?;
    let out = stdout(&output);

    assert!(output.status.success(), "stdout: {}", out);
    insta::assert_snapshot!(test.read_table("default", "en")?, @r#"
    /* eslint-disable */

    /** I18NTABLESYMBOL */
    export default {
        "Hello": "Hello"
    }; /** I18NTABLEEND */
    "#);
    assert_eq!(test.read_table("default", "ko")?, PLACEHOLDER_TABLE);
    assert!(out.contains("Created src/language/default.en.ts (1 key(s) added)"));
    assert!(out.contains("Created src/language/default.ko.ts (1 key(s) added)"));
    // Fresh placeholders are not translations yet.
    assert!(out.contains("partial-translation"));

    Ok(())
}

#[test]
fn test_sync_is_idempotent() -> Result<()> {
    let test = CliTest::with_app(HELLO_APP)?;
    test.sync_command().output()?;

    let output = test.sync_command().output()?;

    assert!(output.status.success());
    assert!(stdout(&output).contains("Resource tables are up to date."));
    assert_eq!(test.read_table("default", "ko")?, PLACEHOLDER_TABLE);

    Ok(())
}

#[test]
fn test_sync_keeps_complete_tables() -> Result<()> {
    let test = CliTest::with_app(HELLO_APP)?;
    test.write_table("default", "en", r#"{"Hello": "Hi"}"#)?;
    test.write_table("default", "ko", r#"{"Hello": "안녕"}"#)?;
    let before = test.read_table("default", "ko")?;

    let output = test.sync_command().output()?;
    let out = stdout(&output);

    assert!(output.status.success());
    assert!(out.contains("Resource tables are up to date."));
    assert!(out.contains("no issues found"));
    assert_eq!(test.read_table("default", "ko")?, before);

    Ok(())
}

#[test]
fn test_sync_reports_unused_key_without_removing_it() -> Result<()> {
    let test = CliTest::with_app(HELLO_APP)?;
    test.write_table("default", "en", r#"{"Hello": "Hi", "Bye": "Goodbye"}"#)?;
    test.write_table("default", "ko", r#"{"Hello": "안녕"}"#)?;
    let before = test.read_table("default", "en")?;

    let output = test.sync_command().output()?;
    let out = stdout(&output);

    assert!(output.status.success(), "unused keys are warnings");
    assert!(out.contains("warning: \"Bye\"  unused-key"));
    assert!(out.contains("--> src/language/default.en.ts:"));
    assert_eq!(test.read_table("default", "en")?, before);

    Ok(())
}

#[test]
fn test_sync_check_fails_without_writing() -> Result<()> {
    let test = CliTest::with_app(HELLO_APP)?;

    let output = test.sync_command().arg("--check").output()?;
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(1));
    assert!(out.contains("Would create src/language/default.en.ts"));
    assert!(out.contains("2 file(s) out of date"));
    assert!(!test.root().join("src/language").exists());

    Ok(())
}

#[test]
fn test_sync_check_passes_when_up_to_date() -> Result<()> {
    let test = CliTest::with_app(HELLO_APP)?;
    test.sync_command().output()?;

    let output = test.sync_command().arg("--check").output()?;

    assert!(output.status.success());
    assert!(stdout(&output).contains("Resource tables are up to date."));

    Ok(())
}

#[test]
fn test_sync_namespaced_lookup_uses_its_own_table() -> Result<()> {
    let test = CliTest::with_app(
        r#"import { I18n } from "./i18n";
const i18n = new I18n({ en: {} });
i18n.nsLocText("menu", "Open");
"#,
    )?;

    let output = test.sync_command().output()?;

    assert!(output.status.success());
    assert!(test.read_table("menu", "en")?.contains("\"Open\": \"Open\""));
    assert!(!test.root().join("src/language/default.en.ts").exists());

    Ok(())
}

#[test]
fn test_sync_non_literal_key_is_an_error() -> Result<()> {
    let test = CliTest::with_app(
        r#"import { I18n } from "./i18n";
const i18n = new I18n({ en: {} });
const label = "Hello";
i18n.locText(label);
"#,
    )?;

    let output = test.sync_command().output()?;
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(1));
    assert!(out.contains("call-shape"));
    assert!(out.contains("--> src/app.ts:4:"));

    Ok(())
}

#[test]
fn test_sync_malformed_table_is_reported() -> Result<()> {
    let test = CliTest::with_app(HELLO_APP)?;
    test.write_file("src/language/default.en.ts", "export default { broken")?;
    test.write_table("default", "ko", r#"{"Hello": "안녕"}"#)?;

    let output = test.sync_command().output()?;
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(1));
    assert!(out.contains("malformed-table"));
    assert_eq!(
        test.read_file("src/language/default.en.ts")?,
        "export default { broken"
    );

    Ok(())
}

#[test]
fn test_sync_missing_source_root_is_a_usage_error() -> Result<()> {
    let test = CliTest::new()?;

    let output = test
        .sync_command()
        .args(["--source-root", "does-not-exist"])
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(crate::stderr(&output).contains("Source root is not a directory"));

    Ok(())
}
