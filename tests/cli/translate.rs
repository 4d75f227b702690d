use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, stderr, stdout};

const HELLO_APP: &str = r#"import { I18n } from "./i18n";
export const i18n = new I18n({ en: {}, ko: {}, fr: {} });
export const greeting = i18n.locText("Hello");
i18n.locText("Hello");
"#;

#[test]
fn test_translate_dry_run_lists_untranslated_entries() -> Result<()> {
    let test = CliTest::with_app(HELLO_APP)?;
    test.write_table("default", "en", r#"{"Hello": "Hello"}"#)?;
    test.write_table("default", "ko", r#"{"Hello": "안녕"}"#)?;
    test.write_table("default", "fr", r#"{"Hello": ""}"#)?;

    let output = test
        .translate_command()
        .args(["--dry-run", "--default-language", "en"])
        .output()?;
    let out = stdout(&output);

    assert!(output.status.success(), "stdout: {}", out);
    assert!(out.contains("Would translate 1 entry:"));
    assert!(out.contains("  - default.Hello [fr] (2 occurrences)"));
    assert!(!out.contains("[en]"));

    Ok(())
}

#[test]
fn test_translate_retranslate_includes_translated_entries() -> Result<()> {
    let test = CliTest::with_app(HELLO_APP)?;
    test.write_table("default", "en", r#"{"Hello": "Hello"}"#)?;
    test.write_table("default", "ko", r#"{"Hello": "안녕"}"#)?;
    test.write_table("default", "fr", r#"{"Hello": "Bonjour"}"#)?;

    let output = test
        .translate_command()
        .args(["--dry-run", "--default-language", "en"])
        .args(["--retranslate", "default.Hello"])
        .output()?;
    let out = stdout(&output);

    assert!(output.status.success());
    assert!(out.contains("Would translate 2 entries:"));
    assert!(out.contains("default.Hello [ko]"));
    assert!(out.contains("default.Hello [fr]"));

    Ok(())
}

#[test]
fn test_translate_rejects_unused_retranslate_target() -> Result<()> {
    let test = CliTest::with_app(HELLO_APP)?;

    let output = test
        .translate_command()
        .args(["--dry-run", "--retranslate", "default.Bye"])
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("\"default.Bye\" is not used in the source"));

    Ok(())
}

#[test]
fn test_translate_nothing_to_do_needs_no_api_key() -> Result<()> {
    let test = CliTest::with_app(HELLO_APP)?;
    test.write_table("default", "en", r#"{"Hello": "Hello"}"#)?;
    test.write_table("default", "ko", r#"{"Hello": "안녕"}"#)?;
    test.write_table("default", "fr", r#"{"Hello": "Bonjour"}"#)?;

    let output = test
        .translate_command()
        .args(["--default-language", "en"])
        .output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Nothing to translate."));

    Ok(())
}

#[test]
fn test_translate_without_api_key_fails_before_writing() -> Result<()> {
    let test = CliTest::with_app(HELLO_APP)?;
    test.write_table("default", "fr", r#"{"Hello": "Hello"}"#)?;
    let before = test.read_table("default", "fr")?;

    let output = test.translate_command().output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("OPENAI_API_KEY is not set"));
    assert_eq!(test.read_table("default", "fr")?, before);

    Ok(())
}
