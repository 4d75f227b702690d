use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, stdout};

const HELLO_APP: &str = r#"import { I18n } from "./i18n";
export const i18n = new I18n({ en: {}, ko: {} });
export const greeting = i18n.locText("Hello");
"#;

#[test]
fn test_minify_dry_run_writes_nothing() -> Result<()> {
    let test = CliTest::with_app(HELLO_APP)?;
    test.write_table("default", "en", r#"{"Hello": "Hi"}"#)?;
    test.write_table("default", "ko", r#"{"Hello": "안녕"}"#)?;

    let output = test.minify_command().output()?;
    let out = stdout(&output);

    assert!(output.status.success(), "stdout: {}", out);
    assert!(out.contains("Would rewrite 1 call site(s), keep 0"));
    assert_eq!(test.read_file("src/app.ts")?, HELLO_APP);

    Ok(())
}

#[test]
fn test_minify_rewrites_mature_keys() -> Result<()> {
    let test = CliTest::with_app(HELLO_APP)?;
    test.write_table("default", "en", r#"{"Hello": "Hi"}"#)?;
    test.write_table("default", "ko", r#"{"Hello": "안녕"}"#)?;

    let output = test.minify_command().args(["--out-dir", "dist"]).output()?;

    assert!(output.status.success(), "stdout: {}", stdout(&output));
    assert_eq!(
        test.read_file("dist/src/app.ts")?,
        HELLO_APP.replace(r#"locText("Hello")"#, "locText(0)")
    );
    assert!(test.read_file("dist/src/language/default.ko.ts")?.contains("\"0\": \"안녕\""));
    // Sources in place are left alone.
    assert_eq!(test.read_file("src/app.ts")?, HELLO_APP);

    Ok(())
}

#[test]
fn test_minify_keeps_partially_translated_keys() -> Result<()> {
    let test = CliTest::with_app(HELLO_APP)?;
    test.write_table("default", "en", r#"{"Hello": "Hi"}"#)?;
    test.write_table("default", "ko", r#"{"Hello": "Hello"}"#)?;

    let output = test.minify_command().args(["--out-dir", "dist"]).output()?;
    let out = stdout(&output);

    assert!(output.status.success(), "partial translations are warnings");
    assert!(out.contains("partial-translation"));
    assert!(out.contains("not translated in: ko"));
    assert_eq!(test.read_file("dist/src/app.ts")?, HELLO_APP);

    Ok(())
}

#[test]
fn test_minify_default_language_placeholder_counts_as_translated() -> Result<()> {
    let test = CliTest::with_app(HELLO_APP)?;
    test.write_table("default", "en", r#"{"Hello": "Hello"}"#)?;
    test.write_table("default", "ko", r#"{"Hello": "안녕"}"#)?;

    let output = test
        .minify_command()
        .args(["--default-language", "en"])
        .output()?;

    assert!(output.status.success());
    assert!(stdout(&output).contains("Would rewrite 1 call site(s)"));

    Ok(())
}

#[test]
fn test_minify_unknown_key_is_reported() -> Result<()> {
    let test = CliTest::with_app(HELLO_APP)?;

    let output = test.minify_command().output()?;
    let out = stdout(&output);

    assert!(out.contains("key-not-found"));
    assert!(out.contains("--> src/app.ts:3:"));

    Ok(())
}

#[test]
fn test_minify_keeps_byte_order_mark() -> Result<()> {
    let app = format!("\u{feff}{}", HELLO_APP.replace("\"Hello\"", "\"안녕하세요\""));
    let test = CliTest::with_app(&app)?;
    test.write_table("default", "en", r#"{"안녕하세요": "Hello"}"#)?;
    test.write_table("default", "ko", r#"{"안녕하세요": "안녕하세요!"}"#)?;

    let output = test.minify_command().args(["--out-dir", "dist"]).output()?;

    assert!(output.status.success(), "stdout: {}", stdout(&output));
    assert_eq!(
        test.read_file("dist/src/app.ts")?,
        app.replace(r#"locText("안녕하세요")"#, "locText(0)")
    );

    Ok(())
}
