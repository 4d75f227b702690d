use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use anyhow::{Context, Ok, Result};
use insta_cmd::get_cargo_bin;
use tempfile::TempDir;

mod init;
mod minify;
mod sync;
mod translate;

const BIN_NAME: &str = "loctext";

/// i18n class with the three marker comments.
pub const I18N_LIB: &str = r#"/** I18NCONSTRUCTORSYMBOL */
export class I18n {
    constructor(data: object) {}
    /** I18NLOCTEXTSYMBOL */
    locText(key: string | number, ...args: unknown[]): string { return String(key); }
    /** I18NNSLOCTEXTSYMBOL */
    nsLocText(ns: string, key: string | number, ...args: unknown[]): string { return String(key); }
}
"#;

pub struct CliTest {
    _temp_dir: TempDir,
    project_dir: PathBuf,
}

impl CliTest {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().canonicalize()?;
        // Stops config discovery from walking above the project.
        fs::create_dir(project_dir.join(".git"))?;
        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
        })
    }

    /// Project with the i18n library and `src/app.ts`.
    pub fn with_app(app: &str) -> Result<Self> {
        let test = Self::new()?;
        test.write_file("src/i18n.ts", I18N_LIB)?;
        test.write_file("src/app.ts", app)?;
        Ok(test)
    }

    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file_path = self.project_dir.join(path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory:{}", parent.display()))?;
        }

        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write file: {}", file_path.display()))?;

        Ok(())
    }

    /// Write a resource table under the default resource directory.
    pub fn write_table(&self, namespace: &str, language: &str, json: &str) -> Result<()> {
        self.write_file(
            &format!("src/language/{}.{}.ts", namespace, language),
            &format!(
                "/* eslint-disable */\n\n/** I18NTABLESYMBOL */\nexport default {}; /** I18NTABLEEND */\n",
                json
            ),
        )
    }

    pub fn read_table(&self, namespace: &str, language: &str) -> Result<String> {
        self.read_file(&format!("src/language/{}.{}.ts", namespace, language))
    }

    pub fn root(&self) -> &Path {
        &self.project_dir
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(get_cargo_bin(BIN_NAME));
        cmd.current_dir(&self.project_dir);
        cmd.env_clear();
        cmd.env("NO_COLOR", "1"); // Disable colors for consistent test output
        cmd
    }

    pub fn sync_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("sync");
        cmd
    }

    pub fn minify_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("minify");
        cmd
    }

    pub fn translate_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("translate");
        cmd
    }

    pub fn read_file(&self, path: &str) -> Result<String> {
        let file_path = self.project_dir.join(path);
        fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read file: {}", file_path.display()))
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
