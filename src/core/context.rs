use std::{
    cell::OnceCell,
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use anyhow::{Context as _, Result, bail};
use colored::Colorize;

use crate::{
    cli::args::CommonArgs,
    config::{CONFIG_FILE_NAME, Config, load_config},
    core::{
        extract::{Extraction, extract},
        file_scanner::{ScanOptions, scan_files},
        minify::ReplacementTable,
        program::{Program, normalize_path},
        sync::ResourceStore,
    },
    issues::Issue,
};

struct IndexData {
    table: ReplacementTable,
    issues: Vec<Issue>,
}

/// Shared state of one build invocation.
///
/// Every pass of a command reads the program, the extraction result and
/// the replacement table through this context, so index assignment and
/// call-site rewriting observe the exact same data. Each piece is
/// computed on first access and never persisted.
///
/// Configuration priority: CLI arguments, then `.loctextrc.json`, then
/// built-in defaults.
pub struct BuildContext {
    /// Merged configuration (CLI args > config file > defaults).
    pub config: Config,

    /// Absolute project root; reports show paths relative to it.
    pub root_dir: PathBuf,

    /// Root source files, in enumeration order.
    pub files: BTreeSet<PathBuf>,

    pub verbose: bool,

    store: ResourceStore,
    program: OnceCell<Program>,
    extraction: OnceCell<Extraction>,
    index: OnceCell<IndexData>,
}

/// `path` made absolute against `base` and normalized.
fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&base.join(path))
    }
}

impl BuildContext {
    pub fn new(common_args: &CommonArgs) -> Result<Self> {
        Self::with_excluded_dirs(common_args, &[])
    }

    /// Like [`BuildContext::new`], additionally keeping `excluded_dirs`
    /// (e.g. an output directory) out of the source scan.
    pub fn with_excluded_dirs(common_args: &CommonArgs, excluded_dirs: &[PathBuf]) -> Result<Self> {
        let verbose = common_args.verbose;

        let source_root = common_args
            .source_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        let root_dir = std::path::absolute(&source_root)
            .map(|p| normalize_path(&p))
            .with_context(|| format!("Invalid path: {:?}", source_root))?;
        if !root_dir.is_dir() {
            bail!("Source root is not a directory: {}", source_root.display());
        }

        let config_result = load_config(&root_dir)?;
        if verbose && !config_result.from_file {
            eprintln!(
                "{}: no {} found, using default configuration",
                "note".bold(),
                CONFIG_FILE_NAME
            );
        }

        let mut config = config_result.config;
        if let Some(ref resource_dir) = common_args.resource_dir {
            config.resource_dir = resource_dir.to_string_lossy().to_string();
        }
        if let Some(ref default_language) = common_args.default_language {
            config.default_language = Some(default_language.clone());
        }

        let resource_dir = resolve_against(&root_dir, Path::new(&config.resource_dir));
        let scan_base = resolve_against(&root_dir, Path::new(&config.source_root));

        let mut excluded: Vec<PathBuf> = vec![resource_dir.clone()];
        excluded.extend(excluded_dirs.iter().map(|dir| resolve_against(&root_dir, dir)));

        let scan_result = scan_files(
            &scan_base,
            &ScanOptions {
                includes: &config.includes,
                ignores: &config.ignores,
                ignore_test_files: config.ignore_test_files,
                excluded_dirs: &excluded,
                verbose,
            },
        );
        if scan_result.skipped_count > 0 {
            eprintln!(
                "{} {} path(s) skipped due to access errors{}",
                "warning:".bold().yellow(),
                scan_result.skipped_count,
                if verbose { "" } else { " (use -v for details)" }
            );
        }

        let store = ResourceStore::new(resource_dir, config.table_extension(), root_dir.clone());

        Ok(Self {
            config,
            root_dir,
            files: scan_result.files,
            verbose,
            store,
            program: OnceCell::new(),
            extraction: OnceCell::new(),
            index: OnceCell::new(),
        })
    }

    pub fn store(&self) -> &ResourceStore {
        &self.store
    }

    pub fn default_language(&self) -> Option<&str> {
        self.config.default_language.as_deref()
    }

    /// Parsed program: the root files plus everything they import.
    pub fn program(&self) -> &Program {
        self.program.get_or_init(|| {
            let program = Program::load(&self.root_dir, &self.files);
            if self.verbose {
                for error in program.parse_errors() {
                    eprintln!(
                        "{} {} - {}",
                        "warning:".bold().yellow(),
                        error.file_path,
                        error.error
                    );
                }
            }
            program
        })
    }

    /// Extraction pass over the program.
    ///
    /// # Errors
    ///
    /// Returns an error if the i18n constructor arguments are malformed.
    pub fn extraction(&self) -> Result<&Extraction> {
        if let Some(extraction) = self.extraction.get() {
            return Ok(extraction);
        }
        let extraction = extract(self.program())?;
        Ok(self.extraction.get_or_init(|| extraction))
    }

    fn index(&self) -> Result<&IndexData> {
        if let Some(index) = self.index.get() {
            return Ok(index);
        }
        let languages = &self.extraction()?.languages;
        let (table, issues) = ReplacementTable::build(&self.store, languages, self.default_language())?;
        Ok(self.index.get_or_init(|| IndexData { table, issues }))
    }

    /// Replacement table over the current resource tables.
    pub fn replacement_table(&self) -> Result<&ReplacementTable> {
        Ok(&self.index()?.table)
    }

    /// Malformed tables skipped while building the replacement table.
    pub fn replacement_issues(&self) -> Result<&[Issue]> {
        Ok(&self.index()?.issues)
    }

    /// Parse errors of the program, as issues.
    pub fn parse_error_issues(&self) -> Vec<Issue> {
        self.program()
            .parse_errors()
            .iter()
            .cloned()
            .map(Issue::ParseError)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    fn args(root: &Path) -> CommonArgs {
        CommonArgs {
            source_root: Some(root.to_path_buf()),
            resource_dir: None,
            default_language: None,
            verbose: false,
        }
    }

    #[test]
    fn test_resource_dir_is_not_scanned() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/language")).unwrap();
        fs::write(dir.path().join("src/app.ts"), "export {};\n").unwrap();
        fs::write(
            dir.path().join("src/language/default.en.ts"),
            "export default {}; /** I18NTABLEEND */\n",
        )
        .unwrap();

        let ctx = BuildContext::new(&args(dir.path())).unwrap();

        let files: Vec<_> = ctx
            .files
            .iter()
            .map(|f| crate::utils::display_path(f, &ctx.root_dir))
            .collect();
        assert_eq!(files, vec!["src/app.ts"]);
        assert!(ctx.store().dir().ends_with("src/language"));
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "resourceDir": "i18n", "defaultLanguage": "en" }"#,
        )
        .unwrap();

        let mut common = args(dir.path());
        common.default_language = Some("ko".to_string());
        let ctx = BuildContext::new(&common).unwrap();

        assert_eq!(ctx.config.resource_dir, "i18n");
        assert_eq!(ctx.default_language(), Some("ko"));
    }

    #[test]
    fn test_missing_source_root_is_an_error() {
        let dir = tempdir().unwrap();
        let common = args(&dir.path().join("missing"));
        assert!(BuildContext::new(&common).is_err());
    }
}
