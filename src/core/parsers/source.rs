use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use swc_common::{
    BytePos, FileName, Globals, SourceMap,
    comments::{Comment, SingleThreadedComments},
};
use swc_ecma_ast::Module;
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

/// Map of byte positions to comments.
pub type CommentMap = HashMap<BytePos, Vec<Comment>>;

/// Thread-safe extracted comments from SingleThreadedComments.
/// Extracted during parsing and stored independently of swc types.
#[derive(Debug, Clone, Default)]
pub struct ExtractedComments {
    pub leading: CommentMap,
    pub trailing: CommentMap,
}

impl ExtractedComments {
    /// Extract comments from SingleThreadedComments.
    /// This must be called before SingleThreadedComments is dropped.
    pub fn from_swc(comments: &SingleThreadedComments) -> Self {
        let (leading, trailing) = comments.borrow_all();
        Self {
            leading: leading.iter().map(|(k, v)| (*k, v.clone())).collect(),
            trailing: trailing.iter().map(|(k, v)| (*k, v.clone())).collect(),
        }
    }

    /// Raw text of every comment attached in front of the token at `pos`,
    /// joined by newlines. Empty when there is none.
    pub fn leading_text(&self, pos: BytePos) -> String {
        self.leading
            .get(&pos)
            .map(|comments| {
                comments
                    .iter()
                    .map(|c| c.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default()
    }
}

pub struct ParsedSource {
    pub module: Module,
    pub source_map: Arc<SourceMap>,
    /// Start of this file inside the shared source map.
    pub start_pos: BytePos,
    /// The file text as parsed, without a leading byte order mark. Span
    /// offsets index into this text.
    pub text: Arc<str>,
    /// The file on disk started with U+FEFF.
    pub has_bom: bool,
    pub comments: ExtractedComments,
}

impl ParsedSource {
    /// Byte offset of `pos` within this file's text.
    pub fn offset_of(&self, pos: BytePos) -> usize {
        (pos.0.saturating_sub(self.start_pos.0)) as usize
    }
}

/// Syntax for a file path: TypeScript, with JSX enabled for `.tsx`/`.jsx`,
/// and declaration-file mode for `.d.ts`.
fn syntax_for(file_path: &str) -> Syntax {
    let ext = Path::new(file_path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    Syntax::Typescript(TsSyntax {
        tsx: matches!(ext, "tsx" | "jsx"),
        dts: file_path.ends_with(".d.ts"),
        ..Default::default()
    })
}

/// Parse a source code string into an AST.
///
/// Accepts a shared SourceMap for thread-safe parallel parsing.
pub fn parse_source(code: String, file_path: &str, source_map: Arc<SourceMap>) -> Result<ParsedSource> {
    use swc_common::GLOBALS;

    // Wrap in GLOBALS.set() for thread safety
    // swc drops a leading BOM before assigning positions; strip it here so
    // `text` and span offsets agree.
    let (code, has_bom) = match code.strip_prefix('\u{feff}') {
        Some(rest) => (rest.to_string(), true),
        None => (code, false),
    };

    GLOBALS.set(&Globals::new(), || {
        let text: Arc<str> = Arc::from(code.as_str());
        let source_file = source_map.new_source_file(FileName::Real(file_path.into()).into(), code);

        let comments = SingleThreadedComments::default();
        let mut parser = Parser::new(
            syntax_for(file_path),
            StringInput::from(&*source_file),
            Some(&comments),
        );

        let module = parser
            .parse_module()
            .map_err(|e| anyhow!("Failed to parse {}: {:?}", file_path, e.kind().msg()))?;

        // Extract comments immediately (before SingleThreadedComments drops)
        let extracted_comments = ExtractedComments::from_swc(&comments);

        Ok(ParsedSource {
            module,
            source_map,
            start_pos: source_file.start_pos,
            text,
            has_bom,
            comments: extracted_comments,
        })
    })
}
