//! Tokenization-based syntax highlighting.
//!
//! Source text is lexed into a flat sequence of classified spans and
//! rendered as line-numbered HTML. Tokenization is total: every byte of the
//! input lands in exactly one token, in order, so concatenating the token
//! texts reconstructs the source exactly. Anything the lexer does not
//! recognize becomes a [`TokenKind::Plain`] span rather than an error —
//! malformed input must never fail a render.
//!
//! The grammar is a small lexical descriptor (keyword set plus comment and
//! string syntax), not a parser. A handful of common languages are shipped;
//! unknown extensions fall back to the C-family grammar.

use std::path::Path;

/// Classification of one lexed span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    Identifier,
    Number,
    Str,
    CharLit,
    Comment,
    Preprocessor,
    Punct,
    Whitespace,
    Plain,
}

/// One span of source text with its classification.
///
/// `text` is a slice of the original source; tokens tile the input with no
/// gaps or overlaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub kind: TokenKind,
}

/// A lexical grammar: just enough structure to classify tokens.
#[derive(Debug, Clone, Copy)]
pub struct Language {
    pub name: &'static str,
    keywords: &'static [&'static str],
    line_comment: &'static str,
    block_comment: Option<(&'static str, &'static str)>,
    /// Lines whose first non-blank character is `#` are preprocessor
    /// directives. Unset where `#` already starts a comment.
    hash_preprocessor: bool,
    /// Single quotes delimit strings rather than character literals.
    single_quote_strings: bool,
}

const C_KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef", "union",
    "unsigned", "void", "volatile", "while",
];

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait",
    "true", "type", "unsafe", "use", "where", "while",
];

const GO_KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var",
];

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

const SHELL_KEYWORDS: &[&str] = &[
    "case", "do", "done", "elif", "else", "esac", "exit", "export", "fi", "for", "function",
    "if", "in", "local", "return", "select", "then", "until", "while",
];

/// The default grammar, used for unknown extensions.
pub const C_FAMILY: Language = Language {
    name: "c",
    keywords: C_KEYWORDS,
    line_comment: "//",
    block_comment: Some(("/*", "*/")),
    hash_preprocessor: true,
    single_quote_strings: false,
};

pub const RUST: Language = Language {
    name: "rust",
    keywords: RUST_KEYWORDS,
    line_comment: "//",
    block_comment: Some(("/*", "*/")),
    hash_preprocessor: false,
    single_quote_strings: false,
};

pub const GO: Language = Language {
    name: "go",
    keywords: GO_KEYWORDS,
    line_comment: "//",
    block_comment: Some(("/*", "*/")),
    hash_preprocessor: false,
    single_quote_strings: false,
};

pub const PYTHON: Language = Language {
    name: "python",
    keywords: PYTHON_KEYWORDS,
    line_comment: "#",
    block_comment: None,
    hash_preprocessor: false,
    single_quote_strings: true,
};

pub const SHELL: Language = Language {
    name: "shell",
    keywords: SHELL_KEYWORDS,
    line_comment: "#",
    block_comment: None,
    hash_preprocessor: false,
    single_quote_strings: true,
};

impl Language {
    /// Picks a grammar from the file extension, defaulting to [`C_FAMILY`].
    pub fn from_path(path: &Path) -> &'static Language {
        match path.extension().and_then(|e| e.to_str()) {
            Some("rs") => &RUST,
            Some("go") => &GO,
            Some("py") => &PYTHON,
            Some("sh" | "bash") => &SHELL,
            _ => &C_FAMILY,
        }
    }
}

/// Lexes `source` into a complete token sequence.
///
/// Total coverage is guaranteed: every branch of the lexer consumes at least
/// one character, unterminated strings run to the end of their line, and
/// unterminated block comments run to the end of the input.
pub fn tokenize<'a>(source: &'a str, lang: &Language) -> Vec<Token<'a>> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    // Whether everything on the current line so far is blank, which is what
    // makes a `#` a preprocessor directive in the C family.
    let mut line_blank = true;

    while pos < source.len() {
        let rest = &source[pos..];
        let (len, kind) = next_token(rest, lang, line_blank);
        debug_assert!(len > 0, "lexer must always make progress");
        let text = &rest[..len];
        tokens.push(Token { text, kind });

        line_blank = match text.rfind('\n') {
            Some(i) => text[i + 1..].chars().all(char::is_whitespace),
            None => line_blank && kind == TokenKind::Whitespace,
        };
        pos += len;
    }

    tokens
}

/// Length and kind of the next token at the start of `rest`.
fn next_token(rest: &str, lang: &Language, line_blank: bool) -> (usize, TokenKind) {
    let first = match rest.chars().next() {
        Some(c) => c,
        None => return (0, TokenKind::Plain),
    };

    if first.is_whitespace() {
        return (prefix_len(rest, char::is_whitespace), TokenKind::Whitespace);
    }

    if rest.starts_with(lang.line_comment) {
        return (line_end(rest), TokenKind::Comment);
    }

    if let Some((open, close)) = lang.block_comment {
        if rest.starts_with(open) {
            let len = match rest[open.len()..].find(close) {
                Some(i) => open.len() + i + close.len(),
                None => rest.len(),
            };
            return (len, TokenKind::Comment);
        }
    }

    if lang.hash_preprocessor && first == '#' && line_blank {
        return (line_end(rest), TokenKind::Preprocessor);
    }

    if first == '"' {
        return (scan_string(rest, '"'), TokenKind::Str);
    }

    if first == '\'' {
        if lang.single_quote_strings {
            return (scan_string(rest, '\''), TokenKind::Str);
        }
        if let Some(len) = scan_char_lit(rest) {
            return (len, TokenKind::CharLit);
        }
        return (1, TokenKind::Punct);
    }

    if first.is_ascii_digit() {
        let len = prefix_len(rest, |c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
        return (len, TokenKind::Number);
    }

    if first.is_alphabetic() || first == '_' {
        let len = prefix_len(rest, |c| c.is_alphanumeric() || c == '_');
        let kind = if lang.keywords.contains(&&rest[..len]) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        return (len, kind);
    }

    if first.is_ascii_punctuation() {
        return (first.len_utf8(), TokenKind::Punct);
    }

    (first.len_utf8(), TokenKind::Plain)
}

/// Byte length of the prefix of `rest` whose chars satisfy `pred`.
fn prefix_len(rest: &str, pred: impl Fn(char) -> bool) -> usize {
    rest.char_indices()
        .find(|&(_, c)| !pred(c))
        .map(|(i, _)| i)
        .unwrap_or(rest.len())
}

/// Byte length up to (not including) the next newline.
fn line_end(rest: &str) -> usize {
    rest.find('\n').unwrap_or(rest.len())
}

/// Scans a quoted string starting at the opening quote. Backslash escapes
/// the next character. An unterminated string stops before the newline so
/// one bad literal cannot swallow the rest of the file.
fn scan_string(rest: &str, quote: char) -> usize {
    let mut chars = rest.char_indices();
    chars.next(); // opening quote
    let mut escaped = false;
    for (i, c) in chars {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '\n' => return i,
            c if c == quote => return i + c.len_utf8(),
            _ => {}
        }
    }
    rest.len()
}

/// Tries to scan a character literal starting at the opening quote.
///
/// Accepts `'x'` and short escapes like `'\n'` or `'\x41'`. Anything else
/// (notably a Rust lifetime such as `'a`) is not a literal and the caller
/// falls back to a single-quote punctuation token.
fn scan_char_lit(rest: &str) -> Option<usize> {
    let mut chars = rest.char_indices();
    chars.next(); // opening quote
    match chars.next() {
        Some((_, '\\')) => {
            let mut body = 0;
            for (i, c) in chars {
                if c == '\'' {
                    return Some(i + 1);
                }
                if c == '\n' || body > 8 {
                    return None;
                }
                body += 1;
            }
            None
        }
        Some((_, '\n')) | None => None,
        Some(_) => {
            let (i, next) = chars.next()?;
            (next == '\'').then_some(i + 1)
        }
    }
}

/// Escapes the characters that could let file content alter surrounding
/// markup. Applied to every piece of untrusted text that reaches a view.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn css_class(kind: TokenKind) -> Option<&'static str> {
    match kind {
        TokenKind::Keyword => Some("kw"),
        TokenKind::Str | TokenKind::CharLit => Some("str"),
        TokenKind::Comment => Some("cmt"),
        TokenKind::Number => Some("num"),
        TokenKind::Preprocessor => Some("pp"),
        _ => None,
    }
}

fn push_line_number(out: &mut String, line: usize) {
    out.push_str(&format!("<span class=\"ln\">{:>4} </span>", line));
}

/// Renders `source` as line-numbered, highlighted HTML inside a `<pre>`.
///
/// Tokens may span lines (block comments, whitespace runs); each physical
/// line gets its own 1-based number, with span classes carried across the
/// break. All token text is HTML-escaped.
pub fn render_html(source: &str, lang: &Language) -> String {
    let tokens = tokenize(source, lang);
    let mut out = String::with_capacity(source.len() * 2);
    out.push_str("<pre class=\"source\">");

    let mut line = 1;
    push_line_number(&mut out, line);

    for token in &tokens {
        let class = css_class(token.kind);
        let mut parts = token.text.split('\n').peekable();
        while let Some(part) = parts.next() {
            if !part.is_empty() {
                match class {
                    Some(c) => {
                        out.push_str(&format!(
                            "<span class=\"{}\">{}</span>",
                            c,
                            escape_html(part)
                        ));
                    }
                    None => out.push_str(&escape_html(part)),
                }
            }
            if parts.peek().is_some() {
                out.push('\n');
                line += 1;
                push_line_number(&mut out, line);
            }
        }
    }

    out.push_str("</pre>");
    out
}
