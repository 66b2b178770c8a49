//! HTTP routes and view rendering.
//!
//! The core components never see HTTP; this layer resolves the request
//! target, picks one of four views, and renders HTML around the core's
//! typed results.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/?q=` | Landing page, or search results when `q` is non-empty |
//! | `GET`  | `/src/{path}` | Directory listing or highlighted source view |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! `OutOfBounds` and `NotFound` both render the same 404 page so that
//! probing paths cannot reveal anything about the filesystem outside the
//! root. Read failures during a search or render are 500s.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Path as UrlPath, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use globset::GlobSet;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::error::BrowseError;
use crate::grep::{self, SearchResult};
use crate::highlight::{self, escape_html, Language};
use crate::listing::{self, DirChild};
use crate::resolve;

/// Immutable per-process configuration, shared read-only by all handlers.
///
/// The root is threaded explicitly through every core call rather than
/// living in ambient global state, so each component stays independently
/// testable.
#[derive(Clone)]
pub struct ServeConfig {
    /// Canonicalized root directory the whole service is scoped to.
    pub root: PathBuf,
    /// Listen address, e.g. `127.0.0.1:8080`.
    pub bind: String,
    /// User-supplied exclude globs layered over the built-in `.git` pruning.
    pub excludes: GlobSet,
}

/// The four views the service can render.
///
/// Selection is a closed decision over three predicates: whether the request
/// targeted the root URL, whether a search pattern is present, and (for
/// non-root targets) whether the resolved path is a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Landing,
    SearchResults,
    DirectoryView,
    SourceView,
}

impl View {
    pub fn select(is_root: bool, has_pattern: bool, is_dir: bool) -> View {
        match (is_root, has_pattern) {
            (true, false) => View::Landing,
            (true, true) => View::SearchResults,
            (false, _) => {
                if is_dir {
                    View::DirectoryView
                } else {
                    View::SourceView
                }
            }
        }
    }
}

/// Starts the HTTP server and runs until the process is terminated.
pub async fn run_server(config: ServeConfig) -> anyhow::Result<()> {
    let bind_addr = config.bind.clone();
    let state = Arc::new(config);

    let app = Router::new()
        .route("/", get(handle_root))
        .route("/src", get(handle_browse_root))
        .route("/src/{*path}", get(handle_browse))
        .route("/health", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!(bind = %bind_addr, "srcview listening");
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

// ============ Error response ============

/// Internal error type that converts into an HTML error response.
struct AppError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = page_shell(
            &format!("{}", self.status),
            &format!("<p>{}</p>", escape_html(&self.message)),
            "",
        );
        (self.status, Html(body)).into_response()
    }
}

impl From<BrowseError> for AppError {
    fn from(err: BrowseError) -> Self {
        match err {
            BrowseError::OutOfBounds
            | BrowseError::NotFound(_)
            | BrowseError::NotADirectory(_)
            | BrowseError::IsADirectory(_) => AppError {
                status: StatusCode::NOT_FOUND,
                // One body for every 404 cause; see module docs.
                message: "not found".to_string(),
            },
            BrowseError::Io(_) | BrowseError::NotText(_) => AppError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: err.to_string(),
            },
        }
    }
}

// ============ GET /health ============

fn health_body() -> serde_json::Value {
    serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    })
}

async fn handle_health() -> Json<serde_json::Value> {
    Json(health_body())
}

// ============ GET / and GET /src/{path} ============

#[derive(Deserialize)]
struct BrowseQuery {
    #[serde(default)]
    q: String,
}

/// Handler for `GET /`: landing page, or whole-tree search when `q` is set.
async fn handle_root(
    State(state): State<Arc<ServeConfig>>,
    Query(query): Query<BrowseQuery>,
) -> Result<Html<String>, AppError> {
    match View::select(true, !query.q.is_empty(), false) {
        View::Landing => Ok(Html(render_landing(&state.root.display().to_string()))),
        View::SearchResults => {
            let result = grep::search_tree(&state.root, &query.q, &state.excludes)?;
            Ok(Html(render_search(&result)))
        }
        // Root targets never select a browse view.
        View::DirectoryView | View::SourceView => unreachable!(),
    }
}

/// Handler for `GET /src`: the root directory's listing.
async fn handle_browse_root(
    State(state): State<Arc<ServeConfig>>,
    Query(query): Query<BrowseQuery>,
) -> Result<Html<String>, AppError> {
    browse(&state, "", &query.q)
}

/// Handler for `GET /src/{path}`: directory listing or source view.
async fn handle_browse(
    State(state): State<Arc<ServeConfig>>,
    UrlPath(path): UrlPath<String>,
    Query(query): Query<BrowseQuery>,
) -> Result<Html<String>, AppError> {
    browse(&state, &path, &query.q)
}

fn browse(state: &ServeConfig, rel_path: &str, pattern: &str) -> Result<Html<String>, AppError> {
    let abs = resolve::resolve(&state.root, rel_path)?;
    let meta = std::fs::metadata(&abs).map_err(|e| BrowseError::from_io(&abs, e))?;

    match View::select(false, !pattern.is_empty(), meta.is_dir()) {
        View::DirectoryView => {
            let children = listing::list_dir(&abs)?;
            Ok(Html(render_directory(rel_path, &children, pattern)))
        }
        View::SourceView => {
            let source = listing::read_source(&abs)?;
            let lang = Language::from_path(&abs);
            let body = highlight::render_html(&source, lang);
            Ok(Html(render_source(rel_path, &body, pattern)))
        }
        View::Landing | View::SearchResults => unreachable!(),
    }
}

// ============ URL encoding ============

/// Percent-encodes a root-relative path for use inside an `href`, keeping
/// `/` so path structure survives.
fn encode_path(path: &str) -> String {
    encode(path, true)
}

/// Percent-encodes a query parameter value.
fn encode_query(value: &str) -> String {
    encode(value, false)
}

fn encode(text: &str, keep_slash: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for b in text.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(b as char)
            }
            b'/' if keep_slash => out.push('/'),
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

// ============ Views ============

const STYLE: &str = "body{font-family:sans-serif;margin:2em}\
pre.source{line-height:1.4}\
.ln{color:#999}\
.kw{color:#708;font-weight:bold}\
.str{color:#170}\
.cmt{color:#998;font-style:italic}\
.num{color:#164}\
.pp{color:#05a}\
ul.listing{list-style:none;padding-left:0}\
ul.results li{margin:2px 0}";

/// Common page layout: title, search form pre-filled with the current
/// pattern, and the view body.
fn page_shell(title: &str, body: &str, pattern: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><title>{title}</title><style>{STYLE}</style></head>\
         <body><form action=\"/\"><input name=\"q\" value=\"{q}\" size=\"40\">\
         <button>Search</button></form><h1>{title}</h1>{body}</body></html>",
        title = escape_html(title),
        q = escape_html(pattern),
        body = body,
    )
}

fn render_landing(root_label: &str) -> String {
    let body = format!(
        "<p>Serving <code>{}</code>. Enter a search pattern above or \
         <a href=\"/src\">browse the tree</a>.</p>",
        escape_html(root_label)
    );
    page_shell("srcview", &body, "")
}

fn render_search(result: &SearchResult) -> String {
    let mut body = String::new();
    body.push_str(&format!(
        "<p>{} match(es) for <code>{}</code> under <code>{}</code></p><ul class=\"results\">",
        result.matches.len(),
        escape_html(&result.pattern),
        escape_html(&result.root_label),
    ));
    for m in &result.matches {
        body.push_str(&format!(
            "<li><a href=\"/src/{href}?q={q}\">{path}:{line}</a>: <code>{text}</code></li>",
            href = encode_path(&m.rel_path),
            q = encode_query(&result.pattern),
            path = escape_html(&m.rel_path),
            line = m.line_number,
            text = escape_html(&m.line_text),
        ));
    }
    body.push_str("</ul>");
    page_shell(&format!("search: {}", result.pattern), &body, &result.pattern)
}

fn render_directory(rel_path: &str, children: &[DirChild], pattern: &str) -> String {
    let base = if rel_path.is_empty() {
        String::new()
    } else {
        format!("{}/", encode_path(rel_path))
    };
    let mut body = String::from("<ul class=\"listing\">");
    for child in children {
        let suffix = if child.is_dir { "/" } else { "" };
        body.push_str(&format!(
            "<li><a href=\"/src/{base}{href}?q={q}\">{name}{suffix}</a></li>",
            base = base,
            href = encode_path(&child.name),
            q = encode_query(pattern),
            name = escape_html(&child.name),
            suffix = suffix,
        ));
    }
    body.push_str("</ul>");
    let title = if rel_path.is_empty() { "/" } else { rel_path };
    page_shell(title, &body, pattern)
}

fn render_source(rel_path: &str, highlighted: &str, pattern: &str) -> String {
    page_shell(rel_path, highlighted, pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grep::Match;

    #[test]
    fn view_selection_is_exhaustive_over_its_predicates() {
        assert_eq!(View::select(true, false, false), View::Landing);
        assert_eq!(View::select(true, true, false), View::SearchResults);
        assert_eq!(View::select(false, false, true), View::DirectoryView);
        assert_eq!(View::select(false, true, true), View::DirectoryView);
        assert_eq!(View::select(false, false, false), View::SourceView);
        assert_eq!(View::select(false, true, false), View::SourceView);
        // The dir predicate never flips a root target into a browse view.
        assert_eq!(View::select(true, false, true), View::Landing);
        assert_eq!(View::select(true, true, true), View::SearchResults);
    }

    #[test]
    fn path_encoding_keeps_slashes_and_escapes_the_rest() {
        assert_eq!(encode_path("sub/b.txt"), "sub/b.txt");
        assert_eq!(encode_path("a b/c#d.txt"), "a%20b/c%23d.txt");
        assert_eq!(encode_query("a/b c"), "a%2Fb%20c");
    }

    #[test]
    fn search_view_escapes_match_text_and_links_locations() {
        let result = SearchResult {
            pattern: "<p>".to_string(),
            root_label: "/srv/code".to_string(),
            matches: vec![Match {
                rel_path: "a.html".to_string(),
                line_number: 3,
                line_text: "<p>hello</p>".to_string(),
            }],
        };
        let html = render_search(&result);
        assert!(html.contains("a.html:3"));
        assert!(html.contains("/src/a.html?q=%3Cp%3E"));
        assert!(html.contains("&lt;p&gt;hello&lt;/p&gt;"));
        assert!(!html.contains("<p>hello"));
    }

    #[test]
    fn directory_view_marks_folders_and_carries_the_pattern() {
        let children = vec![
            DirChild {
                name: "a.txt".to_string(),
                is_dir: false,
            },
            DirChild {
                name: "sub".to_string(),
                is_dir: true,
            },
        ];
        let html = render_directory("", &children, "foo");
        assert!(html.contains("/src/a.txt?q=foo"));
        assert!(html.contains("/src/sub?q=foo"));
        assert!(html.contains("sub/</a>"));

        let nested = render_directory("sub", &children, "");
        assert!(nested.contains("/src/sub/a.txt?q="));
    }

    #[test]
    fn landing_view_shows_the_root_label_only() {
        let html = render_landing("/srv/code");
        assert!(html.contains("/srv/code"));
        assert!(!html.contains("match(es)"));
    }

    #[test]
    fn error_pages_do_not_leak_out_of_bounds_targets() {
        let oob: AppError = BrowseError::OutOfBounds.into();
        let missing: AppError =
            BrowseError::NotFound("/srv/code/gone".to_string()).into();
        assert_eq!(oob.status, StatusCode::NOT_FOUND);
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
        assert_eq!(oob.message, missing.message);
    }

    #[test]
    fn health_body_reports_status_and_version() {
        let body = health_body();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn io_failures_map_to_server_errors() {
        let err: AppError = BrowseError::NotText("blob.bin".to_string()).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
