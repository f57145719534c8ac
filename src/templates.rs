//! Precompiled page templates.
//!
//! Every page under `html/pages/` is compiled together with `html/layout.html`
//! into its own `Tera` instance at startup. The resulting cache is immutable
//! and shared read-only by all request tasks.

use crate::db::Player;
use crate::error::BossError;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tera::{Context, Tera, Value};
use tracing::info;

const LAYOUT_NAME: &str = "layout.html";

/// Per-request data handed to a page.
#[derive(Debug, Default, Serialize)]
pub struct TemplateData {
    pub current_year: i32,
    pub player: Option<Player>,
    pub players: Vec<Player>,
    /// Values echoed back into the create form.
    pub form: BTreeMap<String, String>,
    pub form_errors: BTreeMap<String, String>,
}

impl TemplateData {
    pub fn new() -> Self {
        Self {
            current_year: Local::now().year(),
            ..Default::default()
        }
    }
}

/// Immutable mapping from page name (`home.html`) to its compiled set.
pub struct TemplateCache {
    pages: HashMap<String, Tera>,
}

impl TemplateCache {
    /// Compile `dir/layout.html` with every `dir/pages/*.html`. Any page that
    /// fails to parse, has a non UTF-8 name, or whose layout is missing, fails
    /// the whole build.
    pub fn build(dir: &Path) -> Result<Self, BossError> {
        let layout = dir.join(LAYOUT_NAME);
        let mut pages = HashMap::new();

        for page in page_files(&dir.join("pages"))? {
            let name = page
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_owned)
                .ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("page file name is not UTF-8: {}", page.display()),
                    )
                })?;
            let mut tera = new_tera();
            tera.add_template_files(vec![
                (layout.as_path(), Some(LAYOUT_NAME)),
                (page.as_path(), Some(name.as_str())),
            ])?;
            pages.insert(name, tera);
        }

        info!(path = %dir.display(), count = pages.len(), "template cache built");
        Ok(Self { pages })
    }

    /// Compile in-memory sources; same layout contract as [`TemplateCache::build`].
    pub fn from_sources(layout: &str, pages: &[(&str, &str)]) -> Result<Self, BossError> {
        let mut compiled = HashMap::new();
        for (name, body) in pages {
            let mut tera = new_tera();
            tera.add_raw_templates(vec![(LAYOUT_NAME, layout), (*name, *body)])?;
            compiled.insert((*name).to_string(), tera);
        }
        Ok(Self { pages: compiled })
    }

    /// Fail unless every page in `names` was compiled.
    pub fn require(self, names: &[&str]) -> Result<Self, BossError> {
        match names.iter().find(|name| !self.pages.contains_key(**name)) {
            Some(missing) => Err(BossError::TemplateMissing((*missing).to_string())),
            None => Ok(self),
        }
    }

    pub fn contains(&self, page: &str) -> bool {
        self.pages.contains_key(page)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Execute `page` into a buffer.
    pub fn render_to_string(&self, page: &str, data: &TemplateData) -> Result<String, BossError> {
        let tera = self
            .pages
            .get(page)
            .ok_or_else(|| BossError::TemplateMissing(page.to_string()))?;
        let ctx = Context::from_serialize(data)?;
        Ok(tera.render(page, &ctx)?)
    }

    /// Render `page` and only then attach `status`; a failed execution never
    /// produces a partial body.
    pub fn render(
        &self,
        status: StatusCode,
        page: &str,
        data: &TemplateData,
    ) -> Result<Response, BossError> {
        let buf = self.render_to_string(page, data)?;
        Ok((status, Html(buf)).into_response())
    }
}

fn new_tera() -> Tera {
    let mut tera = Tera::default();
    tera.register_filter("human_date", human_date);
    tera
}

fn page_files(dir: &Path) -> Result<Vec<PathBuf>, BossError> {
    let mut pages: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_html_file(path))
        .collect();
    pages.sort();
    Ok(pages)
}

fn is_html_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|s| s.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("html"))
            == Some(true)
}

/// `1981-02-01` (or an RFC 3339 timestamp) -> `01.02. 1981`.
fn human_date(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let raw = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("human_date expects a date string"))?;
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| chrono::DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|e| tera::Error::msg(format!("human_date: cannot parse {raw:?}: {e}")))?;
    Ok(Value::String(date.format("%d.%m. %Y").to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: &str = r#"<html><body>{% block main %}{% endblock %}<footer>{{ current_year }}</footer></body></html>"#;

    #[test]
    fn human_date_formats_dates_and_timestamps() {
        let args = HashMap::new();
        let out = human_date(&Value::String("1981-02-01".into()), &args).unwrap();
        assert_eq!(out, Value::String("01.02. 1981".into()));

        let out = human_date(&Value::String("2024-12-31T23:10:00+00:00".into()), &args).unwrap();
        assert_eq!(out, Value::String("31.12. 2024".into()));

        assert!(human_date(&Value::Bool(true), &args).is_err());
        assert!(human_date(&Value::String("yesterday".into()), &args).is_err());
    }

    #[test]
    fn renders_page_inside_layout() {
        let cache = TemplateCache::from_sources(
            LAYOUT,
            &[(
                "home.html",
                r#"{% extends "layout.html" %}{% block main %}<h1>Home</h1>{% endblock %}"#,
            )],
        )
        .unwrap();

        let mut data = TemplateData::new();
        data.current_year = 2030;
        let html = cache.render_to_string("home.html", &data).unwrap();
        assert!(html.contains("<h1>Home</h1>"));
        assert!(html.contains("<footer>2030</footer>"));
    }

    #[test]
    fn missing_page_is_an_error() {
        let cache = TemplateCache::from_sources(LAYOUT, &[]).unwrap();
        let err = cache
            .render_to_string("nope.html", &TemplateData::new())
            .unwrap_err();
        assert!(matches!(err, BossError::TemplateMissing(ref p) if p == "nope.html"));
        assert!(cache.require(&["nope.html"]).is_err());
    }

    #[test]
    fn unknown_parent_fails_compilation() {
        let res = TemplateCache::from_sources(
            LAYOUT,
            &[(
                "bad.html",
                r#"{% extends "base.html" %}{% block main %}x{% endblock %}"#,
            )],
        );
        assert!(res.is_err());
    }

    #[test]
    fn execution_error_yields_no_output() {
        let cache = TemplateCache::from_sources(
            LAYOUT,
            &[(
                "player.html",
                r#"{% extends "layout.html" %}{% block main %}{{ player.surname }}{% endblock %}"#,
            )],
        )
        .unwrap();
        let res = cache.render(StatusCode::OK, "player.html", &TemplateData::new());
        assert!(matches!(res, Err(BossError::Template(_))));
    }
}
