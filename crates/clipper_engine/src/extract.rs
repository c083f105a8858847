use scraper::{Html, Selector};

/// Elements that never carry the readable part of a page. Form controls are
/// listed, `form` itself is not.
const BOILERPLATE: &str = "script, style, noscript, template, iframe, svg, nav, header, footer, \
     aside, input, button, select, textarea, [role=navigation], [role=banner], \
     [role=contentinfo], [aria-hidden=\"true\"]";

/// Candidate content roots, most specific first.
const CONTENT_ROOTS: [&str; 4] = ["article", "main", "[role=main]", "body"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    pub title: Option<String>,
    pub content_html: String,
}

pub trait Extractor: Send + Sync {
    fn extract(&self, document: &Html) -> ExtractedContent;
}

/// Lightweight "readability-like" extractor:
/// - title from `og:title`, then `<title>`, then the first `<h1>`
/// - drops navigation, chrome and scripting elements
/// - returns the inner HTML of the first `<article>`, `<main>`,
///   `[role=main]` or `<body>`, falling back to the whole document.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReadabilityLikeExtractor;

impl Extractor for ReadabilityLikeExtractor {
    fn extract(&self, document: &Html) -> ExtractedContent {
        let title = find_title(document);

        let mut cleaned = document.clone();
        strip_boilerplate(&mut cleaned);
        let content_html = CONTENT_ROOTS
            .iter()
            .filter_map(|css| selector(css))
            .find_map(|sel| cleaned.select(&sel).next().map(|node| node.inner_html()))
            .unwrap_or_else(|| cleaned.root_element().html());

        ExtractedContent {
            title,
            content_html,
        }
    }
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn find_title(document: &Html) -> Option<String> {
    let og_title = selector(r#"meta[property="og:title"]"#).and_then(|sel| {
        document
            .select(&sel)
            .filter_map(|meta| meta.value().attr("content"))
            .map(collapse_whitespace)
            .find(|t| !t.is_empty())
    });
    og_title.or_else(|| first_text(document, "title")).or_else(|| first_text(document, "h1"))
}

fn first_text(document: &Html, css: &str) -> Option<String> {
    let sel = selector(css)?;
    document
        .select(&sel)
        .map(|node| collapse_whitespace(&node.text().collect::<String>()))
        .find(|t| !t.is_empty())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_boilerplate(document: &mut Html) {
    let Some(sel) = selector(BOILERPLATE) else {
        return;
    };
    let ids: Vec<_> = document.select(&sel).map(|node| node.id()).collect();
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}
