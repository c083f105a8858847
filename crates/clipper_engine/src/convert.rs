use ego_tree::NodeId;
use htmd::options::{BulletListMarker, CodeBlockFence, CodeBlockStyle, Options};
use htmd::HtmlToMarkdown;
use scraper::node::{Element, Node, Text};
use scraper::{ElementRef, Html};
use url::Url;

/// Elements whose content never reaches the Markdown output.
const SKIPPED_TAGS: [&str; 11] = [
    "script", "style", "noscript", "template", "iframe", "svg", "video", "audio", "canvas",
    "object", "embed",
];

/// Largest ordered-list start a CommonMark list marker can carry (nine digits).
const MAX_LIST_START: i64 = 999_999_999;

pub trait Converter: Send + Sync {
    /// Render an HTML fragment as Markdown. Relative links and image sources
    /// are resolved against `base_url` when one is given.
    fn to_markdown(&self, html: &str, base_url: Option<&str>) -> String;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum HeadingStyle {
    /// `# Title`
    #[default]
    Atx,
    /// `Title` underlined with `===` / `---` for levels 1 and 2, ATX below.
    Setext,
}

/// HTML to Markdown converter backed by `htmd`.
///
/// Before conversion the fragment is normalized: every `pre` holds a single
/// `code` carrying the `language-` or `lang-` hint found on either element,
/// link targets and image sources become absolute, `#fragment` and
/// `javascript:` links are reduced to their text, links without text are
/// labelled with their target, images without a source are dropped and
/// ordered-list starts are clamped to what a Markdown list marker can hold.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownConverter {
    heading_style: HeadingStyle,
}

impl MarkdownConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_heading_style(heading_style: HeadingStyle) -> Self {
        Self { heading_style }
    }

    fn build(&self) -> HtmlToMarkdown {
        let heading_style = match self.heading_style {
            HeadingStyle::Atx => htmd::options::HeadingStyle::Atx,
            HeadingStyle::Setext => htmd::options::HeadingStyle::Setex,
        };
        HtmlToMarkdown::builder()
            .options(Options {
                heading_style,
                bullet_list_marker: BulletListMarker::Dash,
                code_block_style: CodeBlockStyle::Fenced,
                code_block_fence: CodeBlockFence::Backticks,
                ..Default::default()
            })
            .skip_tags(SKIPPED_TAGS.to_vec())
            .build()
    }
}

impl Converter for MarkdownConverter {
    fn to_markdown(&self, html: &str, base_url: Option<&str>) -> String {
        let base_url = base_url.and_then(|b| Url::parse(b).ok());
        let prepared = prepare(html, base_url.as_ref());
        let markdown = self
            .build()
            .convert(&prepared)
            .unwrap_or_else(|_| plain_text(&prepared));
        markdown.trim().to_string()
    }
}

fn plain_text(html: &str) -> String {
    Html::parse_fragment(html)
        .root_element()
        .text()
        .collect::<String>()
}

enum Rewrite {
    Keep,
    Drop,
    /// Replace the element with its children.
    Unwrap,
    /// Give an empty link its own target as text.
    Label(String),
}

/// Normalize code blocks, links, images and list starts in `html` and
/// serialize it back.
fn prepare(html: &str, base: Option<&Url>) -> String {
    let mut fragment = Html::parse_fragment(html);
    let ids: Vec<_> = fragment
        .tree
        .nodes()
        .filter(|node| {
            node.value()
                .as_element()
                .is_some_and(|el| matches!(el.name(), "a" | "img" | "ol" | "pre"))
        })
        .map(|node| node.id())
        .collect();

    for id in ids {
        if is_named(&fragment, id, "pre") {
            wrap_code_block(&mut fragment, id);
            continue;
        }
        let (children, has_text) = match fragment.tree.get(id).and_then(ElementRef::wrap) {
            Some(element) => (
                element.children().map(|child| child.id()).collect::<Vec<_>>(),
                element.text().any(|t| !t.trim().is_empty())
                    || element.descendants().any(|d| {
                        d.value().as_element().is_some_and(|el| el.name() == "img")
                    }),
            ),
            None => continue,
        };
        let Some(mut node) = fragment.tree.get_mut(id) else {
            continue;
        };
        let rewrite = match node.value() {
            Node::Element(element) => rewrite_element(element, base, has_text),
            _ => Rewrite::Keep,
        };
        match rewrite {
            Rewrite::Keep => {}
            Rewrite::Drop => node.detach(),
            Rewrite::Unwrap => {
                if node.parent().is_none() {
                    continue;
                }
                for child in children {
                    node.insert_id_before(child);
                }
                node.detach();
            }
            Rewrite::Label(target) => {
                node.append(Node::Text(Text {
                    text: target.as_str().into(),
                }));
            }
        }
    }

    fragment.root_element().inner_html()
}

fn is_named(fragment: &Html, id: NodeId, name: &str) -> bool {
    fragment
        .tree
        .get(id)
        .and_then(|node| node.value().as_element())
        .is_some_and(|el| el.name() == name)
}

/// Move the content of `pre` (or of its `code` children) into one fresh
/// `code` element tagged with the block's language.
fn wrap_code_block(fragment: &mut Html, pre_id: NodeId) {
    let Some(pre) = fragment.tree.get(pre_id).and_then(ElementRef::wrap) else {
        return;
    };
    let language = language_hint(pre.value()).or_else(|| {
        pre.children()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name() == "code")
            .find_map(|code| language_hint(code.value()))
    });
    let children: Vec<(NodeId, bool)> = pre
        .children()
        .map(|child| {
            let is_code = child
                .value()
                .as_element()
                .is_some_and(|el| el.name() == "code");
            (child.id(), is_code)
        })
        .collect();

    let Some(code) = code_element(language.as_deref()) else {
        return;
    };
    let Some(mut pre_node) = fragment.tree.get_mut(pre_id) else {
        return;
    };
    let code_id = pre_node.append(Node::Element(code)).id();

    for (child, is_code) in children {
        let moved: Vec<NodeId> = if is_code {
            fragment
                .tree
                .get(child)
                .map(|old| old.children().map(|n| n.id()).collect())
                .unwrap_or_default()
        } else {
            vec![child]
        };
        if let Some(mut target) = fragment.tree.get_mut(code_id) {
            for id in moved {
                target.append_id(id);
            }
        }
        if is_code {
            if let Some(mut old) = fragment.tree.get_mut(child) {
                old.detach();
            }
        }
    }
}

fn code_element(language: Option<&str>) -> Option<Element> {
    let markup = match language {
        Some(language) => format!(r#"<code class="language-{language}"></code>"#),
        None => "<code></code>".to_string(),
    };
    Html::parse_fragment(&markup)
        .tree
        .nodes()
        .find_map(|node| node.value().as_element().filter(|el| el.name() == "code").cloned())
}

fn language_hint(element: &Element) -> Option<String> {
    element
        .classes()
        .find_map(|class| {
            class
                .strip_prefix("language-")
                .or_else(|| class.strip_prefix("lang-"))
        })
        .filter(|language| {
            !language.is_empty()
                && language
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || "+#._-".contains(c))
        })
        .map(str::to_string)
}

fn rewrite_element(element: &mut Element, base: Option<&Url>, has_text: bool) -> Rewrite {
    match element.name() {
        "img" => match element.attr("src").and_then(|src| resolve_url(src, base)) {
            Some(src) => {
                let alt = element
                    .attr("alt")
                    .map(|alt| alt.split_whitespace().collect::<Vec<_>>().join(" "));
                set_attr(element, "src", &src);
                if let Some(alt) = alt {
                    set_attr(element, "alt", &alt);
                }
                Rewrite::Keep
            }
            None => Rewrite::Drop,
        },
        "a" => {
            let Some(href) = element.attr("href") else {
                return Rewrite::Keep;
            };
            match resolve_url(href, base) {
                Some(target) => {
                    set_attr(element, "href", &target);
                    if has_text {
                        Rewrite::Keep
                    } else {
                        Rewrite::Label(target)
                    }
                }
                None => Rewrite::Unwrap,
            }
        }
        "ol" => {
            let start = element
                .attr("start")
                .map(|start| start.trim().parse::<i64>().unwrap_or(1));
            if let Some(start) = start {
                set_attr(element, "start", &start.clamp(0, MAX_LIST_START).to_string());
            }
            Rewrite::Keep
        }
        _ => Rewrite::Keep,
    }
}

fn set_attr(element: &mut Element, name: &str, value: &str) {
    for (key, current) in element.attrs.iter_mut() {
        if &*key.local == name {
            *current = value.into();
        }
    }
}

/// Absolute form of a link target. `None` for empty, `#fragment` and
/// `javascript:` targets.
fn resolve_url(reference: &str, base: Option<&Url>) -> Option<String> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with('#') || lower.starts_with("javascript:") {
        return None;
    }
    if let Ok(url) = Url::parse(trimmed) {
        return Some(url.into());
    }
    match base.and_then(|base| base.join(trimmed).ok()) {
        Some(url) => Some(url.into()),
        None => Some(trimmed.to_string()),
    }
}
