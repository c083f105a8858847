use clipper_engine::{
    decode_body, Converter, Extractor, HeadingStyle, Html, MarkdownConverter,
    ReadabilityLikeExtractor,
};
use pretty_assertions::assert_eq;

const BASE: &str = "https://example.com/blog/post";

fn md(html: &str) -> String {
    MarkdownConverter::new().to_markdown(html, Some(BASE))
}

fn lines(markdown: &str) -> Vec<&str> {
    markdown.lines().map(str::trim_end).collect()
}

#[test]
fn decode_respects_charset_header() {
    let bytes = b"caf\xe9"; // iso-8859-1
    let decoded = decode_body(bytes, Some("text/html; charset=ISO-8859-1")).unwrap();
    assert_eq!(decoded, "café");
}

#[test]
fn decode_handles_utf8_bom() {
    let bytes = b"\xEF\xBB\xBFhello";
    let decoded = decode_body(bytes, Some("text/html")).unwrap();
    assert_eq!(decoded, "hello");
}

#[test]
fn extractor_prefers_article_then_body() {
    let html = r#"
    <html><head><title>Title</title></head>
    <body>
        <nav><a href="/">Home</a></nav>
        <article><h1>Heading</h1><p>Body text</p></article>
        <aside>Related posts</aside>
    </body></html>
    "#;
    let extracted = ReadabilityLikeExtractor.extract(&Html::parse_document(html));
    assert_eq!(extracted.title.as_deref(), Some("Title"));
    assert!(extracted.content_html.contains("Heading"));
    assert!(extracted.content_html.contains("Body text"));
    assert!(!extracted.content_html.contains("Home"));
    assert!(!extracted.content_html.contains("Related posts"));
}

#[test]
fn heading_then_paragraph_uses_atx_marker() {
    assert_eq!(md("<h1>Hello</h1><p>World</p>"), "# Hello\n\nWorld");
}

#[test]
fn all_heading_levels_are_kept() {
    let out = md("<h1>a</h1><h2>b</h2><h3>c</h3><h4>d</h4><h5>e</h5><h6>f</h6>");
    let headings: Vec<_> = lines(&out).into_iter().filter(|l| !l.is_empty()).collect();
    assert_eq!(
        headings,
        ["# a", "## b", "### c", "#### d", "##### e", "###### f"]
    );
}

#[test]
fn setext_style_underlines_top_levels() {
    let out = MarkdownConverter::with_heading_style(HeadingStyle::Setext)
        .to_markdown("<h1>Title</h1><p>x</p>", None);
    let out = lines(&out);
    assert_eq!(out[0], "Title");
    assert!(out[1].starts_with("==="), "{out:?}");
}

#[test]
fn lists_keep_structure_and_numbering() {
    let out = md(r#"
        <ul><li>one</li><li>two<ul><li>nested</li></ul></li></ul>
        <ol start="3"><li>third</li><li>fourth</li></ol>
    "#);
    let out = lines(&out);
    let find = |text: &str| {
        out.iter()
            .copied()
            .find(|l| l.ends_with(text))
            .unwrap_or_else(|| panic!("{text} missing in {out:?}"))
    };
    assert!(find("one").starts_with("- "));
    assert!(find("two").starts_with("- "));
    let nested = find("nested");
    assert!(nested.starts_with(' ') && nested.trim_start().starts_with("- "));
    assert!(find("third").starts_with("3."));
    assert!(find("fourth").starts_with("4."));
}

#[test]
fn oversized_list_start_does_not_overflow() {
    let huge = md(r#"<ol start="18446744073709551615"><li>a</li><li>b</li></ol>"#);
    assert!(huge.contains('a') && huge.contains('b'), "{huge}");
    let negative = md(r#"<ol start="-2"><li>x</li></ol>"#);
    assert!(negative.ends_with('x'), "{negative}");
}

#[test]
fn links_resolve_against_page_url() {
    let out = md(r#"<p>See <a href="../about">the about page</a> and <a href="https://rust-lang.org">Rust</a>.</p>"#);
    assert!(out.contains("[the about page](https://example.com/about)"), "{out}");
    assert!(out.contains("[Rust](https://rust-lang.org/)"), "{out}");
}

#[test]
fn script_and_fragment_links_keep_only_text() {
    let out = md(r##"<p><a href="javascript:run()">Run</a> or <a href="#top">Top</a></p>"##);
    assert_eq!(out, "Run or Top");
}

#[test]
fn empty_link_shows_its_target() {
    let out = md(r#"<p><a href="/feed"></a></p>"#);
    assert!(
        out.contains("[https://example.com/feed](https://example.com/feed)")
            || out.contains("<https://example.com/feed>"),
        "{out}"
    );
}

#[test]
fn code_blocks_are_fenced_with_language() {
    let out = md("<p>Run:</p><pre><code class=\"language-rust\">fn main() {\n    println!(\"hi\");\n}\n</code></pre>");
    let out = lines(&out);
    assert_eq!(out[0], "Run:");
    assert!(out.contains(&"```rust"), "{out:?}");
    assert!(out.contains(&"    println!(\"hi\");"), "{out:?}");
    assert_eq!(out.last(), Some(&"```"));
}

#[test]
fn inline_code_span_outlasts_backtick_runs() {
    let out = md("<p><code>a``b</code></p>");
    let fence = out.chars().take_while(|c| *c == '`').count();
    assert!(fence > 0 && fence != 2, "{out}");
    assert!(out.ends_with(&"`".repeat(fence)), "{out}");
    assert!(out.replace('\\', "").contains("a``b"), "{out}");
}

#[test]
fn inline_code_and_emphasis() {
    let out = md("<p>Use <code>cargo</code> <strong>now</strong>, <em>maybe</em>.</p>");
    assert!(out.contains("`cargo`"), "{out}");
    assert!(out.contains("**now**"), "{out}");
    assert!(out.contains("maybe"), "{out}");
}

#[test]
fn markdown_lookalike_text_stays_text() {
    let out = md("<p># not a heading</p><p>1. not a list</p><p>*not em*</p>");
    let out = lines(&out);
    assert!(out.iter().any(|l| l.contains("not a heading")), "{out:?}");
    assert!(!out.iter().any(|l| l.starts_with("# ")), "{out:?}");
    assert!(!out.iter().any(|l| l.starts_with("1. ")), "{out:?}");
    assert!(!out.iter().any(|l| l.contains("*not em*")), "{out:?}");
}

#[test]
fn images_become_alt_text_and_absolute_source() {
    let out = md(r#"<p>Before <img src="/img/cat.png" alt="A  cat"> after <img alt="no source"></p>"#);
    assert!(out.contains("![A cat](https://example.com/img/cat.png)"), "{out}");
    assert!(!out.contains("no source"), "{out}");
}

#[test]
fn block_quotes_prefix_every_line() {
    let out = md("<blockquote><p>first</p><p>second</p></blockquote><p>end</p>");
    let out = lines(&out);
    assert!(out.contains(&"> first"), "{out:?}");
    assert!(out.contains(&"> second"), "{out:?}");
    assert_eq!(out.last(), Some(&"end"));
}

#[test]
fn table_cells_survive() {
    let out = md("<table><tr><th>key</th><th>value</th></tr><tr><td>alpha</td><td>one</td></tr></table>");
    for cell in ["key", "value", "alpha", "one"] {
        assert!(out.contains(cell), "{cell} missing in {out}");
    }
}

#[test]
fn scripts_and_media_are_dropped() {
    let html = "<p>keep</p><script>alert(1)</script><video src=\"x.mp4\">fallback</video>";
    assert_eq!(md(html), "keep");
}

#[test]
fn pipeline_decode_extract_convert_is_deterministic() {
    let bytes = br#"<html><head><title>X</title></head><body><article><p>A</p><p>B</p></article></body></html>"#;
    let run = || {
        let decoded = decode_body(bytes, Some("text/html; charset=utf-8")).unwrap();
        let extracted = ReadabilityLikeExtractor.extract(&Html::parse_document(&decoded));
        MarkdownConverter::new().to_markdown(&extracted.content_html, None)
    };
    let first = run();
    assert_eq!(first, "A\n\nB");
    assert_eq!(first, run());
}
