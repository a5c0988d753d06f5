//! Section markup analysis.
//!
//! One reading-order section is parsed once into a [`SectionShape`]: its words,
//! the first few text lines, and whatever heading structure the markup offers.
//! The title cascade in `title.rs` only ever looks at the shape.

use super::text::{flatten_whitespace, normalize, tokenize};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

/// Lines kept for the first-line fallback: the line itself plus three more.
const FALLBACK_LINES: usize = 4;

const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "head", "noscript", "template"];

const BLOCK_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "dd",
    "div",
    "dl",
    "dt",
    "figcaption",
    "figure",
    "footer",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "td",
    "th",
    "tr",
    "ul",
];

static SEL_BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());
static SEL_HEADINGS: Lazy<[Selector; 3]> = Lazy::new(|| {
    [
        Selector::parse("h1").unwrap(),
        Selector::parse("h2").unwrap(),
        Selector::parse("h3").unwrap(),
    ]
});
static SEL_CLASSED: Lazy<Selector> = Lazy::new(|| Selector::parse("[class]").unwrap());

static RE_TITLE_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)title|chapter|heading").unwrap());
static RE_SUBTITLE_CLASS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)sub-?title").unwrap());

/// Everything the title cascade needs to know about one section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionShape {
    pub words: Vec<String>,
    /// Normalized text of the primary heading candidate.
    pub heading: Option<String>,
    /// Normalized text of the subtitle candidate following the heading.
    pub subtitle: Option<String>,
    /// First non-empty text lines, normalized, at most four.
    pub lines: Vec<String>,
}

impl SectionShape {
    pub fn has_heading(&self) -> bool {
        self.heading.is_some()
    }
}

/// Parse section markup into its shape. HTML parsing is lenient, so this
/// never fails; unreadable sections are rejected before they get here.
pub fn analyze(markup: &str) -> SectionShape {
    let document = Html::parse_document(markup);
    let body = document
        .select(&SEL_BODY)
        .next()
        .unwrap_or_else(|| document.root_element());

    let mut raw = String::new();
    collect_text(body, &mut raw);

    let lines = raw
        .lines()
        .map(normalize)
        .filter(|line| !line.is_empty())
        .take(FALLBACK_LINES)
        .collect();

    let primary = primary_candidate(body);
    let subtitle = primary
        .as_ref()
        .and_then(|candidate| subtitle_candidate(body, candidate));

    SectionShape {
        words: tokenize(&raw),
        heading: primary.map(|candidate| candidate.text),
        subtitle,
        lines,
    }
}

#[derive(Debug, Clone)]
struct Candidate<'a> {
    element: ElementRef<'a>,
    text: String,
    level: Option<u8>,
}

fn primary_candidate(body: ElementRef<'_>) -> Option<Candidate<'_>> {
    for (idx, selector) in SEL_HEADINGS.iter().enumerate() {
        if let Some(candidate) = body
            .select(selector)
            .find_map(|element| non_empty_candidate(element, Some(idx as u8 + 1)))
        {
            return Some(candidate);
        }
    }

    body.select(&SEL_CLASSED)
        .filter(|element| {
            let class = element.value().attr("class").unwrap_or_default();
            RE_TITLE_CLASS.is_match(class) && !RE_SUBTITLE_CLASS.is_match(class)
        })
        .find_map(|element| non_empty_candidate(element, None))
}

fn subtitle_candidate(body: ElementRef<'_>, primary: &Candidate<'_>) -> Option<String> {
    let sibling = primary
        .element
        .next_siblings()
        .find_map(ElementRef::wrap)
        .filter(|element| match (primary.level, heading_level(element.value().name())) {
            (Some(level), Some(next)) => next == level + 1,
            (None, Some(_)) => true,
            _ => false,
        })
        .map(element_text)
        .filter(|text| !text.is_empty());
    if sibling.is_some() {
        return sibling;
    }

    body.select(&SEL_CLASSED)
        .filter(|element| *element != primary.element)
        .filter(|element| {
            RE_SUBTITLE_CLASS.is_match(element.value().attr("class").unwrap_or_default())
        })
        .map(element_text)
        .find(|text| !text.is_empty())
}

fn non_empty_candidate(element: ElementRef<'_>, level: Option<u8>) -> Option<Candidate<'_>> {
    let text = element_text(element);
    if text.is_empty() {
        return None;
    }
    Some(Candidate {
        element,
        text,
        level,
    })
}

fn heading_level(name: &str) -> Option<u8> {
    match name {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect_text(element, &mut raw);
    normalize(&raw)
}

/// Append the text under `element`. Source line wrapping is flattened; only
/// block boundaries and `<br>` start a new line, so adjacent paragraphs never
/// fuse into one word and a wrapped paragraph stays one line.
fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&flatten_whitespace(text)),
            Node::Element(el) => {
                let name = el.name();
                if SKIPPED_ELEMENTS.contains(&name) {
                    continue;
                }
                if name == "br" {
                    out.push('\n');
                    continue;
                }
                let block = BLOCK_ELEMENTS.contains(&name);
                if block {
                    out.push('\n');
                }
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, out);
                }
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::analyze;

    fn xhtml(body: &str) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
             <html xmlns=\"http://www.w3.org/1999/xhtml\"><head><title>ignored</title>\
             <style>p {{ margin: 0 }}</style></head><body>{body}</body></html>"
        )
    }

    #[test]
    fn adjacent_blocks_do_not_fuse_words() {
        let shape = analyze(&xhtml("<p>alpha</p><p>beta<br/>gamma</p>"));
        assert_eq!(shape.words, vec!["alpha", "beta", "gamma"]);
        assert_eq!(shape.lines, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn wrapped_paragraph_is_one_line() {
        let shape = analyze(&xhtml(
            "<p>It was a bright cold day in April, and the\nclocks were striking thirteen.</p>",
        ));
        assert_eq!(
            shape.lines,
            vec!["It was a bright cold day in April, and the clocks were striking thirteen."]
        );
        assert_eq!(shape.words.len(), 14);
        assert_eq!(crate::extractor::title::detect_title(&shape), None);
    }

    #[test]
    fn inline_markup_keeps_word_boundaries() {
        let shape = analyze(&xhtml("<p>a <em>b</em>\n<strong>c</strong>d</p>"));
        assert_eq!(shape.words, vec!["a", "b", "cd"]);
    }

    #[test]
    fn head_and_style_text_is_ignored() {
        let shape = analyze(&xhtml("<p>only this</p>"));
        assert_eq!(shape.words, vec!["only", "this"]);
    }

    #[test]
    fn prefers_h1_over_earlier_h2() {
        let shape = analyze(&xhtml("<h2>Contents</h2><h1>The Real Title</h1><p>text.</p>"));
        assert_eq!(shape.heading.as_deref(), Some("The Real Title"));
    }

    #[test]
    fn falls_back_to_class_pattern() {
        let shape = analyze(&xhtml(
            "<p class=\"chapter-number\">IV</p><p>Once upon a time.</p>",
        ));
        assert_eq!(shape.heading.as_deref(), Some("IV"));
    }

    #[test]
    fn subtitle_class_is_not_a_primary_candidate() {
        let shape = analyze(&xhtml("<p class=\"subtitle\">A Tale</p><p>Prose here.</p>"));
        assert_eq!(shape.heading, None);
    }

    #[test]
    fn next_level_heading_is_subtitle() {
        let shape = analyze(&xhtml("<h1>1</h1><h2>The Beginning</h2><p>Prose.</p>"));
        assert_eq!(shape.heading.as_deref(), Some("1"));
        assert_eq!(shape.subtitle.as_deref(), Some("The Beginning"));
    }

    #[test]
    fn subtitle_class_found_anywhere() {
        let shape = analyze(&xhtml(
            "<h2>PART ONE</h2><div><span class=\"sub-title\">Arrival</span></div>",
        ));
        assert_eq!(shape.heading.as_deref(), Some("PART ONE"));
        assert_eq!(shape.subtitle.as_deref(), Some("Arrival"));
    }

    #[test]
    fn skipped_level_is_not_a_subtitle() {
        let shape = analyze(&xhtml("<h1>One</h1><h3>Aside</h3><p>Prose.</p>"));
        assert_eq!(shape.subtitle, None);
    }

    #[test]
    fn empty_heading_is_ignored() {
        let shape = analyze(&xhtml("<h1>  </h1><p>Some prose.</p>"));
        assert!(!shape.has_heading());
    }

    #[test]
    fn lines_are_capped() {
        let shape = analyze(&xhtml("<p>a</p><p>b</p><p>c</p><p>d</p><p>e</p>"));
        assert_eq!(shape.lines.len(), 4);
        assert_eq!(shape.words.len(), 5);
    }
}
