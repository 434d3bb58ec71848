//! A minimal markup document.
//!
//! The storefront never needs a full DOM: it locates elements by tag name,
//! `#id` or `.class`, replaces an element's inner markup, and swaps a whole
//! element for other markup. `Document` does exactly that on an owned string.
//!
//! Matching is forgiving in the way browsers are: tag names are
//! case-insensitive, attribute values may use either quote style, and an
//! element whose closing tag is missing is treated as empty.

use std::fmt;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// An opening tag with its attribute list.
static OPEN_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<([a-zA-Z][a-zA-Z0-9-]*)((?:\s+[^\s"'>/=]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'>]+))?)*)\s*(/?)>"#,
    )
    .expect("Invalid regex")
});

/// A markup comment; an unterminated one runs to the end of the input.
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?(?:-->|\z)").expect("Invalid regex"));

/// One `name="value"` pair inside an opening tag.
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#)
        .expect("Invalid regex")
});

/// Elements that never have content or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Errors from document manipulation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomError {
    /// No element matches the selector.
    #[error("No element matches selector '{0}'")]
    NoMatch(Selector),

    /// The matched element cannot hold content.
    #[error("Element matching '{0}' cannot contain markup")]
    VoidElement(Selector),
}

/// A simple selector: one tag name, one id, or one class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Tag(String),
    Id(String),
    Class(String),
}

impl Selector {
    /// Parse `main`, `#cart-list` or `.badge`.
    #[must_use]
    pub fn parse(selector: &str) -> Self {
        let selector = selector.trim();
        if let Some(id) = selector.strip_prefix('#') {
            Self::Id(id.to_string())
        } else if let Some(class) = selector.strip_prefix('.') {
            Self::Class(class.to_string())
        } else {
            Self::Tag(selector.to_ascii_lowercase())
        }
    }

    /// Selector matching elements by tag name.
    #[must_use]
    pub fn tag(name: &str) -> Self {
        Self::Tag(name.to_ascii_lowercase())
    }

    fn matches(&self, element: &Element) -> bool {
        match self {
            Self::Tag(name) => element.tag == *name,
            Self::Id(id) => element.attr("id") == Some(id.as_str()),
            Self::Class(class) => element
                .attr("class")
                .is_some_and(|classes| classes.split_whitespace().any(|c| c == class)),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(name) => write!(f, "{name}"),
            Self::Id(id) => write!(f, "#{id}"),
            Self::Class(class) => write!(f, ".{class}"),
        }
    }
}

/// A located element.
///
/// Spans are byte offsets into the document the element was found in and
/// go stale as soon as that document is modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercased tag name.
    pub tag: String,
    attrs: Vec<(String, String)>,
    outer: Range<usize>,
    inner: Option<Range<usize>>,
}

impl Element {
    /// Get an attribute value. Valueless attributes read as `""`.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An owned markup document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    html: String,
}

impl Document {
    /// Wrap markup in a document.
    #[must_use]
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    /// The full document markup.
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Consume the document, returning its markup.
    #[must_use]
    pub fn into_html(self) -> String {
        self.html
    }

    /// Find the first element, in document order, matching the selector.
    #[must_use]
    pub fn find(&self, selector: &Selector) -> Option<Element> {
        let comments = self.comment_spans();
        OPEN_TAG_RE.captures_iter(&self.html).find_map(|caps| {
            let whole = caps.get(0)?;
            if in_comment(&comments, whole.start()) {
                return None;
            }
            let tag = caps.get(1)?.as_str().to_ascii_lowercase();
            let attrs = caps.get(2).map_or("", |m| m.as_str());
            let self_closing = caps.get(3).is_some_and(|m| !m.as_str().is_empty());

            let mut element = Element {
                tag,
                attrs: parse_attrs(attrs),
                outer: whole.range(),
                inner: None,
            };
            if !selector.matches(&element) {
                return None;
            }

            if !self_closing && !VOID_ELEMENTS.contains(&element.tag.as_str()) {
                let content_start = whole.end();
                match self.closing_tag(&element.tag, content_start, &comments) {
                    Some(close) => {
                        element.inner = Some(content_start..close.start);
                        element.outer = whole.start()..close.end;
                    }
                    None => element.inner = Some(content_start..content_start),
                }
            }
            Some(element)
        })
    }

    /// Whether any element matches the selector.
    #[must_use]
    pub fn contains(&self, selector: &Selector) -> bool {
        self.find(selector).is_some()
    }

    /// The inner markup of the first element matching the selector.
    #[must_use]
    pub fn inner_html(&self, selector: &Selector) -> Option<&str> {
        let inner = self.find(selector)?.inner?;
        self.html.get(inner)
    }

    /// Replace the inner markup of the first element matching the selector.
    ///
    /// # Errors
    ///
    /// Returns `DomError` if nothing matches or the element is void.
    pub fn set_inner_html(&mut self, selector: &Selector, html: &str) -> Result<(), DomError> {
        let element = self
            .find(selector)
            .ok_or_else(|| DomError::NoMatch(selector.clone()))?;
        let inner = element
            .inner
            .ok_or_else(|| DomError::VoidElement(selector.clone()))?;
        self.html.replace_range(inner, html);
        Ok(())
    }

    /// Replace a previously located element, tags included, with markup.
    pub fn replace_element(&mut self, element: &Element, html: &str) {
        self.html.replace_range(element.outer.clone(), html);
    }

    /// Byte ranges of every comment, in document order.
    fn comment_spans(&self) -> Vec<Range<usize>> {
        COMMENT_RE
            .find_iter(&self.html)
            .map(|m| m.range())
            .collect()
    }

    /// Find the end tag balancing an open `tag` whose content starts at `from`.
    fn closing_tag(
        &self,
        tag: &str,
        from: usize,
        comments: &[Range<usize>],
    ) -> Option<Range<usize>> {
        let rest = self.html.get(from..)?;
        let pattern = format!(r"(?i)<(/?){}(?:\s[^>]*?)?(/?)>", regex::escape(tag));
        let tag_re = Regex::new(&pattern).ok()?;

        let mut depth = 0usize;
        for caps in tag_re.captures_iter(rest) {
            let whole = caps.get(0)?;
            if in_comment(comments, from + whole.start()) {
                continue;
            }
            let is_close = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
            let is_self_closing = caps.get(2).is_some_and(|m| !m.as_str().is_empty());

            if is_close {
                if depth == 0 {
                    return Some(from + whole.start()..from + whole.end());
                }
                depth -= 1;
            } else if !is_self_closing {
                depth += 1;
            }
        }
        None
    }
}

fn in_comment(comments: &[Range<usize>], pos: usize) -> bool {
    comments.iter().any(|span| span.contains(&pos))
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.html)
    }
}

fn parse_attrs(raw: &str) -> Vec<(String, String)> {
    ATTR_RE
        .captures_iter(raw)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or("", |m| m.as_str());
            Some((name, value.to_string()))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<body><header><span class="badge cart-count">0</span></header><main id="content"><div id="book-list"><div><p>nested</p></div></div></main><img id="cover" src="/a.jpg"></body>"#;

    #[test]
    fn test_selector_parse() {
        assert_eq!(Selector::parse("main"), Selector::Tag("main".to_string()));
        assert_eq!(Selector::parse("MAIN"), Selector::Tag("main".to_string()));
        assert_eq!(Selector::parse("#cart-list"), Selector::Id("cart-list".to_string()));
        assert_eq!(Selector::parse(".badge"), Selector::Class("badge".to_string()));
        assert_eq!(Selector::parse(".badge").to_string(), ".badge");
    }

    #[test]
    fn test_find_by_tag_id_and_class() {
        let doc = Document::new(PAGE);
        assert_eq!(doc.find(&Selector::tag("main")).unwrap().attr("id"), Some("content"));
        assert_eq!(doc.inner_html(&Selector::parse(".badge")), Some("0"));
        assert_eq!(
            doc.inner_html(&Selector::parse("#book-list")),
            Some("<div><p>nested</p></div>")
        );
        assert!(!doc.contains(&Selector::parse("#missing")));
    }

    #[test]
    fn test_set_inner_html_balances_nested_tags() {
        let mut doc = Document::new(PAGE);
        doc.set_inner_html(&Selector::parse("#book-list"), "<p>fresh</p>")
            .unwrap();
        assert_eq!(
            doc.inner_html(&Selector::tag("main")),
            Some(r#"<div id="book-list"><p>fresh</p></div>"#)
        );
        assert!(doc.html().ends_with(r#"<img id="cover" src="/a.jpg"></body>"#));
    }

    #[test]
    fn test_set_inner_html_errors() {
        let mut doc = Document::new(PAGE);
        assert_eq!(
            doc.set_inner_html(&Selector::parse("#nope"), "x"),
            Err(DomError::NoMatch(Selector::Id("nope".to_string())))
        );
        assert_eq!(
            doc.set_inner_html(&Selector::parse("#cover"), "x"),
            Err(DomError::VoidElement(Selector::Id("cover".to_string())))
        );
    }

    #[test]
    fn test_replace_element() {
        let mut doc = Document::new(r#"<div><component src="/header"></component><p>x</p></div>"#);
        let placeholder = doc.find(&Selector::tag("component")).unwrap();
        assert_eq!(placeholder.attr("src"), Some("/header"));
        doc.replace_element(&placeholder, "<header>H</header>");
        assert_eq!(doc.html(), "<div><header>H</header><p>x</p></div>");
    }

    #[test]
    fn test_self_closing_and_unclosed_elements() {
        let mut doc = Document::new(r"<component src='/a'/><component src=/b>");
        let first = doc.find(&Selector::tag("component")).unwrap();
        assert_eq!(first.attr("src"), Some("/a"));
        doc.replace_element(&first, "A");
        let second = doc.find(&Selector::tag("component")).unwrap();
        assert_eq!(second.attr("src"), Some("/b"));
        doc.replace_element(&second, "B");
        assert_eq!(doc.html(), "AB");
    }

    #[test]
    fn test_commented_out_elements_are_ignored() {
        let doc = Document::new(
            r#"<!-- <component src="/old"></component> --><main></main><component src="/new"></component>"#,
        );
        let placeholder = doc.find(&Selector::tag("component")).unwrap();
        assert_eq!(placeholder.attr("src"), Some("/new"));

        let doc = Document::new(r#"<!-- <component src="/old"></component> --><main></main>"#);
        assert!(!doc.contains(&Selector::tag("component")));

        let doc = Document::new(r#"<main></main><!-- unterminated <div id="x"></div>"#);
        assert!(!doc.contains(&Selector::parse("#x")));
    }

    #[test]
    fn test_closing_tag_inside_comment_is_skipped() {
        let mut doc = Document::new("<main><!-- </main> --><p>old</p></main><footer>f</footer>");
        doc.set_inner_html(&Selector::tag("main"), "NEW").unwrap();
        assert_eq!(doc.html(), "<main>NEW</main><footer>f</footer>");
    }

    #[test]
    fn test_valueless_attribute() {
        let doc = Document::new("<option selected>all</option>");
        assert_eq!(doc.find(&Selector::tag("option")).unwrap().attr("selected"), Some(""));
    }
}
