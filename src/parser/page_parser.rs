// Page snapshot built from parsed HTML
use crate::model::Element;
use ego_tree::NodeId;
use scraper::{ElementRef, Html};

/// Attribute carrying the prior value of a trend element.
pub const PREVIOUS_ATTR: &str = "previous";

/// A parsed page and the flat, document-ordered list of its elements.
///
/// `elements[i]` is the i-th element of a pre-order walk of `html.tree`,
/// template contents included, and `nodes[i]` is its id in that tree.
pub struct Page {
    pub html: Html,
    pub elements: Vec<Element>,
    pub nodes: Vec<NodeId>,
    pub fragment: bool,
}

pub trait Parser {
    fn parse(&self, html: &str) -> Page;
}

pub struct PageParser {
    fragment: bool,
}

impl PageParser {
    pub fn new(fragment: bool) -> Self {
        Self { fragment }
    }
}

impl Parser for PageParser {
    fn parse(&self, html: &str) -> Page {
        let document = if self.fragment {
            Html::parse_fragment(html)
        } else {
            Html::parse_document(html)
        };

        let (elements, nodes) = document
            .tree
            .root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .map(|element| (snapshot(element), element.id()))
            .unzip();

        Page {
            html: document,
            elements,
            nodes,
            fragment: self.fragment,
        }
    }
}

fn snapshot(element: ElementRef<'_>) -> Element {
    let value = element.value();
    Element {
        tag: value.name().to_string(),
        classes: value
            .attr("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default(),
        text: element.text().collect(),
        previous: value.attr(PREVIOUS_ATTR).map(str::to_string),
        font_weight: None,
        appended: String::new(),
    }
}
