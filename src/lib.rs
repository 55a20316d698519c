//! Annotates HTML pages by colour-coding marked numeric cells.
//!
//! Elements carrying a marker class (`traffic_light_90_80`, `rise_fall`, ...)
//! get a `w3-*` category class and bold emphasis, or a trend arrow compared
//! against their `previous` attribute.

pub mod analyzer;
pub mod config;
pub mod lifecycle;
pub mod model;
pub mod normalizer;
pub mod parser;
pub mod report;
pub mod source;
pub mod writer;

use analyzer::{AnnotateOptions, AnnotationResult, Annotator, AnnotatorImpl};
use lifecycle::{EventHub, LifecycleEvent};
use parser::{PageParser, Parser};

/// Parses `html`, runs the annotation pass on page load and writes the result.
pub fn annotate_html(
    html: &str,
    options: &AnnotateOptions,
    fragment: bool,
) -> (String, AnnotationResult) {
    let mut page = PageParser::new(fragment).parse(html);

    let annotator = AnnotatorImpl::new(options.clone());
    let mut hub = EventHub::new();
    hub.register(LifecycleEvent::Load, move |elements| annotator.annotate(elements));
    let result = hub.fire(LifecycleEvent::Load, &mut page.elements);

    (writer::write_page(page), result)
}
