// Serializes an annotated page back to HTML
use crate::model::{Element, WriteError};
use crate::parser::Page;
use ego_tree::NodeId;
use html5ever::{LocalName, QualName, namespace_url, ns};
use scraper::node::{Element as HtmlElement, Text};
use scraper::{Html, Node, StrTendril};
use std::path::Path;

/// Applies each element's class, emphasis and appended content to the parsed
/// tree and serializes it. Fragments are written without their wrapper.
pub fn write_page(page: Page) -> String {
    let Page {
        mut html,
        elements,
        nodes,
        fragment,
    } = page;
    for (element, id) in elements.iter().zip(nodes) {
        apply(&mut html, id, element);
    }

    if fragment {
        html.root_element().inner_html()
    } else {
        html.html()
    }
}

fn apply(html: &mut Html, id: NodeId, snapshot: &Element) {
    let Some(mut node) = html.tree.get_mut(id) else {
        return;
    };
    if let Node::Element(element) = node.value() {
        let current: Vec<&str> = element
            .attr("class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default();
        if current != snapshot.classes {
            set_attr(element, "class", &snapshot.class_attr());
        }
        if let Some(weight) = &snapshot.font_weight {
            let style = merge_font_weight(element.attr("style").unwrap_or_default(), weight);
            set_attr(element, "style", &style);
        }
    }
    if !snapshot.appended.is_empty() {
        node.append(Node::Text(Text {
            text: StrTendril::from_slice(&snapshot.appended),
        }));
    }
}

/// Attributes are kept sorted by name; new ones go in their sorted slot.
fn set_attr(element: &mut HtmlElement, name: &str, value: &str) {
    let qualname = QualName::new(None, ns!(), LocalName::from(name));
    let value = StrTendril::from_slice(value);
    match element.attrs.binary_search_by(|(attr, _)| attr.cmp(&qualname)) {
        Ok(idx) => element.attrs[idx].1 = value,
        Err(idx) => element.attrs.insert(idx, (qualname, value)),
    }
}

pub async fn save_page(path: &Path, html: &str) -> Result<(), WriteError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| WriteError::Io {
                path: parent.display().to_string(),
                source,
            })?;
    }
    tokio::fs::write(path, html)
        .await
        .map_err(|source| WriteError::Io {
            path: path.display().to_string(),
            source,
        })
}

/// Replaces any `font-weight` declaration in an inline style with `weight`.
pub fn merge_font_weight(style: &str, weight: &str) -> String {
    let mut declarations: Vec<&str> = split_declarations(style)
        .into_iter()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .filter(|d| {
            let property = d.split(':').next().unwrap_or_default();
            !property.trim().eq_ignore_ascii_case("font-weight")
        })
        .collect();
    let font_weight = format!("font-weight: {weight}");
    declarations.push(&font_weight);
    declarations.join("; ")
}

/// Splits on `;` outside quotes and parentheses.
fn split_declarations(style: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quote = None;
    let mut depth = 0usize;
    let mut escaped = false;
    let mut start = 0;
    for (i, c) in style.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (c, quote) {
            ('\\', _) => escaped = true,
            (q, Some(open)) if q == open => quote = None,
            (_, Some(_)) => {}
            ('"' | '\'', None) => quote = Some(c),
            ('(', None) => depth += 1,
            (')', None) => depth = depth.saturating_sub(1),
            (';', None) if depth == 0 => {
                parts.push(&style[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&style[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{AnnotateOptions, Annotator, AnnotatorImpl};
    use crate::parser::{PageParser, Parser};

    fn annotate(html: &str, fragment: bool) -> String {
        let mut page = PageParser::new(fragment).parse(html);
        AnnotatorImpl::new(AnnotateOptions::default()).annotate(&mut page.elements);
        write_page(page)
    }

    #[test]
    fn test_unmarked_document_round_trips() {
        let html = "<!DOCTYPE html><html><head><title>Report</title></head>\
                    <body><!-- note --><p class=\"lead\" id=\"x\">a &amp; b &lt;c&gt;</p>\
                    <br><img alt=\"&quot;q&quot;\" src=\"a.png\"></body></html>";
        assert_eq!(annotate(html, false), html);
    }

    #[test]
    fn test_raw_text_not_escaped() {
        let html = "<html><head><script>if (a < b && c) {}</script></head><body></body></html>";
        assert_eq!(annotate(html, false), html);
    }

    #[test]
    fn test_percentage_class_and_style_written() {
        let out = annotate(
            "<p class=\"traffic_light_90_80\" style=\"color: black; font-weight: normal\">85</p>",
            true,
        );
        assert_eq!(
            out,
            "<p class=\"traffic_light_90_80 w3-yellow\" \
             style=\"color: black; font-weight: bolder\">85</p>"
        );
    }

    #[test]
    fn test_style_added_when_missing() {
        let out = annotate("<span class=\"unary_good_80\">12</span>", true);
        assert_eq!(
            out,
            "<span class=\"unary_good_80\" style=\"font-weight: bolder\">12</span>"
        );
    }

    #[test]
    fn test_trend_glyph_appended_after_children() {
        let out = annotate(
            "<span class=\"rise_fall\" previous=\"1,000\"><b>1,200</b></span>",
            true,
        );
        assert_eq!(
            out,
            "<span class=\"rise_fall\" previous=\"1,000\"><b>1,200</b> ⇑</span>"
        );
    }

    #[test]
    fn test_second_run_on_output_is_stable() {
        let html = "<!DOCTYPE html><html><head></head><body>\
                    <p class=\"traffic_light_60_50\">55</p>\
                    <p class=\"rise_fall\" previous=\"9\">8</p></body></html>";
        let once = annotate(html, false);
        let twice = annotate(&once, false);
        assert_eq!(once, twice);
        assert!(once.contains("class=\"traffic_light_60_50 w3-yellow\""));
        assert!(once.contains(">8 ⇓</p>"));
    }

    #[test]
    fn test_merge_font_weight() {
        assert_eq!(merge_font_weight("", "bolder"), "font-weight: bolder");
        assert_eq!(
            merge_font_weight("color: red;", "bold"),
            "color: red; font-weight: bold"
        );
        assert_eq!(
            merge_font_weight("FONT-WEIGHT: 100; margin: 0", "bolder"),
            "margin: 0; font-weight: bolder"
        );
    }

    #[test]
    fn test_merge_font_weight_keeps_quoted_semicolons() {
        assert_eq!(
            merge_font_weight("background: url(\"a;b.png\"); font-weight: 300", "bolder"),
            "background: url(\"a;b.png\"); font-weight: bolder"
        );
        assert_eq!(
            merge_font_weight("font-family: 'x;y'; color: red", "bold"),
            "font-family: 'x;y'; color: red; font-weight: bold"
        );
        assert_eq!(
            merge_font_weight("background: url(a;b.png)", "bold"),
            "background: url(a;b.png); font-weight: bold"
        );
    }

    #[test]
    fn test_template_contents_written_in_place() {
        let out = annotate(
            "<template><td class=\"traffic_light_71\">80</td></template>\
             <p class=\"unary_good_80\">90</p>",
            true,
        );
        assert_eq!(
            out,
            "<template><td class=\"traffic_light_71 w3-green\" style=\"font-weight: bolder\">80</td>\
             </template><p class=\"unary_good_80 w3-green\" style=\"font-weight: bolder\">90</p>"
        );
    }

    #[test]
    fn test_namespaced_attributes_keep_prefix() {
        let out = annotate(
            "<svg><use xlink:href=\"#icon\"></use></svg><span class=\"traffic_light_71\">75</span>",
            true,
        );
        assert!(out.contains("<use xlink:href=\"#icon\"></use>"), "{out}");
        assert!(out.contains("<span class=\"traffic_light_71 w3-green\""), "{out}");
    }

    #[tokio::test]
    async fn test_save_page_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.html");
        save_page(&path, "<p></p>").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<p></p>");
    }
}
