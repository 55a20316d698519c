use crate::analyzer::rules::{RuleKind, find_rule, first_matching_rule};
use crate::model::{Annotation, Category, Element, Outcome, Skip, Trend};
use crate::normalizer::extract_number;
use std::collections::HashMap;
use tracing::debug;

/// Classifies the text of an element marked with `marker`.
///
/// Returns `Skip::Unparsable` for text without a leading number and
/// `Skip::OutOfBounds` when the value fails the rule's bound check. Unknown
/// markers and the trend marker are out of bounds for this operation.
pub fn classify_percentage(marker: &str, raw_text: &str) -> Result<(f64, Category), Skip> {
    let Some(RuleKind::Percentage(thresholds)) = find_rule(marker).map(|r| r.kind) else {
        return Err(Skip::OutOfBounds);
    };
    let value = extract_number(raw_text).ok_or(Skip::Unparsable)?;
    let category = thresholds.categorize(value).ok_or(Skip::OutOfBounds)?;
    Ok((value, category))
}

/// Compares the element's current value to its `previous` attribute.
pub fn classify_trend(raw_text: &str, previous: Option<&str>) -> Result<(f64, f64, Trend), Skip> {
    let current = extract_number(raw_text).ok_or(Skip::Unparsable)?;
    let previous = match previous {
        Some(p) if !p.is_empty() => p,
        _ => return Err(Skip::MissingPrevious),
    };
    let previous = extract_number(previous).ok_or(Skip::UnparsablePrevious)?;

    let trend = if current > previous {
        Trend::Rise
    } else if current < previous {
        Trend::Fall
    } else {
        Trend::Same
    };
    Ok((current, previous, trend))
}

#[derive(Debug, Clone)]
pub struct AnnotateOptions {
    /// Value written to the element's inline `font-weight`.
    pub emphasis: String,
    /// Skip mutations that an earlier pass already applied.
    pub idempotent: bool,
}

impl Default for AnnotateOptions {
    fn default() -> Self {
        Self {
            emphasis: "bolder".to_string(),
            idempotent: true,
        }
    }
}

/// Result of one pass over a page.
#[derive(Debug, Default, Clone)]
pub struct AnnotationResult {
    pub annotations: Vec<Annotation>,
    pub skipped: HashMap<Skip, usize>,
}

impl AnnotationResult {
    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }

    pub fn merge(&mut self, other: AnnotationResult) {
        self.annotations.extend(other.annotations);
        for (reason, count) in other.skipped {
            *self.skipped.entry(reason).or_default() += count;
        }
    }
}

/// Trait defining the interface for a page annotator.
pub trait Annotator {
    fn annotate(&self, elements: &mut [Element]) -> AnnotationResult;
}

pub struct AnnotatorImpl {
    options: AnnotateOptions,
}

impl AnnotatorImpl {
    pub fn new(options: AnnotateOptions) -> Self {
        Self { options }
    }

    fn annotate_element(&self, index: usize, element: &mut Element) -> Option<Result<Annotation, Skip>> {
        let rule = first_matching_rule(&element.classes)?;

        let result = match rule.kind {
            RuleKind::Percentage(_) => self.apply_percentage(rule.token, element),
            RuleKind::Trend => self.apply_trend(element),
        };
        Some(result.map(|(value, outcome)| Annotation {
            element: index,
            tag: element.tag.clone(),
            marker: rule.token,
            value,
            outcome,
        }))
    }

    fn apply_percentage(&self, marker: &str, element: &mut Element) -> Result<(f64, Outcome), Skip> {
        let (value, category) = classify_percentage(marker, &element.text)?;

        if let Some(class) = category.css_class() {
            element.add_class(class, self.options.idempotent);
        }
        element.font_weight = Some(self.options.emphasis.clone());
        Ok((value, Outcome::Percentage { category }))
    }

    fn apply_trend(&self, element: &mut Element) -> Result<(f64, Outcome), Skip> {
        if self.options.idempotent && ends_with_glyph(&element.rendered_text()) {
            return Err(Skip::AlreadyAnnotated);
        }
        let (value, previous, trend) = classify_trend(&element.text, element.previous.as_deref())?;

        element.appended.push(' ');
        element.appended.push(trend.glyph());
        Ok((value, Outcome::Trend { trend, previous }))
    }
}

impl Annotator for AnnotatorImpl {
    /// Single flat pass: each element is handled by at most one rule.
    fn annotate(&self, elements: &mut [Element]) -> AnnotationResult {
        let mut result = AnnotationResult::default();

        for (index, element) in elements.iter_mut().enumerate() {
            match self.annotate_element(index, element) {
                None => {}
                Some(Ok(annotation)) => result.annotations.push(annotation),
                Some(Err(reason)) => {
                    debug!(element = index, tag = %element.tag, ?reason, "Skipped marked element");
                    *result.skipped.entry(reason).or_default() += 1;
                }
            }
        }

        result
    }
}

fn ends_with_glyph(text: &str) -> bool {
    text.trim_end()
        .chars()
        .next_back()
        .is_some_and(|c| Trend::GLYPHS.contains(&c))
}
