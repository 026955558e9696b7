//! Pulls the featured item out of the announcements page markup.
//!
//! Only the first `#main > .latest-news` block is searched. Anything missing
//! degrades to an empty field; extraction itself never fails.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::core::models::SpecialOffer;

pub const BLOCK_SELECTOR: &str = "#main > .latest-news";
pub const TITLE_SELECTOR: &str = "a > .news_span";
pub const DESCRIPTION_SELECTOR: &str = "p";
pub const IMAGE_SELECTOR: &str = "img";
pub const ANCHOR_SELECTOR: &str = "a";

struct OfferSelectors {
    block: Selector,
    title: Selector,
    description: Selector,
    image: Selector,
    anchor: Selector,
}

// Parsed once; None only if a selector literal above is malformed.
static SELECTORS: LazyLock<Option<OfferSelectors>> = LazyLock::new(|| {
    let parse = |css: &str| {
        Selector::parse(css)
            .map_err(|e| warn!("Invalid selector {}: {:?}", css, e))
            .ok()
    };

    Some(OfferSelectors {
        block: parse(BLOCK_SELECTOR)?,
        title: parse(TITLE_SELECTOR)?,
        description: parse(DESCRIPTION_SELECTOR)?,
        image: parse(IMAGE_SELECTOR)?,
        anchor: parse(ANCHOR_SELECTOR)?,
    })
});

/// Extracts a [`SpecialOffer`] from raw page markup.
///
/// # Examples
///
/// ```
/// use burgerbot::pipeline::extractor::extract;
///
/// let offer = extract("<html><body><p>nothing here</p></body></html>");
/// assert!(offer.is_empty());
/// ```
#[must_use]
pub fn extract(markup: &str) -> SpecialOffer {
    let Some(selectors) = SELECTORS.as_ref() else {
        return SpecialOffer::default();
    };

    let document = Html::parse_document(markup);
    let Some(block) = document.select(&selectors.block).next() else {
        debug!("No latest-news block found in document");
        return SpecialOffer::default();
    };

    // A link inside the description makes html5ever close the wrapping anchor
    // and re-open a copy of it inside the paragraph, so the paragraph and image
    // are looked up anywhere in the block rather than under the anchor.
    let wrapper = block.select(&selectors.anchor).next();

    SpecialOffer {
        title: block
            .select(&selectors.title)
            .flat_map(|el| el.text())
            .collect::<String>()
            .trim()
            .to_string(),
        description: block
            .select(&selectors.description)
            .next()
            .map(|p| own_text(p, wrapper))
            .unwrap_or_default()
            .trim()
            .to_string(),
        image_ref: block
            .select(&selectors.image)
            .next()
            .and_then(|img| img.value().attr("src"))
            .map(ToString::to_string),
    }
}

/// Text held directly by `element`, skipping every child element's content.
///
/// Children that are re-opened copies of `wrapper` (same tag and `href`) still
/// count as the element's own text.
fn own_text(element: ElementRef<'_>, wrapper: Option<ElementRef<'_>>) -> String {
    let wrapper_href = wrapper.map(|w| w.value().attr("href"));

    element
        .children()
        .flat_map(|node| {
            if let Some(text) = node.value().as_text() {
                return vec![&**text];
            }
            match ElementRef::wrap(node) {
                Some(child)
                    if child.value().name() == "a"
                        && wrapper_href == Some(child.value().attr("href")) =>
                {
                    child.text().collect()
                }
                _ => Vec::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn own_text_skips_nested_elements() {
        let fragment = Html::parse_fragment("<p>before <span>inner</span>after</p>");
        let selector = Selector::parse("p").unwrap();
        let p = fragment.select(&selector).next().unwrap();
        assert_eq!(own_text(p, None), "before after");
    }

    #[test]
    fn selectors_are_valid() {
        assert!(SELECTORS.is_some());
    }
}
