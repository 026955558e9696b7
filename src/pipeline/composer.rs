//! Turns an extraction result into the Slack reply text.

use crate::core::models::SpecialOffer;
use crate::errors::FetchError;

/// Builds the reply for a fetch result.
///
/// A successful fetch renders up to three lines: the title in Slack bold, the
/// description, then the image reference. Empty fields are left out. A failed
/// fetch, or an offer with nothing in it, yields `apology` unchanged.
///
/// # Examples
///
/// ```
/// use burgerbot::core::models::SpecialOffer;
/// use burgerbot::pipeline::composer::compose;
///
/// let offer = SpecialOffer {
///     title: "The Smokey".into(),
///     description: "Bacon, BBQ sauce, cheese".into(),
///     image_ref: Some("/img/smokey.png".into()),
/// };
/// assert_eq!(
///     compose(&Ok(offer), "sorry"),
///     "*The Smokey*\nBacon, BBQ sauce, cheese\n/img/smokey.png"
/// );
/// ```
#[must_use]
pub fn compose(result: &Result<SpecialOffer, FetchError>, apology: &str) -> String {
    let Ok(offer) = result else {
        return apology.to_string();
    };

    let mut lines = Vec::with_capacity(3);
    if !offer.title.is_empty() {
        lines.push(format!("*{}*", offer.title));
    }
    if !offer.description.is_empty() {
        lines.push(offer.description.clone());
    }
    if let Some(image) = offer.image_ref.as_deref().filter(|i| !i.is_empty()) {
        lines.push(image.to_string());
    }

    if lines.is_empty() {
        apology.to_string()
    } else {
        lines.join("\n")
    }
}
