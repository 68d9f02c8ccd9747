//! Certificate page extraction.
//!
//! Turns the grading site's certificate page into a [`CertificateRecord`].
//!
//! # Markers
//!
//! | Field         | Element                                   |
//! |---------------|-------------------------------------------|
//! | `card_name`   | `div.cert-details-title` (required)       |
//! | `grade`       | `div.cert-grade` (required)               |
//! | `set`         | `div.cert-details-subtitle` (required)    |
//! | `population`  | `div.cert-data-item` labelled "Population"  |
//! | `card_number` | `div.cert-data-item` labelled "Card Number" |
//! | `image_link`  | `src` of the first `img.cert-image`       |
//!
//! Missing required markers fail the whole extraction. Everything else
//! degrades to an empty string and extraction of the other fields carries on.
//!
//! Detail labels are classified by case-sensitive substring match, with
//! "Population" checked before "Card Number" and the first matching entry
//! winning. A label containing both substrings counts as population. This
//! mirrors the site as it is laid out today and will misclassify if the
//! labels are ever reworded.

use std::sync::LazyLock;

use cert_lookup_core::CertificateRecord;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

macro_rules! selector {
    ($e:expr) => {{
        static SELECTOR: LazyLock<Selector> =
            LazyLock::new(|| Selector::parse($e).expect("Invalid selector"));
        &*SELECTOR
    }};
}

const TITLE: &str = "div.cert-details-title";
const GRADE: &str = "div.cert-grade";
const SUBTITLE: &str = "div.cert-details-subtitle";

const POPULATION_LABEL: &str = "Population";
const CARD_NUMBER_LABEL: &str = "Card Number";

/// Errors raised when a certificate page lacks a required marker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// A required element was not present on the page.
    #[error("{0} not found on certificate page")]
    MissingElement(&'static str),
}

/// Extract a record from the raw certificate page.
///
/// # Errors
///
/// Returns [`ExtractError::MissingElement`] if the title, grade or subtitle
/// block is absent.
pub fn extract(page: &str) -> Result<CertificateRecord, ExtractError> {
    let html = Html::parse_document(page);

    let card_name = required_text(&html, selector!(TITLE), TITLE)?;
    let grade = required_text(&html, selector!(GRADE), GRADE)?;
    let set = required_text(&html, selector!(SUBTITLE), SUBTITLE)?;

    let mut population: Option<String> = None;
    let mut card_number: Option<String> = None;
    for item in html.select(selector!("div.cert-data-item")) {
        let Some(label) = first_text(item, selector!("div.cert-data-label")) else {
            continue;
        };
        let Some(value) = first_text(item, selector!("div.cert-data-value")) else {
            continue;
        };

        if label.contains(POPULATION_LABEL) {
            population.get_or_insert(value);
        } else if label.contains(CARD_NUMBER_LABEL) {
            card_number.get_or_insert(value);
        }
    }

    let image_link = html
        .select(selector!("img.cert-image"))
        .next()
        .and_then(|img| img.value().attr("src"))
        .unwrap_or_default()
        .to_owned();

    Ok(CertificateRecord {
        card_name,
        grade,
        set,
        card_number: card_number.unwrap_or_default(),
        population: population.unwrap_or_default(),
        image_link,
    })
}

fn required_text(
    html: &Html,
    selector: &Selector,
    name: &'static str,
) -> Result<String, ExtractError> {
    html.select(selector)
        .next()
        .map(stripped_text)
        .ok_or(ExtractError::MissingElement(name))
}

fn first_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element.select(selector).next().map(stripped_text)
}

/// Concatenate the element's text nodes, each trimmed, skipping blank ones.
fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
