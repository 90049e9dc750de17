//! Batch extraction of rendered result cards into [`Listing`] records.
//!
//! Every field lookup is independently fault-tolerant: a missing or
//! malformed control degrades to that field's sentinel instead of aborting
//! the record. The review blob is parsed by fixed line position (line 1 =
//! score, line 3 first token = count), a documented contract with the
//! platform's markup that is inherently brittle to upstream changes.

use crate::error::Result;
use crate::page::Page;
use crate::selectors as sel;
use crate::types::{Listing, RunState, NO_REVIEWS_YET};
use log::{debug, warn};

/// Visible score: second line of the review blob, or the "no reviews yet"
/// marker when the blob is short or the control absent.
pub fn score_from_blob(blob: Option<&str>) -> String {
    blob.and_then(|text| text.lines().nth(1))
        .map(|line| line.to_string())
        .unwrap_or_else(|| NO_REVIEWS_YET.to_string())
}

/// Review count: first whitespace token of the fourth line of the review
/// blob; `0` when absent or malformed.
pub fn reviews_from_blob(blob: Option<&str>) -> u32 {
    blob.and_then(|text| text.lines().nth(3))
        .and_then(|line| line.split_whitespace().next())
        .and_then(|token| token.replace(',', "").parse().ok())
        .unwrap_or(0)
}

/// Cost: second whitespace token of the raw price text
/// (`"From AU$214"` -> `"AU$214"`).
pub fn cost_from_text(raw: Option<&str>) -> Option<String> {
    raw.and_then(|text| text.split_whitespace().nth(1))
        .map(|token| token.to_string())
}

/// Room type: first line of the recommended-units text.
pub fn first_line(raw: Option<&str>) -> Option<String> {
    raw.and_then(|text| text.lines().next()).map(|l| l.to_string())
}

/// Total result count from the live-region announcement: second whitespace
/// token, thousands separators stripped.
pub fn parse_result_count(text: &str) -> Option<u64> {
    text.split_whitespace()
        .nth(1)
        .and_then(|token| token.replace(',', "").parse().ok())
}

fn text_within<P: Page>(page: &P, card: &P::Handle, locator: &sel::Locator) -> Option<String> {
    let found = page.find_within(card, locator).ok().flatten()?;
    page.element_text(&found).ok()
}

/// Build one listing from a rendered card. Returns `None` only when the
/// detail-page link — the sole required field — cannot be read.
pub fn listing_from_card<P: Page>(page: &P, card: &P::Handle) -> Result<Option<Listing>> {
    let url = match page.find_within(card, &sel::DETAIL_LINK)? {
        Some(link) => page.element_attr(&link, "href")?,
        None => None,
    };
    let Some(url) = url else {
        warn!("card without a detail link, skipping");
        return Ok(None);
    };

    let review_blob = text_within(page, card, &sel::REVIEW_SCORE);

    Ok(Some(Listing {
        title: text_within(page, card, &sel::TITLE),
        address: text_within(page, card, &sel::ADDRESS),
        cost: cost_from_text(text_within(page, card, &sel::PRICE).as_deref()),
        review_score: score_from_blob(review_blob.as_deref()),
        number_of_reviews: reviews_from_blob(review_blob.as_deref()),
        room_type: first_line(text_within(page, card, &sel::RECOMMENDED_UNITS).as_deref()),
        url,
    }))
}

/// Convert a window of rendered cards into accepted listings, dropping any
/// whose fingerprint was already emitted this run. Duplicates are expected
/// from overlapping scroll windows and discarded silently.
pub fn extract_batch<P: Page>(
    page: &P,
    cards: &[P::Handle],
    state: &mut RunState,
) -> Result<Vec<Listing>> {
    let mut accepted = Vec::new();
    for card in cards {
        let Some(listing) = listing_from_card(page, card)? else {
            continue;
        };
        if state.admit(&listing) {
            accepted.push(listing);
        } else {
            debug!("duplicate listing {}", listing.url);
        }
    }
    Ok(accepted)
}
