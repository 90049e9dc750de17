//! Shared Selectors
//!
//! Every hook into the platform's markup lives here; when the upstream
//! markup shifts, this is the only file that should need touching.

use std::fmt;

/// How to locate elements on the rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locator {
    Css(&'static str),
    XPath(&'static str),
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(s) => write!(f, "css `{s}`"),
            Locator::XPath(s) => write!(f, "xpath `{s}`"),
        }
    }
}

/// One search-result card.
pub const PROPERTY_CARD: Locator = Locator::Css("[data-testid='property-card']");

/// Property name within a card.
pub const TITLE: Locator = Locator::Css("[data-testid='title']");

/// Raw price text, e.g. `"From AU$214"`.
pub const PRICE: Locator = Locator::Css("[data-testid='price-and-discounted-price']");

/// Multi-line review blob: its second line carries the score, its fourth
/// the review count.
pub const REVIEW_SCORE: Locator = Locator::Css("[data-testid='review-score']");

/// Recommended-units block; its first line is the room type.
pub const RECOMMENDED_UNITS: Locator = Locator::Css("[data-testid='recommended-units']");

/// Short address line within a card.
pub const ADDRESS: Locator = Locator::Css("[data-testid='address']");

/// Canonical detail-page anchor within a card.
pub const DETAIL_LINK: Locator = Locator::Css("a[target='_blank'][rel='noopener noreferrer']");

/// Live region announcing the total result count for the active filter.
pub const RESULT_COUNT: Locator = Locator::Css("[aria-live='assertive']");

/// Trigger that opens the sort dropdown.
pub const SORT_TRIGGER: Locator = Locator::Css("[data-testid='sorters-dropdown-trigger']");

/// Sort option: price, high to low.
pub const SORT_DESCENDING: Locator = Locator::Css("button[data-id='price_from_high_to_low']");

/// Sort option: price, low to high.
pub const SORT_ASCENDING: Locator = Locator::Css("button[data-id='price']");

/// Button that appends the next batch of results to the page.
pub const LOAD_MORE: Locator =
    Locator::XPath("//span[text()='Load more results']/ancestor::button");
