use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

/// Shown in place of a numeric score for properties that have no reviews yet.
pub const NO_REVIEWS_YET: &str = "New to Booking.com";

/// The seven output columns, in sink order.
pub const FIELD_NAMES: [&str; 7] = [
    "title",
    "address",
    "cost",
    "review_score",
    "number_of_reviews",
    "room_type",
    "url",
];

/// One scraped search-result card.
///
/// Only `url` is guaranteed; every other field degrades to an explicit
/// "no value" (`None`, the [`NO_REVIEWS_YET`] marker, or `0`) when the
/// corresponding control is missing or malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub title: Option<String>,
    pub address: Option<String>,
    pub cost: Option<String>,
    pub review_score: String,
    pub number_of_reviews: u32,
    pub room_type: Option<String>,
    pub url: String,
}

impl Listing {
    /// Order-independent identity over the full field set.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::from_pairs([
            ("title", self.title.clone().unwrap_or_default()),
            ("address", self.address.clone().unwrap_or_default()),
            ("cost", self.cost.clone().unwrap_or_default()),
            ("review_score", self.review_score.clone()),
            ("number_of_reviews", self.number_of_reviews.to_string()),
            ("room_type", self.room_type.clone().unwrap_or_default()),
            ("url", self.url.clone()),
        ])
    }
}

/// Identity of a [`Listing`] as a set of field/value pairs.
///
/// Two listings with identical field values produce the same fingerprint
/// regardless of the order the pairs are supplied in. Dedup keys on the
/// whole field set rather than the detail-page URL, so the same property
/// scraped with one changed optional field counts as a new row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(BTreeMap<&'static str, String>);

impl Fingerprint {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (&'static str, String)>) -> Self {
        Fingerprint(pairs.into_iter().collect())
    }
}

/// Mutable state for a single sweep invocation.
///
/// Owned by the orchestrator and passed by reference into every extraction
/// call; the seen-set grows monotonically and is never shared across runs.
#[derive(Debug, Default)]
pub struct RunState {
    seen: HashSet<Fingerprint>,
    emitted: u64,
    bucket_cursor: usize,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a listing into this run. Returns `false` (silently, this is an
    /// expected outcome of overlapping scroll windows) when an identical
    /// listing was already emitted.
    pub fn admit(&mut self, listing: &Listing) -> bool {
        if self.seen.insert(listing.fingerprint()) {
            self.emitted += 1;
            true
        } else {
            false
        }
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Advance the bucket cursor, returning the index of the bucket about
    /// to be swept. The cursor moves strictly forward.
    pub fn advance_bucket(&mut self) -> usize {
        let i = self.bucket_cursor;
        self.bucket_cursor += 1;
        i
    }
}

/// Tunables for one sweep. Defaults mirror the production run against the
/// AUD search surface.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Maximum items the platform renders for any single query/sort.
    pub cap: u64,
    /// Lower edge of the fixed-width price buckets.
    pub domain_floor: u32,
    /// Upper edge; everything at or above it lands in the final open bucket.
    pub domain_ceiling: u32,
    pub bucket_width: u32,
    /// Currency tag baked into the platform's price filter.
    pub currency: String,
    /// Result count at or below which the first render needs no scrolling.
    pub initial_window: u64,
    /// Consecutive identical height reads before scrolling is considered done.
    pub height_stable_reads: u32,
    /// Randomized delay bounds applied after every page interaction.
    pub pace_min: Duration,
    pub pace_max: Duration,
    /// Bounded wait for simple element presence.
    pub presence_wait: Duration,
    /// Bounded wait for the sort menu to become visible.
    pub menu_wait: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            cap: 1_000,
            domain_floor: 20,
            domain_ceiling: 890,
            bucket_width: 10,
            currency: "AUD".into(),
            initial_window: 20,
            height_stable_reads: 3,
            pace_min: Duration::from_secs(3),
            pace_max: Duration::from_secs(5),
            presence_wait: Duration::from_secs(10),
            menu_wait: Duration::from_secs(30),
        }
    }
}
