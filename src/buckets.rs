//! Price-bucket partitioning.
//!
//! The platform never shows more than its cap for one query, so the only
//! way to enumerate a larger result space is to narrow the price filter
//! until each sub-query's count is small enough. The partition assumes the
//! platform's reported count shrinks monotonically as the range narrows.

use crate::error::{Result, SweepError};
use crate::types::SweepConfig;
use std::fmt;
use url::Url;

/// One edge of a price range. The platform's filter syntax spells the open
/// ends as `min` / `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Unbounded,
    At(u32),
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Unbounded => write!(f, "-"),
            Bound::At(v) => write!(f, "{v}"),
        }
    }
}

/// A contiguous price sub-range; immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBucket {
    pub lower: Bound,
    pub upper: Bound,
}

impl PriceBucket {
    fn edge(b: Bound, open: &str) -> String {
        match b {
            Bound::Unbounded => open.to_string(),
            Bound::At(v) => v.to_string(),
        }
    }

    /// Render the platform's price-filter value, e.g. `price=AUD-min-20-1`.
    pub fn filter_value(&self, currency: &str) -> String {
        format!(
            "price={}-{}-{}-1",
            currency,
            Self::edge(self.lower, "min"),
            Self::edge(self.upper, "max"),
        )
    }
}

impl fmt::Display for PriceBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{}]", self.lower, self.upper)
    }
}

/// Decompose the full price domain into an ordered, contiguous sequence:
/// `(min, floor]`, fixed-width buckets over `[floor+1, ceiling-1]`, then
/// `[ceiling, max)`. Adjacent bucket edges differ by exactly one price unit.
pub fn partition(floor: u32, ceiling: u32, width: u32) -> Vec<PriceBucket> {
    let mut out = vec![PriceBucket {
        lower: Bound::Unbounded,
        upper: Bound::At(floor),
    }];

    let width = width.max(1);
    let mut lower = floor + 1;
    while lower < ceiling {
        let upper = (lower + width - 1).min(ceiling - 1);
        out.push(PriceBucket {
            lower: Bound::At(lower),
            upper: Bound::At(upper),
        });
        lower = upper + 1;
    }

    out.push(PriceBucket {
        lower: Bound::At(ceiling),
        upper: Bound::Unbounded,
    });
    out
}

/// The full bucket sequence for a sweep configuration.
pub fn partition_for(cfg: &SweepConfig) -> Vec<PriceBucket> {
    partition(cfg.domain_floor, cfg.domain_ceiling, cfg.bucket_width)
}

/// Append the bucket's price filter to a search URL as an `nflt` parameter.
pub fn bucket_url(search: &Url, bucket: &PriceBucket, currency: &str) -> Result<Url> {
    let mut url = search.clone();
    if !url.has_host() {
        return Err(SweepError::InvalidUrl(search.to_string()));
    }
    url.query_pairs_mut()
        .append_pair("nflt", &bucket.filter_value(currency));
    Ok(url)
}
