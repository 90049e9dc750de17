//! Cap-aware pagination strategy and run orchestration.
//!
//! A bucket whose reported count fits under the platform cap is swept in a
//! single pass. An oversized bucket gets two: descending-by-price for the
//! first `cap` items, then ascending-by-price for the remainder — two
//! disjoint cap-sized windows that cover the bucket without re-reading the
//! middle. Both passes stream straight to the sink, so a crash mid-pass
//! keeps everything already flushed.

use crate::buckets::{bucket_url, partition_for};
use crate::driver::ScrollDriver;
use crate::error::{Result, SweepError};
use crate::extract::parse_result_count;
use crate::pacing::{CancelToken, Pacing};
use crate::page::Page;
use crate::selectors as sel;
use crate::sink::ListingSink;
use crate::types::{RunState, SweepConfig};
use log::{info, warn};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    PriceDescending,
    PriceAscending,
}

impl SortOrder {
    fn option_locator(self) -> sel::Locator {
        match self {
            SortOrder::PriceDescending => sel::SORT_DESCENDING,
            SortOrder::PriceAscending => sel::SORT_ASCENDING,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    pub buckets: usize,
    pub listings: u64,
}

pub struct Engine<'a, P: Page> {
    page: &'a P,
    pacing: &'a Pacing,
    cancel: &'a CancelToken,
    cfg: &'a SweepConfig,
}

impl<'a, P: Page> Engine<'a, P> {
    pub fn new(
        page: &'a P,
        pacing: &'a Pacing,
        cancel: &'a CancelToken,
        cfg: &'a SweepConfig,
    ) -> Self {
        Self {
            page,
            pacing,
            cancel,
            cfg,
        }
    }

    fn driver(&self) -> ScrollDriver<'a, P> {
        ScrollDriver::new(self.page, self.pacing, self.cancel, self.cfg)
    }

    /// Sweep every price bucket of the configured domain in order. A bucket
    /// that fails is logged and abandoned; only cancellation stops the run.
    pub fn run(
        &self,
        search_url: &Url,
        state: &mut RunState,
        sink: &mut dyn ListingSink,
    ) -> Result<RunSummary> {
        let buckets = partition_for(self.cfg);
        let mut summary = RunSummary::default();

        for bucket in &buckets {
            self.cancel.check()?;
            state.advance_bucket();
            let url = bucket_url(search_url, bucket, &self.cfg.currency)?;
            info!("sweeping price range {bucket}: {url}");

            match self.sweep_bucket(url.as_str(), state, sink) {
                Ok(()) => {}
                Err(SweepError::Cancelled) => return Err(SweepError::Cancelled),
                Err(e) => warn!("bucket {bucket} abandoned: {e}"),
            }
            summary.buckets += 1;
            self.pacing.pause();
        }

        summary.listings = state.emitted();
        Ok(summary)
    }

    /// Enumerate one bucket-scoped query context exhaustively.
    pub fn sweep_bucket(
        &self,
        url: &str,
        state: &mut RunState,
        sink: &mut dyn ListingSink,
    ) -> Result<()> {
        self.page.navigate(url)?;
        let count = self.read_result_count()?;
        info!("{count} properties in range");
        if count == 0 {
            return Ok(());
        }

        if count < self.cfg.cap {
            self.driver().collect(count, state, sink)?;
        } else {
            self.apply_sort(SortOrder::PriceDescending)?;
            info!("collecting first {} of an oversized bucket", self.cfg.cap);
            self.driver().collect(self.cfg.cap, state, sink)?;

            self.apply_sort(SortOrder::PriceAscending)?;
            info!(
                "collecting remaining {} from the low end",
                count - self.cfg.cap
            );
            self.driver().collect(count - self.cfg.cap, state, sink)?;
        }
        Ok(())
    }

    /// Read the platform's reported result count for the active filter.
    /// This guards the very first step after navigation, so it retries
    /// indefinitely (with pacing and a cancellation check) until readable.
    fn read_result_count(&self) -> Result<u64> {
        loop {
            self.cancel.check()?;
            match self.try_read_count() {
                Ok(n) => return Ok(n),
                Err(e) => {
                    warn!("could not read result count: {e}");
                    self.pacing.pause();
                }
            }
        }
    }

    fn try_read_count(&self) -> Result<u64> {
        let counters = self.page.find_elements(&sel::RESULT_COUNT)?;
        let counter = counters
            .first()
            .ok_or_else(|| SweepError::other("result counter not rendered yet"))?;
        let text = self.page.element_text(counter)?;
        parse_result_count(&text)
            .ok_or_else(|| SweepError::other(format!("unparsable result count: {text:?}")))
    }

    /// Switch the active sort order. A sort menu that never becomes visible
    /// is treated as transient flakiness: retry forever with a full page
    /// reload between attempts, stopping only on cancellation.
    fn apply_sort(&self, order: SortOrder) -> Result<()> {
        loop {
            self.cancel.check()?;
            match self.try_apply_sort(order) {
                Ok(()) => return Ok(()),
                Err(SweepError::WaitTimeout(what)) => {
                    warn!("sort menu not visible ({what}); reloading and retrying");
                    self.pacing.pause();
                    self.page.refresh()?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn try_apply_sort(&self, order: SortOrder) -> Result<()> {
        self.page.scroll_to(0)?;
        self.pacing.pause();

        let trigger = self
            .page
            .find_elements(&sel::SORT_TRIGGER)?
            .into_iter()
            .next()
            .ok_or_else(|| SweepError::WaitTimeout(sel::SORT_TRIGGER.to_string()))?;
        self.page.click(&trigger)?;

        let option = self
            .page
            .wait_visible(&order.option_locator(), self.cfg.menu_wait)?;
        self.page.click(&option)?;
        self.pacing.pause();
        Ok(())
    }
}
