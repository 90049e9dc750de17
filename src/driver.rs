//! Scroll/Load-More Driver.
//!
//! Grows the rendered result set for one query context until a target count
//! is reached, extracting only the newly-appeared window each round and
//! appending accepted records to the sink before anything else happens.

use crate::error::{Result, SweepError};
use crate::extract::extract_batch;
use crate::pacing::{click_offset_px, CancelToken, Pacing};
use crate::page::Page;
use crate::selectors as sel;
use crate::sink::ListingSink;
use crate::types::{RunState, SweepConfig};
use log::{info, warn};

pub struct ScrollDriver<'a, P: Page> {
    page: &'a P,
    pacing: &'a Pacing,
    cancel: &'a CancelToken,
    cfg: &'a SweepConfig,
}

impl<'a, P: Page> ScrollDriver<'a, P> {
    pub fn new(page: &'a P, pacing: &'a Pacing, cancel: &'a CancelToken, cfg: &'a SweepConfig) -> Self {
        Self {
            page,
            pacing,
            cancel,
            cfg,
        }
    }

    /// Run one pass under the currently active sort order, collecting until
    /// `target` result elements have been seen or the page runs out of
    /// content. Returns the number of listings accepted this pass.
    pub fn collect(
        &self,
        target: u64,
        state: &mut RunState,
        sink: &mut dyn ListingSink,
    ) -> Result<u64> {
        if target == 0 {
            return Ok(0);
        }

        // Bounded presence wait; a timeout here means the context rendered
        // nothing, which ends the pass rather than failing it.
        match self.page.wait_visible(&sel::PROPERTY_CARD, self.cfg.presence_wait) {
            Ok(_) => {}
            Err(SweepError::WaitTimeout(what)) => {
                info!("no result cards appeared ({what}); ending pass");
                return Ok(0);
            }
            Err(e) => return Err(e),
        }

        let mut accepted_total = 0u64;
        let mut seen_count = 0usize;

        while (seen_count as u64) < target {
            self.cancel.check()?;

            if target > self.cfg.initial_window {
                self.scroll_until_stable()?;
            }

            let cards = self.page.find_elements(&sel::PROPERTY_CARD)?;
            let fresh = &cards[seen_count.min(cards.len())..];
            let accepted = extract_batch(self.page, fresh, state)?;
            sink.append(&accepted)?;
            accepted_total += accepted.len() as u64;
            info!("scraped {} new items", accepted.len());
            seen_count = cards.len();

            if (seen_count as u64) >= target {
                break;
            }

            let load_more = self.page.find_elements(&sel::LOAD_MORE)?;
            let Some(button) = load_more.first() else {
                info!("no more results");
                break;
            };
            if let Err(e) = self.trigger_load_more(button) {
                warn!("load-more unavailable ({e}); ending pass");
                break;
            }
        }

        Ok(accepted_total)
    }

    /// Scroll the page until the measured content height holds steady for
    /// the configured number of consecutive reads.
    fn scroll_until_stable(&self) -> Result<()> {
        let mut last_height = self.height_with_retry()?;
        let mut streak = 1u32;
        while streak < self.cfg.height_stable_reads {
            self.cancel.check()?;
            self.page.scroll_by_height()?;
            self.pacing.pause();
            let height = self.height_with_retry()?;
            if height == last_height {
                streak += 1;
            } else {
                streak = 1;
                last_height = height;
            }
        }
        Ok(())
    }

    /// The height read guards every scroll decision; retry it indefinitely
    /// (with pacing and a cancellation check) on transient script failures.
    fn height_with_retry(&self) -> Result<i64> {
        loop {
            self.cancel.check()?;
            match self.page.scroll_height() {
                Ok(h) => return Ok(h),
                Err(e) => {
                    warn!("could not read scroll height: {e}");
                    self.pacing.pause();
                }
            }
        }
    }

    /// Scroll near the load-more control (with a randomized offset so the
    /// stop position never repeats exactly), then click it.
    fn trigger_load_more(&self, button: &P::Handle) -> Result<()> {
        let top = self.page.element_top(button)?;
        self.page.scroll_to(top - click_offset_px())?;
        self.pacing.pause();
        self.page.click(button)?;
        info!("clicked load-more; waiting for next batch");
        self.pacing.pause();
        Ok(())
    }
}
