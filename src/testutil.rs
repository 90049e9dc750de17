//! Scripted in-memory stand-in for the browser collaborator.

use crate::error::{Result, SweepError};
use crate::page::Page;
use crate::selectors::{self as sel, Locator};
use std::cell::RefCell;
use std::time::Duration;

#[derive(Debug, Clone)]
pub(crate) struct FakeCard {
    pub title: Option<String>,
    pub price_text: Option<String>,
    pub review_blob: Option<String>,
    pub units_text: Option<String>,
    pub address: Option<String>,
    pub href: Option<String>,
}

impl FakeCard {
    /// A fully-populated card with a unique detail link.
    pub fn numbered(i: usize) -> Self {
        Self {
            title: Some(format!("Stay {i}")),
            price_text: Some(format!("From AU${}", 100 + i)),
            review_blob: Some(format!("Scored 8.1\n8.1\nGood\n{} reviews", 10 + i)),
            units_text: Some("Double Room\n2 beds".into()),
            address: Some(format!("{i} Harbour St")),
            href: Some(format!("https://example.com/hotel/{i}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldKind {
    Title,
    Price,
    Review,
    Units,
    Address,
    Link,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SortKey {
    Descending,
    Ascending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FakeHandle {
    Card(usize),
    Field(usize, FieldKind),
    Counter,
    SortTrigger,
    SortOption(SortKey),
    LoadMore,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FakeEvent {
    Navigated(String),
    Refreshed,
    Sorted(SortKey),
    LoadMoreClicked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActiveDeck {
    Default,
    Descending,
    Ascending,
}

struct FakeState {
    default_deck: Vec<FakeCard>,
    desc_deck: Option<Vec<FakeCard>>,
    asc_deck: Option<Vec<FakeCard>>,
    active: ActiveDeck,
    rendered: usize,
    initial_window: usize,
    grow_per_scroll: usize,
    loaded_limit: usize,
    base_loaded_limit: usize,
    load_more_step: usize,
    count_text: Option<String>,
    sort_fail_times: usize,
    events: Vec<FakeEvent>,
}

impl FakeState {
    fn deck(&self) -> &Vec<FakeCard> {
        match self.active {
            ActiveDeck::Default => &self.default_deck,
            ActiveDeck::Descending => self.desc_deck.as_ref().unwrap_or(&self.default_deck),
            ActiveDeck::Ascending => self.asc_deck.as_ref().unwrap_or(&self.default_deck),
        }
    }

    fn reset_window(&mut self) {
        self.loaded_limit = self.base_loaded_limit;
        self.rendered = self
            .initial_window
            .min(self.loaded_limit)
            .min(self.deck().len());
    }

    fn load_more_present(&self) -> bool {
        self.load_more_step > 0 && self.loaded_limit < self.deck().len()
    }
}

pub(crate) struct FakePage {
    state: RefCell<FakeState>,
}

impl FakePage {
    /// A page whose whole deck is rendered up front; scrolling changes nothing.
    pub fn single_deck(cards: Vec<FakeCard>, count_text: Option<&str>) -> Self {
        let n = cards.len();
        Self::scripted(cards, n, n, n).with_count_text_opt(count_text)
    }

    /// A page that reveals `grow_per_scroll` more cards per scroll, capped at
    /// `loaded_limit` until a load-more click (if enabled) raises it.
    pub fn scripted(
        cards: Vec<FakeCard>,
        initial_window: usize,
        grow_per_scroll: usize,
        loaded_limit: usize,
    ) -> Self {
        let mut state = FakeState {
            default_deck: cards,
            desc_deck: None,
            asc_deck: None,
            active: ActiveDeck::Default,
            rendered: 0,
            initial_window,
            grow_per_scroll,
            loaded_limit,
            base_loaded_limit: loaded_limit,
            load_more_step: 0,
            count_text: None,
            sort_fail_times: 0,
            events: Vec::new(),
        };
        state.reset_window();
        Self {
            state: RefCell::new(state),
        }
    }

    pub fn with_count_text(self, text: &str) -> Self {
        self.state.borrow_mut().count_text = Some(text.to_string());
        self
    }

    fn with_count_text_opt(self, text: Option<&str>) -> Self {
        self.state.borrow_mut().count_text = text.map(|t| t.to_string());
        self
    }

    pub fn with_load_more_step(self, step: usize) -> Self {
        self.state.borrow_mut().load_more_step = step;
        self
    }

    pub fn with_desc_deck(self, cards: Vec<FakeCard>) -> Self {
        self.state.borrow_mut().desc_deck = Some(cards);
        self
    }

    pub fn with_asc_deck(self, cards: Vec<FakeCard>) -> Self {
        self.state.borrow_mut().asc_deck = Some(cards);
        self
    }

    /// Make the next `n` sort-option waits time out before one succeeds.
    pub fn with_sort_failures(self, n: usize) -> Self {
        self.state.borrow_mut().sort_fail_times = n;
        self
    }

    pub fn events(&self) -> Vec<FakeEvent> {
        self.state.borrow().events.clone()
    }

    fn field_text(&self, card_index: usize, kind: FieldKind) -> Option<String> {
        let state = self.state.borrow();
        let card = state.deck().get(card_index)?;
        match kind {
            FieldKind::Title => card.title.clone(),
            FieldKind::Price => card.price_text.clone(),
            FieldKind::Review => card.review_blob.clone(),
            FieldKind::Units => card.units_text.clone(),
            FieldKind::Address => card.address.clone(),
            FieldKind::Link => card.href.clone(),
        }
    }
}

impl Page for FakePage {
    type Handle = FakeHandle;

    fn navigate(&self, url: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.active = ActiveDeck::Default;
        state.reset_window();
        state.events.push(FakeEvent::Navigated(url.to_string()));
        Ok(())
    }

    fn find_elements(&self, locator: &Locator) -> Result<Vec<FakeHandle>> {
        let state = self.state.borrow();
        let out = match *locator {
            sel::PROPERTY_CARD => (0..state.rendered).map(FakeHandle::Card).collect(),
            sel::RESULT_COUNT => {
                if state.count_text.is_some() {
                    vec![FakeHandle::Counter]
                } else {
                    vec![]
                }
            }
            sel::SORT_TRIGGER => vec![FakeHandle::SortTrigger],
            sel::LOAD_MORE => {
                if state.load_more_present() {
                    vec![FakeHandle::LoadMore]
                } else {
                    vec![]
                }
            }
            _ => vec![],
        };
        Ok(out)
    }

    fn find_within(&self, handle: &FakeHandle, locator: &Locator) -> Result<Option<FakeHandle>> {
        let FakeHandle::Card(i) = handle else {
            return Ok(None);
        };
        let kind = match *locator {
            sel::TITLE => FieldKind::Title,
            sel::PRICE => FieldKind::Price,
            sel::REVIEW_SCORE => FieldKind::Review,
            sel::RECOMMENDED_UNITS => FieldKind::Units,
            sel::ADDRESS => FieldKind::Address,
            sel::DETAIL_LINK => FieldKind::Link,
            _ => return Ok(None),
        };
        Ok(self.field_text(*i, kind).map(|_| FakeHandle::Field(*i, kind)))
    }

    fn element_text(&self, handle: &FakeHandle) -> Result<String> {
        match handle {
            FakeHandle::Field(i, kind) => self
                .field_text(*i, *kind)
                .ok_or_else(|| SweepError::other("stale element")),
            FakeHandle::Counter => self
                .state
                .borrow()
                .count_text
                .clone()
                .ok_or_else(|| SweepError::other("stale element")),
            _ => Err(SweepError::other("no text for handle")),
        }
    }

    fn element_attr(&self, handle: &FakeHandle, name: &str) -> Result<Option<String>> {
        match handle {
            FakeHandle::Field(i, FieldKind::Link) if name == "href" => {
                Ok(self.field_text(*i, FieldKind::Link))
            }
            _ => Ok(None),
        }
    }

    fn scroll_height(&self) -> Result<i64> {
        Ok(1_000 + self.state.borrow().rendered as i64)
    }

    fn scroll_to(&self, _y: i64) -> Result<()> {
        Ok(())
    }

    fn scroll_by_height(&self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let limit = state.loaded_limit.min(state.deck().len());
        state.rendered = (state.rendered + state.grow_per_scroll).min(limit);
        Ok(())
    }

    fn element_top(&self, _handle: &FakeHandle) -> Result<i64> {
        self.scroll_height()
    }

    fn wait_visible(&self, locator: &Locator, _timeout: Duration) -> Result<FakeHandle> {
        let mut state = self.state.borrow_mut();
        match *locator {
            sel::SORT_DESCENDING | sel::SORT_ASCENDING => {
                if state.sort_fail_times > 0 {
                    state.sort_fail_times -= 1;
                    return Err(SweepError::WaitTimeout(locator.to_string()));
                }
                let key = if *locator == sel::SORT_DESCENDING {
                    SortKey::Descending
                } else {
                    SortKey::Ascending
                };
                Ok(FakeHandle::SortOption(key))
            }
            sel::PROPERTY_CARD => {
                if state.rendered > 0 {
                    Ok(FakeHandle::Card(0))
                } else {
                    Err(SweepError::WaitTimeout(locator.to_string()))
                }
            }
            _ => Err(SweepError::WaitTimeout(locator.to_string())),
        }
    }

    fn click(&self, handle: &FakeHandle) -> Result<()> {
        let mut state = self.state.borrow_mut();
        match handle {
            FakeHandle::SortOption(key) => {
                state.active = match key {
                    SortKey::Descending => ActiveDeck::Descending,
                    SortKey::Ascending => ActiveDeck::Ascending,
                };
                state.reset_window();
                state.events.push(FakeEvent::Sorted(*key));
            }
            FakeHandle::LoadMore => {
                state.loaded_limit += state.load_more_step;
                state.events.push(FakeEvent::LoadMoreClicked);
            }
            _ => {}
        }
        Ok(())
    }

    fn refresh(&self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.reset_window();
        state.events.push(FakeEvent::Refreshed);
        Ok(())
    }

    fn close(self) -> Result<()> {
        Ok(())
    }
}
