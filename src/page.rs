//! The browser-automation collaborator.
//!
//! The sweep never assumes a rendering technology beyond the narrow
//! capability set in [`Page`]; the production implementation drives a
//! WebDriver session, tests substitute a scripted fake.

use crate::error::{Result, SweepError};
use crate::runtime;
use crate::selectors::Locator;
use std::time::{Duration, Instant};
use thirtyfour::prelude::*;

/// Poll interval used inside bounded waits.
const WAIT_POLL: Duration = Duration::from_millis(500);

/// Capability set consumed by the enumeration core, one rendered document
/// at a time. `find_elements` yields an empty window on no match — absence
/// is a normal outcome, never an error.
pub trait Page {
    type Handle: Clone;

    fn navigate(&self, url: &str) -> Result<()>;

    /// All elements currently matching, in document order.
    fn find_elements(&self, locator: &Locator) -> Result<Vec<Self::Handle>>;

    /// First matching descendant of `handle`, or `None`.
    fn find_within(&self, handle: &Self::Handle, locator: &Locator)
        -> Result<Option<Self::Handle>>;

    /// Visible text of an element. Fails when the handle has gone stale.
    fn element_text(&self, handle: &Self::Handle) -> Result<String>;

    fn element_attr(&self, handle: &Self::Handle, name: &str) -> Result<Option<String>>;

    /// Current measured content height of the document.
    fn scroll_height(&self) -> Result<i64>;

    /// Scroll to an absolute vertical position.
    fn scroll_to(&self, y: i64) -> Result<()>;

    /// Scroll down by one full content height.
    fn scroll_by_height(&self) -> Result<()>;

    /// Absolute Y position of an element on the document.
    fn element_top(&self, handle: &Self::Handle) -> Result<i64>;

    /// Poll until the first match is visible, failing with
    /// [`SweepError::WaitTimeout`] once `timeout` expires.
    fn wait_visible(&self, locator: &Locator, timeout: Duration) -> Result<Self::Handle>;

    fn click(&self, handle: &Self::Handle) -> Result<()>;

    fn refresh(&self) -> Result<()>;

    fn close(self) -> Result<()>;
}

impl Locator {
    fn by(&self) -> By {
        match self {
            Locator::Css(s) => By::Css(*s),
            Locator::XPath(s) => By::XPath(*s),
        }
    }
}

/// [`Page`] backed by a live WebDriver session.
pub struct WebDriverPage {
    driver: WebDriver,
}

impl WebDriverPage {
    /// Attach to a running WebDriver endpoint (e.g. chromedriver).
    pub fn connect(webdriver_url: &str) -> Result<Self> {
        let caps = DesiredCapabilities::chrome();
        let driver = runtime::block_on(WebDriver::new(webdriver_url, caps))?;
        Ok(Self { driver })
    }

    fn execute_number(&self, script: &str, args: Vec<serde_json::Value>) -> Result<i64> {
        let ret = runtime::block_on(self.driver.execute(script, args))?;
        let value = ret.json().clone();
        value
            .as_i64()
            .or_else(|| value.as_f64().map(|f| f as i64))
            .ok_or_else(|| SweepError::other(format!("script returned non-number: {value}")))
    }
}

impl Page for WebDriverPage {
    type Handle = WebElement;

    fn navigate(&self, url: &str) -> Result<()> {
        runtime::block_on(self.driver.goto(url))?;
        Ok(())
    }

    fn find_elements(&self, locator: &Locator) -> Result<Vec<WebElement>> {
        Ok(runtime::block_on(self.driver.find_all(locator.by()))?)
    }

    fn find_within(&self, handle: &WebElement, locator: &Locator) -> Result<Option<WebElement>> {
        let found = runtime::block_on(handle.find_all(locator.by()))?;
        Ok(found.into_iter().next())
    }

    fn element_text(&self, handle: &WebElement) -> Result<String> {
        Ok(runtime::block_on(handle.text())?)
    }

    fn element_attr(&self, handle: &WebElement, name: &str) -> Result<Option<String>> {
        Ok(runtime::block_on(handle.attr(name))?)
    }

    fn scroll_height(&self) -> Result<i64> {
        self.execute_number("return document.body.scrollHeight;", vec![])
    }

    fn scroll_to(&self, y: i64) -> Result<()> {
        runtime::block_on(
            self.driver
                .execute("window.scrollTo(0, arguments[0]);", vec![y.into()]),
        )?;
        Ok(())
    }

    fn scroll_by_height(&self) -> Result<()> {
        runtime::block_on(
            self.driver
                .execute("window.scrollBy(0, document.body.scrollHeight);", vec![]),
        )?;
        Ok(())
    }

    fn element_top(&self, handle: &WebElement) -> Result<i64> {
        self.execute_number(
            "return arguments[0].getBoundingClientRect().top + window.pageYOffset;",
            vec![handle.to_json()?],
        )
    }

    fn wait_visible(&self, locator: &Locator, timeout: Duration) -> Result<WebElement> {
        let deadline = Instant::now() + timeout;
        loop {
            for el in self.find_elements(locator)? {
                if runtime::block_on(el.is_displayed()).unwrap_or(false) {
                    return Ok(el);
                }
            }
            if Instant::now() >= deadline {
                return Err(SweepError::WaitTimeout(locator.to_string()));
            }
            std::thread::sleep(WAIT_POLL);
        }
    }

    fn click(&self, handle: &WebElement) -> Result<()> {
        runtime::block_on(handle.click())?;
        Ok(())
    }

    fn refresh(&self) -> Result<()> {
        runtime::block_on(self.driver.refresh())?;
        Ok(())
    }

    fn close(self) -> Result<()> {
        runtime::block_on(self.driver.quit())?;
        Ok(())
    }
}
