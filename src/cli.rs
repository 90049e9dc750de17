use crate::buckets::partition_for;
use crate::engine::Engine;
use crate::error::SweepError;
use crate::pacing::{CancelToken, Pacing};
use crate::page::{Page, WebDriverPage};
use crate::sink::CsvSink;
use crate::types::{RunState, SweepConfig};
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use url::Url;

/// The run targets this search context when no URL is given: an
/// Australia-wide query with fixed dates and AUD pricing.
pub const DEFAULT_SEARCH_URL: &str = "https://www.booking.com/searchresults.html\
?ss=Australia\
&checkin_year=2026&checkin_month=2&checkin_monthday=1\
&checkout_year=2026&checkout_month=2&checkout_monthday=2\
&group_adults=2&group_children=0&no_rooms=1&selected_currency=AUD";

const URL_HINT: &str = "Looks like your URL is invalid. Try something like this:\n\
https://www.booking.com/searchresults.en-gb.html?ss=Nice%2C+France\
&checkin=2026-06-10&checkout=2026-06-11&group_adults=2&no_rooms=1&group_children=0";

#[derive(Parser)]
#[command(
    name = "staysweep",
    version,
    about = "Exhaustive listing sweeps past the pagination cap"
)]
pub struct Cli {
    /// Search-results URL to enumerate (defaults to the Australia-wide search)
    url: Option<String>,

    /// WebDriver endpoint to attach to
    #[arg(long, default_value = "http://localhost:9515")]
    webdriver_url: String,

    /// Directory for the dated CSV snapshot
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,
}

/// Run the sweep; the return value is the process exit code. Exit 1 is
/// reserved for an invalid or unreachable start URL — per-bucket trouble is
/// logged and the run still counts as a (partial) completion.
pub fn run() -> i32 {
    let cli = Cli::parse();
    let cfg = SweepConfig::default();

    let raw_url = cli.url.as_deref().unwrap_or(DEFAULT_SEARCH_URL);
    let search_url = match Url::parse(raw_url) {
        Ok(u) if u.has_host() => u,
        _ => {
            eprintln!("{URL_HINT}");
            return 1;
        }
    };

    let page = match WebDriverPage::connect(&cli.webdriver_url) {
        Ok(p) => p,
        Err(e) => {
            error!("could not start a browser session: {e}");
            return 1;
        }
    };

    // Reachability check before anything downstream runs.
    if let Err(e) = page.navigate(search_url.as_str()) {
        error!("initial navigation failed: {e}");
        eprintln!("{URL_HINT}");
        let _ = page.close();
        return 1;
    }

    let snapshot = CsvSink::dated_path(&cli.output_dir);
    let mut sink = match CsvSink::create(&snapshot) {
        Ok(s) => s,
        Err(e) => {
            error!("could not open {}: {e}", snapshot.display());
            let _ = page.close();
            return 1;
        }
    };

    let pacing = Pacing::new(cfg.pace_min, cfg.pace_max);
    let cancel = CancelToken::new();
    let engine = Engine::new(&page, &pacing, &cancel, &cfg);
    let mut state = RunState::new();

    info!(
        "beginning sweep of {} price buckets into {}",
        partition_for(&cfg).len(),
        snapshot.display()
    );

    let code = match engine.run(&search_url, &mut state, &mut sink) {
        Ok(summary) => {
            info!(
                "sweep complete: {} listings across {} buckets stored in {}",
                summary.listings,
                summary.buckets,
                snapshot.display()
            );
            0
        }
        Err(SweepError::Cancelled) => {
            info!("sweep cancelled after {} listings", state.emitted());
            0
        }
        Err(e) => {
            error!(
                "sweep aborted: {e} ({} listings already flushed)",
                state.emitted()
            );
            1
        }
    };

    if let Err(e) = page.close() {
        error!("could not close the browser session: {e}");
    }
    code
}
