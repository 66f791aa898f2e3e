// UI layer: prompts for credentials with `dialoguer`, shows a spinner
// while pages are fetched and prints what happened. All decisions about
// pagination live in `pages`; this module only drives and reports.

use crate::api::{ApiClient, Credentials};
use crate::config::Config;
use crate::error::FetchError;
use crate::pages::{aggregate, Aggregation, Completion, PageRequest, PageResponse, PageSource};
use crate::writer::{save_products, SaveOutcome};
use anyhow::{Context, Result};
use crossterm::style::Stylize;
use dialoguer::{Input, Password};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{error, warn};

/// Ask for the API credentials. Username is echoed, password is hidden;
/// neither may be empty.
pub fn prompt_credentials() -> Result<Credentials> {
    println!("Please enter your TCO Certified API credentials:");
    let username: String = Input::new().with_prompt("Username").interact_text()?;
    // `Password` hides input in terminal for passwords.
    let password: String = Password::new().with_prompt("Password").interact()?;
    Ok(Credentials { username, password })
}

/// Authenticate, fetch the configured pages and write the result.
///
/// Only an authentication failure is returned as an error; fetch and write
/// problems are reported and end the run normally.
pub fn run(config: &Config, credentials: Credentials) -> Result<()> {
    let mut api = ApiClient::new(&config.base_url).context("Failed to build HTTP client")?;

    let login = new_spinner("Logging in...")?;
    let token = api.authenticate(&credentials);
    login.finish_and_clear();
    drop(credentials);
    match token {
        Ok(token) => {
            println!("Token received");
            api.set_token(token);
        }
        Err(e) => {
            println!("{}", "Exiting due to authentication failure.".red());
            return Err(e).context("authentication failed");
        }
    }

    if config.selection.is_open_ended() {
        println!("Fetching all available pages...");
    }
    let fetching = new_spinner("Fetching...")?;
    let result = aggregate(
        SpinnerSource {
            inner: &api,
            spinner: &fetching,
        },
        &config.query,
        config.selection,
        config.max_pages,
    );
    // Warnings are emitted only once the spinner no longer owns stderr.
    fetching.finish_and_clear();
    report_aggregation(&result);

    match save_products(&result.products, &config.output) {
        Ok(SaveOutcome::Saved(path)) => {
            println!("All product data saved to '{}'", path.display());
        }
        Ok(SaveOutcome::NothingToSave) => println!("No data to save."),
        Err(e) => {
            error!(error = %e, "saving products failed");
            println!("{}", format!("Failed to save JSON: {e}").red());
        }
    }
    Ok(())
}

fn report_aggregation(result: &Aggregation) {
    for page in &result.skipped_pages {
        println!("No products found on page {page}.");
    }
    match &result.completion {
        Completion::ListExhausted => {
            println!("Fetched {} page(s).", result.requested_pages.len());
        }
        Completion::LastPage { page, total } => {
            println!("Page {page} / {total} fetched");
            println!("{}", "All pages retrieved.".green());
        }
        Completion::EmptyPage { page } => {
            println!("No products found on page {page}, stopping.");
        }
        Completion::Failed { page, error } => {
            warn!(page, status = ?error.status(), %error, "page request failed");
            let msg = match error {
                FetchError::Status { status, body } => {
                    format!("Request failed on page {page}: {status}\n{body}")
                }
                other => format!("Request failed on page {page}: {other}"),
            };
            println!("{}", msg.red());
        }
        Completion::PageLimit { limit } => {
            warn!(limit, "open-ended sweep reached the page limit");
            println!("{}", format!("Stopped after {limit} pages (page limit reached).").yellow());
        }
    }
    println!("{} product(s) collected.", result.products.len());
}

fn new_spinner(msg: &'static str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(msg);
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

/// Shows the page being fetched on the spinner.
struct SpinnerSource<'a, S> {
    inner: S,
    spinner: &'a ProgressBar,
}

impl<S: PageSource> PageSource for SpinnerSource<'_, S> {
    fn fetch_page(&self, request: &PageRequest) -> Result<PageResponse, FetchError> {
        self.spinner.set_message(format!("Fetching page {}...", request.page));
        self.inner.fetch_page(request)
    }
}
