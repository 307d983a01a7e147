//! CLI subcommand implementations and the helpers they share.

pub mod blog;
pub mod blogs;
pub mod contact;
pub mod import_instagram;
pub mod login;
pub mod my_tours;
pub mod tour;
pub mod tours;

use std::io::{BufRead, Write};
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tourbook_lib::pagination::LoadMoreButton;
use tourbook_lib::types::Locale;
use tourbook_lib::{Client, Config, LocalStore, PageSource, PaginatedResource};

use crate::output::OutputFormat;

/// Everything a command needs: the API client, local store and resolved settings.
pub struct Context {
    pub client: Client,
    pub store: LocalStore,
    pub config: Config,
    pub locale: Locale,
    pub format: OutputFormat,
}

impl Context {
    /// Fails early for vendor commands when no token is stored.
    pub fn require_login(&self) -> Result<()> {
        if !self.client.is_authenticated() {
            bail!("not logged in; run `tourbook login` first");
        }
        Ok(())
    }
}

/// How many pages a list command loads.
#[derive(Args, Debug)]
pub struct PagingArgs {
    /// Number of pages to load
    #[arg(long, default_value = "1")]
    pub pages: usize,

    /// Keep loading until the last page
    #[arg(long, conflicts_with = "pages")]
    pub all: bool,

    /// Print each page and ask before loading the next one
    #[arg(long, conflicts_with_all = ["pages", "all"])]
    pub interactive: bool,
}

pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Asks a yes/no question on stderr; an empty answer means yes.
pub fn confirm(question: &str) -> Result<bool> {
    let answer = prompt(&format!("{} [Y/n]", question))?;
    Ok(matches!(answer.to_ascii_lowercase().as_str(), "" | "y" | "yes"))
}

/// Reads one trimmed line from stdin after printing `label` on stderr.
pub fn prompt(label: &str) -> Result<String> {
    eprint!("{} ", label);
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Loads the first page, then more pages as `paging` asks, handing new
/// records to `show`. Non-interactive runs show everything once at the end.
pub async fn browse<S, F>(
    resource: &PaginatedResource<S>,
    paging: &PagingArgs,
    noun: &str,
    mut show: F,
) -> Result<()>
where
    S: PageSource,
    F: FnMut(&[S::Item]) -> Result<()>,
{
    let pb = spinner(&format!("Loading {}...", noun));
    let first = resource.reload().await;
    pb.finish_and_clear();
    first?;

    if paging.interactive {
        show(&resource.snapshot().items)?;
        while LoadMoreButton::is_visible(resource) {
            if !confirm("Load more?")? {
                break;
            }
            let before = resource.len();
            let pb = spinner(&format!("Loading more {}...", noun));
            let mut outcome = LoadMoreButton::press(resource).await;
            pb.finish_and_clear();
            loop {
                match &outcome {
                    Ok(_) => break,
                    Err(e) => eprintln!("Error: {}", e),
                }
                if !confirm("Retry?")? {
                    break;
                }
                outcome = resource.retry().await;
            }
            let items = resource.snapshot().items;
            if items.len() > before {
                show(&items[before..])?;
            }
            if outcome.is_err() {
                break;
            }
        }
    } else {
        let mut loaded = 1;
        let mut failure = None;
        while (paging.all || loaded < paging.pages) && LoadMoreButton::is_visible(resource) {
            let pb = spinner(&format!("Loading page {}...", resource.page() + 1));
            let outcome = LoadMoreButton::press(resource).await;
            pb.finish_and_clear();
            if let Err(e) = outcome {
                failure = Some(e);
                break;
            }
            loaded += 1;
        }
        show(&resource.snapshot().items)?;
        if let Some(e) = failure {
            eprintln!("Showing the pages loaded before the error.");
            return Err(e.into());
        }
    }

    let snap = resource.snapshot();
    if !snap.items.is_empty() {
        eprintln!(
            "{} {} loaded ({} total){}",
            snap.items.len(),
            noun,
            snap.total,
            if snap.has_more { ", more available" } else { "" }
        );
    }
    Ok(())
}
