//! The `tours` subcommand: browses the public activity catalogue.

use anyhow::Result;
use clap::Args;
use tokio::sync::mpsc;
use tourbook_lib::debounce::{debounce, drive_search};
use tourbook_lib::render::TourCard;
use tourbook_lib::types::{Locale, Tour};
use tourbook_lib::validation;
use tourbook_lib::{ListKind, PaginatedResource, TourFilters, TourSource};

use super::{browse, Context, PagingArgs};
use crate::output::print_tours;

/// Filter flags shared by `tours` and `my-tours`.
#[derive(Args, Debug)]
pub struct TourFilterArgs {
    /// Search text
    #[arg(long)]
    pub search: Option<String>,

    /// Price range: FROM-TO, FROM- or -TO (e.g. 100000-500000)
    #[arg(long)]
    pub price: Option<String>,

    /// Tour type (e.g. cultural, hiking); "all" for no filter
    #[arg(long = "type")]
    pub tour_type: Option<String>,

    /// Earliest start date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Latest start date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Location ID
    #[arg(long)]
    pub location: Option<i64>,

    /// Sort: newest, oldest, price-asc, price-desc, popular
    #[arg(long, default_value = "newest")]
    pub sort: String,
}

impl TourFilterArgs {
    /// Validates the flags into filter selections. `status` is only used by vendor lists.
    pub fn to_filters(&self, status: Option<&str>) -> Result<TourFilters> {
        let mut filters = TourFilters {
            sort: validation::validate_tour_sort(&self.sort)?,
            ..TourFilters::default()
        };
        if let Some(ref search) = self.search {
            filters.search = validation::validate_search(search)?;
        }
        if let Some(ref price) = self.price {
            validation::validate_price(price)?;
            filters.price = price.clone();
        }
        if let Some(ref tour_type) = self.tour_type {
            filters.tour_type = validation::sanitize_text(tour_type, validation::MAX_NAME_LENGTH)?;
        }
        if let Some(status) = status {
            if let Some(status) = validation::validate_status(status)? {
                filters.status = status.to_string();
            }
        }
        if let Some(ref from) = self.from {
            filters.from_date = Some(validation::validate_date(from)?);
        }
        if let Some(ref to) = self.to {
            filters.to_date = Some(validation::validate_date(to)?);
        }
        validation::validate_date_range(filters.from_date, filters.to_date)?;
        if let Some(location) = self.location {
            filters.location_id = validation::validate_id(location)?;
        }
        Ok(filters)
    }
}

#[derive(Args)]
pub struct ToursArgs {
    #[command(flatten)]
    pub filters: TourFilterArgs,

    /// Show the short featured strip instead of the full catalogue
    #[arg(long)]
    pub featured: bool,

    /// Read search terms from stdin, one per line; each settles after the debounce delay
    #[arg(long, conflicts_with = "interactive")]
    pub live_search: bool,

    #[command(flatten)]
    pub paging: PagingArgs,
}

fn cards(tours: &[Tour], locale: Locale) -> Vec<TourCard> {
    tours.iter().map(|t| TourCard::from_tour(t, locale)).collect()
}

pub async fn run(args: &ToursArgs, ctx: &Context) -> Result<()> {
    let kind = if args.featured {
        ListKind::Featured
    } else {
        ListKind::Activities
    };
    let query = args.filters.to_filters(None)?.build(kind, ctx.locale);
    let resource = PaginatedResource::new(TourSource(&ctx.client), query, kind.page_size());

    if args.live_search {
        return live_search(&resource, ctx).await;
    }

    browse(&resource, &args.paging, "tours", |items| {
        print_tours(&cards(items, ctx.locale), ctx.format)
    })
    .await
}

/// Feeds stdin lines through the debouncer into the list, printing the
/// first page after every term that settles.
async fn live_search(resource: &PaginatedResource<TourSource<'_>>, ctx: &Context) -> Result<()> {
    let (tx, keystrokes) = mpsc::channel::<String>(64);
    let reader = tokio::task::spawn_blocking(move || {
        let stdin = std::io::stdin();
        let mut line = String::new();
        while stdin.read_line(&mut line).map(|n| n > 0).unwrap_or(false) {
            if tx.blocking_send(line.trim().to_string()).is_err() {
                break;
            }
            line.clear();
        }
    });

    eprintln!("Type a search term and press enter (Ctrl-D to finish).");
    let (terms, debouncer) = debounce(keystrokes, ctx.config.debounce);
    drive_search(resource, terms, |term| {
        let snap = resource.snapshot();
        eprintln!("-- results for {:?} --", term);
        if let Some(ref error) = snap.error {
            eprintln!("Error: {}", error);
            return;
        }
        if let Err(e) = print_tours(&cards(&snap.items, ctx.locale), ctx.format) {
            eprintln!("Error: {}", e);
        }
    })
    .await;

    reader.await?;
    debouncer.await?;
    Ok(())
}
