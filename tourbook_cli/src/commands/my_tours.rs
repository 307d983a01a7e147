//! The `my-tours` subcommand: the signed-in vendor's own tours.

use anyhow::Result;
use clap::Args;
use tourbook_lib::render::TourCard;
use tourbook_lib::{ListKind, PaginatedResource, VendorTourSource};

use super::tours::TourFilterArgs;
use super::{browse, Context, PagingArgs};
use crate::output::print_tours;

#[derive(Args)]
pub struct MyToursArgs {
    #[command(flatten)]
    pub filters: TourFilterArgs,

    /// Moderation status: all, active, inactive, pending, draft, rejected
    #[arg(long, default_value = "all")]
    pub status: String,

    #[command(flatten)]
    pub paging: PagingArgs,
}

pub async fn run(args: &MyToursArgs, ctx: &Context) -> Result<()> {
    ctx.require_login()?;
    let kind = ListKind::MyTours;
    let query = args
        .filters
        .to_filters(Some(&args.status))?
        .build(kind, ctx.locale);
    let resource = PaginatedResource::new(VendorTourSource(&ctx.client), query, kind.page_size());

    browse(&resource, &args.paging, "tours", |items| {
        let cards: Vec<TourCard> = items
            .iter()
            .map(|t| TourCard::from_tour(t, ctx.locale))
            .collect();
        print_tours(&cards, ctx.format)
    })
    .await
}
