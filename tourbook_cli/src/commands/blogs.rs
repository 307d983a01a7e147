//! The `blogs` subcommand: browses blog posts.

use anyhow::Result;
use clap::Args;
use tourbook_lib::render::BlogCard;
use tourbook_lib::validation;
use tourbook_lib::{BlogFilters, BlogSource, ListKind, PaginatedResource};

use super::{browse, Context, PagingArgs};
use crate::output::print_blogs;

#[derive(Args)]
pub struct BlogsArgs {
    /// Search text
    #[arg(long)]
    pub search: Option<String>,

    /// Sort: newest, oldest, popular
    #[arg(long, default_value = "newest")]
    pub sort: String,

    #[command(flatten)]
    pub paging: PagingArgs,
}

pub async fn run(args: &BlogsArgs, ctx: &Context) -> Result<()> {
    let mut filters = BlogFilters {
        sort: validation::validate_blog_sort(&args.sort)?,
        ..BlogFilters::default()
    };
    if let Some(ref search) = args.search {
        filters.search = validation::validate_search(search)?;
    }
    let resource = PaginatedResource::new(
        BlogSource(&ctx.client),
        filters.build(ctx.locale),
        ListKind::Blogs.page_size(),
    );

    browse(&resource, &args.paging, "posts", |items| {
        let cards: Vec<BlogCard> = items
            .iter()
            .map(|b| BlogCard::from_blog(b, ctx.locale))
            .collect();
        print_blogs(&cards, ctx.format)
    })
    .await
}
