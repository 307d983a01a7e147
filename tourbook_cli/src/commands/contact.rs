//! The `contact` subcommand: builds a Telegram link carrying a booking request.

use anyhow::Result;
use clap::Args;
use tourbook_lib::contact::ContactRequest;
use tourbook_lib::types::TourID;
use tourbook_lib::validation;

use super::{spinner, Context};

#[derive(Args)]
pub struct ContactArgs {
    /// Tour to ask about
    pub tour_id: TourID,

    /// Your name
    #[arg(long)]
    pub name: String,

    /// Phone number to call back
    #[arg(long)]
    pub phone: String,

    /// Preferred date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// Number of guests
    #[arg(long, default_value = "1")]
    pub guests: u32,

    /// Operator username; defaults to the configured one
    #[arg(long)]
    pub telegram: Option<String>,
}

pub async fn run(args: &ContactArgs, ctx: &Context) -> Result<()> {
    let id = validation::validate_id(args.tour_id)?;
    let date = args
        .date
        .as_deref()
        .map(validation::validate_date)
        .transpose()?;

    let pb = spinner("Loading tour...");
    let tour = ctx.client.get_tour(id).await;
    pb.finish_and_clear();
    let tour = tour?.data;

    let request = ContactRequest {
        tour_id: tour.id,
        tour_title: tour.title.get(ctx.locale).unwrap_or_default().to_string(),
        name: args.name.clone(),
        phone: args.phone.clone(),
        date,
        guests: args.guests,
    };
    let username = args.telegram.as_deref().unwrap_or(&ctx.config.telegram);
    let link = request.telegram_link(username)?;

    eprintln!("{}\n", request.message());
    println!("{}", link);
    Ok(())
}
