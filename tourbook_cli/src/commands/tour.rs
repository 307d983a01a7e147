//! The `tour` subcommand: show a single tour and manage vendor tours.
//!
//! Drafts live in JSON or TOML files. `tour draft` writes one (optionally
//! seeded from an existing tour and filled in through the step-by-step
//! editor); `tour create` / `tour update` submit it.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Subcommand};
use tourbook_lib::draft::{submit_tour, ImageSlot, SubmitMode, TourDraft, TourWizard, WizardTab};
use tourbook_lib::render::TourCard;
use tourbook_lib::types::{Locale, TourID};
use tourbook_lib::validation;

use super::{confirm, prompt, spinner, Context};
use crate::output::{print_json, print_tours, OutputFormat};

#[derive(Args)]
pub struct TourArgs {
    #[command(subcommand)]
    pub action: TourAction,
}

#[derive(Subcommand)]
pub enum TourAction {
    /// Show one tour
    Show {
        id: TourID,
    },
    /// Write a draft file, optionally seeded from an existing tour
    Draft {
        /// Draft file (.json or .toml)
        file: PathBuf,
        /// Seed the draft from this tour
        #[arg(long)]
        from: Option<TourID>,
        /// Fill the draft in step by step (Content, Details, Files)
        #[arg(long)]
        wizard: bool,
    },
    /// Create a tour from a draft file
    Create {
        file: PathBuf,
    },
    /// Update a tour from a draft file
    Update {
        id: TourID,
        file: PathBuf,
    },
    /// Delete a tour
    Delete {
        id: TourID,
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
}

pub async fn run(args: &TourArgs, ctx: &Context) -> Result<()> {
    match &args.action {
        TourAction::Show { id } => show(*id, ctx).await,
        TourAction::Draft { file, from, wizard } => draft(file, *from, *wizard, ctx).await,
        TourAction::Create { file } => submit(file, SubmitMode::Create, ctx).await,
        TourAction::Update { id, file } => {
            submit(file, SubmitMode::Update(validation::validate_id(*id)?), ctx).await
        }
        TourAction::Delete { id, yes } => delete(*id, *yes, ctx).await,
    }
}

async fn show(id: TourID, ctx: &Context) -> Result<()> {
    let id = validation::validate_id(id)?;
    let pb = spinner("Loading tour...");
    let tour = ctx.client.get_tour(id).await;
    pb.finish_and_clear();
    let tour = tour?.data;

    if ctx.format == OutputFormat::Json {
        print_json(&tour);
        return Ok(());
    }
    print_tours(&[TourCard::from_tour(&tour, ctx.locale)], ctx.format)?;
    if let Some(description) = tour.description.as_ref().and_then(|d| d.get(ctx.locale)) {
        println!("\n{}", description.trim());
    }
    Ok(())
}

async fn draft(file: &Path, from: Option<TourID>, wizard: bool, ctx: &Context) -> Result<()> {
    let mut draft = match from {
        Some(id) => {
            let id = validation::validate_id(id)?;
            let pb = spinner("Loading tour...");
            let tour = ctx.client.get_tour(id).await;
            pb.finish_and_clear();
            TourDraft::from_tour(&tour?.data)
        }
        None if file.exists() => TourDraft::load(file)?,
        None => TourDraft::default(),
    };
    if wizard {
        edit_in_wizard(&mut draft)?;
    }
    draft.save(file)?;
    eprintln!("Draft saved to {}", file.display());
    Ok(())
}

async fn submit(file: &Path, mode: SubmitMode, ctx: &Context) -> Result<()> {
    ctx.require_login()?;
    let mut draft = TourDraft::load(file)?;
    let pending = draft.images.iter().filter(|s| s.is_local()).count();
    let pb = spinner(&if pending > 0 {
        format!("Uploading {} image(s) and saving...", pending)
    } else {
        "Saving...".to_string()
    });
    let result = submit_tour(&ctx.client, &mut draft, mode).await;
    pb.finish_and_clear();

    // Uploaded images are now remote; keep them so a retry does not upload again.
    if pending > 0 {
        draft.save(file)?;
    }
    let tour = result?;
    eprintln!("Saved tour {}", tour.id);
    print_tours(&[TourCard::from_tour(&tour, ctx.locale)], ctx.format)
}

async fn delete(id: TourID, yes: bool, ctx: &Context) -> Result<()> {
    ctx.require_login()?;
    let id = validation::validate_id(id)?;
    if !yes && !confirm(&format!("Delete tour {}?", id))? {
        eprintln!("Aborted.");
        return Ok(());
    }
    let resp = ctx.client.delete_tour(id).await?;
    eprintln!(
        "{}",
        resp.message.unwrap_or_else(|| format!("Deleted tour {}", id))
    );
    Ok(())
}

/// Keeps `current` when the answer is empty.
fn ask(label: &str, current: &str) -> Result<String> {
    let answer = prompt(&format!("{} [{}]:", label, current))?;
    Ok(if answer.is_empty() {
        current.to_string()
    } else {
        answer
    })
}

fn ask_optional(label: &str, current: &Option<String>) -> Result<Option<String>> {
    let answer = ask(label, current.as_deref().unwrap_or_default())?;
    Ok(Some(answer).filter(|a| !a.trim().is_empty()))
}

/// Walks the editor tabs in order. Empty answers keep the current value;
/// `b` goes back one tab.
fn edit_in_wizard(draft: &mut TourDraft) -> Result<()> {
    let mut wizard = TourWizard::new();
    loop {
        let tab = wizard.tab();
        eprintln!("\n== {} ==", tab.label());
        match tab {
            WizardTab::Content => edit_content(draft)?,
            WizardTab::Details => edit_details(draft)?,
            WizardTab::Files => edit_files(draft)?,
        }
        let label = if wizard.is_last() {
            "[enter] finish, [b]ack:"
        } else {
            "[enter] next, [b]ack:"
        };
        match prompt(label)?.as_str() {
            "b" | "back" => {
                wizard.back();
            }
            _ if wizard.is_last() => return Ok(()),
            _ => {
                wizard.next();
            }
        }
    }
}

fn edit_content(draft: &mut TourDraft) -> Result<()> {
    for locale in Locale::ALL {
        let title = ask(&format!("Title ({})", locale), draft.title.get(locale))?;
        draft.title.set(locale, &title);
        let description = ask(
            &format!("Description ({})", locale),
            draft.description.get(locale),
        )?;
        draft.description.set(locale, &description);
    }
    Ok(())
}

fn edit_details(draft: &mut TourDraft) -> Result<()> {
    draft.price = ask_optional("Price", &draft.price)?;
    draft.sale_price = ask_optional("Sale price", &draft.sale_price)?;
    draft.currency = ask("Currency", &draft.currency)?;
    draft.duration = ask_optional("Duration", &draft.duration)?;
    draft.tour_type = ask_optional("Type", &draft.tour_type)?;
    let location = ask(
        "Location ID",
        &draft.location_id.map(|id| id.to_string()).unwrap_or_default(),
    )?;
    draft.location_id = location.trim().parse().ok();

    loop {
        let stop = prompt("Add route stop (empty to continue):")?;
        if stop.is_empty() {
            break;
        }
        let note = prompt("  Stop description (optional):")?;
        draft.add_waypoint(&stop, Some(&note));
    }
    loop {
        let item = prompt("Add inclusion (empty to continue):")?;
        if item.is_empty() {
            break;
        }
        draft.add_inclusion(&item);
    }
    loop {
        let item = prompt("Add exclusion (empty to continue):")?;
        if item.is_empty() {
            break;
        }
        draft.add_exclusion(&item);
    }
    Ok(())
}

fn edit_files(draft: &mut TourDraft) -> Result<()> {
    for (i, slot) in draft.images.iter().enumerate() {
        eprintln!("  {}. {}", i + 1, slot.display_url());
    }
    if let Ok(n) = prompt("Remove image number (empty to skip):")?.parse::<usize>() {
        if n > 0 && draft.remove_image(n - 1).is_none() {
            eprintln!("No image {}", n);
        }
    }
    loop {
        let path = prompt("Add image file (empty to finish):")?;
        if path.is_empty() {
            break;
        }
        match ImageSlot::local(&path) {
            Ok(slot) => {
                eprintln!("  preview: {}", slot.display_url());
                draft.add_image(slot);
            }
            Err(e) => eprintln!("  {}", e),
        }
    }
    Ok(())
}
