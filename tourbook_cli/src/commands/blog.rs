//! The `blog` subcommand: read one post and manage vendor posts.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Subcommand};
use tourbook_lib::draft::{submit_blog, BlogDraft, SubmitMode};
use tourbook_lib::render::BlogCard;
use tourbook_lib::types::BlogID;
use tourbook_lib::validation;

use super::{confirm, spinner, Context};
use crate::output::{print_blogs, print_json, OutputFormat};

#[derive(Args)]
pub struct BlogArgs {
    #[command(subcommand)]
    pub action: BlogAction,
}

#[derive(Subcommand)]
pub enum BlogAction {
    /// Show one post with its full text
    Show {
        id: BlogID,
    },
    /// Write a draft file, optionally seeded from an existing post
    Draft {
        /// Draft file (.json or .toml)
        file: PathBuf,
        #[arg(long)]
        from: Option<BlogID>,
    },
    /// Publish a post from a draft file
    Create {
        file: PathBuf,
    },
    /// Update a post from a draft file
    Update {
        id: BlogID,
        file: PathBuf,
    },
    /// Delete a post
    Delete {
        id: BlogID,
        #[arg(long)]
        yes: bool,
    },
}

pub async fn run(args: &BlogArgs, ctx: &Context) -> Result<()> {
    match &args.action {
        BlogAction::Show { id } => show(*id, ctx).await,
        BlogAction::Draft { file, from } => draft(file, *from, ctx).await,
        BlogAction::Create { file } => submit(file, SubmitMode::Create, ctx).await,
        BlogAction::Update { id, file } => {
            submit(file, SubmitMode::Update(validation::validate_id(*id)?), ctx).await
        }
        BlogAction::Delete { id, yes } => delete(*id, *yes, ctx).await,
    }
}

async fn show(id: BlogID, ctx: &Context) -> Result<()> {
    let id = validation::validate_id(id)?;
    let pb = spinner("Loading post...");
    let blog = ctx.client.get_blog(id).await;
    pb.finish_and_clear();
    let blog = blog?.data;

    if ctx.format == OutputFormat::Json {
        print_json(&blog);
        return Ok(());
    }
    print_blogs(&[BlogCard::from_blog(&blog, ctx.locale)], ctx.format)?;
    if let Some(content) = blog.content.as_ref().and_then(|c| c.get(ctx.locale)) {
        println!("\n{}", content.trim());
    }
    Ok(())
}

async fn draft(file: &Path, from: Option<BlogID>, ctx: &Context) -> Result<()> {
    let draft = match from {
        Some(id) => {
            let id = validation::validate_id(id)?;
            let pb = spinner("Loading post...");
            let blog = ctx.client.get_blog(id).await;
            pb.finish_and_clear();
            BlogDraft::from_blog(&blog?.data)
        }
        None => BlogDraft::default(),
    };
    draft.save(file)?;
    eprintln!("Draft saved to {}", file.display());
    Ok(())
}

async fn submit(file: &Path, mode: SubmitMode, ctx: &Context) -> Result<()> {
    ctx.require_login()?;
    let mut draft = BlogDraft::load(file)?;
    let pending = draft.images.iter().filter(|s| s.is_local()).count();
    let pb = spinner("Saving post...");
    let result = submit_blog(&ctx.client, &mut draft, mode).await;
    pb.finish_and_clear();

    if pending > 0 {
        draft.save(file)?;
    }
    let blog = result?;
    eprintln!("Saved post {}", blog.id);
    print_blogs(&[BlogCard::from_blog(&blog, ctx.locale)], ctx.format)
}

async fn delete(id: BlogID, yes: bool, ctx: &Context) -> Result<()> {
    ctx.require_login()?;
    let id = validation::validate_id(id)?;
    if !yes && !confirm(&format!("Delete post {}?", id))? {
        eprintln!("Aborted.");
        return Ok(());
    }
    let resp = ctx.client.delete_blog(id).await?;
    eprintln!(
        "{}",
        resp.message.unwrap_or_else(|| format!("Deleted post {}", id))
    );
    Ok(())
}
