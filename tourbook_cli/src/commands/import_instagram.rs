//! The `import-instagram` subcommand: seeds a tour draft from an Instagram post.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tourbook_lib::instagram::import_tour;

use super::{spinner, Context};

#[derive(Args)]
pub struct ImportInstagramArgs {
    /// Post, reel or IGTV link
    pub url: String,

    /// Where to write the draft (.json or .toml)
    #[arg(long, default_value = "tour-draft.json")]
    pub out: PathBuf,
}

pub async fn run(args: &ImportInstagramArgs, ctx: &Context) -> Result<()> {
    ctx.require_login()?;
    let pb = spinner("Reading post...");
    let draft = import_tour(&ctx.client, &args.url).await;
    pb.finish_and_clear();
    let draft = draft?;

    draft.save(&args.out)?;
    let title = draft.title.get(ctx.locale);
    eprintln!(
        "Imported {:?}: {} image(s), {} inclusion(s)",
        if title.is_empty() { "untitled" } else { title },
        draft.images.len(),
        draft.inclusions.len()
    );
    let missing = draft.title.missing();
    if !missing.is_empty() {
        let names: Vec<String> = missing.iter().map(|l| l.to_string()).collect();
        eprintln!("Title still needed for: {}", names.join(", "));
    }
    eprintln!(
        "Draft saved to {}; review it, then run `tourbook tour create {}`",
        args.out.display(),
        args.out.display()
    );
    Ok(())
}
