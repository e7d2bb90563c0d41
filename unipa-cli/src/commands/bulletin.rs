//! Bulletin commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::config::build_authed_client;
use crate::handlers::bulletin::{print_detail, CategoryInfo};
use crate::output::{print_table, OutputFormat};

#[derive(Subcommand)]
pub enum BulletinAction {
    /// List bulletin categories
    #[command(alias = "ls")]
    List {
        /// Expand each category through its "show more" view
        #[arg(short, long)]
        all: bool,
    },

    /// Show one bulletin's detail
    Show {
        /// Category index on the summary page
        category: usize,
        /// Item index within the category
        item: usize,
    },

    /// Download attachments of one bulletin
    #[command(alias = "dl")]
    Download {
        /// Category index on the summary page
        category: usize,
        /// Item index within the category
        item: usize,
        /// Attachment index; all attachments when omitted
        #[arg(short, long)]
        file: Option<usize>,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}

pub async fn handle(action: BulletinAction, format: OutputFormat, verbose: bool) -> Result<()> {
    match action {
        BulletinAction::List { all } => list(all, format, verbose).await,
        BulletinAction::Show { category, item } => show(category, item).await,
        BulletinAction::Download {
            category,
            item,
            file,
            output,
        } => download(category, item, file, output).await,
    }
}

async fn list(all: bool, format: OutputFormat, verbose: bool) -> Result<()> {
    let client = build_authed_client()?;
    let categories = client.bulletins().list(all).await?;

    let infos: Vec<CategoryInfo> = categories
        .iter()
        .enumerate()
        .map(|(i, c)| CategoryInfo::from_category(i, c))
        .collect();

    match format {
        OutputFormat::Plain => {
            for info in &infos {
                info.plain_print_with_items();
            }
        }
        OutputFormat::Table if verbose => {
            for info in infos {
                println!("\n{}", info.title);
                print_table(info.items.clone(), format);
            }
        }
        _ => print_table(infos, format),
    }
    Ok(())
}

async fn show(category: usize, item: usize) -> Result<()> {
    let client = build_authed_client()?;
    let detail = client.bulletins().detail(category, item).await?;
    print_detail(&detail);
    Ok(())
}

async fn download(
    category: usize,
    item: usize,
    file: Option<usize>,
    output: PathBuf,
) -> Result<()> {
    let client = build_authed_client()?;
    let detail = client.bulletins().detail(category, item).await?;

    if detail.attachments.is_empty() {
        println!("No attachments");
        return Ok(());
    }

    let selected: Vec<_> = match file {
        Some(index) => {
            let att = detail
                .attachments
                .get(index)
                .with_context(|| format!("no attachment at index {index}"))?;
            vec![att]
        }
        None => detail.attachments.iter().collect(),
    };

    std::fs::create_dir_all(&output)
        .with_context(|| format!("could not create {}", output.display()))?;

    for att in selected {
        let downloaded = client.bulletins().download(att, None).await?;
        let target = output.join(&att.name);
        std::fs::write(&target, &downloaded.bytes)
            .with_context(|| format!("could not write {}", target.display()))?;
        println!("{} ({} bytes)", target.display(), downloaded.bytes.len());
    }
    Ok(())
}
