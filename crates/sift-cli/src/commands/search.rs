//! One-shot search command

use std::time::Duration;

use clap::Args;

use crate::output::render_state;
use crate::AppContext;

#[derive(Args)]
pub struct SearchArgs {
    /// Search query
    pub query: String,

    /// Number of pages to load
    #[arg(short, long, default_value = "1")]
    pub pages: u32,

    /// Load every page
    #[arg(long)]
    pub all: bool,
}

pub async fn run(args: &SearchArgs, ctx: &AppContext) -> anyhow::Result<()> {
    if args.query.trim().is_empty() {
        anyhow::bail!("Please provide a search query");
    }

    let controller = ctx.controller()?;

    controller.search_with_delay(&args.query, Duration::ZERO);
    let mut state = controller.settled().await;
    let mut pages = 1;

    while state.error.is_none() && state.has_more() && (args.all || pages < args.pages) {
        controller.load_more();
        state = controller.settled().await;
        pages += 1;
    }

    tracing::info!(
        "Search for '{}' loaded {} of {} results",
        args.query,
        state.results.len(),
        state.total
    );

    println!("{}", render_state(&state, ctx.format));

    if let Some(error) = state.error {
        anyhow::bail!("Search for '{}' failed: {}", args.query, error);
    }

    Ok(())
}
