//! Output formatting utilities

use serde::Serialize;
use sift_core::{Article, SearchState};

/// Longest summary shown on a text card
const SUMMARY_WIDTH: usize = 120;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StateView<'a> {
    #[serde(flatten)]
    state: &'a SearchState,
    has_more: bool,
}

/// Render a state snapshot in the requested format
pub fn render_state(state: &SearchState, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => {
            let view = StateView {
                state,
                has_more: state.has_more(),
            };
            serde_json::to_string_pretty(&view).unwrap_or_else(|_| "{}".to_string())
        }
        OutputFormat::Text => render_text(state),
    }
}

fn render_text(state: &SearchState) -> String {
    if !state.has_content() {
        return "Start searching\n  Type a query to find articles, guides, and resources".to_string();
    }

    if state.is_empty_result() {
        return format!(
            "No results found\n  No articles match \"{}\". Try different keywords or check your spelling.",
            state.query
        );
    }

    let mut lines = Vec::new();

    if (!state.results.is_empty() || !state.loading.is_idle()) && !state.query.is_empty() {
        let heading = if state.total > 0 {
            let plural = if state.total == 1 { "" } else { "s" };
            format!("{} result{}", format_count(state.total), plural)
        } else {
            "Results".to_string()
        };
        lines.push(format!("{} for \"{}\"", heading, state.query));
    }

    if let Some(ref error) = state.error {
        lines.push(format!("Something went wrong: {}", error));
        lines.push("  Type :retry to try again".to_string());
    }

    for (index, article) in state.results.iter().enumerate() {
        lines.push(render_card(index, article));
    }

    if state.is_initial_load() {
        lines.push("Searching...".to_string());
    }

    let info = state.page_info();
    if (info.has_more || state.is_loading_more()) && info.loaded > 0 && state.error.is_none() {
        if state.is_loading_more() {
            lines.push("Loading more...".to_string());
        } else {
            lines.push(format!(
                "Showing {} of {} articles, page {} of {} (:more to load more)",
                info.loaded,
                format_count(info.total),
                info.page,
                info.total_pages
            ));
        }
    }

    if state.is_end_of_results() {
        lines.push(format!("All {} articles loaded", format_count(info.total)));
    }

    lines.join("\n")
}

fn render_card(index: usize, article: &Article) -> String {
    format!(
        "{:>3}. #{} {}\n     {}",
        index + 1,
        article.id,
        article.title,
        truncate(&article.summary, SUMMARY_WIDTH)
    )
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let cut: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", cut.trim_end())
}

/// `1234567` -> `1,234,567`
fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
