use crate::types::Repository;
use crate::ui_state::UiState;
use colored::*;

const PREVIEW_LIMIT: usize = 5;

/// Text rendering of a state for the terminal.
pub fn render(state: &UiState) -> String {
    match state {
        UiState::Idle => "Pick a strategy to start a request".dimmed().to_string(),
        UiState::Loading => "⏳ Loading...".yellow().to_string(),
        UiState::Success {
            items,
            method_label,
        } => render_success(items, method_label),
        UiState::Error { message } => message.red().to_string(),
    }
}

fn render_success(items: &[Repository], method_label: &str) -> String {
    let mut out = format!("{}\n", format!("✅ {} succeeded!", method_label).bold().green());
    out.push_str(&format!("Found {} repositories\n", items.len()));

    for repo in items.iter().take(PREVIEW_LIMIT) {
        out.push_str(&format!("{}\n", "-".repeat(40).dimmed()));
        out.push_str(&render_repository(repo));
    }

    if items.len() > PREVIEW_LIMIT {
        out.push_str(&format!("\n... and {} more\n", items.len() - PREVIEW_LIMIT));
    }
    out
}

fn render_repository(repo: &Repository) -> String {
    let mut out = format!("📦 {}\n", repo.name.bold());
    out.push_str(&format!("   owner: {}\n", repo.owner.login));
    out.push_str(&format!("   ⭐ {} stars\n", repo.star_count));
    if let Some(language) = &repo.language {
        out.push_str(&format!("   💻 {}\n", language));
    }
    if let Some(description) = &repo.description {
        out.push_str(&format!("   📝 {}\n", description.dimmed()));
    }
    out.push_str(&format!("   🔗 {}\n", repo.html_url.blue()));
    out
}
