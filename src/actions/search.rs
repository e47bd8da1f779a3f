use regex::RegexBuilder;

use crate::app::{AppMode, AppState};
use crate::model::GroupingId;
use crate::tree::{is_suppressed, GlTree};

/// Groupings whose name matches `query`, depth-first.
///
/// The query is a case-insensitive regex; anything that does not compile is
/// matched literally.
pub fn find_matches(tree: &GlTree, query: &str) -> Vec<GroupingId> {
    let regex = RegexBuilder::new(query)
        .case_insensitive(true)
        .build()
        .or_else(|_| {
            RegexBuilder::new(&regex::escape(query))
                .case_insensitive(true)
                .build()
        });
    let Ok(regex) = regex else {
        return Vec::new();
    };
    tree.iter()
        .filter(|node| !is_suppressed(node, node.depth))
        .filter(|node| regex.is_match(&node.name))
        .map(|node| node.id.clone())
        .collect()
}

pub fn start_search(app: &mut AppState) {
    app.mode = AppMode::Search {
        query: String::new(),
    };
}

pub fn search_char(app: &mut AppState, c: char) {
    if let AppMode::Search { query } = &mut app.mode {
        query.push(c);
    }
}

pub fn search_backspace(app: &mut AppState) {
    if let AppMode::Search { query } = &mut app.mode {
        query.pop();
    }
}

pub fn confirm_search(app: &mut AppState) {
    let query = if let AppMode::Search { query } = &app.mode {
        query.clone()
    } else {
        return;
    };
    app.mode = AppMode::Normal;

    if query.is_empty() {
        return;
    }
    app.search_results = find_matches(&app.tree, &query);
    app.search_index = 0;

    match app.search_results.first().cloned() {
        Some(first) => {
            app.reveal(&first);
            app.set_message(format!("Found {} matches", app.search_results.len()));
        }
        None => app.set_message(format!("No match for '{}'", query)),
    }
}

pub fn cancel_search(app: &mut AppState) {
    app.mode = AppMode::Normal;
}

pub fn next_search_result(app: &mut AppState) {
    if app.search_results.is_empty() {
        return;
    }
    app.search_index = (app.search_index + 1) % app.search_results.len();
    let id = app.search_results[app.search_index].clone();
    app.reveal(&id);
    app.set_message(format!(
        "Match {} of {}",
        app.search_index + 1,
        app.search_results.len()
    ));
}
