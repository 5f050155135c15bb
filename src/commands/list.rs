//! List the posts of the generated home page

use anyhow::Result;

use crate::generator::{Generator, SavedState};
use crate::Site;

/// Print the posts loaded so far
pub fn run(site: &Site) -> Result<()> {
    let generator = Generator::new(site)?;
    let saved = generator.load_state()?;
    print!("{}", format_listing(&saved));
    Ok(())
}

fn format_listing(saved: &SavedState) -> String {
    let state = &saved.state;
    let mut out = format!("Posts ({}, page {}):\n", state.posts.len(), state.page);
    for post in &state.posts {
        out.push_str(&format!(
            "  {} - {} [{}]\n",
            post.display_date.as_deref().unwrap_or("----------"),
            post.title,
            post.uid
        ));
    }
    match (&saved.failure, &state.next_page) {
        (Some(failure), _) => out.push_str(&format!("Halted: {}\n", failure)),
        (None, Some(cursor)) => out.push_str(&format!("Next page: {}\n", cursor)),
        (None, None) => out.push_str("No more pages\n"),
    }
    out
}
