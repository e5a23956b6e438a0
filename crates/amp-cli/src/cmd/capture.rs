use crate::output::print_json;
use amp_core::inbox::InboxItem;
use anyhow::bail;
use std::path::Path;

pub fn run(root: &Path, user: &str, title: &str, body: Option<&str>, json: bool) -> anyhow::Result<()> {
    let title = title.trim();
    if title.is_empty() {
        bail!("title must not be empty");
    }
    let item = InboxItem::capture(root, user, title, body.unwrap_or_default())?;

    if json {
        print_json(&serde_json::json!({
            "id": item.id,
            "title": item.title,
            "captured_at": item.captured_at,
        }))?;
    } else {
        println!("Captured: {} ({})", item.title, item.id);
    }
    Ok(())
}
