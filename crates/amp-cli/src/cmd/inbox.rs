use crate::output::{print_json, print_table};
use amp_core::inbox::InboxItem;
use amp_core::types::InboxStatus;
use std::path::Path;

/// List open inbox items, oldest first.
pub fn run(root: &Path, user: &str, json: bool) -> anyhow::Result<()> {
    let items: Vec<InboxItem> = InboxItem::list(root, user)?
        .into_iter()
        .filter(|i| i.status == InboxStatus::Open)
        .collect();

    if json {
        let list: Vec<serde_json::Value> = items
            .iter()
            .map(|i| {
                serde_json::json!({
                    "id": i.id,
                    "title": i.title,
                    "captured_at": i.captured_at,
                })
            })
            .collect();
        return print_json(&list);
    }

    if items.is_empty() {
        println!("Inbox zero. Nothing to triage.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|i| {
            vec![
                i.id.clone(),
                i.captured_at.format("%Y-%m-%d %H:%M").to_string(),
                i.title.clone(),
            ]
        })
        .collect();
    print_table(&["ID", "CAPTURED", "TITLE"], rows);
    Ok(())
}
