use crate::output::print_json;
use amp_core::review::Review;
use amp_core::types::ReviewCadence;
use std::path::Path;
use std::str::FromStr;

/// Open (or create) today's review entry and print where it lives so the
/// user can edit it in their editor of choice.
pub fn run(root: &Path, user: &str, cadence: &str, json: bool) -> anyhow::Result<()> {
    let cadence = ReviewCadence::from_str(cadence)?;
    let today = chrono::Utc::now().date_naive();
    let (review, created) = Review::open_or_create(root, user, cadence, today)?;
    let path = amp_core::paths::review_path(root, user, cadence, &review.key);

    if json {
        print_json(&serde_json::json!({
            "cadence": review.cadence,
            "key": review.key,
            "created": created,
            "path": path,
        }))?;
    } else {
        let verb = if created { "Created" } else { "Opened" };
        println!("{verb} {cadence} review {}", review.key);
        println!("  {}", path.display());
    }
    Ok(())
}
