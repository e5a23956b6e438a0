use crate::output::print_json;
use amp_core::inbox::TriageTarget;
use amp_core::types::Priority;
use std::path::Path;
use std::str::FromStr;

#[allow(clippy::too_many_arguments)]
pub fn run(
    root: &Path,
    user: &str,
    id: &str,
    area: &str,
    project: &str,
    title: Option<&str>,
    priority: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let priority = priority.map(Priority::from_str).transpose()?;
    let action = amp_core::inbox::triage(
        root,
        user,
        id,
        TriageTarget {
            area,
            project,
            title: title.map(str::to_string),
            priority,
        },
    )?;

    if json {
        print_json(&serde_json::json!({
            "id": action.id,
            "title": action.title,
            "status": action.status,
            "priority": action.priority,
            "area": area,
            "project": project,
        }))?;
    } else {
        println!(
            "Triaged into {area}/{project}: {} ({})",
            action.title, action.id
        );
    }
    Ok(())
}
