use anyhow::Context;
use std::path::Path;

pub fn run(root: &Path, user: &str) -> anyhow::Result<()> {
    amp_core::user::init(root, user).with_context(|| format!("failed to init user '{user}'"))?;
    println!("Initialized user '{user}' in: {}", root.display());
    println!("  created: users/{user}/settings.toml");
    println!("  created: users/{user}/inbox/");
    println!("  created: users/{user}/areas/");
    println!("  created: users/{user}/reviews/");
    Ok(())
}
