use agora_core::event::NaturalKey;
use anyhow::Result;
use chrono::NaiveDate;
use dialoguer::Confirm;
use owo_colors::OwoColorize;

use crate::app::App;
use crate::render::Render;

pub async fn run(app: &App, title: &str, date: NaiveDate, force: bool) -> Result<()> {
    let key = NaturalKey::new(title, date);

    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete {key} everywhere?"))
            .default(false)
            .interact()?;

        if !confirmed {
            return Ok(());
        }
    }

    let mut reconciler = app.reconciler().await?;
    let report = reconciler.delete(&key).await?;

    if report.removed_locally {
        println!("{} {}", "Deleted".red(), key);
    } else {
        println!("{}", format!("{key} was not cached locally").dimmed());
    }
    println!("   {}", report.remote.render());

    Ok(())
}
