use anyhow::Result;
use owo_colors::OwoColorize;

use crate::app::App;
use crate::render::Render;
use crate::utils::tui;

pub async fn run(app: &App) -> Result<()> {
    if app.offline {
        anyhow::bail!("Cannot sync while offline");
    }

    let mut reconciler = app.reconciler().await?;

    let spinner = tui::create_spinner("Syncing".to_string());
    let result = reconciler.sync().await;
    spinner.finish_and_clear();

    let report = result?;
    println!("{}", report.render());
    println!(
        "\n{}",
        format!(
            "Fetched {}: {} new, {} already cached, {} skipped",
            report.fetched,
            report.added.len(),
            report.duplicates,
            report.invalid.len()
        )
        .dimmed()
    );

    Ok(())
}
