use anyhow::Result;
use chrono::Local;
use owo_colors::OwoColorize;

use crate::app::App;
use crate::render::{Render, render_events};
use crate::utils::tui;

pub async fn run(app: &App) -> Result<()> {
    let mut reconciler = app.reconciler().await?;

    if !app.offline {
        let spinner = tui::create_spinner("Fetching events".to_string());
        let result = reconciler.sync().await;
        spinner.finish_and_clear();

        match result {
            Ok(report) if !report.is_empty() => {
                println!("{}", report.render());
                println!();
            }
            Ok(_) => {}
            // Cached events are still worth showing.
            Err(e) => println!("{}\n", format!("Could not reach remote store: {e}").yellow()),
        }
    }

    let today = Local::now().date_naive();
    println!("{}", "Discover".bold());
    println!(
        "{}",
        render_events(reconciler.all_events(), today, "No events yet")
    );

    Ok(())
}
