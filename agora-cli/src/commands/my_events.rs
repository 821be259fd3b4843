use agora_core::feed::HomeTab;
use anyhow::Result;
use chrono::Local;
use owo_colors::OwoColorize;

use crate::app::App;
use crate::render::render_events;

pub async fn run(app: &App) -> Result<()> {
    let reconciler = app.reconciler().await?;

    let today = Local::now().date_naive();
    println!("{}", "My events".bold());
    println!(
        "{}",
        render_events(reconciler.view(HomeTab::MyEvents), today, "No liked events yet")
    );

    Ok(())
}
