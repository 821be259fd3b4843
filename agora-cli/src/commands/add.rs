use agora_core::event::EventDraft;
use anyhow::Result;
use owo_colors::OwoColorize;

use crate::app::App;
use crate::render::Render;

pub async fn run(app: &App, title: &str, location: &str, date: &str) -> Result<()> {
    let event = EventDraft::parse(title, location, date)?;
    let mut reconciler = app.reconciler().await?;

    let report = reconciler.add_event(event).await?;

    println!("{} {}", "Added".green(), report.event.render());
    println!("   {}", report.remote.render());

    Ok(())
}
