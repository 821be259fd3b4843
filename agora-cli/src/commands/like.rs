use agora_core::event::NaturalKey;
use anyhow::Result;
use chrono::NaiveDate;

use crate::app::App;
use crate::render::Render;

pub async fn run(app: &App, title: &str, date: NaiveDate, liked: bool) -> Result<()> {
    let mut reconciler = app.reconciler().await?;
    let key = NaturalKey::new(title, date);

    let event = reconciler.set_liked(&key, liked).await?;
    println!("{}", event.render());

    Ok(())
}
