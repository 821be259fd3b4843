//! Terminal rendering for agora types.

use agora_core::event::Event;
use agora_core::reconciler::{RemoteWrite, SyncReport};
use chrono::NaiveDate;
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Event {
    fn render(&self) -> String {
        let heart = if self.liked { "♥".red().to_string() } else { "♡".dimmed().to_string() };
        format!(
            "{} {} {} {}",
            heart,
            self.title.bold(),
            self.display_date().dimmed(),
            format!("@ {}", self.location).dimmed()
        )
    }
}

/// Render a list of events, flagging the ones that already happened.
pub fn render_events(events: &[Event], today: NaiveDate, empty: &str) -> String {
    if events.is_empty() {
        return format!("   {}", empty.dimmed());
    }

    events
        .iter()
        .map(|event| {
            if event.is_past(today) {
                format!("   {} {}", event.render(), "(passed)".red())
            } else {
                format!("   {}", event.render())
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl<T> Render for RemoteWrite<T> {
    fn render(&self) -> String {
        match self {
            RemoteWrite::Synced(_) => "synced".green().to_string(),
            RemoteWrite::Failed(e) => format!("not synced: {}", e).yellow().to_string(),
        }
    }
}

impl Render for SyncReport {
    fn render(&self) -> String {
        let mut lines = Vec::new();

        for event in &self.added {
            lines.push(format!("   {} {}", "+".green(), event.render()));
        }

        for invalid in &self.invalid {
            lines.push(format!(
                "   {} {}",
                "!".yellow(),
                format!("skipped document {}: {}", invalid.id, invalid.reason).yellow()
            ));
        }

        for (key, write) in &self.redeleted {
            lines.push(format!("   {} {} ({})", "-".red(), key, write.render()));
        }

        if lines.is_empty() {
            return format!("   {}", "No new events".dimmed());
        }

        lines.join("\n")
    }
}
