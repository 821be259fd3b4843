use agora_core::auth::IdentityProvider;
use agora_core::session::Session;
use anyhow::Result;
use owo_colors::OwoColorize;

use crate::app::App;

pub async fn run(app: &App) -> Result<()> {
    if !app.offline {
        // The local session is cleared even if the provider can't be reached.
        if let Err(e) = app.identity().sign_out().await {
            tracing::warn!(error = %e, "provider sign-out failed");
        }
    }

    if Session::clear(&app.session_path)? {
        println!("{}", "Signed out".green());
    } else {
        println!("{}", "Not signed in".dimmed());
    }

    Ok(())
}
