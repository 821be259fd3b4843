use agora_core::auth::{AuthMethod, AuthOutcome, Credentials, IdentityProvider};
use agora_core::session::Session;
use anyhow::Result;
use owo_colors::OwoColorize;

use crate::app::App;

pub async fn run(app: &App, email: &str) -> Result<()> {
    let password = rpassword::prompt_password("Password: ")?;
    let confirm = rpassword::prompt_password("Confirm password: ")?;
    let credentials = Credentials::for_registration(email, &password, &confirm)?;

    match app.identity().register(credentials).await {
        AuthOutcome::SignedIn(account) => {
            Session::new(account.clone(), AuthMethod::EmailPassword).save(&app.session_path)?;
            println!("{} {}", "Registered as".green(), account);
        }
        AuthOutcome::Cancelled => println!("{}", "Registration cancelled".dimmed()),
        AuthOutcome::Failed(message) => anyhow::bail!("Registration failed: {message}"),
    }

    Ok(())
}
