use agora_core::auth::{AuthMethod, AuthOutcome, AuthRequest, Credentials, IdentityProvider};
use agora_core::session::Session;
use anyhow::Result;
use owo_colors::OwoColorize;

use crate::app::App;
use crate::utils::tui;

pub async fn run(app: &App, email: Option<String>, google: bool, facebook: bool) -> Result<()> {
    let request = match email {
        Some(email) => {
            let password = rpassword::prompt_password("Password: ")?;
            AuthRequest::EmailPassword(Credentials::for_login(&email, &password)?)
        }
        None if google => AuthRequest::Social(AuthMethod::Google),
        None if facebook => AuthRequest::Social(AuthMethod::Facebook),
        None => AuthRequest::Anonymous,
    };

    let method = request.method();
    let provider = app.identity();

    let spinner = tui::create_spinner(format!("Signing in with {method}"));
    let outcome = provider.sign_in(request).await;
    spinner.finish_and_clear();

    match outcome {
        AuthOutcome::SignedIn(account) => {
            Session::new(account.clone(), method).save(&app.session_path)?;
            println!("{} {}", "Signed in as".green(), account);
        }
        AuthOutcome::Cancelled => println!("{}", "Sign-in cancelled".dimmed()),
        AuthOutcome::Failed(message) => anyhow::bail!("Login failed: {message}"),
    }

    Ok(())
}
