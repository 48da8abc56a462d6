use anyhow::{bail, Context};
use chrono::Local;

use bktutor_client::commands::{auth, home::StudentHome};
use bktutor_client::events::Step;
use bktutor_client::{init_tracing, ApiClient, ClientConfig};
use bktutor_shared::constants::APP_NAME;
use bktutor_shared::format::schedule_label;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ClientConfig::from_env();
    let api = ApiClient::new(&config).context("failed to build HTTP client")?;
    tracing::info!(api = %api.base(), "Starting {APP_NAME} client");

    if auth::check_session(&api).await.is_redirect() {
        let (Ok(email), Ok(password)) = (
            std::env::var("BKTUTOR_EMAIL"),
            std::env::var("BKTUTOR_PASSWORD"),
        ) else {
            bail!("not signed in; set BKTUTOR_EMAIL and BKTUTOR_PASSWORD");
        };
        if let Err(notice) = auth::login(&api, &email, &password).await {
            bail!("login failed: {}", notice.text);
        }
    }

    let mut home = StudentHome::new(api, &config);
    if let Step::Navigate(to) = home.init().await {
        bail!("session ended, redirected to {}", to.path());
    }

    let state = home.state();
    if let Some(error) = state.catalog.error() {
        bail!("{error}");
    }

    let today = Local::now().date_naive();
    println!("{}  ({})", state.catalog.count_label(), state.catalog.page_info());
    for session in state.catalog.page_sessions() {
        let mark = if state.registration.is_registered(&session.id) {
            "registered"
        } else {
            ""
        };
        println!(
            "{:<10} {}  tutor {}  on {}  {}",
            session.id.as_str(),
            session.summary(),
            session.tutor_or_tbd(),
            schedule_label(&session.day_of_week, today),
            mark
        );
    }

    let who = home.identity();
    println!("signed in as {} {}", who.display, who.id_label);
    Ok(())
}
