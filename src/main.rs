use std::net::TcpListener;

use anyhow::Context;

use contact_desk::app::{self, LandingPage};
use contact_desk::notifier::Notifier;
use contact_desk::repo::ContactStore;
use contact_desk::settings::Settings;
use contact_desk::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = telemetry::create_subscriber("info", std::io::stdout);
    telemetry::set_subscriber(subscriber)?;

    let settings = Settings::load().context("Failed to load settings")?;

    // Schema creation failures abort startup
    let store = ContactStore::connect(&settings.database).await?;

    let notifier = Notifier::new(settings.email.client()?, settings.email.notifier_config());
    let config = notifier.validate_configuration();
    if !config.is_valid {
        tracing::warn!(
            missing = ?config.missing,
            "Email configuration incomplete, notifications will fail"
        );
    }

    let listener = TcpListener::bind(settings.app.addr()).context("Failed to bind listener")?;
    tracing::info!("Server running on http://{}", listener.local_addr()?);

    let landing = LandingPage(settings.app.landing_page().to_path_buf());
    let server = app::run(listener, store.clone(), notifier, landing)?;
    let handle = server.handle();
    let mut server = tokio::spawn(server);

    tokio::select! {
        res = &mut server => {
            res.context("Server task panicked")?.context("Server failed")?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for shutdown signal")?;
            tracing::info!("Shutdown signal received");

            // Finish in-flight requests before releasing the database
            handle.stop(true).await;
            server
                .await
                .context("Server task panicked")?
                .context("Server failed")?;
        }
    }

    store.close().await;
    tracing::info!("Server shutdown gracefully");

    Ok(())
}
