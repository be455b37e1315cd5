use dotenvy::dotenv;
use serenity::all::GatewayIntents;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use nodestat::commands::{stats, Data};
use nodestat::config::Config;
use nodestat::error::BotError;
use nodestat::handlers::on_error;
use nodestat::services::{IpInfoClient, StatsReporter, SysinfoProvider};

#[tokio::main]
async fn main() -> Result<(), BotError> {
    dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting node stats bot...");

    let config = Config::from_env()?;

    info!(
        node = %config.node.name,
        command = %config.node.command,
        "Configuration loaded"
    );

    if config.geolocation.timeout_secs.is_none() {
        info!("Geolocation lookup has no timeout configured");
    }

    let reporter = Arc::new(StatsReporter::new(
        SysinfoProvider::new(),
        IpInfoClient::new(&config.geolocation),
        config.node.clone(),
        config.embed.clone(),
    ));

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![stats::command(&config.node)],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            let reporter = reporter.clone();

            Box::pin(async move {
                info!(user = %ready.user.name, "Logged in");

                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Slash commands registered globally");

                Ok(Data { reporter })
            })
        })
        .build();

    let mut client = serenity::Client::builder(&config.token, GatewayIntents::non_privileged())
        .framework(framework)
        .await
        .map_err(|e| BotError::Client(format!("Failed to create client: {}", e)))?;

    if let Err(e) = client.start().await {
        error!(error = %e, "Client stopped");
        return Err(BotError::Client(format!("Failed to initialize client: {}", e)));
    }

    Ok(())
}
