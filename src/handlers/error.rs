use crate::commands::Data;
use crate::utils::embed;
use tracing::error;

type Error = Box<dyn std::error::Error + Send + Sync>;

/// Handle framework errors
pub async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(command = %ctx.command().name, error = ?error, "Command failed");
            let embed = embed::error("Command Failed", &error.to_string());
            let _ = ctx.send(poise::CreateReply::default().embed(embed)).await;
        }
        poise::FrameworkError::CommandPanic { payload, ctx, .. } => {
            error!(command = %ctx.command().name, payload = ?payload, "Command panicked");
            let embed = embed::error(
                "Internal Error",
                "An unexpected error occurred. Please try again later.",
            );
            let _ = ctx.send(poise::CreateReply::default().embed(embed)).await;
        }
        error => {
            error!("Other error: {}", error);
        }
    }
}
