use async_trait::async_trait;
use tracing::info;

use crate::config::NodeConfig;
use crate::error::BotError;
use crate::services::stats::{Reply, Replyable};

type Error = Box<dyn std::error::Error + Send + Sync>;
type Context<'a> = poise::Context<'a, super::Data, Error>;

/// Node statistics
#[poise::command(slash_command)]
pub async fn stats(ctx: Context<'_>) -> Result<(), Error> {
    info!(user = %ctx.author().name, "Stats requested");

    ctx.data().reporter.respond(&ctx).await?;
    Ok(())
}

/// The stats command under the name and description configured for this node.
pub fn command(node: &NodeConfig) -> poise::Command<super::Data, Error> {
    let mut cmd = stats();
    cmd.name = node.command.clone();
    cmd.qualified_name = node.command.clone();
    cmd.description = Some(format!("Node statistics for {}", node.name));
    cmd
}

#[async_trait]
impl<'a> Replyable for Context<'a> {
    async fn defer(&self) -> crate::error::Result<()> {
        poise::Context::defer(*self).await.map_err(BotError::Discord)
    }

    async fn reply(&self, reply: Reply) -> crate::error::Result<()> {
        let reply = match reply {
            Reply::Embed(embed) => poise::CreateReply::default().embed(embed),
            Reply::Text(text) => poise::CreateReply::default().content(text),
        };

        self.send(reply).await.map_err(BotError::Discord)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_uses_node_config() {
        let node = NodeConfig {
            command: "fsn1".to_string(),
            name: "Falkenstein".to_string(),
            hostname: "fsn1.example.net".to_string(),
        };

        let cmd = command(&node);
        assert_eq!(cmd.name, "fsn1");
        assert_eq!(cmd.qualified_name, "fsn1");
        assert_eq!(cmd.description.as_deref(), Some("Node statistics for Falkenstein"));
        assert!(cmd.slash_action.is_some());
        assert!(cmd.parameters.is_empty());
    }
}
