//! Bulk registration of application commands.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

use integral_commands::CommandSchema;

use crate::config::BotConfig;
use crate::error::{BotError, BotResult};

/// Client for the application command endpoints.
pub struct RegistrationClient {
    client: reqwest::Client,
    api_base: String,
    token: SecretString,
    application_id: String,
}

impl std::fmt::Debug for RegistrationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationClient")
            .field("api_base", &self.api_base)
            .field("token", &"[REDACTED]")
            .field("application_id", &self.application_id)
            .finish()
    }
}

impl RegistrationClient {
    /// Create a client from the bot configuration.
    pub fn new(config: &BotConfig) -> BotResult<Self> {
        let (token, application_id) = config.credentials()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| BotError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token: token.clone(),
            application_id: application_id.to_string(),
        })
    }

    /// Endpoint for global commands, or for one guild's commands.
    pub fn commands_url(&self, guild_id: Option<&str>) -> String {
        match guild_id {
            Some(guild) => format!(
                "{}/applications/{}/guilds/{}/commands",
                self.api_base, self.application_id, guild
            ),
            None => format!(
                "{}/applications/{}/commands",
                self.api_base, self.application_id
            ),
        }
    }

    /// Overwrite the registered commands with `schemas`.
    ///
    /// Returns the number of commands the platform reports as registered.
    pub async fn register(
        &self,
        guild_id: Option<&str>,
        schemas: &[CommandSchema],
    ) -> BotResult<usize> {
        let url = self.commands_url(guild_id);
        info!("Started refreshing {} application commands", schemas.len());
        debug!("PUT {}", url);

        let response = self
            .client
            .put(&url)
            .header(
                "Authorization",
                format!("Bot {}", self.token.expose_secret()),
            )
            .json(schemas)
            .send()
            .await?;

        let status = response.status();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<f64>().ok())
                .map(|secs| secs.ceil() as u64)
                .unwrap_or(5);
            return Err(BotError::RateLimited {
                retry_after_secs: retry_after,
            });
        }
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::Auth(format!("{}: {}", status, body)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::Api(format!("{}: {}", status, body)));
        }

        let registered: Vec<serde_json::Value> = response.json().await?;
        info!("Successfully reloaded {} application commands", registered.len());
        Ok(registered.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(server: &MockServer) -> BotConfig {
        let mut config = BotConfig::default().with_token("test-token");
        config.client_id = Some("42".to_string());
        config.api_base = format!("{}/", server.uri());
        config
    }

    fn schemas() -> Vec<CommandSchema> {
        vec![
            CommandSchema::new("help", "Displays the list of available commands."),
            CommandSchema::new("chart", "Prints a chart of intertype relationships."),
        ]
    }

    #[test]
    fn test_requires_credentials() {
        assert!(matches!(
            RegistrationClient::new(&BotConfig::default()),
            Err(BotError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_register_global_commands() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/applications/42/commands"))
            .and(header("Authorization", "Bot test-token"))
            .and(body_json(serde_json::json!([
                {"name": "help", "description": "Displays the list of available commands."},
                {"name": "chart", "description": "Prints a chart of intertype relationships."}
            ])))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": "1", "name": "help"},
                {"id": "2", "name": "chart"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = RegistrationClient::new(&config(&server)).unwrap();
        assert_eq!(client.register(None, &schemas()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_register_guild_commands() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/applications/42/guilds/7/commands"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{}])))
            .expect(1)
            .mount(&server)
            .await;

        let client = RegistrationClient::new(&config(&server)).unwrap();
        assert_eq!(client.register(Some("7"), &schemas()[..1]).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_register_error_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/applications/42/guilds/401/commands"))
            .respond_with(ResponseTemplate::new(401).set_body_string("401: Unauthorized"))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/applications/42/guilds/429/commands"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "1.5"))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/applications/42/commands"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid form body"))
            .mount(&server)
            .await;

        let client = RegistrationClient::new(&config(&server)).unwrap();
        assert!(matches!(
            client.register(Some("401"), &schemas()).await,
            Err(BotError::Auth(_))
        ));
        assert!(matches!(
            client.register(Some("429"), &schemas()).await,
            Err(BotError::RateLimited { retry_after_secs: 2 })
        ));
        assert!(matches!(
            client.register(None, &schemas()).await,
            Err(BotError::Api(msg)) if msg.contains("invalid form body")
        ));
    }
}
