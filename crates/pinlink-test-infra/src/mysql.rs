use crate::{Result, TestInfraError};
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::time::Duration;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::ImageExt;
use testcontainers::{ContainerAsync, GenericImage};
use typed_builder::TypedBuilder;

const MYSQL_PORT: u16 = 3306;
const CONNECT_ATTEMPTS: usize = 20;
const CONNECT_BACKOFF: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, TypedBuilder)]
pub struct MysqlConfig {
    #[builder(default = "8.4".to_string(), setter(into))]
    tag: String,
    #[builder(default = "pinlink".to_string(), setter(into))]
    database: String,
    #[builder(default = "pinlink".to_string(), setter(into))]
    username: String,
    #[builder(default = "pinlink".to_string(), setter(into))]
    password: String,
}

/// Disposable MySQL server holding an empty `pinlink` database.
pub struct MySqlServer {
    container: ContainerAsync<GenericImage>,
    config: MysqlConfig,
}

impl MySqlServer {
    /// Starts a server with the default configuration.
    pub async fn start() -> Result<Self> {
        Self::with_config(MysqlConfig::builder().build()).await
    }

    pub async fn with_config(config: MysqlConfig) -> Result<Self> {
        let container = GenericImage::new("mysql", config.tag.as_str())
            .with_exposed_port(MYSQL_PORT.tcp())
            .with_wait_for(WaitFor::message_on_stderr("ready for connections"))
            .with_env_var("MYSQL_DATABASE", config.database.as_str())
            .with_env_var("MYSQL_USER", config.username.as_str())
            .with_env_var("MYSQL_PASSWORD", config.password.as_str())
            .with_env_var("MYSQL_RANDOM_ROOT_PASSWORD", "yes")
            .start()
            .await?;

        Ok(Self { container, config })
    }

    pub async fn database_url(&self) -> Result<String> {
        let host = match self.container.get_host().await?.to_string().as_str() {
            "localhost" => String::from("127.0.0.1"),
            other => other.to_string(),
        };
        let port = self.container.get_host_port_ipv4(MYSQL_PORT).await?;
        let MysqlConfig {
            username,
            password,
            database,
            ..
        } = &self.config;
        Ok(format!("mysql://{username}:{password}@{host}:{port}/{database}"))
    }

    /// Opens a connection pool to the test database.
    ///
    /// The entrypoint logs "ready for connections" once for its temporary
    /// init server and again for the real one, so the first attempts may
    /// be refused.
    pub async fn pool(&self) -> Result<MySqlPool> {
        let url = self.database_url().await?;
        let mut last_error = None;

        for _ in 0..CONNECT_ATTEMPTS {
            match MySqlPoolOptions::new()
                .max_connections(10)
                .connect(&url)
                .await
            {
                Ok(pool) => return Ok(pool),
                Err(err) => {
                    last_error = Some(err);
                    tokio::time::sleep(CONNECT_BACKOFF).await;
                }
            }
        }

        Err(TestInfraError::MySql(last_error.unwrap_or(sqlx::Error::PoolTimedOut)))
    }

    /// Returns the underlying container reference.
    pub fn container(&self) -> &ContainerAsync<GenericImage> {
        &self.container
    }
}
