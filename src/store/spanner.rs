use anyhow::{Context, Result};
use async_trait::async_trait;
use gcloud_gax::grpc::Code;
use gcloud_googleapis::spanner::admin::database::v1::{
    CreateDatabaseRequest, GetDatabaseDdlRequest, GetDatabaseRequest, UpdateDatabaseDdlRequest,
};
use gcloud_googleapis::spanner::admin::instance::v1::{
    CreateInstanceRequest, GetInstanceRequest, Instance,
};
use gcloud_spanner::admin::AdminClientConfig;
use gcloud_spanner::admin::client::Client as AdminClient;
use gcloud_spanner::client::{Client, ClientConfig};
use gcloud_spanner::key::Key;
use gcloud_spanner::mutation::{delete, insert_or_update};
use gcloud_spanner::statement::Statement;
use gcloud_spanner::value::CommitTimestamp;
use std::future::Future;
use std::sync::Arc;

use super::{KvStore, StoreError};
use crate::config::SpannerConfig;

const TABLE: &str = "kv_store";

/// Key-value store backed by a single Spanner table
///
/// Values are UTF-8 text; the `data` column is a `STRING(MAX)`.
#[derive(Clone)]
pub struct SpannerStore {
    inner: Arc<Client>,
}

impl SpannerStore {
    /// Create a new Spanner-backed store from configuration
    ///
    /// The gcloud-spanner library automatically detects the
    /// SPANNER_EMULATOR_HOST environment variable and connects to
    /// the emulator when set, or production Spanner otherwise.
    ///
    /// The instance, database, and table are created if they don't exist.
    pub async fn from_config(config: &SpannerConfig) -> Result<Self> {
        auto_provision(config).await?;

        let database_path = config.database_path();

        match &config.emulator_host {
            Some(host) => tracing::info!("Connecting to Spanner emulator at: {}", host),
            None => tracing::info!("Connecting to production Spanner"),
        }

        let client = Client::new(&database_path, ClientConfig::default())
            .await
            .context("Failed to create Spanner client")?;

        tracing::info!(
            "Successfully connected to Spanner database: {}",
            database_path
        );

        Ok(Self {
            inner: Arc::new(client),
        })
    }

    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut statement = Statement::new("SELECT data FROM kv_store WHERE id = @id");
        statement.add_param("id", &key.to_string());

        let mut tx = self
            .inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to query data from Spanner")?;

        match result_set.next().await? {
            Some(row) => {
                let data: String = row.column_by_name("data")?;
                Ok(Some(data.into_bytes()))
            }
            None => Ok(None),
        }
    }

    async fn upsert(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let data = String::from_utf8(value).context("Value is not valid UTF-8")?;
        let key = key.to_string();

        let mutation = insert_or_update(
            TABLE,
            &["id", "data", "created_at", "updated_at"],
            &[&key, &data, &CommitTimestamp::new(), &CommitTimestamp::new()],
        );

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to upsert data to Spanner")?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mutation = delete(TABLE, Key::new(&key.to_string()));

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to delete data from Spanner")?;
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let mut statement =
            Statement::new("SELECT id FROM kv_store WHERE STARTS_WITH(id, @prefix) ORDER BY id ASC");
        statement.add_param("prefix", &prefix.to_string());

        let mut tx = self
            .inner
            .single()
            .await
            .context("Failed to create read transaction for listing")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to execute prefix listing query")?;

        let mut keys = Vec::new();
        while let Some(row) = result_set.next().await? {
            keys.push(row.column_by_name::<String>("id")?);
        }
        Ok(keys)
    }
}

#[async_trait]
impl KvStore for SpannerStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.read(key).await.map_err(|source| StoreError::Get {
            key: key.to_string(),
            source,
        })
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.upsert(key, value).await.map_err(|source| StoreError::Put {
            key: key.to_string(),
            source,
        })?;
        tracing::debug!("Upserted key: {}", key);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.remove(key).await.map_err(|source| StoreError::Delete {
            key: key.to_string(),
            source,
        })?;
        tracing::debug!("Deleted key: {}", key);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let keys = self
            .keys_with_prefix(prefix)
            .await
            .map_err(|source| StoreError::List {
                prefix: prefix.to_string(),
                source,
            })?;
        tracing::debug!("Listed {} keys with prefix {:?}", keys.len(), prefix);
        Ok(keys)
    }
}

const CREATE_TABLE_DDL: &str = "CREATE TABLE kv_store (
    id STRING(MAX) NOT NULL,
    data STRING(MAX) NOT NULL,
    created_at TIMESTAMP NOT NULL OPTIONS (allow_commit_timestamp=true),
    updated_at TIMESTAMP NOT NULL OPTIONS (allow_commit_timestamp=true),
) PRIMARY KEY (id)";

/// Create the instance, database and table when they are missing.
async fn auto_provision(config: &SpannerConfig) -> Result<()> {
    tracing::info!("Starting auto-provisioning checks...");

    let admin = AdminClient::new(AdminClientConfig::default())
        .await
        .context("Failed to create Spanner admin client")?;

    let project_path = format!("projects/{}", config.project);
    let instance_path = format!("{}/instances/{}", project_path, config.instance);
    let database_path = config.database_path();

    let lookup = admin
        .instance()
        .get_instance(
            GetInstanceRequest {
                name: instance_path.clone(),
                field_mask: None,
            },
            None,
        )
        .await
        .map_err(|status| (status.code(), status.message().to_string()));
    ensure("instance", &instance_path, found("instance", lookup), || async {
        let request = CreateInstanceRequest {
            parent: project_path.clone(),
            instance_id: config.instance.clone(),
            instance: Some(Instance {
                name: instance_path.clone(),
                config: instance_config_path(&project_path, config.emulator_host.is_some()),
                display_name: format!("{} instance", config.instance),
                node_count: 1,
                ..Default::default()
            }),
        };
        let mut operation = admin.instance().create_instance(request, None).await?;
        operation.wait(None).await?;
        Ok(())
    })
    .await?;

    let lookup = admin
        .database()
        .get_database(
            GetDatabaseRequest {
                name: database_path.clone(),
            },
            None,
        )
        .await
        .map_err(|status| (status.code(), status.message().to_string()));
    ensure("database", &database_path, found("database", lookup), || async {
        let request = CreateDatabaseRequest {
            parent: instance_path.clone(),
            create_statement: format!("CREATE DATABASE `{}`", config.database),
            extra_statements: vec![],
            encryption_config: None,
            database_dialect: 1, // Google Standard SQL
            proto_descriptors: vec![],
        };
        let mut operation = admin.database().create_database(request, None).await?;
        operation.wait(None).await?;
        Ok(())
    })
    .await?;

    let ddl = admin
        .database()
        .get_database_ddl(
            GetDatabaseDdlRequest {
                database: database_path.clone(),
            },
            None,
        )
        .await
        .context("Failed to get database DDL")?
        .into_inner()
        .statements;
    ensure("table", TABLE, Ok(has_kv_table(&ddl)), || async {
        let request = UpdateDatabaseDdlRequest {
            database: database_path.clone(),
            statements: vec![CREATE_TABLE_DDL.to_string()],
            operation_id: String::new(),
            proto_descriptors: vec![],
            throughput_mode: false,
        };
        let mut operation = admin.database().update_database_ddl(request, None).await?;
        operation.wait(None).await?;
        Ok(())
    })
    .await?;

    tracing::info!("Auto-provisioning complete");
    Ok(())
}

/// Run `create` unless the resource already exists.
async fn ensure<F, Fut>(kind: &str, name: &str, exists: Result<bool>, create: F) -> Result<()>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<()>>,
{
    if exists? {
        tracing::info!("Spanner {} already exists: {}", kind, name);
        return Ok(());
    }

    tracing::info!("Spanner {} not found, creating: {}", kind, name);
    create()
        .await
        .with_context(|| format!("Failed to create {} {}", kind, name))?;
    tracing::info!("Spanner {} created: {}", kind, name);
    Ok(())
}

/// `NotFound` means "create it"; any other status is fatal.
fn found<T>(kind: &str, lookup: std::result::Result<T, (Code, String)>) -> Result<bool> {
    match lookup {
        Ok(_) => Ok(true),
        Err((Code::NotFound, _)) => Ok(false),
        Err((_, message)) => Err(anyhow::anyhow!(
            "Failed to check {} existence: {}",
            kind,
            message
        )),
    }
}

fn instance_config_path(project_path: &str, emulated: bool) -> String {
    if emulated {
        format!("{}/instanceConfigs/emulator-config", project_path)
    } else {
        format!("{}/instanceConfigs/regional-us-central1", project_path)
    }
}

fn has_kv_table(statements: &[String]) -> bool {
    statements.iter().any(|stmt| {
        stmt.contains("CREATE TABLE kv_store") || stmt.contains("CREATE TABLE `kv_store`")
    })
}
