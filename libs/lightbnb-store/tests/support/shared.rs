use anyhow::Context as _;
use lightbnb_store::Config;
use std::sync::Arc;
use tokio::sync::OnceCell;

static SHARED: OnceCell<Arc<SharedTestResources>> = OnceCell::const_new();

pub struct SharedTestResources {
    /// `database.test_database_url` when set, else `database.url`.
    pub database_url: String,
}

pub async fn shared() -> anyhow::Result<Arc<SharedTestResources>> {
    SHARED
        .get_or_try_init(|| async {
            lightbnb_store::logging::init_simple_logging();

            let mut config = Config::load().context("load Config for tests")?;
            if let Some(url) = &config.database.test_database_url {
                config.database.url = url.clone();
            }

            Ok::<_, anyhow::Error>(Arc::new(SharedTestResources {
                database_url: config.database.url,
            }))
        })
        .await
        .cloned()
}
