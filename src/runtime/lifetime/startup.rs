use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::{ObjectCache, object_cache::MokaCacheWrapper};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::storage::Storage;

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

/// 准备服务器启动的上下文：存储（含迁移）与成员缓存
pub async fn prepare_server_startup() -> Result<StartupContext> {
    // 进程内只需安装一次，重复安装返回 Err
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    let config = AppConfig::get();
    let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::from_config(&config.cache));
    warn!(
        "Moka cache initialized (capacity {}, ttl {}s)",
        config.cache.memory.max_capacity, config.cache.default_ttl
    );

    Ok(StartupContext { storage, cache })
}
