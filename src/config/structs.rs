use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub cors: CorsConfig,
    pub workflow: WorkflowConfig,
}

/// 应用设置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub system_name: String,
    pub environment: String,
    pub log_level: String,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub unix_socket_path: String,
    pub workers: usize,
    pub max_workers: usize,
    pub timeouts: TimeoutConfig,
    pub limits: LimitConfig,
}

/// 超时配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    pub client_request: u64,
    pub client_disconnect: u64,
    pub keep_alive: u64,
}

/// 限制配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitConfig {
    pub max_payload_size: usize,
}

/// JWT 配置
///
/// 令牌由外部身份服务签发，这里只负责校验。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    pub secret: String,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub leeway: u64,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,    // 数据库连接 URL（从 scheme 自动推断类型，memory:// 为内存存储）
    pub pool_size: u32, // 连接池大小
    pub timeout: u64,   // 连接超时 (秒)
}

/// 缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub default_ttl: u64,
    pub memory: MemoryConfig,
}

/// 内存缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    pub max_capacity: u64,
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub max_age: usize,
}

/// 表单/报告工作流配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// 复制表单时追加到标题后的后缀
    pub copy_suffix: String,
    /// 是否在状态流转后发送通知
    pub notifications_enabled: bool,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            copy_suffix: " [복사본]".to_string(),
            notifications_enabled: true,
        }
    }
}
