//! Application configuration module / 应用配置模块
//!
//! Loaded from config.json, created with defaults on first run / 首次运行时创建默认配置文件.
//! The orchestrator receives these structs explicitly, nothing here is global.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::matcher::{Algorithm, DEFAULT_MAX_MATCHES};
use crate::rpc::MAX_MESSAGE_BYTES;

/// Application configuration / 应用配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Backend server configuration / 搜索后端服务配置
    pub server: ServerConfig,
    /// Remote backend used by the orchestrator / 远程后端配置
    pub remote: RemoteConfig,
    /// Local search configuration / 本地搜索配置
    pub search: SearchConfig,
}

/// Search backend server configuration / 搜索后端服务配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address / 监听地址
    pub host: String,
    /// Listen port / 监听端口
    pub port: u16,
    /// Max request/response size in bytes / 最大消息字节数
    pub max_message_bytes: usize,
}

/// Remote backend configuration / 远程后端配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Use the remote backend instead of searching in-process / 是否启用远程后端
    pub enabled: bool,
    /// Remote host / 远程主机
    pub host: String,
    /// Remote port / 远程端口
    pub port: u16,
    /// Per-call timeout in seconds / 单次调用超时（秒）
    pub timeout_secs: f64,
    /// Connection timeout in seconds / 连接超时（秒）
    pub connect_timeout_secs: f64,
    /// Max request/response size in bytes / 最大消息字节数
    pub max_message_bytes: usize,
}

/// Local search configuration / 本地搜索配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Local algorithm / 本地算法
    pub algorithm: Algorithm,
    /// Match cap, null for unbounded / 匹配数上限，null 表示不限
    pub max_matches: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 50051,
            max_message_bytes: MAX_MESSAGE_BYTES,
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: "localhost".to_string(),
            port: 50051,
            timeout_secs: DEFAULT_TIMEOUT.as_secs_f64(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT.as_secs_f64(),
            max_message_bytes: MAX_MESSAGE_BYTES,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Naive,
            max_matches: Some(DEFAULT_MAX_MATCHES),
        }
    }
}

impl ServerConfig {
    /// Get the server bind address / 获取服务器绑定地址
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl RemoteConfig {
    /// host:port / 远程地址
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// URI for the gRPC channel / gRPC 通道地址
    pub fn endpoint(&self) -> String {
        format!("http://{}", self.address())
    }

    /// Per-call timeout; an unusable value falls back to the default / 单次调用超时
    pub fn timeout(&self) -> Duration {
        secs_to_duration(self.timeout_secs).unwrap_or(DEFAULT_TIMEOUT)
    }

    pub fn connect_timeout(&self) -> Duration {
        secs_to_duration(self.connect_timeout_secs).unwrap_or(DEFAULT_CONNECT_TIMEOUT)
    }

    /// Reject timeouts that would fail every call / 校验超时配置
    pub fn validate(&self) -> Result<()> {
        if secs_to_duration(self.timeout_secs).is_none() {
            bail!("remote.timeout_secs must be a positive number of seconds, got {}", self.timeout_secs);
        }
        if secs_to_duration(self.connect_timeout_secs).is_none() {
            bail!(
                "remote.connect_timeout_secs must be a positive number of seconds, got {}",
                self.connect_timeout_secs
            );
        }
        Ok(())
    }
}

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Positive, finite, representable seconds only / 仅接受正的有限秒数
fn secs_to_duration(secs: f64) -> Option<Duration> {
    if secs > 0.0 {
        Duration::try_from_secs_f64(secs).ok()
    } else {
        None
    }
}

impl AppConfig {
    /// Apply environment overrides / 应用环境变量覆盖
    ///
    /// `USE_GRPC_SEARCH`, `GRPC_HOST`, `GRPC_PORT` (remote target and server
    /// listen port) and `GRPC_TIMEOUT_SECONDS`. `lookup` is usually
    /// `|key| std::env::var(key).ok()`. Unparsable values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("USE_GRPC_SEARCH") {
            match parse_bool(&value) {
                Some(enabled) => self.remote.enabled = enabled,
                None => tracing::warn!("Ignoring invalid USE_GRPC_SEARCH value: {}", value),
            }
        }
        if let Some(host) = lookup("GRPC_HOST") {
            if !host.trim().is_empty() {
                self.remote.host = host.trim().to_string();
            }
        }
        if let Some(value) = lookup("GRPC_PORT") {
            match value.trim().parse::<u16>() {
                Ok(port) => {
                    self.remote.port = port;
                    self.server.port = port;
                }
                Err(_) => tracing::warn!("Ignoring invalid GRPC_PORT value: {}", value),
            }
        }
        if let Some(value) = lookup("GRPC_TIMEOUT_SECONDS") {
            match value.trim().parse::<f64>() {
                Ok(secs) if secs_to_duration(secs).is_some() => self.remote.timeout_secs = secs,
                _ => tracing::warn!("Ignoring invalid GRPC_TIMEOUT_SECONDS value: {}", value),
            }
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Get the config file path / 获取配置文件路径
fn get_config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.json")
}

/// Load configuration from ./config.json, or create default if not exists / 加载配置文件
pub fn load_config() -> Result<AppConfig> {
    load_config_from(&get_config_path())
}

/// Load configuration from `path`, creating it with defaults if missing / 从指定路径加载配置
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        config
            .remote
            .validate()
            .with_context(|| format!("Invalid config file {:?}", path))?;
        tracing::info!("Loaded configuration from {:?}", path);
        Ok(config)
    } else {
        let config = AppConfig::default();
        save_config_to(&config, path)?;
        tracing::info!("Created default configuration at {:?}", path);
        Ok(config)
    }
}

/// Save configuration to `path` / 保存配置到文件
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(path, content).with_context(|| format!("Failed to write config file {:?}", path))?;
    Ok(())
}
