//!
//! # 通用配置模块
//!
//! 包含算法注册表与异步引擎使用的配置结构，以及从文件或环境变量加载配置的管理器。
//!
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

use crate::common::identifiers::AlgorithmIdentifier;
use crate::error::{Error, Result};

const ENV_ENABLED_ALGORITHMS: &str = "SUBTLE_KIT_ENABLED_ALGORITHMS";
const ENV_MIN_RSA_MODULUS_LENGTH: &str = "SUBTLE_KIT_MIN_RSA_MODULUS_LENGTH";
const ENV_MAX_RSA_MODULUS_LENGTH: &str = "SUBTLE_KIT_MAX_RSA_MODULUS_LENGTH";
const ENV_MAX_CONCURRENT_OPERATIONS: &str = "SUBTLE_KIT_MAX_CONCURRENT_OPERATIONS";

/// 库的完整配置
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SubtleConfig {
    /// 注册表启用的算法名称
    #[serde(default = "default_enabled_algorithms")]
    pub enabled_algorithms: Vec<String>,
    /// 允许生成的最小 RSA 模数长度（比特）
    #[serde(default = "default_min_rsa_modulus_length")]
    pub min_rsa_modulus_length: usize,
    /// 允许生成的最大 RSA 模数长度（比特）
    #[serde(default = "default_max_rsa_modulus_length")]
    pub max_rsa_modulus_length: usize,
    /// 异步引擎同时执行的最大操作数
    #[serde(default = "default_max_concurrent_operations")]
    pub max_concurrent_operations: usize,
}

fn default_enabled_algorithms() -> Vec<String> {
    AlgorithmIdentifier::ALL
        .iter()
        .map(|id| id.name().to_string())
        .collect()
}

fn default_min_rsa_modulus_length() -> usize {
    1024
}

fn default_max_rsa_modulus_length() -> usize {
    16384
}

fn default_max_concurrent_operations() -> usize {
    4
}

impl Default for SubtleConfig {
    fn default() -> Self {
        Self {
            enabled_algorithms: default_enabled_algorithms(),
            min_rsa_modulus_length: default_min_rsa_modulus_length(),
            max_rsa_modulus_length: default_max_rsa_modulus_length(),
            max_concurrent_operations: default_max_concurrent_operations(),
        }
    }
}

impl SubtleConfig {
    /// 解析启用的算法；未知名称视为配置错误
    pub fn enabled_identifiers(&self) -> Result<Vec<AlgorithmIdentifier>> {
        self.enabled_algorithms
            .iter()
            .map(|name| {
                AlgorithmIdentifier::from_name(name)
                    .ok_or_else(|| Error::Config(format!("unknown algorithm in config: {}", name)))
            })
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        self.enabled_identifiers()?;
        if self.min_rsa_modulus_length > self.max_rsa_modulus_length {
            return Err(Error::Config(format!(
                "min_rsa_modulus_length {} exceeds max_rsa_modulus_length {}",
                self.min_rsa_modulus_length, self.max_rsa_modulus_length
            )));
        }
        if self.max_concurrent_operations == 0 {
            return Err(Error::Config(
                "max_concurrent_operations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// 配置来源
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// 内存默认值
    Default,
    /// 文件
    File,
    /// 环境变量
    Environment,
}

/// 配置管理器
///
/// 读取无锁；更新整体替换配置快照。
pub struct ConfigManager {
    config: ArcSwap<SubtleConfig>,
    config_source: ConfigSource,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// 创建默认配置管理器
    pub fn new() -> Self {
        Self::with_config(SubtleConfig::default())
    }

    pub fn with_config(config: SubtleConfig) -> Self {
        Self {
            config: ArcSwap::from_pointee(config),
            config_source: ConfigSource::Default,
            config_path: None,
        }
    }

    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config: SubtleConfig = serde_json::from_str(&contents)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))?;
        config.validate()?;

        let mut manager = Self::with_config(config);
        manager.config_source = ConfigSource::File;
        manager.config_path = Some(path.to_path_buf());
        Ok(manager)
    }

    /// 从环境变量加载配置，未设置的项保持默认值
    pub fn from_env() -> Result<Self> {
        let mut config = SubtleConfig::default();

        if let Ok(value) = std::env::var(ENV_ENABLED_ALGORITHMS) {
            config.enabled_algorithms = value
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Ok(value) = std::env::var(ENV_MIN_RSA_MODULUS_LENGTH) {
            config.min_rsa_modulus_length = value.parse().map_err(|_| {
                Error::Config(format!("{} is not a number: {}", ENV_MIN_RSA_MODULUS_LENGTH, value))
            })?;
        }

        if let Ok(value) = std::env::var(ENV_MAX_RSA_MODULUS_LENGTH) {
            config.max_rsa_modulus_length = value.parse().map_err(|_| {
                Error::Config(format!("{} is not a number: {}", ENV_MAX_RSA_MODULUS_LENGTH, value))
            })?;
        }

        if let Ok(value) = std::env::var(ENV_MAX_CONCURRENT_OPERATIONS) {
            config.max_concurrent_operations = value.parse().map_err(|_| {
                Error::Config(format!(
                    "{} is not a number: {}",
                    ENV_MAX_CONCURRENT_OPERATIONS, value
                ))
            })?;
        }

        config.validate()?;
        let mut manager = Self::with_config(config);
        manager.config_source = ConfigSource::Environment;
        Ok(manager)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self.config.load().as_ref())?;
        fs::write(path, json)?;
        Ok(())
    }

    /// 获取当前配置快照
    pub fn get_config(&self) -> Arc<SubtleConfig> {
        self.config.load_full()
    }

    pub fn source(&self) -> &ConfigSource {
        &self.config_source
    }

    /// 更新配置；若配置来源是文件则自动保存
    pub fn update_config(&self, config: SubtleConfig) -> Result<()> {
        config.validate()?;
        self.config.store(Arc::new(config));

        if self.config_source == ConfigSource::File {
            if let Some(path) = &self.config_path {
                self.save_to_file(path)?;
            }
        }
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn config_manager_initialization() {
        let manager = ConfigManager::new();
        let config = manager.get_config();

        assert_eq!(manager.source(), &ConfigSource::Default);
        assert_eq!(config.min_rsa_modulus_length, 1024);
        assert_eq!(config.max_concurrent_operations, 4);
        assert_eq!(config.enabled_identifiers().unwrap().len(), 4);
    }

    #[test]
    fn config_file_roundtrip() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("subtle.json");

        let manager = ConfigManager::with_config(SubtleConfig {
            enabled_algorithms: vec!["HMAC".to_string(), "AES-KW".to_string()],
            min_rsa_modulus_length: 2048,
            max_rsa_modulus_length: 4096,
            max_concurrent_operations: 2,
        });
        manager.save_to_file(&config_path).unwrap();

        let loaded = ConfigManager::from_file(&config_path).unwrap();
        let config = loaded.get_config();
        assert_eq!(loaded.source(), &ConfigSource::File);
        assert_eq!(
            config.enabled_identifiers().unwrap(),
            vec![AlgorithmIdentifier::Hmac, AlgorithmIdentifier::AesKw]
        );
        assert_eq!(config.min_rsa_modulus_length, 2048);
        assert_eq!(config.max_rsa_modulus_length, 4096);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("partial.json");
        fs::write(&config_path, r#"{ "max_concurrent_operations": 8 }"#).unwrap();

        let config = ConfigManager::from_file(&config_path).unwrap().get_config();
        assert_eq!(config.max_concurrent_operations, 8);
        assert_eq!(config.min_rsa_modulus_length, 1024);
        assert_eq!(config.max_rsa_modulus_length, 16384);
        assert_eq!(config.enabled_algorithms.len(), 4);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("bad.json");
        fs::write(&config_path, r#"{ "enabled_algorithms": ["HMAC", "ROT13"] }"#).unwrap();
        assert!(matches!(
            ConfigManager::from_file(&config_path),
            Err(Error::Config(_))
        ));

        let manager = ConfigManager::new();
        let mut config = (*manager.get_config()).clone();
        config.max_concurrent_operations = 0;
        assert!(matches!(manager.update_config(config), Err(Error::Config(_))));

        let inverted = SubtleConfig {
            min_rsa_modulus_length: 4096,
            max_rsa_modulus_length: 2048,
            ..SubtleConfig::default()
        };
        assert!(matches!(inverted.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_update_auto_saves_file_config() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("cfg.json");
        ConfigManager::new().save_to_file(&path).unwrap();

        let manager = ConfigManager::from_file(&path).unwrap();
        let mut config = (*manager.get_config()).clone();
        config.min_rsa_modulus_length = 3072;
        manager.update_config(config).unwrap();

        let reloaded = ConfigManager::from_file(&path).unwrap();
        assert_eq!(reloaded.get_config().min_rsa_modulus_length, 3072);
    }

    #[test]
    fn test_config_from_env_overrides() {
        unsafe { std::env::set_var(ENV_ENABLED_ALGORITHMS, "hmac, aes-gcm"); }
        unsafe { std::env::set_var(ENV_MAX_CONCURRENT_OPERATIONS, "16"); }
        let manager = ConfigManager::from_env().unwrap();
        let config = manager.get_config();
        assert_eq!(manager.source(), &ConfigSource::Environment);
        assert_eq!(
            config.enabled_identifiers().unwrap(),
            vec![AlgorithmIdentifier::Hmac, AlgorithmIdentifier::AesGcm]
        );
        assert_eq!(config.max_concurrent_operations, 16);
        unsafe { std::env::remove_var(ENV_ENABLED_ALGORITHMS); }
        unsafe { std::env::remove_var(ENV_MAX_CONCURRENT_OPERATIONS); }
    }
}
