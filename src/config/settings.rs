use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::defaults::DefaultConfig;
use crate::error::ConfigError;
use crate::scanner::PathFilter;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 排除配置
    pub exclude: ExcludeConfig,

    /// 包含配置
    pub include: IncludeConfig,

    /// 流水线配置
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExcludeConfig {
    /// 需要剪枝的目录名（只匹配名字，不匹配路径）
    pub directories: HashSet<String>,

    /// 需要跳过的文件 glob 模式，匹配相对于根目录的路径
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IncludeConfig {
    /// 只读取匹配这些 glob 模式的文件，为空表示读取所有文件
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// 每个聚合通道的缓冲区大小，必须大于 0
    pub channel_capacity: usize,

    /// 单个文件读取超时（毫秒），None 表示不限制
    pub read_timeout_ms: Option<u64>,

    /// 是否跟随符号链接进入目录
    pub follow_symlinks: bool,

    /// 最大遍历深度
    pub max_depth: Option<usize>,
}

impl Default for ExcludeConfig {
    fn default() -> Self {
        Self {
            directories: DefaultConfig::default_exclude_dirs(),
            patterns: Vec::new(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DefaultConfig::default_channel_capacity(),
            read_timeout_ms: None,
            follow_symlinks: false,
            max_depth: None,
        }
    }
}

impl PipelineConfig {
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_ms.map(Duration::from_millis)
    }
}

impl Config {
    /// 从文件加载配置
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content, path)
    }

    fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// 获取默认配置文件路径
    pub fn default_config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("tree-reader");
        path.push("config.toml");
        Some(path)
    }

    /// 加载默认位置的配置，不存在时使用内置默认值（不会创建文件）
    pub fn load_or_default() -> Result<Self, ConfigError> {
        match Self::default_config_path() {
            Some(path) if path.exists() => Self::load_from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// 校验配置取值
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pipeline.channel_capacity == 0 {
            return Err(ConfigError::ZeroChannelCapacity);
        }
        if self.pipeline.read_timeout_ms == Some(0) {
            return Err(ConfigError::ZeroReadTimeout);
        }
        self.path_filter()?;
        Ok(())
    }

    /// 编译包含/排除模式
    pub fn path_filter(&self) -> Result<PathFilter, ConfigError> {
        PathFilter::new(&self.include.patterns, &self.exclude.patterns)
    }
}
