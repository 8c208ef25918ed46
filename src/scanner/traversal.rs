use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{ConfigError, TraversalError};
use crate::models::DirectoryEntry;
use crate::scanner::PathFilter;

/// 需要剪枝的目录名集合
pub type ExclusionSet = HashSet<String>;

/// 深度优先的目录遍历源
///
/// 名字在排除集合中的目录不会产生任何后代条目，但兄弟子树照常遍历。
/// 不匹配路径过滤器的文件不会产生条目。
#[derive(Debug, Clone)]
pub struct TraversalSource {
    root: PathBuf,
    exclusions: ExclusionSet,
    filter: PathFilter,
    follow_links: bool,
    max_depth: Option<usize>,
}

impl TraversalSource {
    /// 创建新的遍历源
    pub fn new(root: impl Into<PathBuf>, exclusions: ExclusionSet) -> Self {
        Self {
            root: root.into(),
            exclusions,
            filter: PathFilter::default(),
            follow_links: false,
            max_depth: None,
        }
    }

    /// 使用配置创建遍历源，glob 模式无效时返回错误
    pub fn from_config(root: impl Into<PathBuf>, config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            root: root.into(),
            exclusions: config.exclude.directories.clone(),
            filter: config.path_filter()?,
            follow_links: config.pipeline.follow_symlinks,
            max_depth: config.pipeline.max_depth,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 惰性产生遍历条目，遇到错误时产生 `Err`，调用方应就此停止
    pub fn entries(&self) -> impl Iterator<Item = Result<DirectoryEntry, TraversalError>> + '_ {
        let mut walker = WalkDir::new(&self.root)
            .follow_links(self.follow_links)
            .sort_by_file_name();

        if let Some(max_depth) = self.max_depth {
            walker = walker.max_depth(max_depth);
        }

        walker
            .into_iter()
            .filter_entry(move |entry| !self.is_excluded(entry))
            .map(move |entry| match entry {
                Ok(entry) => Ok(DirectoryEntry::new(entry.path(), entry.file_type().is_dir())),
                Err(source) => Err(TraversalError::Walk {
                    root: self.root.clone(),
                    source,
                }),
            })
    }

    /// 目录按名字匹配排除集合，文件按相对路径匹配过滤器
    fn is_excluded(&self, entry: &walkdir::DirEntry) -> bool {
        if !entry.file_type().is_dir() {
            let relative = match entry.path().strip_prefix(&self.root) {
                Ok(relative) if !relative.as_os_str().is_empty() => relative,
                _ => Path::new(entry.file_name()),
            };
            return !self.filter.is_match(relative);
        }

        entry
            .file_name()
            .to_str()
            .map(|name| self.exclusions.contains(name))
            .unwrap_or(false)
    }
}
