use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;

use crate::error::ConfigError;

/// 基于 glob 的文件过滤器，匹配相对于遍历根目录的路径
///
/// 没有通配符也没有扩展名的模式同时匹配自身及其下所有文件，`docs` 等价于 `docs` 加 `docs/**`。
#[derive(Debug, Clone)]
pub struct PathFilter {
    include: Option<GlobSet>,
    exclude: GlobSet,
}

impl Default for PathFilter {
    fn default() -> Self {
        Self {
            include: None,
            exclude: GlobSet::empty(),
        }
    }
}

impl PathFilter {
    /// 编译包含/排除模式，include 为空表示包含所有文件
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self, ConfigError> {
        let include = if include.is_empty() {
            None
        } else {
            Some(build_globset(include)?)
        };

        Ok(Self {
            include,
            exclude: build_globset(exclude)?,
        })
    }

    /// 文件是否应被读取
    pub fn is_match(&self, relative: &Path) -> bool {
        if self.exclude.is_match(relative) {
            return false;
        }

        self.include
            .as_ref()
            .map(|include| include.is_match(relative))
            .unwrap_or(true)
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();

    for pattern in patterns {
        for expanded in expand_pattern(pattern) {
            let glob = Glob::new(&expanded).map_err(|source| ConfigError::Pattern {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
    }

    builder.build().map_err(|source| ConfigError::Pattern {
        pattern: patterns.join(", "),
        source,
    })
}

fn expand_pattern(pattern: &str) -> Vec<String> {
    let pattern = pattern.trim_end_matches('/');
    let has_wildcard = pattern.contains(['*', '?', '[', '{']);
    let has_extension = Path::new(pattern).extension().is_some();

    if has_wildcard || has_extension {
        vec![pattern.to_string()]
    } else {
        vec![pattern.to_string(), format!("{pattern}/**")]
    }
}
