use std::collections::HashSet;

pub struct DefaultConfig;

impl DefaultConfig {
    /// 默认剪枝的目录名
    pub fn default_exclude_dirs() -> HashSet<String> {
        ["node_modules", ".git"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// 聚合通道的默认缓冲区大小
    pub fn default_channel_capacity() -> usize {
        100
    }
}
