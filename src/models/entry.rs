use std::path::{Component, Path, PathBuf};

/// 遍历产生的单个条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub path: PathBuf,
    pub is_directory: bool,
}

impl DirectoryEntry {
    pub fn new(path: &Path, is_directory: bool) -> Self {
        Self {
            path: display_path(path),
            is_directory,
        }
    }
}

/// 一次成功读取的结果
#[derive(Debug, Clone)]
pub struct ReadOutcome {
    pub path: PathBuf,
    pub payload: Vec<u8>,
}

/// 去掉开头的 `./`，使遍历 `.` 时输出 `a.txt` 而不是 `./a.txt`
pub fn display_path(path: &Path) -> PathBuf {
    let trimmed: PathBuf = path
        .components()
        .skip_while(|c| matches!(c, Component::CurDir))
        .collect();

    if trimmed.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_path() {
        assert_eq!(display_path(Path::new("./a.txt")), PathBuf::from("a.txt"));
        assert_eq!(display_path(Path::new("./sub/b.txt")), PathBuf::from("sub/b.txt"));
        assert_eq!(display_path(Path::new(".")), PathBuf::from("."));
        assert_eq!(display_path(Path::new("dir/c.txt")), PathBuf::from("dir/c.txt"));
        assert_eq!(display_path(Path::new("/tmp/x")), PathBuf::from("/tmp/x"));
    }
}
