use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;
use url::Url;

use super::repository_name::RepositoryName;

/// RemoteBase関連のエラー
#[derive(Debug, Error, PartialEq)]
pub enum RemoteBaseError {
    #[error("Remote base cannot be empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Invalid characters in remote base: {0}")]
    InvalidCharacters(String),
}

const SUPPORTED_SCHEMES: &[&str] = &["https", "http", "ssh", "git", "file"];

fn scp_like_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._-]+@[A-Za-z0-9.-]+:[A-Za-z0-9._~/-]*$")
            .expect("static pattern compiles")
    })
}

/// リモートホスト／組織のベースURLの値オブジェクト
///
/// `https://github.com/DEFRA` や `git@github.com:DEFRA` のような形式を受け付け、
/// リポジトリ名を連結してクローンURLを組み立てる。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RemoteBase {
    /// 末尾のスラッシュを除いた正規化済みのベース
    base: String,
}

impl RemoteBase {
    /// 新しいRemoteBaseインスタンスを作成
    pub fn new(base: &str) -> Result<Self, RemoteBaseError> {
        let trimmed = base.trim().trim_end_matches('/');

        if trimmed.is_empty() {
            return Err(RemoteBaseError::Empty);
        }

        if trimmed.chars().any(|ch| ch.is_control() || ch.is_whitespace()) {
            return Err(RemoteBaseError::InvalidCharacters(trimmed.to_string()));
        }

        if trimmed.contains("://") {
            let url = Url::parse(trimmed)
                .map_err(|e| RemoteBaseError::InvalidFormat(format!("{}: {}", trimmed, e)))?;
            if !SUPPORTED_SCHEMES.contains(&url.scheme()) {
                return Err(RemoteBaseError::UnsupportedScheme(url.scheme().to_string()));
            }
        } else if !scp_like_pattern().is_match(trimmed) {
            return Err(RemoteBaseError::InvalidFormat(trimmed.to_string()));
        }

        Ok(Self {
            base: trimmed.to_string(),
        })
    }

    /// リポジトリのクローンURLを生成（`<base>/<name>.git`）
    pub fn repository_url(&self, name: &RepositoryName) -> String {
        format!("{}/{}.git", self.base, name)
    }

    /// ベースを文字列として取得
    pub fn as_str(&self) -> &str {
        &self.base
    }
}

impl fmt::Display for RemoteBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)
    }
}

impl TryFrom<String> for RemoteBase {
    type Error = RemoteBaseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<RemoteBase> for String {
    fn from(value: RemoteBase) -> Self {
        value.base
    }
}
