use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// RepositoryName関連のエラー
#[derive(Debug, Error, PartialEq)]
pub enum RepositoryNameError {
    #[error("Repository name cannot be empty")]
    Empty,

    #[error("Repository name too long: {0} characters (max: 255)")]
    TooLong(usize),

    #[error("Repository name cannot start with '-': {0}")]
    StartsWithHyphen(String),

    #[error("Reserved repository name: {0}")]
    Reserved(String),

    #[error("Invalid character in repository name '{name}': {character:?}")]
    InvalidCharacter { name: String, character: char },
}

fn allowed_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("static pattern compiles"))
}

/// サービスリポジトリ名の値オブジェクト
///
/// マニフェストファイル名から拡張子を除いたもの。`git clone` の引数や
/// ローカルのディレクトリ名としてそのまま使われるため、パス区切り文字や
/// 先頭のハイフンは受け付けない。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepositoryName {
    name: String,
}

impl RepositoryName {
    /// 新しいRepositoryNameインスタンスを作成
    pub fn new(name: &str) -> Result<Self, RepositoryNameError> {
        Self::validate(name)?;
        Ok(Self {
            name: name.to_string(),
        })
    }

    /// リポジトリ名の妥当性を検証
    fn validate(name: &str) -> Result<(), RepositoryNameError> {
        if name.is_empty() {
            return Err(RepositoryNameError::Empty);
        }

        if name.len() > 255 {
            return Err(RepositoryNameError::TooLong(name.len()));
        }

        // gitのオプションとして解釈されるのを防ぐ
        if name.starts_with('-') {
            return Err(RepositoryNameError::StartsWithHyphen(name.to_string()));
        }

        if name == "." || name == ".." {
            return Err(RepositoryNameError::Reserved(name.to_string()));
        }

        if !allowed_pattern().is_match(name) {
            let character = name
                .chars()
                .find(|ch| !(ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-')))
                .unwrap_or('?');
            return Err(RepositoryNameError::InvalidCharacter {
                name: name.to_string(),
                character,
            });
        }

        Ok(())
    }

    /// リポジトリ名を文字列として取得
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// リポジトリ名を所有権付きで取得
    pub fn into_string(self) -> String {
        self.name
    }
}

impl fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl TryFrom<String> for RepositoryName {
    type Error = RepositoryNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::validate(&value)?;
        Ok(Self { name: value })
    }
}

impl From<RepositoryName> for String {
    fn from(value: RepositoryName) -> Self {
        value.name
    }
}
