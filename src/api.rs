//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

use std::fmt;
use std::str::FromStr;

use crate::error::Isa2MdError;

/// ISAカタログのスキーマバージョン
///
/// サポートされるバージョンの閉じた集合です。列位置・シート位置などの
/// スキーマテーブルはバージョンごとに`schema`モジュールで解決されます。
///
/// 文字列からの変換は`FromStr`で行い、認識されない識別子は
/// `Isa2MdError::UnsupportedVersion`になります（ベストエフォートの
/// フォールバックは行いません）。
///
/// # 使用例
///
/// ```rust
/// use isa2md::IsaVersion;
///
/// let version: IsaVersion = "6_DE".parse().unwrap();
/// assert_eq!(version, IsaVersion::V6De);
/// assert!("7_DE".parse::<IsaVersion>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IsaVersion {
    /// ISA 5.1 ドイツ語版（識別子: `5_1_DE`）
    V5_1De,

    /// ISA 6 ドイツ語版（識別子: `6_DE`）
    V6De,
}

impl IsaVersion {
    /// バージョン識別子の文字列表現を返す
    pub fn as_str(&self) -> &'static str {
        match self {
            IsaVersion::V5_1De => "5_1_DE",
            IsaVersion::V6De => "6_DE",
        }
    }
}

impl FromStr for IsaVersion {
    type Err = Isa2MdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "5_1_DE" => Ok(IsaVersion::V5_1De),
            "6_DE" => Ok(IsaVersion::V6De),
            other => Err(Isa2MdError::UnsupportedVersion {
                version: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for IsaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// カタログの論理セクション
///
/// ISAワークブックは最大3つの論理セクション（それぞれ独立したシート）を
/// 持ちます。メインの情報セキュリティセクションは常に出力され、残りの
/// 2つは`ConverterBuilder`でオプトインした場合のみ出力されます。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SectionKind {
    /// 情報セキュリティ（メインのコントロールセット、シート4）
    InformationSecurity,

    /// プロトタイプ保護（シート5）
    PrototypeProtection,

    /// データ保護（シート6）
    DataProtection,
}
