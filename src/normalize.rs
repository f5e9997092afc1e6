//! Text Normalizer Module
//!
//! スプレッドシートのエクスポートで混入する句読点・空白のアーティファクトを
//! 修正する、固定順序の置換ルール列を提供するモジュール。
//!
//! ルールは順序付きリストとして保持され、必ずリスト順に適用されます。

use regex::Regex;

use crate::error::Isa2MdError;

/// 名前付き正規化ルール
///
/// 1つの正規表現置換。名前は個別のユニットテストとデバッグのためのものです。
#[derive(Debug)]
pub(crate) struct NormalizeRule {
    /// ルール名
    pub name: &'static str,

    /// マッチパターン
    pattern: Regex,

    /// 置換文字列
    replacement: &'static str,
}

impl NormalizeRule {
    fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Result<Self, Isa2MdError> {
        let pattern = Regex::new(pattern)
            .map_err(|e| Isa2MdError::Config(format!("Invalid normalize rule '{}': {}", name, e)))?;
        Ok(Self {
            name,
            pattern,
            replacement,
        })
    }

    /// このルール単体をテキストに適用する
    pub fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, self.replacement).into_owned()
    }
}

/// テキスト正規化パイプライン
///
/// 固定された置換ルール列を、定義順に1回ずつ適用します。
///
/// # ルールの順序
///
/// 順序には依存関係があり、入れ替えると結果が変わります:
/// - `collapse-spaces`は`indent-bullets`より前でなければならない
///   （箇条書きのインデントとして挿入した空白を潰さないため）。
/// - `strip-space-before-plus`と`unify-plus-bullets`は`indent-bullets`より
///   後でなければならない。`indent-bullets`は`-`の箇条書きしか認識しないため、
///   後から`-`に統一された`+`の箇条書きは同一パス内ではインデントされない。
///   （`+`由来の箇条書きを再インデントする2回目のパスは意図的に行わない。）
#[derive(Debug)]
pub(crate) struct TextNormalizer {
    /// 置換ルール列（適用順）
    rules: Vec<NormalizeRule>,
}

impl TextNormalizer {
    /// ルール列をコンパイルする
    pub fn new() -> Result<Self, Isa2MdError> {
        let rules = vec![
            // 非ASCIIのハイフン・ダッシュ類の連続をASCIIハイフン1つに統一
            NormalizeRule::new(
                "unify-hyphens",
                "[\u{2010}\u{1806}\u{FE63}\u{FF0D}\u{2043}\u{2212}\u{2013}]+",
                "-",
            )?,
            // 空白（ノーブレークスペースを含む）の連続を半角スペース1つに統一
            NormalizeRule::new("collapse-spaces", "[ \u{00A0}]+", " ")?,
            // `-`で始まる行をサブ項目としてインデントする。既にインデント済みの
            // 箇条書きにも一律に適用されるため、それらは二重にインデントされる。
            NormalizeRule::new("indent-bullets", "\n( *)-", "\n  ${1}-")?,
            // 3つ以上連続する改行を空行1つ（改行2つ）に統一
            NormalizeRule::new("collapse-blank-lines", "\n{3,}", "\n\n")?,
            // `+`の直前の空白を除去
            NormalizeRule::new("strip-space-before-plus", " \\+", "+")?,
            // 行頭の`+`箇条書きを`-`に統一
            NormalizeRule::new("unify-plus-bullets", "\n\\+", "\n-")?,
        ];
        Ok(Self { rules })
    }

    /// 全ルールを定義順に適用する
    pub fn apply(&self, text: &str) -> String {
        let mut result = text.to_string();
        for rule in &self.rules {
            result = rule.apply(&result);
        }
        result
    }

    /// 名前でルールを取得する（テスト用）
    #[cfg(test)]
    pub fn rule(&self, name: &str) -> &NormalizeRule {
        self.rules
            .iter()
            .find(|rule| rule.name == name)
            .unwrap_or_else(|| panic!("Unknown rule: {}", name))
    }
}
