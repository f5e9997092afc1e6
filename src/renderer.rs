//! Renderer Module
//!
//! コントロール行のシーケンスを、階層化された見出しとラベル付き
//! フィールドブロックのテキストに変換するモジュール。
//!
//! レンダリングは(行シーケンス, セクションスキーマ)の純粋な関数であり、
//! テキストの生成以外の副作用を持ちません。

use crate::loader::{ControlRow, SectionTable};
use crate::normalize::TextNormalizer;
use crate::schema::{FieldKey, SectionSchema};

/// 番号文字列から見出しの深さを導出する
///
/// 深さは番号文字列に含まれる`.`の数 + 1で、それ以外の検証は行いません。
/// ドキュメントの実際のネスト構造とは照合しないため、不正な番号文字列は
/// そのまま不正な深さを生みます。
///
/// ```text
/// depth("3")     == 1
/// depth("3.2")   == 2
/// depth("3.2.1") == 3
/// ```
pub(crate) fn heading_depth(number: &str) -> usize {
    number.matches('.').count() + 1
}

/// 1セクション分のテキストをレンダリングする
///
/// # アルゴリズム
///
/// 各行について:
/// - 深さ = ドット数 + 1、マーカー長 = 深さ + スキーマのオフセット
///   （オフセットはバージョン依存の定数で、スキーマテーブルが保持する）
/// - 見出し行 = マーカー + 番号 + 質問文
/// - 深さがしきい値以上の行にのみ、ラベル付きフィールドブロックを出力する。
///   `.`を含まない番号の行は深さ1のトップレベル見出しであり、構造のみで
///   フィールドブロックは持たない。
///
/// # 正規化の適用範囲
///
/// 後置フィールド（ISA 6のドキュメント/証跡）を持たないセクションは、
/// セクション全体のテキストに対して正規化を1回適用します。後置フィールドを
/// 持つセクションでは、行ごとに見出し+メインブロックへ正規化を適用した後、
/// 後置ブロックを未正規化のまま連結します。後置ブロックが正規化を受けない
/// のは元カタログ処理の挙動であり、そのまま保持しています。
pub(crate) fn render_section(
    table: &SectionTable,
    schema: &SectionSchema,
    normalizer: &TextNormalizer,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    for row in &table.rows {
        let depth = heading_depth(&row.number);
        let marker = "#".repeat(depth + schema.heading_offset);
        let heading = format!("{} {} {}", marker, row.number, row.question);

        let block = if depth >= schema.min_block_depth {
            Some(render_block(schema.block_fields, table, row))
        } else {
            None
        };

        if schema.trailing_fields.is_empty() {
            parts.push(heading);
            if let Some(block) = block {
                parts.push(block);
            }
        } else {
            match block {
                Some(block) => {
                    let unit = normalizer.apply(&format!("{}\n{}", heading, block));
                    let trailing = render_block(schema.trailing_fields, table, row);
                    parts.push(format!("{}{}", unit, trailing));
                }
                None => parts.push(normalizer.apply(&heading)),
            }
        }
    }

    // セクション末尾には空行を1つ置く
    let text = format!("{}\n", parts.join("\n"));
    if schema.trailing_fields.is_empty() {
        normalizer.apply(&text)
    } else {
        text
    }
}

/// ラベル付きフィールドブロックをレンダリングする
///
/// 各フィールドは、太字のラベル行（ローダーが正規化した列ヘッダー）、
/// 空行、セルのテキスト値の並びになります。
fn render_block(fields: &[FieldKey], table: &SectionTable, row: &ControlRow) -> String {
    let rendered: Vec<String> = fields
        .iter()
        .map(|&field| format!("**{}**\n\n{}\n", table.label(field), row.field(field)))
        .collect();
    format!("\n{}", rendered.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{IsaVersion, SectionKind};
    use crate::schema::VersionSchema;
    use std::collections::HashMap;

    fn labels(entries: &[(FieldKey, &str)]) -> HashMap<FieldKey, String> {
        entries
            .iter()
            .map(|(key, label)| (*key, label.to_string()))
            .collect()
    }

    fn row(number: &str, question: &str, fields: &[(FieldKey, &str)]) -> ControlRow {
        ControlRow::new(
            number.to_string(),
            question.to_string(),
            fields
                .iter()
                .map(|(key, value)| (*key, value.to_string()))
                .collect(),
        )
    }

    fn normalizer() -> TextNormalizer {
        TextNormalizer::new().unwrap()
    }

    #[test]
    fn test_heading_depth() {
        assert_eq!(heading_depth("3"), 1);
        assert_eq!(heading_depth("3.2"), 2);
        assert_eq!(heading_depth("3.2.1"), 3);
    }

    // ISA 6はマーカー長 = 深さ + 1
    #[test]
    fn test_heading_line_v6() {
        let schema = VersionSchema::resolve(IsaVersion::V6De);
        let section = schema.section(SectionKind::InformationSecurity);
        let table = SectionTable::new(labels(&[]), vec![row("2.1.3", "Access control", &[])]);

        let output = render_section(&table, section, &normalizer());
        assert!(output.starts_with("#### 2.1.3 Access control"));
    }

    // ISA 5.1はマーカー長 = 深さ
    #[test]
    fn test_heading_line_v5_1() {
        let schema = VersionSchema::resolve(IsaVersion::V5_1De);
        let section = schema.section(SectionKind::InformationSecurity);
        let table = SectionTable::new(labels(&[]), vec![row("2.1.3", "Access control", &[])]);

        let output = render_section(&table, section, &normalizer());
        assert!(output.starts_with("### 2.1.3 Access control"));
    }

    // トップレベル見出し（深さ1）は構造のみで、フィールドブロックを持たない
    #[test]
    fn test_top_level_heading_has_no_block() {
        let schema = VersionSchema::resolve(IsaVersion::V5_1De);
        let section = schema.section(SectionKind::InformationSecurity);
        let table = SectionTable::new(
            labels(&[(FieldKey::Goal, "Ziel")]),
            vec![row("1", "Organisation", &[(FieldKey::Goal, "ignored")])],
        );

        let output = render_section(&table, section, &normalizer());
        assert_eq!(output, "# 1 Organisation\n");
    }

    // メインセクションは深さ3以上でのみブロックを出力する
    #[test]
    fn test_main_block_depth_threshold() {
        let schema = VersionSchema::resolve(IsaVersion::V5_1De);
        let section = schema.section(SectionKind::InformationSecurity);
        let table = SectionTable::new(
            labels(&[(FieldKey::Goal, "Ziel")]),
            vec![
                row("1.1", "Richtlinien", &[(FieldKey::Goal, "shallow")]),
                row("1.1.1", "Leitlinie", &[(FieldKey::Goal, "deep")]),
            ],
        );

        let output = render_section(&table, section, &normalizer());
        assert!(!output.contains("shallow"));
        assert!(output.contains("deep"));
    }

    #[test]
    fn test_main_block_field_template() {
        let schema = VersionSchema::resolve(IsaVersion::V5_1De);
        let section = schema.section(SectionKind::InformationSecurity);
        let table = SectionTable::new(
            labels(&[
                (FieldKey::Goal, "Ziel"),
                (FieldKey::RequirementMust, "Anforderungen (muss)"),
                (FieldKey::RequirementShould, "Anforderungen (sollte)"),
                (FieldKey::RequirementHigh, "Anforderungen bei hohem Schutzbedarf"),
                (FieldKey::RequirementVeryHigh, "Anforderungen bei sehr hohem Schutzbedarf"),
            ]),
            vec![row(
                "1.1.1",
                "Leitlinie",
                &[
                    (FieldKey::Goal, "Goal text"),
                    (FieldKey::RequirementMust, "Must text"),
                    (FieldKey::RequirementShould, "Should text"),
                    (FieldKey::RequirementHigh, "High text"),
                    (FieldKey::RequirementVeryHigh, "Very high text"),
                ],
            )],
        );

        let output = render_section(&table, section, &normalizer());
        assert_eq!(
            output,
            "### 1.1.1 Leitlinie\n\
             \n\
             **Ziel**\n\
             \n\
             Goal text\n\
             \n\
             **Anforderungen (muss)**\n\
             \n\
             Must text\n\
             \n\
             **Anforderungen (sollte)**\n\
             \n\
             Should text\n\
             \n\
             **Anforderungen bei hohem Schutzbedarf**\n\
             \n\
             High text\n\
             \n\
             **Anforderungen bei sehr hohem Schutzbedarf**\n\
             \n\
             Very high text\n"
        );
    }

    // プロトタイプ保護は4フィールド（超高保護レベルは存在しない）
    #[test]
    fn test_prototype_block_has_four_fields() {
        let schema = VersionSchema::resolve(IsaVersion::V6De);
        let section = schema.section(SectionKind::PrototypeProtection);
        let table = SectionTable::new(
            labels(&[
                (FieldKey::Goal, "Ziel"),
                (FieldKey::RequirementMust, "muss"),
                (FieldKey::RequirementShould, "sollte"),
                (FieldKey::RequirementHigh, "hoch"),
            ]),
            vec![row(
                "6.1.1",
                "Perimeter",
                &[
                    (FieldKey::Goal, "g"),
                    (FieldKey::RequirementMust, "m"),
                    (FieldKey::RequirementShould, "s"),
                    (FieldKey::RequirementHigh, "h"),
                ],
            )],
        );

        let output = render_section(&table, section, &normalizer());
        assert_eq!(output.matches("**").count() / 2, 4);
        assert!(!output.contains("sehr hoch"));
    }

    // データ保護の深さ2の行: 5.1は目標のみ、6は目標+必須要求事項
    #[test]
    fn test_data_protection_fields_per_version() {
        let dp_labels = labels(&[
            (FieldKey::Goal, "Ziel"),
            (FieldKey::RequirementMust, "Anforderungen (muss)"),
        ]);
        let dp_row = row(
            "7.1",
            "Verarbeitung",
            &[
                (FieldKey::Goal, "Goal text"),
                (FieldKey::RequirementMust, "Must text"),
            ],
        );

        let v5 = VersionSchema::resolve(IsaVersion::V5_1De);
        let table = SectionTable::new(dp_labels.clone(), vec![dp_row.clone()]);
        let output = render_section(&table, v5.section(SectionKind::DataProtection), &normalizer());
        assert_eq!(output.matches("**").count() / 2, 1);
        assert!(output.contains("Goal text"));
        assert!(!output.contains("Must text"));

        let v6 = VersionSchema::resolve(IsaVersion::V6De);
        let table = SectionTable::new(dp_labels, vec![dp_row]);
        let output = render_section(&table, v6.section(SectionKind::DataProtection), &normalizer());
        assert_eq!(output.matches("**").count() / 2, 2);
        assert!(output.contains("Goal text"));
        assert!(output.contains("Must text"));
    }

    // ISA 6のメインセクション: メインブロックは正規化され、
    // 後置ブロック（ドキュメント/証跡）は正規化されずに連結される
    #[test]
    fn test_trailing_block_is_not_normalized() {
        let schema = VersionSchema::resolve(IsaVersion::V6De);
        let section = schema.section(SectionKind::InformationSecurity);
        let table = SectionTable::new(
            labels(&[
                (FieldKey::Goal, "Ziel"),
                (FieldKey::RequirementMust, "muss"),
                (FieldKey::RequirementShould, "sollte"),
                (FieldKey::RequirementHigh, "hoch"),
                (FieldKey::RequirementVeryHigh, "sehr hoch"),
                (FieldKey::Documentation, "Referenzdokumente"),
                (FieldKey::Proof, "Nachweis"),
            ]),
            vec![row(
                "1.1.1",
                "Leitlinie",
                &[
                    (FieldKey::Goal, "a\u{2013}b"),
                    (FieldKey::RequirementMust, "m"),
                    (FieldKey::RequirementShould, "s"),
                    (FieldKey::RequirementHigh, "h"),
                    (FieldKey::RequirementVeryHigh, "v"),
                    (FieldKey::Documentation, "doc\u{2013}ref"),
                    (FieldKey::Proof, "proof"),
                ],
            )],
        );

        let output = render_section(&table, section, &normalizer());
        // メインブロック内のダッシュはASCIIハイフンに統一される
        assert!(output.contains("a-b"));
        // 後置ブロック内のダッシュはそのまま残る
        assert!(output.contains("doc\u{2013}ref"));
        // 後置ブロックはメインブロックの後に続く
        let very_high_pos = output.find("\n\nv\n").unwrap();
        let doc_pos = output.find("**Referenzdokumente**").unwrap();
        assert!(doc_pos > very_high_pos);
    }

    // レンダリングは決定的: 同一入力からバイト単位で同一の出力を得る
    #[test]
    fn test_rendering_is_deterministic() {
        let schema = VersionSchema::resolve(IsaVersion::V6De);
        let section = schema.section(SectionKind::InformationSecurity);
        let table = SectionTable::new(
            labels(&[
                (FieldKey::Goal, "Ziel"),
                (FieldKey::RequirementMust, "muss"),
                (FieldKey::RequirementShould, "sollte"),
                (FieldKey::RequirementHigh, "hoch"),
                (FieldKey::RequirementVeryHigh, "sehr hoch"),
                (FieldKey::Documentation, "Referenzdokumente"),
                (FieldKey::Proof, "Nachweis"),
            ]),
            vec![
                row("1", "Organisation", &[]),
                row(
                    "1.1.1",
                    "Leitlinie",
                    &[
                        (FieldKey::Goal, "g"),
                        (FieldKey::RequirementMust, "m"),
                        (FieldKey::RequirementShould, "s"),
                        (FieldKey::RequirementHigh, "h"),
                        (FieldKey::RequirementVeryHigh, "v"),
                        (FieldKey::Documentation, "d"),
                        (FieldKey::Proof, "p"),
                    ],
                ),
            ],
        );

        let normalizer = normalizer();
        let first = render_section(&table, section, &normalizer);
        let second = render_section(&table, section, &normalizer);
        assert_eq!(first, second);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        /// 深さは番号文字列のドット数の純粋な関数である
        ///
        /// 番号としては不正な文字列（例: 末尾がドット）でも、深さは
        /// ドット数 + 1として導出されます。検証は行わない仕様です。
        proptest! {
            #[test]
            fn test_depth_is_dot_count_plus_one(number in "[0-9a-z.]{0,32}") {
                let dots = number.chars().filter(|c| *c == '.').count();
                prop_assert_eq!(heading_depth(&number), dots + 1);
            }
        }
    }

    // 行の順序はソースグリッドのまま保持される
    #[test]
    fn test_row_order_preserved() {
        let schema = VersionSchema::resolve(IsaVersion::V5_1De);
        let section = schema.section(SectionKind::InformationSecurity);
        let table = SectionTable::new(
            labels(&[]),
            vec![
                row("2", "Zweites", &[]),
                row("1", "Erstes", &[]),
            ],
        );

        let output = render_section(&table, section, &normalizer());
        let second_pos = output.find("Zweites").unwrap();
        let first_pos = output.find("Erstes").unwrap();
        assert!(second_pos < first_pos);
    }
}
