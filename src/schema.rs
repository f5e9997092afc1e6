//! Schema Module
//!
//! ISAバージョンごとのスキーマテーブル（シート位置、スキップ行数、行数上限、
//! フィールド→列位置の対応）を定義・解決するモジュール。
//!
//! バージョンごとの差異はすべてこのテーブルに集約されています。レンダラーは
//! バージョン文字列を一切参照せず、ここで解決されたポリシーのみを使用します。
//! 新しいバージョンの追加は、このモジュールのテーブルを1か所編集するだけで
//! 済むようになっています。

use std::collections::HashMap;

use crate::api::{IsaVersion, SectionKind};
use crate::error::Isa2MdError;

/// セマンティックなフィールド名
///
/// スプレッドシートの列を意味で参照するためのキー。実際の列位置は
/// `SectionSchema`のテーブルがバージョンごとに解決します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum FieldKey {
    /// コントロール番号（ドット区切りの番号文字列、例: "3.2.1"）
    ControlNumber,

    /// コントロール質問文
    ControlQuestion,

    /// 目標（Ziel）
    Goal,

    /// 必須要求事項（muss）
    RequirementMust,

    /// 推奨要求事項（sollte）
    RequirementShould,

    /// 高保護要求事項
    RequirementHigh,

    /// 超高保護要求事項
    RequirementVeryHigh,

    /// 参照ドキュメント（ISA 6で追加）
    Documentation,

    /// 実施証跡（ISA 6で追加）
    Proof,
}

/// 1セクション分のスキーマ
///
/// シート位置と行パラメータ、見出しレベルのオフセット、フィールドブロックの
/// 構成、およびフィールド→列位置の対応を保持します。
#[derive(Debug, Clone)]
pub(crate) struct SectionSchema {
    /// シートインデックス（0始まり）
    pub sheet_index: usize,

    /// ヘッダー行より前にスキップするタイトル行数
    pub skip_rows: usize,

    /// 取り込むデータ行数の上限（Noneは無制限）
    pub row_cap: Option<usize>,

    /// 見出しマーカー長に加算されるオフセット（ISA 6系で1、それ以前は0）
    pub heading_offset: usize,

    /// フィールドブロックを出力する最小の見出し深さ
    pub min_block_depth: usize,

    /// フィールドブロックに含まれるフィールド（出力順）
    pub block_fields: &'static [FieldKey],

    /// メインブロックの後に付加されるフィールド（出力順、ISA 6のメインセクションのみ）
    pub trailing_fields: &'static [FieldKey],

    /// フィールド→列位置（0始まり）の対応
    columns: HashMap<FieldKey, usize>,
}

impl SectionSchema {
    /// フィールドの列位置を解決する
    ///
    /// レンダラーが使用するすべてのフィールドは、サポートされる全バージョンで
    /// 列位置に解決できることが不変条件です。解決できない場合は設定エラーであり、
    /// 劣化したレンダリングにフォールバックしません。
    pub fn column(&self, field: FieldKey) -> Result<usize, Isa2MdError> {
        self.columns.get(&field).copied().ok_or_else(|| {
            Isa2MdError::Config(format!(
                "Field {:?} has no column mapping for sheet {}",
                field, self.sheet_index
            ))
        })
    }
}

/// 1バージョン分のスキーマテーブル
///
/// `IsaVersion`から1回だけ解決され、以降は読み取り専用の設定値として
/// 各変換処理に明示的に渡されます（グローバルな可変状態は持ちません）。
#[derive(Debug, Clone)]
pub(crate) struct VersionSchema {
    /// 解決元のバージョン
    pub version: IsaVersion,

    /// 情報セキュリティ（メイン）セクション
    main: SectionSchema,

    /// プロトタイプ保護セクション
    prototype: SectionSchema,

    /// データ保護セクション
    data_protection: SectionSchema,
}

/// メインセクションのフィールドブロック（目標 + 4段階の要求事項）
const MAIN_BLOCK_FIELDS: &[FieldKey] = &[
    FieldKey::Goal,
    FieldKey::RequirementMust,
    FieldKey::RequirementShould,
    FieldKey::RequirementHigh,
    FieldKey::RequirementVeryHigh,
];

/// ISA 6のメインセクションに付加されるフィールド
const MAIN_TRAILING_FIELDS_V6: &[FieldKey] = &[FieldKey::Documentation, FieldKey::Proof];

/// プロトタイプ保護のフィールドブロック（超高保護レベルは存在しない）
const PROTOTYPE_BLOCK_FIELDS: &[FieldKey] = &[
    FieldKey::Goal,
    FieldKey::RequirementMust,
    FieldKey::RequirementShould,
    FieldKey::RequirementHigh,
];

/// データ保護のフィールドブロック（ISA 6: 目標 + 必須要求事項）
const DATA_PROTECTION_BLOCK_FIELDS_V6: &[FieldKey] =
    &[FieldKey::Goal, FieldKey::RequirementMust];

/// データ保護のフィールドブロック（ISA 5.1: 目標のみ）
const DATA_PROTECTION_BLOCK_FIELDS_V5_1: &[FieldKey] = &[FieldKey::Goal];

/// メインコントロールセットのシートインデックス（5枚目）
const MAIN_SHEET: usize = 4;

/// プロトタイプ保護コントロールのシートインデックス（6枚目）
const PROTOTYPE_SHEET: usize = 5;

/// データ保護コントロールのシートインデックス（7枚目）
const DATA_PROTECTION_SHEET: usize = 6;

/// 各シートの先頭にあるタイトル行数
const TITLE_ROWS: usize = 1;

fn column_map(entries: &[(FieldKey, usize)]) -> HashMap<FieldKey, usize> {
    entries.iter().copied().collect()
}

impl VersionSchema {
    /// バージョンからスキーマテーブルを解決する
    ///
    /// `IsaVersion`は閉じた集合なので、この関数は全域です。未対応バージョンの
    /// 失敗は文字列→`IsaVersion`の変換時点（`FromStr`）で発生します。
    pub fn resolve(version: IsaVersion) -> Self {
        match version {
            IsaVersion::V6De => Self {
                version,
                main: SectionSchema {
                    sheet_index: MAIN_SHEET,
                    skip_rows: TITLE_ROWS,
                    row_cap: None,
                    heading_offset: 1,
                    min_block_depth: 3,
                    block_fields: MAIN_BLOCK_FIELDS,
                    trailing_fields: MAIN_TRAILING_FIELDS_V6,
                    columns: column_map(&[
                        (FieldKey::ControlNumber, 2),
                        (FieldKey::ControlQuestion, 7),
                        (FieldKey::Goal, 8),
                        (FieldKey::RequirementMust, 9),
                        (FieldKey::RequirementShould, 10),
                        (FieldKey::RequirementHigh, 11),
                        (FieldKey::RequirementVeryHigh, 12),
                        (FieldKey::Documentation, 13),
                        (FieldKey::Proof, 14),
                    ]),
                },
                prototype: SectionSchema {
                    sheet_index: PROTOTYPE_SHEET,
                    skip_rows: TITLE_ROWS,
                    row_cap: None,
                    heading_offset: 1,
                    min_block_depth: 3,
                    block_fields: PROTOTYPE_BLOCK_FIELDS,
                    trailing_fields: &[],
                    columns: column_map(&[
                        (FieldKey::ControlNumber, 2),
                        (FieldKey::ControlQuestion, 7),
                        (FieldKey::Goal, 8),
                        (FieldKey::RequirementMust, 9),
                        (FieldKey::RequirementShould, 10),
                        (FieldKey::RequirementHigh, 11),
                    ]),
                },
                data_protection: SectionSchema {
                    sheet_index: DATA_PROTECTION_SHEET,
                    skip_rows: TITLE_ROWS,
                    row_cap: None,
                    heading_offset: 1,
                    min_block_depth: 2,
                    block_fields: DATA_PROTECTION_BLOCK_FIELDS_V6,
                    trailing_fields: &[],
                    columns: column_map(&[
                        (FieldKey::ControlNumber, 2),
                        (FieldKey::ControlQuestion, 7),
                        (FieldKey::Goal, 8),
                        (FieldKey::RequirementMust, 9),
                    ]),
                },
            },

            IsaVersion::V5_1De => Self {
                version,
                main: SectionSchema {
                    sheet_index: MAIN_SHEET,
                    skip_rows: TITLE_ROWS,
                    // 5.1のメインシートは末尾に集計行を持つため上限を設ける
                    row_cap: Some(59),
                    heading_offset: 0,
                    min_block_depth: 3,
                    block_fields: MAIN_BLOCK_FIELDS,
                    trailing_fields: &[],
                    columns: column_map(&[
                        (FieldKey::ControlNumber, 3),
                        (FieldKey::ControlQuestion, 8),
                        (FieldKey::Goal, 9),
                        (FieldKey::RequirementMust, 10),
                        (FieldKey::RequirementShould, 11),
                        (FieldKey::RequirementHigh, 12),
                        (FieldKey::RequirementVeryHigh, 13),
                    ]),
                },
                prototype: SectionSchema {
                    sheet_index: PROTOTYPE_SHEET,
                    skip_rows: TITLE_ROWS,
                    row_cap: None,
                    heading_offset: 0,
                    min_block_depth: 3,
                    block_fields: PROTOTYPE_BLOCK_FIELDS,
                    trailing_fields: &[],
                    columns: column_map(&[
                        (FieldKey::ControlNumber, 3),
                        (FieldKey::ControlQuestion, 8),
                        (FieldKey::Goal, 9),
                        (FieldKey::RequirementMust, 10),
                        (FieldKey::RequirementShould, 11),
                        (FieldKey::RequirementHigh, 12),
                    ]),
                },
                data_protection: SectionSchema {
                    sheet_index: DATA_PROTECTION_SHEET,
                    skip_rows: TITLE_ROWS,
                    row_cap: None,
                    heading_offset: 0,
                    min_block_depth: 2,
                    block_fields: DATA_PROTECTION_BLOCK_FIELDS_V5_1,
                    trailing_fields: &[],
                    columns: column_map(&[
                        (FieldKey::ControlNumber, 3),
                        (FieldKey::ControlQuestion, 8),
                        (FieldKey::Goal, 9),
                    ]),
                },
            },
        }
    }

    /// セクション種別に対応するスキーマを取得する
    pub fn section(&self, kind: SectionKind) -> &SectionSchema {
        match kind {
            SectionKind::InformationSecurity => &self.main,
            SectionKind::PrototypeProtection => &self.prototype,
            SectionKind::DataProtection => &self.data_protection,
        }
    }
}
