//! Table Loader Module
//!
//! calamineで読み込んだワークブックから、1セクション分のシートを
//! 行・列のテキストグリッドとして取り出すモジュール。
//!
//! すべてのセル値はテキストとして読み取ります（数値・日付への型変換は
//! 行いません）。混在コンテンツのフィールドの書式を保持するためです。

use std::collections::HashMap;
use std::io::{Read, Seek};

use calamine::{Data, Reader, Sheets};

use crate::error::Isa2MdError;
use crate::schema::{FieldKey, SectionSchema};

/// 1コントロール項目
///
/// ドット区切りの番号文字列、質問文、およびセマンティックなフィールド名で
/// 参照される自由記述フィールドの集合。ソースグリッドの出現順のまま保持され、
/// 並べ替えは行いません。一度構築された後は読み取り専用です。
#[derive(Debug, Clone)]
pub(crate) struct ControlRow {
    /// コントロール番号（例: "3.2.1"）
    pub number: String,

    /// コントロール質問文
    pub question: String,

    /// フィールド値（セマンティックなフィールド名をキーとする）
    fields: HashMap<FieldKey, String>,
}

impl ControlRow {
    /// 新しいコントロール行を構築する
    pub fn new(number: String, question: String, fields: HashMap<FieldKey, String>) -> Self {
        Self {
            number,
            question,
            fields,
        }
    }

    /// フィールド値を取得する（存在しない場合は空文字列）
    pub fn field(&self, key: FieldKey) -> &str {
        self.fields.get(&key).map(String::as_str).unwrap_or("")
    }
}

/// 1セクション分のテーブル
///
/// 正規化済みの列ヘッダーラベルと、コントロール行の順序付きシーケンス。
#[derive(Debug, Clone)]
pub(crate) struct SectionTable {
    /// 列ヘッダーラベル（改行を除去済み、フィールドブロックの見出しに使用）
    labels: HashMap<FieldKey, String>,

    /// コントロール行（ソースグリッドの出現順）
    pub rows: Vec<ControlRow>,
}

impl SectionTable {
    /// 新しいセクションテーブルを構築する
    pub fn new(labels: HashMap<FieldKey, String>, rows: Vec<ControlRow>) -> Self {
        Self { labels, rows }
    }

    /// フィールドの列ヘッダーラベルを取得する
    pub fn label(&self, key: FieldKey) -> &str {
        self.labels.get(&key).map(String::as_str).unwrap_or("")
    }
}

/// ワークブックから1セクション分のシートを読み込む
///
/// # 引数
///
/// * `workbook` - calamineで開いたワークブック
/// * `schema` - 対象セクションのスキーマ（シート位置、スキップ行数、列対応）
///
/// # 戻り値
///
/// * `Ok(SectionTable)` - 読み込みに成功した場合
/// * `Err(Isa2MdError::Config)` - シートインデックスまたはスキップ行数が
///   ファイルの実態と矛盾する場合（リトライせず中断）
/// * `Err(Isa2MdError::MissingControlNumber)` - 内容のある行の番号セルが空の場合
pub(crate) fn load_section<RS: Read + Seek>(
    workbook: &mut Sheets<RS>,
    schema: &SectionSchema,
) -> Result<SectionTable, Isa2MdError> {
    // 1. シートを取得
    let sheet_count = workbook.sheet_names().len();
    let range = workbook
        .worksheet_range_at(schema.sheet_index)
        .ok_or_else(|| {
            Isa2MdError::Config(format!(
                "Sheet index {} is out of range (total: {})",
                schema.sheet_index, sheet_count
            ))
        })?
        .map_err(Isa2MdError::Parse)?;

    // 2. タイトル行をスキップしてヘッダー行を特定
    let grid: Vec<&[Data]> = range.rows().collect();
    if grid.len() <= schema.skip_rows {
        return Err(Isa2MdError::Config(format!(
            "Skip count {} is out of range for sheet {} (rows: {})",
            schema.skip_rows,
            schema.sheet_index,
            grid.len()
        )));
    }
    let header_row = grid[schema.skip_rows];

    // 3. 列ヘッダーラベルを読み取り、埋め込まれた改行を除去
    let fields = rendered_fields(schema);
    let mut labels = HashMap::new();
    for &field in &fields {
        let col = schema.column(field)?;
        let cell = header_row.get(col).ok_or_else(|| {
            Isa2MdError::Config(format!(
                "Column {} is out of range for sheet {} header (columns: {})",
                col,
                schema.sheet_index,
                header_row.len()
            ))
        })?;
        labels.insert(field, strip_line_breaks(&cell_text(cell)));
    }

    // 4. データ行を取り込む（行数上限を適用、順序は保持）
    let number_col = schema.column(FieldKey::ControlNumber)?;
    let question_col = schema.column(FieldKey::ControlQuestion)?;
    let mut rows = Vec::new();
    for (data_idx, row) in grid[schema.skip_rows + 1..].iter().enumerate() {
        if let Some(cap) = schema.row_cap {
            if data_idx >= cap {
                break;
            }
        }

        let number = cell_text(row.get(number_col).unwrap_or(&Data::Empty));
        let question = cell_text(row.get(question_col).unwrap_or(&Data::Empty));
        let mut field_values = HashMap::new();
        for &field in &fields {
            let col = schema.column(field)?;
            field_values.insert(field, cell_text(row.get(col).unwrap_or(&Data::Empty)));
        }

        // 末尾の空行は取り込まない。内容があるのに番号が無い行はエラー。
        if field_values.values().all(|value| value.is_empty()) {
            continue;
        }
        if number.is_empty() {
            return Err(Isa2MdError::MissingControlNumber {
                sheet: schema.sheet_index,
                row: data_idx,
            });
        }

        rows.push(ControlRow::new(number, question, field_values));
    }

    Ok(SectionTable::new(labels, rows))
}

/// セクションのレンダリングに使用されるフィールドの一覧
fn rendered_fields(schema: &SectionSchema) -> Vec<FieldKey> {
    let mut fields = vec![FieldKey::ControlNumber, FieldKey::ControlQuestion];
    fields.extend_from_slice(schema.block_fields);
    fields.extend_from_slice(schema.trailing_fields);
    fields
}

/// セル値をテキストとして読み取る
///
/// 数値・日付への型変換は行いません。整数値の浮動小数点セルは末尾の`.0`を
/// 付けずに出力します（番号列が数値として保存されている場合のため）。
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// ヘッダーラベルから改行を除去する
///
/// スプレッドシート上で2行に折り返されたラベルを、レンダリングで使える
/// 1つの連続したラベルにします。改行以外の文字は変更しません。
fn strip_line_breaks(label: &str) -> String {
    label.replace(['\n', '\r'], "")
}
