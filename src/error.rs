//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// isa2mdクレート全体で使用するエラー型
///
/// ISAカタログ（Excelファイル）の読み込み、スキーマ解決、変換処理中に発生する
/// すべてのエラーを統一的に扱うために使用されます。
///
/// # エラーの種類
///
/// - `UnsupportedVersion`: 認識されないISAバージョン識別子（I/O開始前に発生）
/// - `Io`: I/O操作中に発生したエラー（ファイル読み込み失敗など）
/// - `Parse`: Excelファイルの解析中に発生したエラー（calamine由来）
/// - `Config`: シート指定や設定の検証に失敗したエラー
/// - `MissingControlNumber`: コントロール番号セルが空の行を検出したエラー
///
/// # 使用例
///
/// ```rust,no_run
/// use isa2md::Isa2MdError;
/// use std::fs::File;
///
/// fn open_catalogue(path: &str) -> Result<(), Isa2MdError> {
///     let file = File::open(path)?;  // Ioエラーが自動的に変換される
///     // ... 処理 ...
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum Isa2MdError {
    /// 認識されないISAバージョン識別子
    ///
    /// スキーマテーブルが定義されていないバージョン文字列が指定された場合に
    /// 発生します。ファイルI/Oを一切行う前に検出されます。
    #[error("Unsupported ISA version '{version}': only 6_DE and 5_1_DE are implemented")]
    UnsupportedVersion {
        /// 指定されたバージョン識別子
        version: String,
    },

    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Excelファイルの解析中に発生したエラー
    ///
    /// calamineクレートがExcelファイルを解析する際に発生したエラーです。
    /// ファイル形式が不正、破損したファイルなどが原因となります。
    /// 変換やリトライは行わず、そのまま呼び出し元へ伝播します。
    #[error("Failed to parse Excel file: {0}")]
    Parse(#[from] calamine::Error),

    /// 設定の検証に失敗したエラー
    ///
    /// シートインデックスが範囲外、スキップ行数がシート行数を超えている、
    /// ヘッダー行に必要な列が存在しない、といった場合に発生します。
    #[error("Configuration error: {0}")]
    Config(String),

    /// コントロール番号セルが空の行を検出したエラー
    ///
    /// 他の列に内容があるにもかかわらず番号列が空の行は、暗黙に処理を続行せず、
    /// シート番号とデータ行番号を添えて即座に失敗します。
    #[error("Missing control number at sheet {sheet}, data row {row}")]
    MissingControlNumber {
        /// エラーが発生したシートのインデックス（0始まり）
        sheet: usize,
        /// エラーが発生したデータ行のインデックス（0始まり）
        row: usize,
    },
}
