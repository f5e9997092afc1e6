//! Builder Module
//!
//! Fluent Builder APIを提供し、`Converter`インスタンスを段階的に構築する。

use std::io::{Cursor, Read, Seek, Write};

use crate::api::{IsaVersion, SectionKind};
use crate::error::Isa2MdError;
use crate::normalize::TextNormalizer;
use crate::schema::VersionSchema;

/// 変換処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct ConversionConfig {
    /// ISAバージョン（必須、デフォルトなし）
    pub version: Option<IsaVersion>,

    /// プロトタイプ保護セクションを出力するか
    pub include_prototype: bool,

    /// データ保護セクションを出力するか
    pub include_data_protection: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            version: None,
            include_prototype: false,
            include_data_protection: false,
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// `Converter`インスタンスを段階的に構築するためのビルダーです。
/// バージョンは必須で、デフォルト値を持ちません。プロトタイプ保護と
/// データ保護のセクションはオプトインです。
///
/// # 使用例
///
/// ```rust
/// use isa2md::{ConverterBuilder, IsaVersion};
///
/// # fn main() -> Result<(), isa2md::Isa2MdError> {
/// let converter = ConverterBuilder::new()
///     .with_version(IsaVersion::V6De)
///     .include_prototype(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConverterBuilder {
    /// 内部設定（構築中）
    config: ConversionConfig,
}

impl ConverterBuilder {
    /// ビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - バージョン: 未設定（`build()`前に`with_version`が必要）
    /// - プロトタイプ保護セクション: 出力しない
    /// - データ保護セクション: 出力しない
    pub fn new() -> Self {
        Self {
            config: ConversionConfig::default(),
        }
    }

    /// ISAバージョンを指定する
    ///
    /// 文字列からの変換には`IsaVersion`の`FromStr`を使用してください。
    /// 認識されない識別子はその時点で`Isa2MdError::UnsupportedVersion`になり、
    /// ファイルI/Oは一切行われません。
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use isa2md::{ConverterBuilder, IsaVersion};
    ///
    /// # fn main() -> Result<(), isa2md::Isa2MdError> {
    /// let version: IsaVersion = "5_1_DE".parse()?;
    /// let builder = ConverterBuilder::new().with_version(version);
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_version(mut self, version: IsaVersion) -> Self {
        self.config.version = Some(version);
        self
    }

    /// プロトタイプ保護セクションを出力に含めるかを指定する
    pub fn include_prototype(mut self, include: bool) -> Self {
        self.config.include_prototype = include;
        self
    }

    /// データ保護セクションを出力に含めるかを指定する
    pub fn include_data_protection(mut self, include: bool) -> Self {
        self.config.include_data_protection = include;
        self
    }

    /// 設定を検証し、`Converter`インスタンスを生成する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Converter)`: 設定が有効な場合
    /// * `Err(Isa2MdError::Config)`: バージョンが未設定の場合
    pub fn build(self) -> Result<Converter, Isa2MdError> {
        // 1. バージョンの検証（スキーマテーブルはここで1回だけ解決される）
        let version = self.config.version.ok_or_else(|| {
            Isa2MdError::Config("ISA version is required: call with_version() first".to_string())
        })?;
        let schema = VersionSchema::resolve(version);

        // 2. 正規化ルール列のコンパイル
        let normalizer = TextNormalizer::new()?;

        // 3. 出力するセクションの確定（ドキュメント順）
        let mut sections = vec![SectionKind::InformationSecurity];
        if self.config.include_prototype {
            sections.push(SectionKind::PrototypeProtection);
        }
        if self.config.include_data_protection {
            sections.push(SectionKind::DataProtection);
        }

        Ok(Converter {
            schema,
            sections,
            normalizer,
        })
    }
}

/// 変換処理のファサード
///
/// ISAカタログ（Excelファイル）をMarkdown形式のテキストに変換するための
/// メインエントリーポイントです。1回の`convert`呼び出しが1回の変換で、
/// 呼び出し間で状態を保持しません。
///
/// # 使用例
///
/// ```rust,no_run
/// use isa2md::{ConverterBuilder, IsaVersion};
/// use std::fs::File;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let converter = ConverterBuilder::new()
///     .with_version(IsaVersion::V6De)
///     .build()?;
/// let input = File::open("isa6.xlsx")?;
/// let output = File::create("isa6.md")?;
/// converter.convert(input, output)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Converter {
    /// 解決済みスキーマテーブル（不変の設定値として各処理へ渡される）
    schema: VersionSchema,

    /// 出力するセクション（ドキュメント順）
    sections: Vec<SectionKind>,

    /// テキスト正規化パイプライン
    normalizer: TextNormalizer,
}

impl Converter {
    /// ISAカタログをMarkdown形式に変換する
    ///
    /// # 引数
    ///
    /// * `input` - Excelファイルを読み込むためのリーダー（Read + Seekトレイトを実装）
    /// * `output` - テキスト出力先のライター（Writeトレイトを実装）
    ///
    /// # 処理フロー
    ///
    /// 1. ワークブックを開く（ファイル全体をメモリに読み込む）
    /// 2. 各セクションについて: シートの読み込み → レンダリング → 正規化
    /// 3. セクションをドキュメント順に連結して書き出す
    ///
    /// 同期・単一スレッドの1パス処理で、途中結果のストリーミングは行いません。
    /// エラー時はその時点で中断し、部分的な出力の保証はありません。
    pub fn convert<R: Read + Seek, W: Write>(
        &self,
        input: R,
        mut output: W,
    ) -> Result<(), Isa2MdError> {
        let document = self.convert_to_string(input)?;
        output.write_all(document.as_bytes())?;
        output.flush()?;
        Ok(())
    }

    /// ISAカタログをMarkdown形式の文字列に変換する
    ///
    /// # 戻り値
    ///
    /// * `Ok(String)` - 変換されたドキュメント全体
    /// * `Err(Isa2MdError)` - 読み込みまたは変換に失敗した場合
    pub fn convert_to_string<R: Read + Seek>(&self, mut input: R) -> Result<String, Isa2MdError> {
        use crate::loader::load_section;
        use crate::renderer::render_section;

        // 1. ワークブックを開く（ファイル全体をメモリに読み込む）
        // calamineの`open_workbook_auto_from_rs`は`Clone`を要求するため、
        // `Clone`を実装しない`File`等も受け付けられるよう一度バッファへ読み込む。
        let mut buffer = Vec::new();
        input.read_to_end(&mut buffer)?;
        let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(buffer))?;

        // 2. 各セクションを読み込み、レンダリングする
        let mut document = String::new();
        for kind in &self.sections {
            let section_schema = self.schema.section(*kind);
            let table = load_section(&mut workbook, section_schema)?;
            document.push_str(&render_section(&table, section_schema, &self.normalizer));
        }

        Ok(document)
    }

    /// 解決済みのISAバージョンを返す
    pub fn version(&self) -> IsaVersion {
        self.schema.version
    }
}
