// 画像処理コラボレータの抽象化インターフェース
//
// コーデックや復元アルゴリズムの実体は差し替え可能にし、
// ジョブはこのトレイト越しにのみ画像へ触れる。

use image::{DynamicImage, GrayImage};
use mockall::automock;
use std::path::Path;

use crate::core::error::ImagingError;
use crate::core::types::OutputFormat;

/// 画像のデコード・エンコード・メタデータ除去を提供するバックエンド
#[automock]
pub trait ImagingBackend: Send + Sync {
    /// ファイルを読み込んでデコードする
    fn decode(&self, path: &Path) -> Result<DynamicImage, ImagingError>;

    /// 指定フォーマットで高品質にエンコードして書き出す
    fn encode(
        &self,
        image: &DynamicImage,
        path: &Path,
        format: OutputFormat,
    ) -> Result<(), ImagingError>;

    /// ピクセルデータのみを新しいバッファへ写し、付随メタデータを捨てる
    ///
    /// 寸法とカラーモードは維持される
    fn strip_metadata(&self, image: &DynamicImage) -> DynamicImage;
}

/// 修復ジョブが必要とする任意提供の復元機能
///
/// エッジ検出・輪郭からのマスク生成・インペインティングの3機能が揃って
/// 初めて修復が可能になる。提供されない環境では修復ジョブは
/// 「機能なし」として即時完了する。
#[automock]
pub trait RestorationBackend: Send + Sync {
    /// 損傷候補のエッジを検出する
    fn detect_edges(&self, image: &DynamicImage) -> anyhow::Result<GrayImage>;

    /// 検出エッジの輪郭から二値の損傷マスクを構築する
    fn build_damage_mask(&self, edges: &GrayImage) -> anyhow::Result<GrayImage>;

    /// マスク領域をインペインティングで復元する
    fn inpaint(&self, image: &DynamicImage, mask: &GrayImage) -> anyhow::Result<DynamicImage>;
}

/// 復元バックエンド未搭載を表す型（値は存在しない）
pub enum NoRestoration {}

impl RestorationBackend for NoRestoration {
    fn detect_edges(&self, _image: &DynamicImage) -> anyhow::Result<GrayImage> {
        match *self {}
    }

    fn build_damage_mask(&self, _edges: &GrayImage) -> anyhow::Result<GrayImage> {
        match *self {}
    }

    fn inpaint(&self, _image: &DynamicImage, _mask: &GrayImage) -> anyhow::Result<DynamicImage> {
        match *self {}
    }
}
