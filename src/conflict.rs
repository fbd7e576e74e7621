// 出力先パスの競合解決
//
// 全ジョブは書き込み前に必ずここを通る。`Overwrite` の削除失敗だけが
// `Err` になり、呼び出し側はそれをファイル単位のエラーとして記録して
// スキップ扱いにする（黙殺しない）。

use chrono::Local;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::types::{ConflictDecision, ConflictPolicy};

pub struct ConflictResolver;

impl ConflictResolver {
    /// 出力先とポリシーから実効的な書き込み先を決める
    ///
    /// - 出力先が存在しない場合はそのまま進行
    /// - `Overwrite`: 既存のファイル/ディレクトリを削除して同じパスを返す
    /// - `Skip`: 何もせずスキップ
    /// - `CopyWithSuffix`: 同じディレクトリに時刻サフィックス付きの別名を作る
    pub fn resolve(target: &Path, policy: ConflictPolicy) -> io::Result<ConflictDecision> {
        if !target.exists() {
            return Ok(ConflictDecision::proceed(target.to_path_buf()));
        }

        match policy {
            ConflictPolicy::Overwrite => {
                if target.is_dir() {
                    fs::remove_dir_all(target)?;
                } else {
                    fs::remove_file(target)?;
                }
                Ok(ConflictDecision::proceed(target.to_path_buf()))
            }
            ConflictPolicy::Skip => Ok(ConflictDecision::skip()),
            ConflictPolicy::CopyWithSuffix => {
                Ok(ConflictDecision::proceed(Self::suffixed(target)))
            }
        }
    }

    /// `stem_HHMMSS.ext` 形式の別名を生成する
    ///
    /// 同一秒内の衝突はさらに `_2`, `_3`, ... の連番で回避する
    fn suffixed(target: &Path) -> PathBuf {
        let parent = target.parent().unwrap_or_else(|| Path::new(""));
        let stem = target
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("file");
        let dot_ext = target
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();

        let stamp = Local::now().format("%H%M%S");
        let mut candidate = parent.join(format!("{stem}_{stamp}{dot_ext}"));
        let mut counter = 2;
        while candidate.exists() {
            candidate = parent.join(format!("{stem}_{stamp}_{counter}{dot_ext}"));
            counter += 1;
        }
        candidate
    }
}
