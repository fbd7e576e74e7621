// 内容ベースの重複検出エンジン
//
// 全ファイルの全量ハッシュは高価なので二段構えにする:
// まずバイトサイズでバケット化し、サイズが一意なファイルは即座に除外、
// 同サイズが2件以上あるバケットだけをストリーミングハッシュする。

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::core::types::{DuplicateGroup, FileEntry};

/// ハッシュ読み取りのチャンクサイズ（メモリ使用量の上限を固定する）
const HASH_CHUNK_SIZE: usize = 8 * 1024;

/// スキャン中に観測者へ通知される進捗
#[derive(Debug)]
pub enum DedupProgress<'a> {
    /// サイズバケット化フェーズ（ファイル1件ごと）
    Sized { done: usize, total: usize },
    /// ハッシュフェーズ（候補1件ごと、重複検出時は該当エントリ付き）
    Hashed {
        done: usize,
        total: usize,
        duplicate: Option<&'a FileEntry>,
    },
    /// サイズパスとハッシュパスの間にファイルが消えた等の読み取りエラー
    ReadError { path: &'a Path, error: &'a str },
}

/// スキャン結果
#[derive(Debug, Default)]
pub struct DedupScan {
    /// 2件以上のメンバーを持つ重複グループ（ハッシュ化順）
    pub groups: Vec<DuplicateGroup>,
    /// 実際に内容ハッシュを計算したファイル数（計測用）
    pub hashed_files: usize,
    /// 除外された読み取りエラー（致命的ではない）
    pub read_errors: Vec<(PathBuf, String)>,
    /// 観測者の要求により途中で打ち切られたか
    pub cancelled: bool,
}

pub struct DedupEngine;

impl DedupEngine {
    /// 二段階スキャンで重複グループを構築する
    ///
    /// `observer` はファイル1件ごとに呼ばれ、`false` を返すと
    /// その時点でスキャンを打ち切る（協調キャンセル）。
    pub fn find_duplicates<F>(entries: &[FileEntry], mut observer: F) -> DedupScan
    where
        F: FnMut(DedupProgress<'_>) -> bool,
    {
        let mut scan = DedupScan::default();
        if entries.is_empty() {
            return scan;
        }

        // フェーズ1: サイズでバケット化。一意サイズは重複になり得ない。
        let total = entries.len();
        let mut size_counts: HashMap<u64, usize> = HashMap::new();
        for (i, entry) in entries.iter().enumerate() {
            if !observer(DedupProgress::Sized {
                done: i + 1,
                total,
            }) {
                scan.cancelled = true;
                return scan;
            }
            *size_counts.entry(entry.size).or_default() += 1;
        }

        let candidates: Vec<&FileEntry> = entries
            .iter()
            .filter(|e| size_counts.get(&e.size).copied().unwrap_or(0) > 1)
            .collect();

        // フェーズ2: 候補のみ内容ハッシュ。最初に見たものが正本。
        let candidate_total = candidates.len();
        let mut order: Vec<String> = Vec::new();
        let mut by_hash: HashMap<String, Vec<FileEntry>> = HashMap::new();

        for (i, entry) in candidates.iter().enumerate() {
            let mut duplicate = None;
            match Self::content_hash(&entry.path) {
                Ok(hash) => {
                    scan.hashed_files += 1;
                    let members = by_hash.entry(hash.clone()).or_insert_with(|| {
                        order.push(hash);
                        Vec::new()
                    });
                    members.push((*entry).clone());
                    if members.len() > 1 {
                        duplicate = Some(*entry);
                    }
                }
                Err(err) => {
                    let message = err.to_string();
                    let keep_going = observer(DedupProgress::ReadError {
                        path: &entry.path,
                        error: &message,
                    });
                    scan.read_errors.push((entry.path.clone(), message));
                    if !keep_going {
                        scan.cancelled = true;
                        return scan;
                    }
                }
            }
            if !observer(DedupProgress::Hashed {
                done: i + 1,
                total: candidate_total,
                duplicate,
            }) {
                scan.cancelled = true;
                return scan;
            }
        }

        scan.groups = order
            .into_iter()
            .filter_map(|hash| {
                let members = by_hash.remove(&hash)?;
                (members.len() >= 2).then_some(DuplicateGroup { hash, members })
            })
            .collect();
        scan
    }

    /// ファイル全体のblake3ダイジェストを固定サイズのチャンクで計算する
    pub fn content_hash(path: &Path) -> io::Result<String> {
        let mut file = File::open(path)?;
        let mut hasher = blake3::Hasher::new();
        let mut buffer = [0u8; HASH_CHUNK_SIZE];
        loop {
            let read = file.read(&mut buffer)?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }
        Ok(hasher.finalize().to_hex().to_string())
    }
}
