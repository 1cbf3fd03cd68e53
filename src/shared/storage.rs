/// ローカルキーバリューストア
///
/// ブラウザのlocalStorage相当の永続ストア。値はすべて文字列で保存し、
/// 構造化データはJSON文字列として格納する（スキーマのバージョン管理は行わない）。
use crate::shared::errors::{AppError, AppResult};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// ストアのキー定義
pub struct StorageKeys;

impl StorageKeys {
    /// 認証トークンのキー
    pub const TOKEN: &'static str = "token";
    /// ユーザープロフィール（JSON）のキー
    pub const USER: &'static str = "user";
    /// チェックアウトへ引き継ぐ車両IDのキー
    pub const SELECTED_CAR_ID: &'static str = "selectedCarId";
    /// チェックアウトへ引き継ぐ車両スナップショット（JSON）のキー
    pub const SELECTED_CAR_DATA: &'static str = "selectedCarData";
    /// ローカルカート（JSON配列）のキー
    pub const LOCAL_CART: &'static str = "rentacar_cart";
}

/// 文字列キーバリューストアの抽象
pub trait KeyValueStore: Send + Sync {
    /// 値を取得する（存在しない場合はNone）
    fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// 値を保存する
    fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// 値を削除する（存在しない場合も成功）
    fn remove(&self, key: &str) -> AppResult<()>;

    /// すべての値を削除する
    fn clear(&self) -> AppResult<()>;
}

/// JSON値として読み出す
///
/// 保存値が壊れている場合はエラーではなくNoneとして扱う
pub fn get_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> AppResult<Option<T>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            log::warn!("ストアの値を解析できませんでした: key={key}, error={e}");
            Ok(None)
        }
    }
}

/// JSON値として保存する
pub fn set_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> AppResult<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

/// メモリ上のストア（テストやセッション限定の利用向け）
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|e| AppError::storage(format!("ストアのロック取得に失敗しました: {e}")))
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn clear(&self) -> AppResult<()> {
        self.lock()?.clear();
        Ok(())
    }
}

/// JSONファイルに永続化するストア
///
/// 書き込みのたびにファイル全体を保存する
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileKeyValueStore {
    /// ストアファイルを開く（存在しない場合は空のストアとして開始）
    ///
    /// 解析できないファイルは`<ファイル名>.corrupt`へ退避し、空のストアとして開始する
    ///
    /// # 引数
    /// * `path` - ストアファイルのパス
    pub fn open<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = if path.exists() {
            let raw = fs::read(&path)?;
            if raw.iter().all(u8::is_ascii_whitespace) {
                BTreeMap::new()
            } else {
                match serde_json::from_slice(&raw) {
                    Ok(entries) => entries,
                    Err(e) => {
                        log::warn!(
                            "ストアファイルの解析に失敗したため空のストアで開始します: path={path:?}, error={e}"
                        );
                        Self::back_up_corrupt_file(&path);
                        BTreeMap::new()
                    }
                }
            }
        } else {
            BTreeMap::new()
        };

        log::debug!(
            "ストアファイルを開きました: path={path:?}, entries={}",
            entries.len()
        );

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// ストアファイルのパスを取得
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 壊れたストアファイルの退避先
    pub fn corrupt_backup_path(path: &Path) -> PathBuf {
        let mut file_name = path.file_name().unwrap_or_default().to_os_string();
        file_name.push(".corrupt");
        path.with_file_name(file_name)
    }

    fn back_up_corrupt_file(path: &Path) {
        let backup = Self::corrupt_backup_path(path);
        match fs::rename(path, &backup) {
            Ok(()) => log::warn!("壊れたストアファイルを退避しました: backup={backup:?}"),
            Err(e) => log::warn!("壊れたストアファイルを退避できませんでした: {e}"),
        }
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let raw = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }

    /// 変更を保存し、保存できた場合のみメモリ上の内容に反映する
    fn update<F>(&self, f: F) -> AppResult<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| AppError::storage(format!("ストアのロック取得に失敗しました: {e}")))?;
        let mut updated = entries.clone();
        f(&mut updated);
        self.persist(&updated)?;
        *entries = updated;
        Ok(())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| AppError::storage(format!("ストアのロック取得に失敗しました: {e}")))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.update(|entries| {
            entries.remove(key);
        })
    }

    fn clear(&self) -> AppResult<()> {
        self.update(|entries| entries.clear())?;
        log::warn!("ストアをクリアしました: path={:?}", self.path);
        Ok(())
    }
}
