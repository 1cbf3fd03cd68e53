use crate::shared::config::environment::{
    get_environment, initialize_logging_system, load_environment_variables, ApiConfig,
    Environment, StorageConfig,
};
use crate::shared::errors::{AppError, AppResult};
use std::fs;
use std::path::{Path, PathBuf};

/// アプリケーション初期化の結果を表す構造体
#[derive(Debug, Clone)]
pub struct InitializationResult {
    /// 初回起動かどうか（ストアファイルが存在しなかった）
    pub is_first_run: bool,
    /// ローカルストアのファイルパス
    pub store_path: PathBuf,
    /// 実行環境
    pub environment: Environment,
    /// API設定
    pub api_config: ApiConfig,
}

/// アプリケーションの初期化を実行する
///
/// # 戻り値
/// 初期化結果、または失敗時はエラー
///
/// # 処理内容
/// 1. 環境変数の読み込みとログシステムの初期化
/// 2. API設定の読み込みと検証
/// 3. ストアディレクトリの作成と初回起動の判定
pub fn initialize_application() -> AppResult<InitializationResult> {
    load_environment_variables();
    initialize_logging_system();

    let environment = get_environment();

    let api_config = ApiConfig::from_env();
    api_config.validate().map_err(AppError::configuration)?;

    if environment == Environment::Production && api_config.is_localhost() {
        log::warn!(
            "本番環境でlocalhostのAPIサーバーが設定されています: {}",
            api_config.base_url
        );
    }

    let store_path = StorageConfig::from_env().store_path;
    ensure_store_directory(&store_path)?;

    // ストアファイルの有無で初回起動を判定
    let is_first_run = !store_path.exists();
    if is_first_run {
        log_first_run_initialization(&environment, &store_path);
    }

    Ok(InitializationResult {
        is_first_run,
        store_path,
        environment,
        api_config,
    })
}

/// ストアファイルの親ディレクトリを確実に作成する
fn ensure_store_directory(store_path: &Path) -> AppResult<()> {
    let Some(parent) = store_path.parent() else {
        return Ok(());
    };

    if parent.as_os_str().is_empty() || parent.exists() {
        return Ok(());
    }

    fs::create_dir_all(parent).map_err(|e| {
        AppError::configuration(format!("ストアディレクトリの作成に失敗: {e}"))
    })?;
    log::info!("ストアディレクトリを作成しました: {parent:?}");

    Ok(())
}

/// 初回起動時の初期化ログを出力する
fn log_first_run_initialization(environment: &Environment, store_path: &Path) {
    log::info!("=== アプリケーション初回起動 ===");
    log::info!("実行環境: {environment:?}");
    log::info!("ストアファイル: {store_path:?}");
}

/// 初期化完了ログを出力する
///
/// # 引数
/// * `result` - 初期化結果
pub fn log_initialization_complete(result: &InitializationResult) {
    if result.is_first_run {
        log::info!("=== 初期化完了 ===");
        log::info!("初回起動の初期化が正常に完了しました");
    } else {
        log::info!("アプリケーション起動完了（既存ストアを使用）");
    }
    log::info!("環境: {:?}", result.environment);
    log::info!("APIサーバー: {}", result.api_config.base_url);
    log::info!("ストア: {:?}", result.store_path);
}
