use std::path::PathBuf;

/// アプリケーションの実行環境を表す列挙型
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    /// 開発環境
    Development,
    /// プロダクション環境
    Production,
}

/// 環境変数取得エラー
#[derive(Debug, Clone)]
pub struct EnvVarError {
    /// 変数名
    pub var_name: String,
    /// エラーメッセージ
    pub message: String,
}

impl std::fmt::Display for EnvVarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "環境変数 {} が見つかりません: {}",
            self.var_name, self.message
        )
    }
}

impl std::error::Error for EnvVarError {}

/// 環境変数を取得する（優先順位: 起動時 > コンパイル時 > エラー）
///
/// # 取得順序
/// 1. 起動時の環境変数（`std::env::var`）
/// 2. コンパイル時の環境変数（`option_env!`マクロ）
/// 3. どちらも見つからない場合はエラー
#[macro_export]
macro_rules! get_env_var {
    ($var_name:expr) => {{
        if let Ok(value) = std::env::var($var_name) {
            log::debug!("環境変数 {} を起動時の環境変数から取得しました", $var_name);
            Ok(value)
        } else if let Some(value) = option_env!($var_name) {
            log::debug!("環境変数 {} をコンパイル時の環境変数から取得しました", $var_name);
            Ok(value.to_string())
        } else {
            Err($crate::shared::config::environment::EnvVarError {
                var_name: $var_name.to_string(),
                message: format!(
                    "起動時の環境変数 {} もコンパイル時の環境変数も見つかりませんでした",
                    $var_name
                ),
            })
        }
    }};
}

/// 環境変数を取得する（オプション版）
#[macro_export]
macro_rules! get_env_var_optional {
    ($var_name:expr) => {{
        $crate::get_env_var!($var_name).ok()
    }};
}

/// 環境変数を取得する（デフォルト値付き）
#[macro_export]
macro_rules! get_env_var_or_default {
    ($var_name:expr, $default_value:expr) => {{
        $crate::get_env_var!($var_name).unwrap_or_else(|_| {
            log::debug!(
                "環境変数 {} が見つからないため、デフォルト値を使用します: {}",
                $var_name,
                $default_value
            );
            $default_value.to_string()
        })
    }};
}

/// 環境設定を管理する構造体
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    /// 実行環境
    pub environment: String,
    /// デバッグモードの有効/無効
    pub debug_mode: bool,
    /// ログレベル
    pub log_level: String,
}

impl EnvironmentConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Self {
        let environment = get_environment();
        let debug_mode = environment == Environment::Development;
        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| {
            if debug_mode {
                "debug".to_string()
            } else {
                "info".to_string()
            }
        });

        Self {
            environment: format!("{environment:?}").to_lowercase(),
            debug_mode,
            log_level,
        }
    }

    /// プロダクション環境かどうかを判定
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 開発環境かどうかを判定
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// 設定されたログレベルを`log::LevelFilter`に変換する
    ///
    /// 不明な値は`Info`として扱う
    pub fn level_filter(&self) -> log::LevelFilter {
        match self.log_level.to_lowercase().as_str() {
            "error" => log::LevelFilter::Error,
            "warn" => log::LevelFilter::Warn,
            "info" => log::LevelFilter::Info,
            "debug" => log::LevelFilter::Debug,
            "trace" => log::LevelFilter::Trace,
            "off" => log::LevelFilter::Off,
            _ => log::LevelFilter::Info,
        }
    }
}

/// 現在の実行環境を判定する
///
/// # 判定ロジック
/// 1. 実行時環境変数 ENVIRONMENT を確認
/// 2. デバッグビルドの場合は Development
/// 3. リリースビルドの場合は Production
pub fn get_environment() -> Environment {
    if let Ok(env_var) = std::env::var("ENVIRONMENT") {
        let env = match env_var.as_str() {
            "production" => Environment::Production,
            _ => Environment::Development,
        };
        log::debug!("環境判定: 実行時環境変数を使用 -> {env_var} -> {env:?}");
        return env;
    }

    let env = if cfg!(debug_assertions) {
        Environment::Development
    } else {
        Environment::Production
    };
    log::debug!(
        "環境判定: ビルド設定を使用 -> debug_assertions={} -> {env:?}",
        cfg!(debug_assertions)
    );
    env
}

/// 環境変数の読み込みを行う
///
/// 開発ビルドの場合のみ.envファイルを読み込む。
/// 本番ビルドでは環境変数は実行時に設定されていることを前提とする。
pub fn load_environment_variables() {
    if cfg!(debug_assertions) {
        match dotenv::dotenv() {
            Ok(path) => {
                log::debug!("環境ファイルを読み込みました: {}", path.display());
            }
            Err(e) => {
                log::debug!("環境ファイルの読み込みをスキップしました: {e}");
            }
        }
    }
}

/// ログシステムを初期化する
///
/// 二重初期化はエラーにせず無視する（テストやUIシェルの再起動で呼ばれるため）
pub fn initialize_logging_system() {
    let env_config = EnvironmentConfig::from_env();

    let result = env_logger::Builder::from_default_env()
        .filter_level(env_config.level_filter())
        .format_timestamp_secs()
        .format_module_path(false)
        .format_target(false)
        .try_init();

    match result {
        Ok(()) => log::info!(
            "ログシステムを初期化しました: level={}, environment={}",
            env_config.log_level,
            env_config.environment
        ),
        Err(_) => log::debug!("ログシステムは既に初期化されています"),
    }
}

/// APIサーバーのデフォルトURL
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// API設定を管理する構造体
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// APIサーバーのベースURL（末尾スラッシュなし）
    pub base_url: String,
    /// リクエストのタイムアウト（秒）。未設定の場合はクライアント側で打ち切らない
    pub timeout_seconds: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_seconds: None,
        }
    }
}

impl ApiConfig {
    /// 環境変数からAPI設定を読み込む
    ///
    /// `API_SERVER_URL`が未設定の場合はデフォルトURLを使用する
    pub fn from_env() -> Self {
        let base_url = crate::get_env_var_or_default!("API_SERVER_URL", DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        let timeout_seconds = crate::get_env_var_optional!("API_TIMEOUT_SECONDS").and_then(|v| {
            v.parse::<u64>()
                .map_err(|_| {
                    log::warn!("API_TIMEOUT_SECONDSのパースに失敗しました: {v}");
                })
                .ok()
        });

        log::info!("API設定: base_url={base_url}, timeout={timeout_seconds:?}");

        Self {
            base_url,
            timeout_seconds,
        }
    }

    /// 設定を検証する
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("APIサーバーのベースURLが設定されていません".to_string());
        }

        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(format!(
                "APIサーバーのベースURLはhttp(s)で始まる必要があります: {}",
                self.base_url
            ));
        }

        if self.timeout_seconds == Some(0) {
            return Err("APIタイムアウトは0より大きい値である必要があります".to_string());
        }

        Ok(())
    }

    /// APIサーバーがlocalhostかどうかを判定
    pub fn is_localhost(&self) -> bool {
        self.base_url.contains("localhost") || self.base_url.contains("127.0.0.1")
    }
}

/// ローカルストアのファイル名
pub const STORE_FILE_NAME: &str = "storefront.json";

/// ローカルストア設定
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// ストアファイルのパス
    pub store_path: PathBuf,
}

impl StorageConfig {
    /// 環境変数からストア設定を読み込む
    ///
    /// `STOREFRONT_STORE_PATH`が未設定の場合はユーザーデータディレクトリ配下を使用する
    pub fn from_env() -> Self {
        let store_path = crate::get_env_var_optional!("STOREFRONT_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_store_path);

        log::debug!("ストア設定: store_path={store_path:?}");
        Self { store_path }
    }
}

/// デフォルトのストアファイルパスを取得する
fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("rentacar")
        .join(STORE_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_equality() {
        assert_eq!(Environment::Development, Environment::Development);
        assert_eq!(Environment::Production, Environment::Production);
        assert_ne!(Environment::Development, Environment::Production);
    }

    #[test]
    fn test_get_environment() {
        let env = get_environment();
        assert!(matches!(
            env,
            Environment::Development | Environment::Production
        ));
    }

    #[test]
    fn test_environment_config_methods() {
        let dev_config = EnvironmentConfig {
            environment: "development".to_string(),
            debug_mode: true,
            log_level: "debug".to_string(),
        };

        let prod_config = EnvironmentConfig {
            environment: "production".to_string(),
            debug_mode: false,
            log_level: "info".to_string(),
        };

        assert!(dev_config.is_development());
        assert!(!dev_config.is_production());
        assert!(!prod_config.is_development());
        assert!(prod_config.is_production());
    }

    #[test]
    fn test_level_filter() {
        let mut config = EnvironmentConfig {
            environment: "development".to_string(),
            debug_mode: true,
            log_level: "WARN".to_string(),
        };
        assert_eq!(config.level_filter(), log::LevelFilter::Warn);

        // 不明な値はInfoにフォールバック
        config.log_level = "verbose".to_string();
        assert_eq!(config.level_filter(), log::LevelFilter::Info);
    }

    #[test]
    fn test_api_config_validate() {
        assert!(ApiConfig::default().validate().is_ok());

        let empty = ApiConfig {
            base_url: String::new(),
            timeout_seconds: None,
        };
        assert!(empty.validate().is_err());

        let bad_scheme = ApiConfig {
            base_url: "ftp://example.com".to_string(),
            timeout_seconds: None,
        };
        assert!(bad_scheme.validate().is_err());

        let zero_timeout = ApiConfig {
            base_url: "https://api.example.com".to_string(),
            timeout_seconds: Some(0),
        };
        assert!(zero_timeout.validate().is_err());
    }

    #[test]
    fn test_api_config_is_localhost() {
        assert!(ApiConfig::default().is_localhost());

        let remote = ApiConfig {
            base_url: "https://api.rentacar.example".to_string(),
            timeout_seconds: Some(10),
        };
        assert!(!remote.is_localhost());
    }

    #[test]
    fn test_default_store_path() {
        let path = default_store_path();
        assert!(path.ends_with(STORE_FILE_NAME));
    }

    #[test]
    fn test_initialize_logging_twice() {
        // 二回呼んでもパニックしないことを確認
        initialize_logging_system();
        initialize_logging_system();
    }
}
