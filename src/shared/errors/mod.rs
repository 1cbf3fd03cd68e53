use thiserror::Error;

/// ストアフロント全体で使用される統一エラー型
#[derive(Debug, Error)]
pub enum AppError {
    /// バリデーション関連のエラー（フォーム入力など）
    #[error("バリデーションエラー: {0}")]
    Validation(String),

    /// リソースが見つからない場合のエラー
    #[error("リソースが見つかりません: {0}")]
    NotFound(String),

    /// バックエンドAPIが失敗ステータスを返した場合のエラー
    #[error("外部サービスエラー: {0}")]
    ExternalService(String),

    /// 通信（トランスポート）レベルのエラー
    #[error("ネットワークエラー: {0}")]
    Network(String),

    /// ローカルのキーバリューストア関連のエラー
    #[error("ストレージエラー: {0}")]
    Storage(String),

    /// 設定関連のエラー
    #[error("設定エラー: {0}")]
    Configuration(String),

    /// I/O関連のエラー
    #[error("I/Oエラー: {0}")]
    Io(#[from] std::io::Error),

    /// JSON解析エラー
    #[error("JSON解析エラー: {0}")]
    Json(#[from] serde_json::Error),
}

/// エラーの重要度を表す列挙型
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorSeverity {
    /// 低重要度（ユーザー入力エラーなど）
    Low,
    /// 中重要度（バックエンドの一時的エラーなど）
    Medium,
    /// 高重要度（設定ミスなど）
    High,
}

impl AppError {
    /// ユーザーに表示するためのフレンドリーなメッセージを取得
    ///
    /// # 戻り値
    /// 通知（トースト）にそのまま表示できるメッセージ
    pub fn user_message(&self) -> &str {
        match self {
            AppError::Validation(msg) => msg,
            AppError::NotFound(msg) => msg,
            AppError::ExternalService(msg) => msg,
            AppError::Network(_) => "Unable to reach the server. Please try again.",
            AppError::Storage(_) => "Could not access local storage",
            AppError::Configuration(_) => "The application is not configured correctly",
            AppError::Io(_) => "A file operation failed",
            AppError::Json(_) => "Received malformed data",
        }
    }

    /// エラーの詳細情報を取得（ログ出力用）
    pub fn details(&self) -> String {
        format!("{self}")
    }

    /// エラーの重要度を取得
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Validation(_) => ErrorSeverity::Low,
            AppError::NotFound(_) => ErrorSeverity::Low,
            AppError::ExternalService(_) => ErrorSeverity::Medium,
            AppError::Network(_) => ErrorSeverity::Medium,
            AppError::Storage(_) => ErrorSeverity::Medium,
            AppError::Configuration(_) => ErrorSeverity::High,
            AppError::Io(_) => ErrorSeverity::Medium,
            AppError::Json(_) => ErrorSeverity::Medium,
        }
    }

    /// バリデーションエラーを作成するヘルパー関数
    ///
    /// # 引数
    /// * `message` - ユーザーに表示するメッセージ
    pub fn validation<S: Into<String>>(message: S) -> Self {
        AppError::Validation(message.into())
    }

    /// リソース未発見エラーを作成するヘルパー関数
    ///
    /// # 引数
    /// * `resource` - 見つからなかったリソース名
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        AppError::NotFound(format!("{} not found", resource.into()))
    }

    /// 外部サービスエラーを作成するヘルパー関数
    pub fn external_service<S: Into<String>>(message: S) -> Self {
        AppError::ExternalService(message.into())
    }

    /// ネットワークエラーを作成するヘルパー関数
    pub fn network<S: Into<String>>(message: S) -> Self {
        AppError::Network(message.into())
    }

    /// ストレージエラーを作成するヘルパー関数
    pub fn storage<S: Into<String>>(message: S) -> Self {
        AppError::Storage(message.into())
    }

    /// 設定エラーを作成するヘルパー関数
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }
}

/// AppErrorからStringへの変換（UIシェルへ渡すため）
impl From<AppError> for String {
    fn from(error: AppError) -> Self {
        error.user_message().to_string()
    }
}

/// reqwest::ErrorからAppErrorへの変換
impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            AppError::ExternalService(format!("Invalid response from server: {error}"))
        } else {
            AppError::Network(error.to_string())
        }
    }
}

/// Result型のエイリアス（クレート全体で使用）
pub type AppResult<T> = Result<T, AppError>;
