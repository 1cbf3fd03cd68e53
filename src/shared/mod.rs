/// 共有エラー型とエラーハンドリング
pub mod errors;

/// 共有設定管理
pub mod config;

/// REST APIクライアント
pub mod api_client;

/// ローカルのキーバリューストア
pub mod storage;

/// ユーザー通知（トースト）
pub mod notifications;

/// 画面状態と画面遷移
pub mod view_state;

/// 共有ユーティリティ関数
pub mod utils;

// 便利な再エクスポート
pub use api_client::{ApiClient, ApiClientConfig};
pub use config::{
    get_environment, initialize_application, initialize_logging_system,
    load_environment_variables, log_initialization_complete, Environment, EnvironmentConfig,
    InitializationResult,
};
pub use errors::{AppError, AppResult, ErrorSeverity};
pub use notifications::{Notification, NotificationKind, Notifier};
pub use storage::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, StorageKeys};
pub use view_state::{LoadState, MountGuard, Navigation, Route};
