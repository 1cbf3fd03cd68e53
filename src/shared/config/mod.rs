/// 環境設定とアプリケーション初期化
pub mod environment;
pub mod initialization;

pub use environment::{
    get_environment, initialize_logging_system, load_environment_variables, ApiConfig,
    Environment, EnvironmentConfig, StorageConfig, DEFAULT_API_BASE_URL,
};
pub use initialization::{
    initialize_application, log_initialization_complete, InitializationResult,
};
