//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and the
//! web server. Services are generic over repository and credential traits;
//! AppState pins them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use minijinja::Environment;

use colloquy_core::chat::service::ChatService;
use colloquy_core::responder::{ChatResponder, ResponderSettings};
use colloquy_core::turn::TurnService;
use colloquy_core::user::service::UserService;
use colloquy_infra::config::{database_url, load_config, resolve_data_dir};
use colloquy_infra::crypto::password::Argon2PasswordHasher;
use colloquy_infra::crypto::token::Sha256TokenGenerator;
use colloquy_infra::llm::build_provider;
use colloquy_infra::sqlite::chat::SqliteChatRepository;
use colloquy_infra::sqlite::pool::DatabasePool;
use colloquy_infra::sqlite::user::SqliteUserRepository;
use colloquy_types::config::AppConfig;

use crate::http::templates;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteChatService = ChatService<SqliteChatRepository>;

pub type ConcreteTurnService = TurnService<SqliteChatRepository>;

pub type ConcreteUserService =
    UserService<SqliteUserRepository, Argon2PasswordHasher, Sha256TokenGenerator>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub turn_service: Arc<ConcreteTurnService>,
    pub user_service: Arc<ConcreteUserService>,
    /// `None` when no LLM API key is configured.
    pub responder: Option<Arc<ChatResponder>>,
    pub templates: Arc<Environment<'static>>,
    pub config: Arc<AppConfig>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await;
        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;

        let responder = build_provider(&config.llm).map(|provider| {
            ChatResponder::new(
                provider,
                ResponderSettings::from_config(&config.llm, &config.pacing),
            )
        });

        Self::from_parts(db_pool, config, data_dir, responder)
    }

    /// Wire services around an already-open pool.
    pub fn from_parts(
        db_pool: DatabasePool,
        config: AppConfig,
        data_dir: PathBuf,
        responder: Option<ChatResponder>,
    ) -> anyhow::Result<Self> {
        let chat_service = Arc::new(ChatService::new(SqliteChatRepository::new(
            db_pool.clone(),
        )));
        let turn_service = TurnService::new(Arc::clone(&chat_service));

        let user_service = UserService::new(
            SqliteUserRepository::new(db_pool.clone()),
            Argon2PasswordHasher::new(),
            Sha256TokenGenerator::new(),
        );

        Ok(Self {
            chat_service,
            turn_service: Arc::new(turn_service),
            user_service: Arc::new(user_service),
            responder: responder.map(Arc::new),
            templates: Arc::new(templates::build_environment()?),
            config: Arc::new(config),
            data_dir,
            db_pool,
        })
    }
}
