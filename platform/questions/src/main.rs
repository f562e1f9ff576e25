use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use common::global::{GlobalConfig, GlobalConfigProvider, GlobalCtx};
use common::{logging, signal};
use fred::clients::RedisPool;
use fred::interfaces::ClientLike;
use platform_questions::config::{ApiConfig, AppConfig, DatabaseConfig, RedisConfig};
use platform_questions::global::QuestionsState;
use platform_questions::projection::RedisProjectionStore;
use platform_questions::service::QuestionService;
use platform_questions::store::PgQuestionStore;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::{select, time};
use tokio_util::sync::CancellationToken;

struct GlobalState {
	ctx: CancellationToken,
	config: AppConfig,
	questions: QuestionService,
}

impl GlobalCtx for GlobalState {
	#[inline(always)]
	fn ctx(&self) -> &CancellationToken {
		&self.ctx
	}
}

impl GlobalConfig for GlobalState {}

impl GlobalConfigProvider<ApiConfig> for GlobalState {
	#[inline(always)]
	fn provide_config(&self) -> &ApiConfig {
		&self.config.api
	}
}

impl QuestionsState for GlobalState {
	#[inline(always)]
	fn questions(&self) -> &QuestionService {
		&self.questions
	}
}

impl GlobalState {
	async fn new(ctx: CancellationToken, config: AppConfig) -> anyhow::Result<Self> {
		let db = setup_database(&config.database).await?;

		if config.database.migrate {
			sqlx::migrate!("./migrations")
				.run(&db)
				.await
				.context("failed to run migrations")?;
			tracing::info!("migrations applied");
		}

		let redis = setup_redis(&config.redis).await?;

		let questions = QuestionService::new(
			Arc::new(PgQuestionStore::new(db)),
			Arc::new(RedisProjectionStore::new(redis)),
			&config.questions,
		);

		Ok(Self { ctx, config, questions })
	}
}

async fn setup_database(config: &DatabaseConfig) -> anyhow::Result<PgPool> {
	PgPoolOptions::new()
		.max_connections(config.max_connections)
		.connect_with(config.connect_options()?)
		.await
		.context("failed to connect to database")
}

async fn setup_redis(config: &RedisConfig) -> anyhow::Result<Arc<RedisPool>> {
	let redis = Arc::new(
		RedisPool::new(
			fred::types::RedisConfig::from_url(&config.url).context("invalid redis url")?,
			None,
			None,
			None,
			config.pool_size,
		)
		.context("failed to create redis pool")?,
	);

	redis.connect();
	redis.wait_for_connect().await.context("failed to connect to redis")?;

	Ok(redis)
}

async fn bootstrap() -> anyhow::Result<()> {
	let config = match AppConfig::load() {
		Ok(config) => config,
		Err(err) => err.exit(),
	};

	logging::init(&config.logging.level, config.logging.mode).context("failed to init logging")?;

	tracing::info!("starting up");

	let ctx = CancellationToken::new();
	let global = Arc::new(GlobalState::new(ctx.clone(), config).await.context("failed to create global state")?);

	tracing::debug!("global state created, starting api");

	let mut api_handle = tokio::spawn(platform_questions::api::run(global));

	let mut signal_handler = signal::SignalHandler::shutdown().context("failed to install signal handlers")?;

	let api_stopped = select! {
		_ = signal_handler.recv() => {
			tracing::info!("shutting down");
			false
		},
		r = &mut api_handle => {
			match r {
				Ok(Ok(())) => tracing::error!("api stopped unexpectedly"),
				Ok(Err(err)) => tracing::error!("api stopped unexpectedly: {:#}", err),
				Err(err) => tracing::error!("api task failed: {}", err),
			}
			true
		},
	};

	ctx.cancel();

	if !api_stopped {
		tracing::info!("waiting for tasks to finish");

		select! {
			_ = time::sleep(Duration::from_secs(60)) => tracing::warn!("force shutting down"),
			_ = signal_handler.recv() => tracing::warn!("force shutting down"),
			_ = &mut api_handle => tracing::info!("shut down"),
		}
	}

	Ok(())
}

#[tokio::main]
pub async fn main() {
	if let Err(err) = bootstrap().await {
		tracing::error!("{:#}", err);
		std::process::exit(1);
	}
}
