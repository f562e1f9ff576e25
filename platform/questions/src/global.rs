use crate::config::ApiConfig;
use crate::service::QuestionService;

pub trait QuestionsState {
	fn questions(&self) -> &QuestionService;
}

pub trait QuestionsGlobal:
	common::global::GlobalCtx
	+ common::global::GlobalConfigProvider<ApiConfig>
	+ common::global::GlobalConfig
	+ QuestionsState
	+ Send
	+ Sync
	+ 'static
{
}

impl<T> QuestionsGlobal for T where
	T: common::global::GlobalCtx
		+ common::global::GlobalConfigProvider<ApiConfig>
		+ common::global::GlobalConfig
		+ QuestionsState
		+ Send
		+ Sync
		+ 'static
{
}
