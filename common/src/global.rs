use tokio_util::sync::CancellationToken;

pub trait GlobalCtx {
	/// Cancelled once the process starts shutting down.
	fn ctx(&self) -> &CancellationToken;
}

pub trait GlobalConfig {
	#[inline(always)]
	fn config<C>(&self) -> &C
	where
		Self: GlobalConfigProvider<C>,
	{
		GlobalConfigProvider::provide_config(self)
	}
}

pub trait GlobalConfigProvider<C> {
	fn provide_config(&self) -> &C;
}
