use std::sync::Arc;

use async_trait::async_trait;
use fred::clients::RedisPool;
use fred::interfaces::{HashesInterface, KeysInterface, SortedSetsInterface, TransactionInterface};
use fred::types::RedisValue;

use super::{Presence, ProjectionEntry, ProjectionError, ProjectionKeys, ProjectionStore, Ranking};

/// Keeps the projection in redis: a hash for the field map and two sorted sets
/// for the indexes.
pub struct RedisProjectionStore {
	redis: Arc<RedisPool>,
}

impl RedisProjectionStore {
	pub fn new(redis: Arc<RedisPool>) -> Self {
		Self { redis }
	}
}

#[async_trait]
impl ProjectionStore for RedisProjectionStore {
	async fn presence(&self, keys: &ProjectionKeys) -> Result<Presence, ProjectionError> {
		let pipeline = self.redis.next().pipeline();

		for key in [&keys.field_map, &keys.like_index, &keys.created_index] {
			let _: RedisValue = pipeline.exists(key).await.map_err(ProjectionError::read)?;
		}
		let _: RedisValue = pipeline.get(&keys.synced).await.map_err(ProjectionError::read)?;

		let (field_map, like_index, created_index, synced_rows): (i64, i64, i64, Option<u64>) =
			pipeline.all().await.map_err(ProjectionError::read)?;

		Ok(Presence {
			field_map: field_map > 0,
			like_index: like_index > 0,
			created_index: created_index > 0,
			synced_rows,
		})
	}

	async fn replace(&self, keys: &ProjectionKeys, entries: &[ProjectionEntry]) -> Result<(), ProjectionError> {
		let trx = self.redis.next().multi();

		trx.del::<(), _>(vec![
			keys.field_map.as_str(),
			keys.like_index.as_str(),
			keys.created_index.as_str(),
			keys.synced.as_str(),
		])
		.await
		.map_err(ProjectionError::write)?;

		if !entries.is_empty() {
			let fields = entries
				.iter()
				.map(|entry| (entry.id.to_string(), entry.payload.as_str()))
				.collect::<Vec<_>>();
			trx.hset::<(), _, _>(&keys.field_map, fields)
				.await
				.map_err(ProjectionError::write)?;

			let likes = entries
				.iter()
				.map(|entry| (entry.like_score, entry.id.to_string()))
				.collect::<Vec<_>>();
			trx.zadd::<(), _, _>(&keys.like_index, None, None, false, false, likes)
				.await
				.map_err(ProjectionError::write)?;

			let created = entries
				.iter()
				.map(|entry| (entry.created_score, entry.id.to_string()))
				.collect::<Vec<_>>();
			trx.zadd::<(), _, _>(&keys.created_index, None, None, false, false, created)
				.await
				.map_err(ProjectionError::write)?;
		}

		trx.set::<(), _, _>(&keys.synced, entries.len() as i64, None, None, false)
			.await
			.map_err(ProjectionError::write)?;

		trx.exec::<RedisValue>(true).await.map_err(ProjectionError::write)?;

		Ok(())
	}

	async fn ranked_ids(&self, keys: &ProjectionKeys, ranking: Ranking, limit: usize) -> Result<Vec<String>, ProjectionError> {
		if limit == 0 {
			return Ok(Vec::new());
		}

		let key = match ranking {
			Ranking::Like => &keys.like_index,
			Ranking::Created => &keys.created_index,
		};

		self.redis
			.zrevrange::<Vec<String>, _>(key, 0, limit as i64 - 1, false)
			.await
			.map_err(ProjectionError::read)
	}

	async fn fetch(&self, keys: &ProjectionKeys, ids: &[String]) -> Result<Vec<Option<String>>, ProjectionError> {
		if ids.is_empty() {
			return Ok(Vec::new());
		}

		self.redis
			.hmget::<Vec<Option<String>>, _, _>(&keys.field_map, ids.to_vec())
			.await
			.map_err(ProjectionError::read)
	}
}
