use std::time::Duration;

use crate::projection::ResyncLeases;

#[tokio::test]
async fn test_same_event_is_serialized() {
	let leases = ResyncLeases::new();

	let first = leases.acquire("evt1").await;
	assert!(!first.contended());

	assert!(
		tokio::time::timeout(Duration::from_millis(50), leases.acquire("evt1"))
			.await
			.is_err(),
		"second lease acquired while the first was held"
	);

	let (second, _) = tokio::join!(leases.acquire("evt1"), async move {
		tokio::time::sleep(Duration::from_millis(10)).await;
		drop(first);
	});

	assert!(second.contended());
}

#[tokio::test]
async fn test_different_events_do_not_block() {
	let leases = ResyncLeases::new();

	let _first = leases.acquire("evt1").await;
	let second = tokio::time::timeout(Duration::from_millis(50), leases.acquire("evt2"))
		.await
		.expect("lease for another event blocked");

	assert!(!second.contended());
	assert_eq!(leases.active(), 2);
}

#[tokio::test]
async fn test_idle_leases_are_pruned() {
	let leases = ResyncLeases::new();

	drop(leases.acquire("evt1").await);
	drop(leases.acquire("evt2").await);
	assert_eq!(leases.active(), 0);

	let lease = leases.acquire("evt3").await;
	assert!(!lease.contended());
	assert_eq!(leases.active(), 1);
}
