//! Shared fixtures for the integration tests.
//!
//! Every test gets its own store, directory and fixed clock. Three users
//! are pre-registered: alice, bob and carol, each with a bearer token
//! `tok-<name>` and handles `<name>` and `<name>@example.com`.

use std::sync::Arc;

use tandem::access::Actor;
use tandem::clock::FixedClock;
use tandem::identity::InMemoryDirectory;
use tandem::list::UserId;
use tandem::service::ListService;
use tandem::store::InMemory;

pub const USERS: [&str; 3] = ["alice", "bob", "carol"];

pub struct TestBed {
    pub service: Arc<ListService>,
    pub directory: Arc<InMemoryDirectory>,
    pub clock: Arc<FixedClock>,
}

/// Build a service over fresh in-memory backends and the standard users.
pub fn test_bed() -> TestBed {
    let store = Arc::new(InMemory::new());
    let directory = Arc::new(InMemoryDirectory::new());
    for name in USERS {
        directory.add_user(
            name,
            format!("tok-{name}"),
            &[name, &format!("{name}@example.com")],
        );
    }

    let clock = Arc::new(FixedClock::default());
    let service = Arc::new(ListService::new(store, directory.clone(), clock.clone()));
    TestBed {
        service,
        directory,
        clock,
    }
}

/// An authenticated actor for one of the standard users.
pub fn as_user(name: &str) -> Actor {
    Actor::User(UserId::from(name))
}
