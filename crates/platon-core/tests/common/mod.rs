#![allow(dead_code)]

use std::sync::Arc;

use platon_core::{SessionStore, Storage, WorkingCopyManager};
use platon_test_utils::{FakePlatform, FakeTransport, samples};
use tempfile::TempDir;

pub struct TestEnv {
    pub temp: TempDir,
    pub platform: Arc<FakePlatform>,
    pub transport: Arc<FakeTransport>,
    pub manager: WorkingCopyManager,
}

impl TestEnv {
    pub fn new(platform: FakePlatform, transport: FakeTransport) -> Self {
        let temp = TempDir::new().unwrap();
        let platform = Arc::new(platform);
        let transport = Arc::new(transport);
        let manager = WorkingCopyManager::new(
            platform.clone(),
            transport.clone(),
            Storage::new(temp.path().join("storage")),
            SessionStore::in_dir(&temp.path().join("config")),
        );
        Self {
            temp,
            platform,
            transport,
            manager,
        }
    }

    /// Writable resource `abc` whose working copy already exists.
    pub fn existing_copy(transport: FakeTransport) -> Self {
        let env = Self::new(writable("abc"), transport);
        std::fs::create_dir_all(env.manager.storage().copy_dir("abc")).unwrap();
        env
    }

    pub fn storage(&self) -> &Storage {
        self.manager.storage()
    }
}

pub fn writable(id: &str) -> FakePlatform {
    FakePlatform::new().with_resource(samples::resource(id, "Fractions", true))
}
