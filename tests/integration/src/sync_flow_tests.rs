//! End-to-end flow over real git repositories
//!
//! The platform is faked, but bundles are produced and consumed by the
//! `git` binary: authenticate, acquire, edit, sync, then check that the
//! uploaded bundle holds both sides of the history.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use platon_api::{ACCESS_TOKEN, MemorySecretStore, SecretStore};
use platon_core::{
    AuthFlow, CallbackParams, LOCAL_COMMIT_MESSAGE, SessionStore, Storage, SyncOutcome, SyncStep,
    StepResult, WorkingCopyManager,
};
use platon_editor::{LinkTarget, reference_links};
use platon_git::{GitCli, Identity};
use platon_test_utils::FakePlatform;
use platon_test_utils::git::{
    commit_file, commit_messages, create_bundle, real_git_repo_with_files, run_git,
};
use platon_test_utils::samples;
use tempfile::TempDir;

struct Flow {
    temp: TempDir,
    platform: Arc<FakePlatform>,
    secrets: Arc<MemorySecretStore>,
    manager: WorkingCopyManager,
}

impl Flow {
    /// Platform serving writable resource `abc`, backed by the `origin` repository.
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let origin = temp.path().join("origin");
        real_git_repo_with_files(
            &origin,
            &[
                ("main.ple", "@extends base.ple\ntitle == Fractions\n"),
                ("base.ple", "sandbox = python\n"),
            ],
        );
        let bundle = temp.path().join("served.bundle");
        create_bundle(&origin, &bundle);

        let platform = Arc::new(
            FakePlatform::new()
                .with_resource(samples::resource("abc", "Fractions", true))
                .with_user(samples::user("jdoe", "jane"))
                .with_bundle("abc", bundle),
        );
        let git = GitCli::default().with_identity(Identity {
            name: "Local".to_string(),
            email: "local@test.com".to_string(),
        });
        let manager = WorkingCopyManager::new(
            platform.clone(),
            Arc::new(git),
            Storage::new(temp.path().join("storage")),
            SessionStore::in_dir(&temp.path().join("config")),
        );

        Self {
            temp,
            platform,
            secrets: Arc::new(MemorySecretStore::new()),
            manager,
        }
    }

    fn origin(&self) -> std::path::PathBuf {
        self.temp.path().join("origin")
    }

    /// Commit on the platform side and serve the new history.
    fn remote_commit(&self, file: &str, content: &str) {
        commit_file(&self.origin(), file, content, "remote edit");
        let bundle = self.temp.path().join("served-2.bundle");
        create_bundle(&self.origin(), &bundle);
        self.platform.set_bundle("abc", bundle);
    }

    async fn login(&self, resource: Option<&str>) -> platon_core::AuthOutcome {
        let params = CallbackParams {
            access_token: Some(samples::access_token("jdoe")),
            refresh_token: Some("refresh".to_string()),
            resource: resource.map(str::to_string),
        };
        AuthFlow::new(self.secrets.clone(), &self.manager)
            .complete(params)
            .await
            .unwrap()
    }

    /// Clone the last uploaded bundle into `dest`.
    fn clone_upload(&self, dest: &Path) {
        let (id, bytes) = self.platform.uploads().pop().expect("nothing uploaded");
        assert_eq!(id, "abc");
        let bundle = self.temp.path().join("uploaded.bundle");
        fs::write(&bundle, bytes).unwrap();
        run_git(
            self.temp.path(),
            &["clone", &bundle.to_string_lossy(), &dest.to_string_lossy()],
        );
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_opens_requested_resource() {
    let flow = Flow::new();

    let outcome = flow.login(Some("abc")).await;

    assert_eq!(
        outcome.welcome,
        "Authentication to PLaTOn successful. Welcome Jane !"
    );
    assert!(flow.secrets.get(ACCESS_TOKEN).unwrap().is_some());

    let copy = outcome.acquired.expect("resource not acquired");
    assert!(!copy.reused);
    assert_eq!(
        fs::read_to_string(copy.path.join("base.ple")).unwrap(),
        "sandbox = python\n"
    );

    let session = flow.manager.session().load().unwrap();
    assert_eq!(session.user.unwrap().username, "jdoe");
    assert_eq!(session.folders.resource_ids(), vec!["abc".to_string()]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sync_merges_and_uploads_both_sides() {
    let flow = Flow::new();
    let copy = flow.login(Some("abc")).await.acquired.unwrap();

    fs::write(copy.path.join("local.ple"), "title == Local\n").unwrap();
    flow.remote_commit("remote.ple", "title == Remote\n");

    let report = flow.manager.sync("abc").await.unwrap();

    assert_eq!(report.outcome, SyncOutcome::Synced);
    assert_eq!(report.step(SyncStep::Upload), Some(&StepResult::Done));
    assert!(report.warnings().is_empty());
    assert!(commit_messages(&copy.path).contains(&LOCAL_COMMIT_MESSAGE.to_string()));

    let check = flow.temp.path().join("check");
    flow.clone_upload(&check);
    assert!(check.join("local.ple").exists());
    assert!(check.join("remote.ple").exists());
    assert!(check.join("main.ple").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_conflicting_edits_stop_before_upload() {
    let flow = Flow::new();
    let copy = flow.login(Some("abc")).await.acquired.unwrap();

    fs::write(copy.path.join("base.ple"), "sandbox = node\n").unwrap();
    flow.remote_commit("base.ple", "sandbox = python3\n");

    let report = flow.manager.sync("abc").await.unwrap();

    assert_eq!(report.outcome, SyncOutcome::Conflict);
    assert!(flow.platform.uploads().is_empty());

    // Still conflicting until the user resolves the markers
    let again = flow.manager.sync("abc").await.unwrap();
    assert_eq!(again.outcome, SyncOutcome::Conflict);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_second_sync_reuses_copy() {
    let flow = Flow::new();
    flow.login(Some("abc")).await;

    let first = flow.manager.sync("abc").await.unwrap();
    let second = flow.manager.sync("abc").await.unwrap();

    assert_eq!(first.outcome, SyncOutcome::Synced);
    assert_eq!(second.outcome, SyncOutcome::Synced);
    assert_eq!(flow.platform.uploads().len(), 2);
    assert_eq!(flow.platform.downloads().len(), 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_new_login_wipes_previous_copies() {
    let flow = Flow::new();
    let copy = flow.login(Some("abc")).await.acquired.unwrap();
    assert!(copy.path.exists());

    flow.login(None).await;

    assert!(!copy.path.exists());
    assert!(flow.manager.session().load().unwrap().folders.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_reference_links_point_into_the_copy() {
    let flow = Flow::new();
    let copy = flow.login(Some("abc")).await.acquired.unwrap();

    let main = copy.path.join("main.ple");
    let location = flow.manager.locate(&main).unwrap();
    let text = fs::read_to_string(&main).unwrap();
    let links = reference_links(&text, &location);

    assert_eq!(links.len(), 1);
    assert_eq!(links[0].target, LinkTarget::File(copy.path.join("base.ple")));
}
