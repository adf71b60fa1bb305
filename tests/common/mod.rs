use assort::app::config::Config;
use assort::host::{AssetHost, FsHost};
use assort::Session;
use std::path::Path;
use tempfile::TempDir;

/// Initialize logging once for all tests
#[allow(dead_code)]
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Create an empty project with an `Assets` folder
pub fn create_test_project() -> TempDir {
    let project = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(project.path().join("Assets")).unwrap();
    project
}

/// Configuration pointing at `project_root`
pub fn create_test_config(project_root: &Path) -> Config {
    let mut config = Config::default();
    config.general.project_root = project_root.to_path_buf();
    config
}

/// Write an asset (and optionally its .meta sidecar) under the project
#[allow(dead_code)]
pub fn write_asset(project_root: &Path, asset_path: &str, with_meta: bool) {
    let full = project_root.join(asset_path);
    if let Some(parent) = full.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&full, b"asset").unwrap();
    if with_meta {
        let mut meta = full.into_os_string();
        meta.push(".meta");
        std::fs::write(meta, b"guid: 0").unwrap();
    }
}

/// Start a filesystem-backed session on `project_root`
#[allow(dead_code)]
pub fn start_session(project_root: &Path) -> Session {
    Session::startup(create_test_config(project_root), FsHost::new(project_root))
}

/// Filesystem host that counts the calls made through it and can be told
/// to fail creating one folder
#[allow(dead_code)]
pub struct CountingHost {
    inner: FsHost,
    pub folders_created: usize,
    pub moves: usize,
    pub refreshes: usize,
    /// Folder leaf name whose creation always fails
    pub fail_leaf: Option<&'static str>,
}

#[allow(dead_code)]
impl CountingHost {
    pub fn new(project_root: &Path) -> Self {
        Self {
            inner: FsHost::new(project_root),
            folders_created: 0,
            moves: 0,
            refreshes: 0,
            fail_leaf: None,
        }
    }
}

impl AssetHost for CountingHost {
    fn folder_exists(&self, path: &str) -> bool {
        self.inner.folder_exists(path)
    }

    fn asset_exists(&self, path: &str) -> bool {
        self.inner.asset_exists(path)
    }

    fn create_folder(&mut self, parent: &str, leaf: &str) -> Option<String> {
        self.folders_created += 1;
        if self.fail_leaf == Some(leaf) {
            return None;
        }
        self.inner.create_folder(parent, leaf)
    }

    fn move_asset(&mut self, from: &str, to: &str) -> Result<(), String> {
        self.moves += 1;
        self.inner.move_asset(from, to)
    }

    fn refresh(&mut self) {
        self.refreshes += 1;
        self.inner.refresh();
    }
}
