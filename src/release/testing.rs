//! In-memory stand-ins for git and the external tools
//!
//! `FakeVcs` keeps one committed snapshot per branch and applies checkouts to
//! a real directory, so the flows can be exercised against a tempdir without
//! a git binary.

use crate::core::config::CutConfig;
use crate::core::context::ReleaseLayout;
use crate::core::error::{CutError, CutResult, GitError, ToolError};
use crate::core::tools::Toolchain;
use crate::core::vcs::Vcs;
use crate::core::worktree::{LocalFs, WorkTree};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

type Snapshot = BTreeMap<PathBuf, Vec<u8>>;

#[derive(Debug, Clone)]
enum Staged {
  All,
  Paths(Vec<PathBuf>),
}

#[derive(Default)]
struct FakeState {
  current: String,
  branches: BTreeMap<String, Snapshot>,
  staged: Option<Staged>,
  commits: Vec<(String, String)>,
  pushed: Vec<(String, String)>,
  calls: Vec<String>,
  dirty: Vec<String>,
  fail_on: Option<String>,
}

pub struct FakeVcs {
  root: PathBuf,
  state: RefCell<FakeState>,
}

impl FakeVcs {
  /// Start on `branch`, whose commit is the current contents of `root`
  pub fn new(root: &Path, branch: &str) -> Self {
    let mut branches = BTreeMap::new();
    branches.insert(branch.to_string(), snapshot(root));
    Self {
      root: root.to_path_buf(),
      state: RefCell::new(FakeState {
        current: branch.to_string(),
        branches,
        ..Default::default()
      }),
    }
  }

  /// Fail any call whose description contains `needle`
  pub fn fail_on(&self, needle: &str) {
    self.state.borrow_mut().fail_on = Some(needle.to_string());
  }

  pub fn set_dirty(&self, files: &[&str]) {
    self.state.borrow_mut().dirty = files.iter().map(|f| f.to_string()).collect();
  }

  pub fn detach(&self) {
    self.state.borrow_mut().current = "HEAD".to_string();
  }

  /// Every call made, in order
  pub fn calls(&self) -> Vec<String> {
    self.state.borrow().calls.clone()
  }

  /// (branch, message) of every commit, in order
  pub fn commits(&self) -> Vec<(String, String)> {
    self.state.borrow().commits.clone()
  }

  /// (remote, branch) of every push, in order
  pub fn pushed(&self) -> Vec<(String, String)> {
    self.state.borrow().pushed.clone()
  }

  /// Committed files of a branch, as relative paths
  pub fn branch_files(&self, branch: &str) -> Vec<String> {
    self
      .state
      .borrow()
      .branches
      .get(branch)
      .map(|snap| snap.keys().map(|p| p.to_string_lossy().replace('\\', "/")).collect())
      .unwrap_or_default()
  }

  /// Committed content of one file on a branch
  pub fn branch_file(&self, branch: &str, path: &str) -> Option<String> {
    self
      .state
      .borrow()
      .branches
      .get(branch)
      .and_then(|snap| snap.get(Path::new(path)))
      .map(|bytes| String::from_utf8_lossy(bytes).to_string())
  }

  fn record(&self, call: String) -> CutResult<()> {
    let mut state = self.state.borrow_mut();
    let fail = state.fail_on.as_ref().is_some_and(|needle| call.contains(needle.as_str()));
    state.calls.push(call.clone());
    if fail {
      return Err(CutError::Git(GitError::CommandFailed {
        command: format!("git {}", call),
        stderr: "injected failure".to_string(),
      }));
    }
    Ok(())
  }

  fn switch_to(&self, name: &str) -> CutResult<()> {
    let mut state = self.state.borrow_mut();
    let target = state
      .branches
      .get(name)
      .cloned()
      .ok_or_else(|| git_error(format!("pathspec '{}' did not match", name)))?;
    // Tracked files of the old branch leave, the new branch's files arrive;
    // untracked files stay, as with git
    if let Some(old) = state.branches.get(&state.current) {
      for path in old.keys() {
        let _ = fs::remove_file(self.root.join(path));
      }
    }
    for (path, bytes) in &target {
      let full = self.root.join(path);
      if let Some(parent) = full.parent() {
        fs::create_dir_all(parent)?;
      }
      fs::write(full, bytes)?;
    }
    state.current = name.to_string();
    state.staged = None;
    Ok(())
  }
}

impl Vcs for FakeVcs {
  fn current_branch(&self) -> CutResult<String> {
    Ok(self.state.borrow().current.clone())
  }

  fn local_branches(&self) -> CutResult<Vec<String>> {
    self.record("branch --list".to_string())?;
    Ok(self.state.borrow().branches.keys().cloned().collect())
  }

  fn modified_tracked_files(&self) -> CutResult<Vec<String>> {
    Ok(self.state.borrow().dirty.clone())
  }

  fn create_branch(&self, name: &str) -> CutResult<()> {
    self.record(format!("branch {}", name))?;
    let mut state = self.state.borrow_mut();
    if state.branches.contains_key(name) {
      return Err(git_error(format!("a branch named '{}' already exists", name)));
    }
    let head = state.branches.get(&state.current).cloned().unwrap_or_default();
    state.branches.insert(name.to_string(), head);
    Ok(())
  }

  fn create_and_checkout_branch(&self, name: &str) -> CutResult<()> {
    self.record(format!("checkout -b {}", name))?;
    let mut state = self.state.borrow_mut();
    if state.branches.contains_key(name) {
      return Err(git_error(format!("a branch named '{}' already exists", name)));
    }
    let head = state.branches.get(&state.current).cloned().unwrap_or_default();
    state.branches.insert(name.to_string(), head);
    state.current = name.to_string();
    Ok(())
  }

  fn checkout_branch(&self, name: &str) -> CutResult<()> {
    self.record(format!("checkout {}", name))?;
    self.switch_to(name)
  }

  fn force_checkout_branch(&self, name: &str) -> CutResult<()> {
    self.record(format!("checkout --force {}", name))?;
    self.switch_to(name)
  }

  fn delete_branch(&self, name: &str) -> CutResult<()> {
    self.record(format!("branch -D {}", name))?;
    let mut state = self.state.borrow_mut();
    if state.current == name {
      return Err(git_error(format!("cannot delete branch '{}' checked out", name)));
    }
    state
      .branches
      .remove(name)
      .map(|_| ())
      .ok_or_else(|| git_error(format!("branch '{}' not found", name)))
  }

  fn stage_all(&self) -> CutResult<()> {
    self.record("add --all .".to_string())?;
    self.state.borrow_mut().staged = Some(Staged::All);
    Ok(())
  }

  fn stage_paths(&self, paths: &[&Path]) -> CutResult<()> {
    let names: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
    self.record(format!("add -- {}", names.join(" ")))?;
    self.state.borrow_mut().staged = Some(Staged::Paths(paths.iter().map(|p| p.to_path_buf()).collect()));
    Ok(())
  }

  fn commit(&self, message: &str) -> CutResult<()> {
    self.record(format!("commit -m {}", message))?;
    let mut state = self.state.borrow_mut();
    let staged = state
      .staged
      .take()
      .ok_or_else(|| git_error("nothing added to commit".to_string()))?;
    let current = state.current.clone();
    let tree = state.branches.entry(current.clone()).or_default();
    match staged {
      Staged::All => *tree = snapshot(&self.root),
      Staged::Paths(paths) => {
        for path in paths {
          tree.insert(path.clone(), fs::read(self.root.join(&path))?);
        }
      }
    }
    state.commits.push((current, message.to_string()));
    Ok(())
  }

  fn push_branch(&self, remote: &str, branch: &str) -> CutResult<()> {
    self.record(format!("push {} {}", remote, branch))?;
    let mut state = self.state.borrow_mut();
    if !state.branches.contains_key(branch) {
      return Err(git_error(format!("src refspec {} does not match any", branch)));
    }
    state.pushed.push((remote.to_string(), branch.to_string()));
    Ok(())
  }
}

fn git_error(stderr: String) -> CutError {
  CutError::Git(GitError::CommandFailed {
    command: "git (fake)".to_string(),
    stderr,
  })
}

/// Every file under `root` except `.git`, keyed by relative path
fn snapshot(root: &Path) -> Snapshot {
  fn walk(root: &Path, dir: &Path, out: &mut Snapshot) {
    let Ok(entries) = fs::read_dir(dir) else { return };
    for entry in entries.flatten() {
      let path = entry.path();
      if dir == root && entry.file_name() == ".git" {
        continue;
      }
      if path.is_dir() {
        walk(root, &path, out);
      } else if let Ok(bytes) = fs::read(&path) {
        out.insert(path.strip_prefix(root).unwrap().to_path_buf(), bytes);
      }
    }
  }

  let mut out = Snapshot::new();
  walk(root, root, &mut out);
  out
}

/// Build runner that writes `dist/index.js` into every package, and a package
/// manager that writes a lock file
pub struct FakeTools {
  root: PathBuf,
  packages: PathBuf,
  lockfile: PathBuf,
  fail_build: bool,
  fail_install: bool,
  calls: RefCell<Vec<&'static str>>,
}

impl FakeTools {
  pub fn new(fixture: &ReleaseFixture) -> Self {
    Self {
      root: fixture.layout.root.clone(),
      packages: fixture.layout.packages.clone(),
      lockfile: fixture.layout.lockfile.clone(),
      fail_build: false,
      fail_install: false,
      calls: RefCell::new(Vec::new()),
    }
  }

  pub fn failing_build(mut self) -> Self {
    self.fail_build = true;
    self
  }

  pub fn failing_install(mut self) -> Self {
    self.fail_install = true;
    self
  }

  pub fn calls(&self) -> Vec<&'static str> {
    self.calls.borrow().clone()
  }

  fn failure(command: &str) -> CutError {
    CutError::Tool(ToolError::Failed {
      command: command.to_string(),
      code: Some(1),
    })
  }
}

impl Toolchain for FakeTools {
  fn build(&self) -> CutResult<()> {
    self.calls.borrow_mut().push("build");
    if self.fail_build {
      return Err(Self::failure("fake build"));
    }
    for package in LocalFs.list_subdirs(&self.packages)? {
      let dist = self.packages.join(&package).join("dist");
      fs::create_dir_all(&dist)?;
      fs::write(dist.join("index.js"), format!("// built {}\n", package))?;
    }
    Ok(())
  }

  fn install(&self) -> CutResult<()> {
    self.calls.borrow_mut().push("install");
    if self.fail_install {
      return Err(Self::failure("fake install"));
    }
    let manifest = fs::read_to_string(self.root.join("package.json"))?;
    fs::write(&self.lockfile, format!("{{\"lockfileVersion\": 3, \"root\": {}}}", manifest))?;
    Ok(())
  }

  fn build_command(&self) -> String {
    "fake build".to_string()
  }

  fn install_command(&self) -> String {
    "fake install".to_string()
  }
}

/// A node-style monorepo at version 1.0.0 inside `<tempdir>/repo`, so the
/// staging sibling lands inside the tempdir too
pub struct ReleaseFixture {
  _temp: TempDir,
  pub layout: ReleaseLayout,
}

impl ReleaseFixture {
  pub fn new(packages: &[&str]) -> Self {
    Self::with_version(packages, "1.0.0")
  }

  pub fn with_version(packages: &[&str], version: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("repo");
    fs::create_dir_all(root.join("packages")).unwrap();
    fs::write(
      root.join("package.json"),
      format!(
        "{{\n  \"name\": \"mono\",\n  \"version\": \"{}\",\n  \"workspaces\": [\"packages/*\"]\n}}",
        version
      ),
    )
    .unwrap();
    fs::write(root.join("README.md"), "# mono\n").unwrap();
    for package in packages {
      let dir = root.join("packages").join(package);
      fs::create_dir_all(dir.join("src")).unwrap();
      fs::write(dir.join("package.json"), format!("{{\"name\": \"@mono/{}\"}}", package)).unwrap();
      fs::write(dir.join("src").join("index.js"), format!("export const name = '{}';\n", package)).unwrap();
    }

    let layout = ReleaseLayout::new(&root, &CutConfig::default()).unwrap();
    Self { _temp: temp, layout }
  }

  pub fn root(&self) -> &Path {
    &self.layout.root
  }

  pub fn vcs(&self) -> FakeVcs {
    FakeVcs::new(self.root(), "main")
  }

  pub fn tools(&self) -> FakeTools {
    FakeTools::new(self)
  }
}
