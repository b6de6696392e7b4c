use git2::{Delta, DiffFindOptions, DiffOptions, Oid, Repository, Sort, Tree};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use log::{debug, info, trace};
use crate::hotspot::{ChangeAction, ChangeEntry, CommitMeta, HistoryBackend, HotspotError, HotspotResult, TreeRef};
use crate::hotspot::model::summary_line;

/// Consecutive commits older than the window the walk tolerates before
/// stopping; committer times are not monotonic along parent links.
const OUT_OF_WINDOW_LOOKAHEAD: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Keep,
    Skip,
    Stop,
}

/// Decides, commit by commit, whether a time-sorted walk is past the window
#[derive(Debug)]
struct WindowCutoff {
    since: i64,
    until: i64,
    lookahead: usize,
    older_run: usize,
}

impl WindowCutoff {
    fn new(since: i64, until: i64, lookahead: usize) -> Self {
        Self { since, until, lookahead, older_run: 0 }
    }

    fn visit(&mut self, timestamp: i64) -> Visit {
        if timestamp < self.since {
            self.older_run += 1;
            return if self.older_run >= self.lookahead { Visit::Stop } else { Visit::Skip };
        }
        self.older_run = 0;
        if timestamp > self.until {
            Visit::Skip
        } else {
            Visit::Keep
        }
    }
}

/// git2-backed commit stream and tree diff
///
/// `git2::Repository` cannot be shared between threads, so diff workers borrow
/// handles from a small pool and open a new one when the pool is empty.
pub struct GitHistory {
    path: PathBuf,
    pool: Mutex<Vec<Repository>>,
}

impl GitHistory {
    /// Open the repository at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> HotspotResult<Self> {
        let path = path.as_ref();
        debug!("Opening git repository at: {}", path.display());

        if !path.exists() {
            return Err(HotspotError::repository_unavailable(
                path.display().to_string(),
                "path does not exist",
            ));
        }

        let repo = Repository::open(path)
            .map_err(|e| HotspotError::repository_unavailable(path.display().to_string(), e.message()))?;

        let workdir = repo
            .workdir()
            .unwrap_or_else(|| repo.path())
            .to_path_buf();
        if repo.is_bare() {
            debug!("Repository is bare: {}", workdir.display());
        }

        info!("Using git repository: {}", workdir.display());
        Ok(Self {
            path: workdir,
            pool: Mutex::new(vec![repo]),
        })
    }

    fn with_repository<T>(&self, operation: impl FnOnce(&Repository) -> T) -> Result<T, git2::Error> {
        let pooled = self.pool.lock().pop();
        let repo = match pooled {
            Some(repo) => repo,
            None => {
                trace!("Opening additional repository handle for worker");
                Repository::open(&self.path)?
            }
        };
        let result = operation(&repo);
        self.pool.lock().push(repo);
        Ok(result)
    }

    fn tree_for<'r>(repo: &'r Repository, tree: TreeRef<'_>) -> Result<Option<Tree<'r>>, git2::Error> {
        match tree {
            TreeRef::Commit(id) => {
                let commit = repo.find_commit(Oid::from_str(id)?)?;
                Ok(Some(commit.tree()?))
            }
            TreeRef::ParentOf(id) => {
                let commit = repo.find_commit(Oid::from_str(id)?)?;
                if commit.parent_count() == 0 {
                    return Ok(None);
                }
                Ok(Some(commit.parent(0)?.tree()?))
            }
        }
    }
}

impl HistoryBackend for GitHistory {
    fn commits_between(&self, reference: &str, since: i64, until: i64) -> HotspotResult<Vec<CommitMeta>> {
        let unavailable = |e: git2::Error| HotspotError::repository_unavailable(self.path.display().to_string(), e.message());

        let walked = self.with_repository(|repo| -> Result<Vec<CommitMeta>, HotspotError> {
            let start = repo
                .revparse_single(reference)
                .and_then(|object| object.peel_to_commit())
                .map_err(|e| HotspotError::repository_unavailable(
                    self.path.display().to_string(),
                    format!("cannot resolve reference '{}': {}", reference, e.message()),
                ))?;

            let mut walk = repo.revwalk().map_err(unavailable)?;
            walk.push(start.id()).map_err(unavailable)?;
            walk.set_sorting(Sort::TIME).map_err(unavailable)?;

            let mut cutoff = WindowCutoff::new(since, until, OUT_OF_WINDOW_LOOKAHEAD);
            let mut commits = Vec::new();
            for oid in walk {
                let oid = oid.map_err(unavailable)?;
                let commit = repo.find_commit(oid).map_err(unavailable)?;
                let timestamp = commit.committer().when().seconds();
                match cutoff.visit(timestamp) {
                    Visit::Keep => {}
                    Visit::Skip => continue,
                    Visit::Stop => {
                        trace!("Stopping walk at {}, past the window", oid);
                        break;
                    }
                }
                commits.push(CommitMeta::new(
                    oid.to_string(),
                    summary_line(&String::from_utf8_lossy(commit.message_bytes())),
                    timestamp,
                ));
            }
            Ok(commits)
        });

        let commits = walked.map_err(unavailable)??;
        debug!("Walked {} commits from '{}' inside the window", commits.len(), reference);
        Ok(commits)
    }

    fn diff_trees(&self, from: TreeRef<'_>, to: TreeRef<'_>) -> HotspotResult<Vec<ChangeEntry>> {
        let commit_id = match from {
            TreeRef::Commit(id) | TreeRef::ParentOf(id) => id.to_string(),
        };

        let entries = self.with_repository(|repo| -> Result<Vec<ChangeEntry>, git2::Error> {
            let old_tree = Self::tree_for(repo, from)?;
            let new_tree = Self::tree_for(repo, to)?;

            let mut options = DiffOptions::new();
            options.ignore_submodules(true);
            let mut diff = repo.diff_tree_to_tree(old_tree.as_ref(), new_tree.as_ref(), Some(&mut options))?;

            let mut find = DiffFindOptions::new();
            find.renames(true);
            diff.find_similar(Some(&mut find))?;

            Ok(diff.deltas().filter_map(delta_to_entry).collect())
        });

        entries
            .and_then(|inner| inner)
            .map_err(|e| HotspotError::diff(commit_id, e.message()))
    }
}

fn delta_to_entry(delta: git2::DiffDelta<'_>) -> Option<ChangeEntry> {
    let old_path = delta.old_file().path().map(|p| p.to_string_lossy().to_string());
    let new_path = delta.new_file().path().map(|p| p.to_string_lossy().to_string());

    match delta.status() {
        Delta::Added | Delta::Copied => new_path.map(ChangeEntry::added),
        Delta::Deleted => old_path.map(ChangeEntry::deleted),
        Delta::Modified | Delta::Typechange => {
            ChangeEntry::new(ChangeAction::Modify, old_path, new_path)
        }
        Delta::Renamed => match (old_path, new_path) {
            (Some(from), Some(to)) => Some(ChangeEntry::renamed(from, to)),
            (from, to) => ChangeEntry::new(ChangeAction::Rename, from, to),
        },
        _ => None,
    }
}
