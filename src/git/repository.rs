use std::io::Write;
use std::path::Path;

use git2::{ErrorCode, ObjectType, Repository as Git2Repo};

use crate::error::{Result, WagnerError};

const FILEMODE_EXECUTABLE: i32 = 0o100755;
const FILEMODE_LINK: i32 = 0o120000;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// Working directory of the repository, if it is not bare
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }
}

impl super::Repository for Git2Repository {
    fn is_dirty(&self) -> Result<bool> {
        let mut options = git2::StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(false)
            .include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut options))?;

        Ok(!statuses.is_empty())
    }

    fn active_branch(&self) -> Result<String> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                // No commits yet: HEAD still names the branch it will create
                let head = self.repo.find_reference("HEAD")?;
                let target = head.symbolic_target().ok_or(WagnerError::DetachedHead)?;

                return Ok(target.trim_start_matches("refs/heads/").to_string());
            }
            Err(e) => return Err(e.into()),
        };

        if !head.is_branch() {
            return Err(WagnerError::DetachedHead);
        }

        head.shorthand()
            .map(|name| name.to_string())
            .ok_or(WagnerError::DetachedHead)
    }

    fn tag_names(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn describe(&self) -> Result<String> {
        let mut options = git2::DescribeOptions::new();
        options.show_commit_oid_as_fallback(true);

        let description = self.repo.describe(&options)?;
        let label = description.format(Some(&git2::DescribeFormatOptions::new()))?;

        Ok(label)
    }

    fn archive(&self, treeish: Option<&str>, prefix: &str, out: &mut dyn Write) -> Result<()> {
        let spec = treeish.unwrap_or("HEAD");
        let commit = self
            .repo
            .revparse_single(spec)
            .and_then(|object| object.peel_to_commit())
            .map_err(|e| WagnerError::tag(format!("Cannot resolve '{}': {}", spec, e)))?;
        let tree = commit.tree()?;
        let mtime = commit.time().seconds().max(0) as u64;

        let mut entries = Vec::new();
        tree.walk(git2::TreeWalkMode::PreOrder, |root, entry| {
            if let Some(name) = entry.name() {
                entries.push((
                    format!("{}{}", root, name),
                    entry.id(),
                    entry.filemode(),
                    entry.kind(),
                ));
            }
            git2::TreeWalkResult::Ok
        })?;

        log::debug!(
            "archiving {} entries of {} with prefix '{}'",
            entries.len(),
            spec,
            prefix
        );

        let mut builder = tar::Builder::new(out);

        let root_dir = prefix.trim_end_matches('/');
        if prefix.ends_with('/') && !root_dir.is_empty() {
            append_directory(&mut builder, root_dir, mtime)?;
        }

        for (path, oid, filemode, kind) in entries {
            let full_path = format!("{}{}", prefix, path);

            match kind {
                Some(ObjectType::Tree) => append_directory(&mut builder, &full_path, mtime)?,
                Some(ObjectType::Blob) => {
                    let blob = self.repo.find_blob(oid)?;
                    let mut header = tar::Header::new_gnu();
                    header.set_mtime(mtime);

                    if filemode == FILEMODE_LINK {
                        let target = String::from_utf8_lossy(blob.content()).into_owned();
                        header.set_entry_type(tar::EntryType::Symlink);
                        header.set_mode(0o777);
                        header.set_size(0);
                        builder.append_link(&mut header, &full_path, &target)?;
                    } else {
                        let mode = if filemode == FILEMODE_EXECUTABLE {
                            0o755
                        } else {
                            0o644
                        };
                        header.set_entry_type(tar::EntryType::Regular);
                        header.set_mode(mode);
                        header.set_size(blob.content().len() as u64);
                        builder.append_data(&mut header, &full_path, blob.content())?;
                    }
                }
                // submodule commits have no content in this repository
                _ => {}
            }
        }

        builder.finish()?;
        Ok(())
    }
}

fn append_directory<W: Write>(builder: &mut tar::Builder<W>, path: &str, mtime: u64) -> Result<()> {
    let mut header = tar::Header::new_gnu();
    header.set_entry_type(tar::EntryType::Directory);
    header.set_mode(0o755);
    header.set_size(0);
    header.set_mtime(mtime);
    builder.append_data(&mut header, path, std::io::empty())?;

    Ok(())
}
