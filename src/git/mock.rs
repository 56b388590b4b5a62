use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

use crate::error::{Result, WagnerError};
use crate::git::Repository;

/// Mock repository for testing without actual git operations
pub struct MockRepository {
    dirty: bool,
    branch: Option<String>,
    tags: BTreeSet<String>,
    description: String,
    files: BTreeMap<String, Vec<u8>>,
}

impl MockRepository {
    /// Create a clean mock repository on `master` without tags
    pub fn new() -> Self {
        MockRepository {
            dirty: false,
            branch: Some("master".to_string()),
            tags: BTreeSet::new(),
            description: "1a2b3c4".to_string(),
            files: BTreeMap::new(),
        }
    }

    /// Mark the working copy as having uncommitted changes
    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    /// Check out a branch
    pub fn set_branch(&mut self, branch: impl Into<String>) {
        self.branch = Some(branch.into());
    }

    /// Detach HEAD from any branch
    pub fn detach_head(&mut self) {
        self.branch = None;
    }

    /// Add a tag
    pub fn add_tag(&mut self, name: impl Into<String>) {
        self.tags.insert(name.into());
    }

    /// Set what `describe` returns
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Add a file to the tree served by `archive`
    pub fn add_file(&mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), content.into());
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn is_dirty(&self) -> Result<bool> {
        Ok(self.dirty)
    }

    fn active_branch(&self) -> Result<String> {
        self.branch.clone().ok_or(WagnerError::DetachedHead)
    }

    fn tag_names(&self) -> Result<Vec<String>> {
        Ok(self.tags.iter().cloned().collect())
    }

    fn describe(&self) -> Result<String> {
        Ok(self.description.clone())
    }

    fn archive(&self, treeish: Option<&str>, prefix: &str, out: &mut dyn Write) -> Result<()> {
        if let Some(tag) = treeish {
            if !self.tags.contains(tag) {
                return Err(WagnerError::tag(format!("Cannot resolve '{}'", tag)));
            }
        }

        let mut builder = tar::Builder::new(out);
        for (path, content) in &self.files {
            let mut header = tar::Header::new_gnu();
            header.set_mode(0o644);
            header.set_size(content.len() as u64);
            builder.append_data(&mut header, format!("{}{}", prefix, path), content.as_slice())?;
        }
        builder.finish()?;

        Ok(())
    }
}
