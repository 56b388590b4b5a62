use crate::error::Result;
use crate::git::Repository;
use crate::ui::Reporter;

/// Resolves the version label of a release.
///
/// An explicit tag is used verbatim; it is not looked up in the repository.
/// Without a tag the HEAD commit is described, which works even in a
/// repository without any tags.
///
/// # Arguments
/// * `repo` - Working copy to describe when no tag is given
/// * `tag` - Tag named by the caller, if any
/// * `reporter` - Receives a "Found version" status line
pub fn resolve_version<R>(repo: &R, tag: Option<&str>, reporter: &dyn Reporter) -> Result<String>
where
    R: Repository + ?Sized,
{
    let version = match tag {
        Some(tag) => tag.to_string(),
        None => repo.describe()?,
    };

    reporter.info(&format!("Found version {}", version));

    Ok(version)
}
