//! Progress reporting and the optional image set.

use std::collections::HashSet;

/// Callback surface for long runs. The product sheet reports at a row
/// interval; everything else reports per phase.
pub trait Progress {
    fn report(&mut self, percent: u8, message: &str);
}

/// Silent sink for library callers and tests.
#[derive(Debug, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn report(&mut self, _percent: u8, _message: &str) {}
}

/// Photograph lookup for product rows. When no directory was supplied the
/// check is skipped entirely rather than flagging every path.
#[derive(Debug, Clone)]
pub enum ImageSet {
    Unavailable,
    Available { dir: String, names: HashSet<String> },
}

impl ImageSet {
    /// `None` when the set is unavailable, otherwise whether the file name
    /// is present (case-insensitive).
    pub fn exists(&self, path: &str) -> Option<bool> {
        match self {
            ImageSet::Unavailable => None,
            ImageSet::Available { names, .. } => {
                let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
                Some(names.contains(&name.to_lowercase()))
            }
        }
    }

    pub fn dir(&self) -> Option<&str> {
        match self {
            ImageSet::Unavailable => None,
            ImageSet::Available { dir, .. } => Some(dir),
        }
    }
}
