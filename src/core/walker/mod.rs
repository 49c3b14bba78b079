//! # Walker Module
//!
//! Depth-first traversal of the folder containment graph.
//!
//! The walk starts at the top-level root, descends into subfolders before
//! direct albums (source enumeration order within each) and returns every
//! folder's transitive photo-ID set up the call stack as an immutable set.
//! Consumers plug in through [`TreeVisitor`]; the walker itself never
//! serializes or copies anything.
//!
//! The source's parent-pointer model should make cycles impossible, but the
//! walker does not rely on that: a visited set turns a revisited folder
//! into [`WalkError::CycleDetected`] instead of unbounded recursion.

use crate::core::library::Library;
use crate::core::model::{Album, Folder};
use crate::error::{Result, WalkError};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Per-node callbacks fired during a walk.
///
/// Callbacks fire for every node except the root; `parent` is `None` when
/// the node sits directly under the root, in which case no parent link is
/// emitted downstream.
pub trait TreeVisitor {
    /// A folder is about to be descended into (pre-order)
    fn enter_folder(&mut self, folder: &Folder, parent: Option<&Folder>) -> Result<()>;

    /// A folder's subtree is complete; `photos` is the union of all
    /// descendant membership sets (post-order)
    fn leave_folder(
        &mut self,
        folder: &Folder,
        parent: Option<&Folder>,
        photos: &BTreeSet<i64>,
    ) -> Result<()>;

    /// An album directly attached to the current folder
    fn visit_album(
        &mut self,
        album: &Album,
        parent: Option<&Folder>,
        photos: &BTreeSet<i64>,
    ) -> Result<()>;
}

/// Recursive traversal over a [`Library`]'s folder tree
pub struct TreeWalker<'a> {
    library: &'a Library,
    visited: HashSet<String>,
}

impl<'a> TreeWalker<'a> {
    pub fn new(library: &'a Library) -> Self {
        Self {
            library,
            visited: HashSet::new(),
        }
    }

    /// Walk the whole tree from the top-level root.
    ///
    /// Returns the photo-ID set of the entire tree. The root itself is
    /// never reported to the visitor.
    pub fn walk<V: TreeVisitor>(&mut self, visitor: &mut V) -> Result<BTreeSet<i64>> {
        let root = self.library.top_folder().clone();
        self.walk_folder(&root, None, true, visitor)
    }

    fn walk_folder<V: TreeVisitor>(
        &mut self,
        folder: &Folder,
        parent: Option<&Folder>,
        is_root: bool,
        visitor: &mut V,
    ) -> Result<BTreeSet<i64>> {
        if !self.visited.insert(folder.uuid.clone()) {
            return Err(WalkError::CycleDetected {
                uuid: folder.uuid.clone(),
            }
            .into());
        }
        debug!("Walking folder {} ({})", folder.name, folder.uuid);

        if !is_root {
            visitor.enter_folder(folder, parent)?;
        }

        let mut members = BTreeSet::new();
        let child_parent = if is_root { None } else { Some(folder) };

        for subfolder in self.library.subfolders(folder)? {
            let subtree = self.walk_folder(&subfolder, child_parent, false, visitor)?;
            members.extend(subtree);
        }

        for album in self.library.albums(folder)? {
            let photos: BTreeSet<i64> = self.library.photo_ids(&album)?.into_iter().collect();
            visitor.visit_album(&album, child_parent, &photos)?;
            members.extend(photos);
        }

        if !is_root {
            visitor.leave_folder(folder, parent, &members)?;
        }
        Ok(members)
    }
}
