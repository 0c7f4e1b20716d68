// SPDX-License-Identifier: MIT OR Apache-2.0

//! Description of the layered sources a service reads from.

use std::fmt;

/// A callback run before ("mount") or after ("unmount") file access.
///
/// Hooks typically power a storage peripheral up and down. They run once
/// around a whole file pass, never per file.
pub type MountHook = Box<dyn FnMut()>;

/// The file and persistent-region sources of a configuration service.
///
/// `files` is in priority order: index 0 has the highest priority and is also
/// the file written by a file-mode save.
///
/// # Examples
///
/// ```
/// use nvcfg::domain::SourceDescriptor;
///
/// let sources = SourceDescriptor::new(["/config.json", "/defaults.json"])
///     .use_persistent(false)
///     .on_mount(|| println!("power up flash"))
///     .on_unmount(|| println!("power down flash"));
///
/// assert_eq!(sources.primary_file(), Some("/config.json"));
/// assert!(!sources.persistent_enabled());
/// ```
pub struct SourceDescriptor {
    files: Vec<String>,
    use_persistent: bool,
    mount: MountHook,
    unmount: MountHook,
}

impl SourceDescriptor {
    /// Creates a descriptor over the given files, highest priority first.
    ///
    /// Persistent-region lookup is enabled by default.
    pub fn new<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
            use_persistent: true,
            mount: Box::new(|| {}),
            unmount: Box::new(|| {}),
        }
    }

    /// Creates a descriptor with no files.
    pub fn empty() -> Self {
        Self::new(Vec::<String>::new())
    }

    /// Appends a file below every file already listed.
    pub fn with_file(mut self, path: impl Into<String>) -> Self {
        self.files.push(path.into());
        self
    }

    /// Enables or disables the persistent region.
    pub fn use_persistent(mut self, enabled: bool) -> Self {
        self.use_persistent = enabled;
        self
    }

    /// Sets the hook run before file access.
    pub fn on_mount(mut self, hook: impl FnMut() + 'static) -> Self {
        self.mount = Box::new(hook);
        self
    }

    /// Sets the hook run after file access.
    pub fn on_unmount(mut self, hook: impl FnMut() + 'static) -> Self {
        self.unmount = Box::new(hook);
        self
    }

    /// Returns the files in priority order.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Returns the highest priority file, the target of file-mode saves.
    pub fn primary_file(&self) -> Option<&str> {
        self.files.first().map(String::as_str)
    }

    /// Returns true if at least one file is configured.
    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }

    /// Returns true if the persistent region is used.
    pub fn persistent_enabled(&self) -> bool {
        self.use_persistent
    }

    /// Runs `f` between the mount and unmount hooks.
    ///
    /// The unmount hook runs whatever `f` returns.
    pub fn mounted<T>(&mut self, f: impl FnOnce(&[String]) -> T) -> T {
        (self.mount)();
        let result = f(&self.files);
        (self.unmount)();
        result
    }
}

impl Default for SourceDescriptor {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for SourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceDescriptor")
            .field("files", &self.files)
            .field("use_persistent", &self.use_persistent)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_descriptor_defaults() {
        let sources = SourceDescriptor::empty();
        assert!(!sources.has_files());
        assert!(sources.persistent_enabled());
        assert_eq!(sources.primary_file(), None);
    }

    #[test]
    fn test_descriptor_priority_order() {
        let sources = SourceDescriptor::new(vec!["/a.json", "/b.json"]);
        assert_eq!(sources.files(), &["/a.json", "/b.json"]);
        assert_eq!(sources.primary_file(), Some("/a.json"));

        let sources = sources.with_file("/c.json");
        assert_eq!(sources.files().last().map(String::as_str), Some("/c.json"));
        assert_eq!(sources.primary_file(), Some("/a.json"));
    }

    #[test]
    fn test_mounted_runs_hooks_in_pairs() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mount_log = Rc::clone(&log);
        let unmount_log = Rc::clone(&log);

        let mut sources = SourceDescriptor::new(["/a.json"])
            .on_mount(move || mount_log.borrow_mut().push("mount"))
            .on_unmount(move || unmount_log.borrow_mut().push("unmount"));

        let count = sources.mounted(|files| files.len());

        assert_eq!(count, 1);
        assert_eq!(*log.borrow(), vec!["mount", "unmount"]);
    }

    #[test]
    fn test_debug_omits_hooks() {
        let sources = SourceDescriptor::new(["/a.json"]).use_persistent(false);
        let debug = format!("{:?}", sources);
        assert!(debug.contains("/a.json"));
        assert!(debug.contains("use_persistent: false"));
    }
}
