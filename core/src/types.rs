//! Record types for an `update-alternatives --query` report.
//!
//! A report describes one alternatives group: the header fields of the group
//! followed by one block per registered alternative. These types hold the
//! parsed values verbatim; nothing is validated beyond what the parser needs
//! to read the report.

use std::collections::HashMap;

/// Status value reported for a group whose selection was made by hand.
pub const STATUS_MANUAL: &str = "manual";

/// Status value reported for a group that follows the best priority.
pub const STATUS_AUTO: &str = "auto";

/// One registered alternative of a group.
///
/// # Examples
///
/// ```
/// use query_alternatives_core::Alternative;
///
/// let alt = Alternative::new("/usr/lib/jvm/java-21-openjdk-amd64/bin/java");
/// assert_eq!(alt.priority, 0);
/// assert!(alt.slaves.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Alternative {
    /// Path of the alternative.
    pub path: String,
    /// Priority of the alternative. Higher wins in automatic mode.
    pub priority: i64,
    /// Slave link name to the path it points at for this alternative.
    pub slaves: HashMap<String, String>,
}

impl Alternative {
    /// Creates an alternative with the given path, priority 0 and no slaves.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

/// A parsed alternatives group.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Alternatives {
    /// Name of the group, e.g. `java`.
    pub name: String,
    /// Generic link, e.g. `/usr/bin/java`.
    pub link: String,
    /// Slave link name to generic slave path.
    pub slaves: HashMap<String, String>,
    /// `auto` or `manual`. Kept as reported.
    pub status: String,
    /// Path of the alternative the system considers best.
    pub best: String,
    /// Path of the currently selected alternative, or `none`.
    pub value: String,
    /// Registered alternatives in report order.
    pub alternatives: Vec<Alternative>,
}

impl Alternatives {
    /// Finds the alternative registered with `path`.
    pub fn find(&self, path: &str) -> Option<&Alternative> {
        self.alternatives.iter().find(|alt| alt.path == path)
    }

    /// Returns the currently selected alternative.
    ///
    /// `None` when the group has no selection (`Value: none`) or the
    /// selected path is not among the registered alternatives.
    ///
    /// # Examples
    ///
    /// ```
    /// use query_alternatives_core::{Alternative, Alternatives};
    ///
    /// let group = Alternatives {
    ///     name: "editor".into(),
    ///     value: "/usr/bin/vim.basic".into(),
    ///     alternatives: vec![
    ///         Alternative::new("/bin/nano"),
    ///         Alternative::new("/usr/bin/vim.basic"),
    ///     ],
    ///     ..Default::default()
    /// };
    /// assert_eq!(group.current().unwrap().path, "/usr/bin/vim.basic");
    /// ```
    pub fn current(&self) -> Option<&Alternative> {
        self.find(&self.value)
    }

    /// Returns the alternative reported as `Best`.
    pub fn best_alternative(&self) -> Option<&Alternative> {
        self.find(&self.best)
    }

    /// Returns the alternative with the greatest priority.
    ///
    /// On ties the one listed first wins.
    pub fn highest_priority(&self) -> Option<&Alternative> {
        self.alternatives
            .iter()
            .reduce(|best, alt| if alt.priority > best.priority { alt } else { best })
    }

    /// Returns `true` if the selection was made manually.
    pub fn is_manual(&self) -> bool {
        self.status == STATUS_MANUAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group() -> Alternatives {
        let mut low = Alternative::new("/usr/bin/nano");
        low.priority = 40;
        let mut high = Alternative::new("/usr/bin/vim.basic");
        high.priority = 50;
        let mut tied = Alternative::new("/usr/bin/vim.tiny");
        tied.priority = 50;

        Alternatives {
            name: "editor".into(),
            link: "/usr/bin/editor".into(),
            status: STATUS_AUTO.into(),
            best: "/usr/bin/vim.basic".into(),
            value: "/usr/bin/nano".into(),
            alternatives: vec![low, high, tied],
            ..Default::default()
        }
    }

    #[test]
    fn test_find_by_path() {
        let group = group();
        assert_eq!(group.find("/usr/bin/vim.tiny").unwrap().priority, 50);
        assert!(group.find("/usr/bin/emacs").is_none());
    }

    #[test]
    fn test_current_and_best() {
        let group = group();
        assert_eq!(group.current().unwrap().path, "/usr/bin/nano");
        assert_eq!(group.best_alternative().unwrap().path, "/usr/bin/vim.basic");
    }

    #[test]
    fn test_current_is_none_without_selection() {
        let mut group = group();
        group.value = "none".into();
        assert!(group.current().is_none());
    }

    #[test]
    fn test_highest_priority_prefers_first_on_tie() {
        let group = group();
        assert_eq!(group.highest_priority().unwrap().path, "/usr/bin/vim.basic");
        assert!(Alternatives::default().highest_priority().is_none());
    }

    #[test]
    fn test_is_manual() {
        let mut group = group();
        assert!(!group.is_manual());
        group.status = STATUS_MANUAL.into();
        assert!(group.is_manual());
    }
}
