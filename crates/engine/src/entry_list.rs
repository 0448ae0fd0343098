//! Ordered, duplicate-free list of entries for one setting.

use uploadvalidator_types::Notice;

/// Alert raised when a candidate is already present.
pub const DUPLICATE_ENTRY_MESSAGE: &str = "Value already exists.";

/// Whether a change notification describes an addition or a removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Removed,
}

/// Change notification emitted by an [`EntryListEditor`].
///
/// Carries the affected entry and the complete resulting list so the owner
/// can mirror it without replaying edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListChanged {
    /// Key of the setting the editor is bound to.
    pub setting: String,
    pub kind: ChangeKind,
    pub entry: String,
    pub all_entries: Vec<String>,
}

/// Result of an add or delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The list changed; the owner must be told.
    Changed(ListChanged),
    /// Nothing to do (empty candidate, unknown entry).
    Ignored,
    /// Recoverable user error; the list is unchanged.
    Rejected(Notice),
    /// The editor is disabled; the list is unchanged.
    Disabled,
}

impl EditOutcome {
    pub fn changed(&self) -> Option<&ListChanged> {
        match self {
            EditOutcome::Changed(change) => Some(change),
            _ => None,
        }
    }
}

/// Leaf editor owning the entries of a single setting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryListEditor {
    setting: String,
    entries: Vec<String>,
    disabled: bool,
}

impl EntryListEditor {
    pub fn new(setting: impl Into<String>) -> Self {
        Self {
            setting: setting.into(),
            ..Default::default()
        }
    }

    pub fn setting(&self) -> &str {
        &self.setting
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Replaces the entries wholesale (used when the owner loads a snapshot).
    ///
    /// Later duplicates are dropped so the uniqueness invariant holds from the
    /// start. No notification is emitted.
    pub fn set_entries(&mut self, entries: Vec<String>) {
        self.entries = dedupe(entries);
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn contains(&self, candidate: &str) -> bool {
        self.entries.iter().any(|entry| entry == candidate)
    }

    /// Appends `candidate` unless it is empty or already present.
    pub fn add_entry(&mut self, candidate: &str) -> EditOutcome {
        if self.disabled {
            return EditOutcome::Disabled;
        }
        if candidate.is_empty() {
            return EditOutcome::Ignored;
        }
        if self.contains(candidate) {
            return EditOutcome::Rejected(Notice::warning(DUPLICATE_ENTRY_MESSAGE));
        }
        self.entries.push(candidate.to_string());
        EditOutcome::Changed(self.notification(ChangeKind::Added, candidate))
    }

    /// Removes the entry equal to `identifier`.
    pub fn delete_entry(&mut self, identifier: &str) -> EditOutcome {
        if self.disabled {
            return EditOutcome::Disabled;
        }
        let Some(position) = self.entries.iter().position(|entry| entry == identifier) else {
            return EditOutcome::Ignored;
        };
        let removed = self.entries.remove(position);
        EditOutcome::Changed(self.notification(ChangeKind::Removed, &removed))
    }

    /// Removes the entry at `index`, as raised by a row's delete control.
    pub fn delete_at(&mut self, index: usize) -> EditOutcome {
        match self.entries.get(index).cloned() {
            Some(identifier) => self.delete_entry(&identifier),
            None if self.disabled => EditOutcome::Disabled,
            None => EditOutcome::Ignored,
        }
    }

    fn notification(&self, kind: ChangeKind, entry: &str) -> ListChanged {
        ListChanged {
            setting: self.setting.clone(),
            kind,
            entry: entry.to_string(),
            all_entries: self.entries.clone(),
        }
    }
}

fn dedupe(entries: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(entries.len());
    for entry in entries {
        if !unique.contains(&entry) {
            unique.push(entry);
        }
    }
    unique
}
