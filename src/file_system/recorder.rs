//! Per-file record of pending text operations.

use std::collections::BTreeMap;
use std::ops::Range;

use super::WorkspacePath;
use crate::error::ConflictKind;

/// One queued change, addressed in the file's original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOperation {
    Remove { position: usize, length: usize },
    /// Inserted text that stays left of any right-insert at the same offset.
    InsertLeft { position: usize, text: String },
    InsertRight { position: usize, text: String },
}

impl EditOperation {
    pub fn position(&self) -> usize {
        match self {
            EditOperation::Remove { position, .. }
            | EditOperation::InsertLeft { position, .. }
            | EditOperation::InsertRight { position, .. } => *position,
        }
    }
}

/// Ordered list of operations for one file. Recording never mutates the file.
#[derive(Debug, Clone)]
pub struct UpdateRecorder {
    path: WorkspacePath,
    operations: Vec<EditOperation>,
}

impl UpdateRecorder {
    pub(crate) fn new(path: WorkspacePath) -> Self {
        Self {
            path,
            operations: Vec::new(),
        }
    }

    pub fn path(&self) -> &WorkspacePath {
        &self.path
    }

    pub fn operations(&self) -> &[EditOperation] {
        &self.operations
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn remove(&mut self, position: usize, length: usize) -> &mut Self {
        self.operations.push(EditOperation::Remove { position, length });
        self
    }

    pub fn insert_left(&mut self, position: usize, text: impl Into<String>) -> &mut Self {
        self.operations.push(EditOperation::InsertLeft {
            position,
            text: text.into(),
        });
        self
    }

    pub fn insert_right(&mut self, position: usize, text: impl Into<String>) -> &mut Self {
        self.operations.push(EditOperation::InsertRight {
            position,
            text: text.into(),
        });
        self
    }

    /// Replace `length` bytes at `position` with `text`.
    pub fn replace(&mut self, position: usize, length: usize, text: impl Into<String>) -> &mut Self {
        self.remove(position, length).insert_right(position, text)
    }

    /// Produce the updated text.
    ///
    /// All positions refer to `original`. Identical removals are merged,
    /// partially overlapping ones are rejected. At one offset, left inserts
    /// come first, then right inserts, each group in recording order.
    pub fn apply(&self, original: &str) -> Result<String, ConflictKind> {
        let mut removals: Vec<Range<usize>> = Vec::new();
        let mut inserts: BTreeMap<usize, (Vec<&str>, Vec<&str>)> = BTreeMap::new();

        for op in &self.operations {
            match op {
                EditOperation::Remove { position, length } => {
                    let range = *position..position + length;
                    check_offset(original, range.start)?;
                    check_offset(original, range.end)?;
                    if !range.is_empty() {
                        removals.push(range);
                    }
                }
                EditOperation::InsertLeft { position, text } => {
                    check_offset(original, *position)?;
                    inserts.entry(*position).or_default().0.push(text);
                }
                EditOperation::InsertRight { position, text } => {
                    check_offset(original, *position)?;
                    inserts.entry(*position).or_default().1.push(text);
                }
            }
        }

        removals.sort_by_key(|r| (r.start, r.end));
        removals.dedup();
        for pair in removals.windows(2) {
            if pair[1].start < pair[0].end {
                return Err(ConflictKind::OverlappingRemovals {
                    first: pair[0].clone(),
                    second: pair[1].clone(),
                });
            }
        }

        let mut points: Vec<usize> = Vec::with_capacity(2 + inserts.len() + removals.len() * 2);
        points.push(0);
        points.push(original.len());
        points.extend(inserts.keys().copied());
        for range in &removals {
            points.push(range.start);
            points.push(range.end);
        }
        points.sort_unstable();
        points.dedup();

        let mut output = String::with_capacity(original.len());
        let mut removal_idx = 0;
        for (i, &point) in points.iter().enumerate() {
            if let Some((left, right)) = inserts.get(&point) {
                left.iter().chain(right.iter()).for_each(|text| output.push_str(text));
            }
            let Some(&next) = points.get(i + 1) else {
                break;
            };
            while removal_idx < removals.len() && removals[removal_idx].end <= point {
                removal_idx += 1;
            }
            let removed = removals
                .get(removal_idx)
                .is_some_and(|r| r.start <= point && next <= r.end);
            if !removed {
                output.push_str(&original[point..next]);
            }
        }

        Ok(output)
    }
}

fn check_offset(text: &str, offset: usize) -> Result<(), ConflictKind> {
    if offset <= text.len() && text.is_char_boundary(offset) {
        Ok(())
    } else {
        Err(ConflictKind::InvalidOffset { offset })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn recorder() -> UpdateRecorder {
        UpdateRecorder::new(WorkspacePath(PathBuf::from("/ws/file.html")))
    }

    #[test]
    fn test_replace_word() {
        let mut rec = recorder();
        rec.remove(5, 3).insert_right(5, "bar");
        assert_eq!(rec.apply("<div foo></div>").unwrap(), "<div bar></div>");
    }

    #[test]
    fn test_left_and_right_inserts_at_same_offset() {
        let mut rec = recorder();
        rec.insert_right(1, "R1");
        rec.insert_left(1, "L1");
        rec.insert_right(1, "R2");
        rec.insert_left(1, "L2");
        assert_eq!(rec.apply("ab").unwrap(), "aL1L2R1R2b");
    }

    #[test]
    fn test_positions_refer_to_original_text() {
        let mut rec = recorder();
        rec.replace(0, 3, "longer-name");
        rec.replace(8, 3, "z");
        assert_eq!(rec.apply("abc def ghi").unwrap(), "longer-name def z");
    }

    #[test]
    fn test_identical_removals_are_merged() {
        let mut rec = recorder();
        rec.remove(2, 2);
        rec.remove(2, 2);
        assert_eq!(rec.apply("abcdef").unwrap(), "abef");
    }

    #[test]
    fn test_adjacent_removals_do_not_conflict() {
        let mut rec = recorder();
        rec.remove(0, 2).remove(2, 2);
        assert_eq!(rec.apply("abcdef").unwrap(), "ef");
    }

    #[test]
    fn test_overlapping_removals_conflict() {
        let mut rec = recorder();
        rec.remove(0, 3).remove(2, 2);
        assert_eq!(
            rec.apply("abcdef"),
            Err(ConflictKind::OverlappingRemovals { first: 0..3, second: 2..4 })
        );
    }

    #[test]
    fn test_invalid_offsets() {
        let mut rec = recorder();
        rec.insert_left(10, "x");
        assert_eq!(rec.apply("abc"), Err(ConflictKind::InvalidOffset { offset: 10 }));

        let mut rec = recorder();
        rec.remove(1, 1);
        // "é" is two bytes; offset 2 splits it.
        assert_eq!(rec.apply("aé"), Err(ConflictKind::InvalidOffset { offset: 2 }));
    }

    #[test]
    fn test_insert_at_end() {
        let mut rec = recorder();
        rec.insert_left(3, "!");
        assert_eq!(rec.apply("abc").unwrap(), "abc!");
    }
}
