use similar::{ChangeTag, TextDiff};

use crate::editor::EditableDocument;
use crate::engine::FormatEngine;
use crate::error::StyleError;

/// One step of the old→new reconciliation. Counts are byte lengths; spans
/// follow line boundaries of the diffed texts.
#[derive(Debug, PartialEq, Eq)]
pub enum PatchOp {
    Retain(usize),
    Insert(String),
    Delete(usize),
}

/// Reformat the whole document and merge the result back with minimal edits,
/// so marks, folds and undo-merge eligibility survive in untouched regions.
///
/// Returns whether the buffer changed. The patch is computed and validated
/// in full before the first edit; a reconciliation failure leaves the buffer
/// unmodified.
pub fn reformat_whole(
    doc: &mut dyn EditableDocument,
    engine: &dyn FormatEngine,
    options: &str,
) -> Result<bool, StyleError> {
    let old = doc.read(0..doc.len());
    let new = engine.format(&old, options)?;
    if old == new {
        return Ok(false);
    }

    let patch = compute_patch(&old, &new)?;
    apply_patch(doc, &patch);
    Ok(true)
}

/// Line-based minimal edit sequence transforming `old` into `new`.
///
/// Adjacent changes of the same kind are coalesced. Validates that retains
/// and deletes cover `old` exactly and retains and inserts cover `new`;
/// anything else is a [`StyleError::Merge`].
pub fn compute_patch(old: &str, new: &str) -> Result<Vec<PatchOp>, StyleError> {
    let diff = TextDiff::from_lines(old, new);
    let mut ops: Vec<PatchOp> = Vec::new();

    for change in diff.iter_all_changes() {
        let text = change.value();
        match (change.tag(), ops.last_mut()) {
            (ChangeTag::Equal, Some(PatchOp::Retain(n))) => *n += text.len(),
            (ChangeTag::Equal, _) => ops.push(PatchOp::Retain(text.len())),
            (ChangeTag::Delete, Some(PatchOp::Delete(n))) => *n += text.len(),
            (ChangeTag::Delete, _) => ops.push(PatchOp::Delete(text.len())),
            (ChangeTag::Insert, Some(PatchOp::Insert(s))) => s.push_str(text),
            (ChangeTag::Insert, _) => ops.push(PatchOp::Insert(text.to_string())),
        }
    }

    let mut old_covered = 0usize;
    let mut new_covered = 0usize;
    for op in &ops {
        match op {
            PatchOp::Retain(n) => {
                old_covered += n;
                new_covered += n;
            }
            PatchOp::Delete(n) => old_covered += n,
            PatchOp::Insert(s) => new_covered += s.len(),
        }
    }
    if old_covered != old.len() || new_covered != new.len() {
        return Err(StyleError::Merge(format!(
            "patch covers {}/{} old and {}/{} new bytes",
            old_covered,
            old.len(),
            new_covered,
            new.len()
        )));
    }

    Ok(ops)
}

/// Apply a validated patch, touching only the changed spans. A delete
/// followed by an insert becomes one `replace` so the edit count stays
/// minimal.
pub fn apply_patch(doc: &mut dyn EditableDocument, patch: &[PatchOp]) {
    let mut pos = 0usize;
    let mut i = 0;
    while i < patch.len() {
        match &patch[i] {
            PatchOp::Retain(n) => pos += n,
            PatchOp::Delete(n) => {
                if let Some(PatchOp::Insert(text)) = patch.get(i + 1) {
                    doc.replace(pos..pos + n, text);
                    pos += text.len();
                    i += 2;
                    continue;
                }
                doc.replace(pos..pos + n, "");
            }
            PatchOp::Insert(text) => {
                doc.insert(pos, text);
                pos += text.len();
            }
        }
        i += 1;
    }
}
