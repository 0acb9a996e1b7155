use once_cell::sync::Lazy;
use regex::Regex;

use crate::editor::{EditableDocument, Selection};
use crate::engine::FormatEngine;
use crate::error::StyleError;
use crate::lex::LexMap;

use super::probe::{line_bounds, line_indentation_pos, nesting_depth};

/// Collapses the leading indentation the synthetic braces introduced:
/// removes the first `[ \t]*\n` run that precedes real content.
static STRIP_LEADING_SPACES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]*\n([^\r\n])").unwrap());

/// A line-widened region shared by one or more selections. Direction comes
/// from the first selection that contributed to it.
struct Region {
    start: usize,
    end: usize,
    reversed: bool,
}

/// One pending region replacement, computed against the pre-edit snapshot.
struct Replacement {
    start: usize,
    end: usize,
    text: String,
    reversed: bool,
}

/// Reformat every selection of `doc` independently, in their original order.
///
/// Each selection is widened to whole lines; selections whose widened
/// regions overlap (two carets on one line, say) coalesce into a single
/// region so no span is edited twice. Each region is wrapped in enough
/// synthetic `{` to fake its real nesting depth, formatted, unwrapped and
/// written back. A formatter failure on any region aborts the whole command
/// with the buffer unchanged. The new selection set replaces the old one all
/// at once, one selection per region, preserving direction.
pub fn reformat_selections(
    doc: &mut dyn EditableDocument,
    engine: &dyn FormatEngine,
    options: &str,
) -> Result<(), StyleError> {
    let snapshot = doc.read(0..doc.len());
    let lex = LexMap::scan(&snapshot);

    let mut regions = Vec::new();
    for sel in doc.selections() {
        let indent_pos = line_indentation_pos(&snapshot, sel.begin());
        let (start, _) = line_bounds(&snapshot, indent_pos);
        let (_, end) = line_bounds(&snapshot, sel.end());
        regions.push(Region {
            start,
            end,
            reversed: sel.is_reversed(),
        });
    }
    coalesce(&mut regions);

    // Read phase: all coordinates are against the pre-edit snapshot.
    let mut replacements = Vec::new();
    for region in &regions {
        replacements.push(plan_replacement(&snapshot, &lex, engine, options, region)?);
    }

    // Edit phase: regions are disjoint now, so bottom-to-top application
    // keeps every pending byte offset valid.
    let mut order: Vec<usize> = (0..replacements.len()).collect();
    order.sort_by(|&a, &b| replacements[b].start.cmp(&replacements[a].start));
    for &i in &order {
        let r = &replacements[i];
        doc.replace(r.start..r.end, &r.text);
    }

    // New selections, in the original order, shifted by edits above them.
    let mut selections = Vec::with_capacity(replacements.len());
    for (i, r) in replacements.iter().enumerate() {
        let mut start = r.start;
        for (j, other) in replacements.iter().enumerate() {
            if j != i && other.end <= r.start {
                start = start + other.text.len() - (other.end - other.start);
            }
        }
        let end = start + r.text.len();
        selections.push(if r.reversed {
            Selection::new(end, start)
        } else {
            Selection::new(start, end)
        });
    }
    doc.set_selections(selections);
    Ok(())
}

/// Merge regions that overlap or share a line until all are disjoint. The
/// surviving region keeps the position (and direction) of its earliest
/// contributor in the original selection order.
fn coalesce(regions: &mut Vec<Region>) {
    loop {
        let mut merged = None;
        'scan: for i in 0..regions.len() {
            for j in i + 1..regions.len() {
                if regions[i].start <= regions[j].end && regions[j].start <= regions[i].end {
                    merged = Some((i, j));
                    break 'scan;
                }
            }
        }
        let Some((i, j)) = merged else {
            break;
        };
        let absorbed = regions.remove(j);
        regions[i].start = regions[i].start.min(absorbed.start);
        regions[i].end = regions[i].end.max(absorbed.end);
    }
}

fn plan_replacement(
    snapshot: &str,
    lex: &LexMap,
    engine: &dyn FormatEngine,
    options: &str,
    region: &Region,
) -> Result<Replacement, StyleError> {
    let indent_pos = line_indentation_pos(snapshot, region.start);
    let depth = nesting_depth(snapshot, lex, indent_pos);

    // Synthetic prefix gives the formatter enough context to indent the
    // fragment as if it were nested `depth` levels deep.
    let mut input = String::new();
    if depth > 0 {
        for _ in 0..depth {
            input.push('{');
        }
        input.push('\n');
    }
    input.push_str(&snapshot[region.start..region.end]);

    let formatted = engine.format(&input, options)?;
    let text = unwrap_synthetic(&input, formatted, depth);

    Ok(Replacement {
        start: region.start,
        end: region.end,
        text,
        reversed: region.reversed,
    })
}

/// Undo the synthetic-brace wrapping on the formatter's output.
fn unwrap_synthetic(input: &str, mut formatted: String, depth: i32) -> String {
    if depth > 0 {
        // Cut through each synthetic `{`, then collapse the indentation-only
        // first line the wrapping introduced.
        for _ in 0..depth {
            if let Some(idx) = formatted.find('{') {
                formatted.drain(..=idx);
            }
        }
        STRIP_LEADING_SPACES.replace(&formatted, "${1}").into_owned()
    } else {
        // With no wrapping the formatter may still emit a spurious blank
        // line before a `{` the source had on the same line.
        if !input.contains("\n{") {
            formatted.replacen("\n{", "{", 1)
        } else {
            formatted
        }
    }
}
