//! Reformat pipeline: option resolution, dispatch to the selection or
//! whole-file path, and error reporting at the command boundary.

mod merge;
mod probe;
mod selection;

pub use merge::{apply_patch, compute_patch, reformat_whole, PatchOp};
pub use probe::{line_bounds, line_indentation_pos, nesting_depth};
pub use selection::reformat_selections;

use crate::config::Settings;
use crate::editor::EditableDocument;
use crate::engine::FormatEngine;
use crate::error::StyleError;
use crate::options::{resolve_options, ResolveContext, StylercOutcome};
use crate::report::ErrorReporter;
use crate::syntax::mode_for_syntax;

/// One reformat invocation. Settings are assembled fresh by the caller per
/// request; nothing here is cached across calls.
pub struct ReformatRequest<'a> {
    pub syntax: &'a str,
    pub selection_only: bool,
    pub settings: &'a Settings,
    pub context: ResolveContext,
}

/// Run a reformat command end to end.
///
/// Configuration and formatter failures are converted into messages on the
/// error surface; nothing propagates past this boundary. Returns `true` when
/// the request completed successfully.
pub fn run_reformat(
    doc: &mut dyn EditableDocument,
    engine: &dyn FormatEngine,
    reporter: &mut ErrorReporter<'_>,
    request: &ReformatRequest<'_>,
) -> bool {
    reporter.close();

    let mode = mode_for_syntax(request.syntax, &request.settings.syntax_mode_mapping)
        .unwrap_or_default();
    let resolved = resolve_options(request.syntax, &mode, request.settings, &request.context);
    let (options, stylerc) = match resolved {
        Ok(r) => r,
        Err(e) => {
            reporter.write(&format!(
                "restyle: An error occurred while processing options: {}\n\n",
                e
            ));
            if let StyleError::Config {
                extra: Some(extra), ..
            } = &e
            {
                reporter.write(&format!("* {}\n", extra));
            }
            reporter.show();
            return false;
        }
    };

    if request.settings.debug() {
        if let Ok(version) = engine.version() {
            eprintln!("restyle: [DEBUG] Engine version: {}", version);
        }
        eprintln!("restyle: [DEBUG] Options: {}", options);
        if let StylercOutcome::Unreadable(reason) = &stylerc {
            eprintln!("restyle: [DEBUG] stylerc skipped: {}", reason);
        }
    }

    let result = if request.selection_only {
        reformat_selections(doc, engine, &options)
    } else {
        reformat_whole(doc, engine, &options).map(|_| ())
    };

    match result {
        Ok(()) => true,
        Err(e @ StyleError::Merge(_)) => {
            reporter.write(&format!("restyle: Merge failure: \"{}\"\n", e));
            reporter.show();
            false
        }
        Err(e) => {
            reporter.write(&format!(
                "restyle: An error occurred while formatting: {}\n\n",
                e
            ));
            reporter.show();
            false
        }
    }
}
