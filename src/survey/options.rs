//! Survey run parameters
//!
//! Everything here is resolved once, before any ref is enumerated.

use crate::model::RefSelection;
use crate::repository::RepoSettings;

pub const DEFAULT_TOP_NR: usize = 10;

/// Ref-kind flags as the caller gave them; `None` means not specified
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct RefsWanted {
    pub all: Option<bool>,
    pub branches: Option<bool>,
    pub tags: Option<bool>,
    pub remotes: Option<bool>,
    pub detached: Option<bool>,
    pub other: Option<bool>,
}

impl RefsWanted {
    /// Resolve to a concrete selection.
    ///
    /// An explicit `all` turns every kind on. Otherwise, if any kind was
    /// specified, unspecified kinds are off. With nothing specified at all,
    /// `default` is used as-is.
    pub fn resolve(&self, default: RefSelection) -> RefSelection {
        if self.all == Some(true) {
            return RefSelection::everything();
        }

        let kinds = [self.branches, self.tags, self.remotes, self.detached, self.other];
        if kinds.iter().all(Option::is_none) {
            return default;
        }

        RefSelection {
            all: false,
            branches: self.branches.unwrap_or(false),
            tags: self.tags.unwrap_or(false),
            remotes: self.remotes.unwrap_or(false),
            detached: self.detached.unwrap_or(false),
            other: self.other.unwrap_or(false),
        }
    }
}

/// Survey settings from the command line, each optional
#[derive(Debug, Clone, Copy, Default)]
pub struct SurveyFlags {
    pub top_nr: Option<usize>,
    pub progress: Option<bool>,
    pub verbose: Option<bool>,
    pub refs: RefsWanted,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SurveyOptions {
    pub top_nr: usize,
    pub show_progress: bool,
    pub verbose: bool,
    pub refs: RefSelection,
}

impl Default for SurveyOptions {
    fn default() -> Self {
        Self {
            top_nr: DEFAULT_TOP_NR,
            show_progress: false,
            verbose: false,
            refs: RefSelection::all_namespaces(),
        }
    }
}

impl SurveyOptions {
    /// Command line first, then git config, then built-in defaults.
    /// Progress defaults to whether stderr is a terminal.
    pub fn resolve(flags: &SurveyFlags, settings: &RepoSettings, stderr_is_terminal: bool) -> Self {
        let top_nr = flags
            .top_nr
            .or_else(|| settings.survey_top.and_then(|n| usize::try_from(n).ok()))
            .unwrap_or(DEFAULT_TOP_NR);

        Self {
            top_nr,
            show_progress: flags
                .progress
                .or(settings.survey_progress)
                .unwrap_or(stderr_is_terminal),
            verbose: flags.verbose.or(settings.survey_verbose).unwrap_or(false),
            refs: flags.refs.resolve(RefSelection::all_namespaces()),
        }
    }
}
