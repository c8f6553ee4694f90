//! Ordered rule registry and the runner that isolates each rule

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, info, warn};

use super::result::{Category, CheckResult, CheckStatus};
use super::support::{CheckInfo, PageSet};
use super::{advanced, analytics, content, geo, off_page, on_page, performance, social, technical};
use crate::page::{PageRecord, SiteContext};

/// A measuring rule over the crawled pages
pub type PageCheck = fn(&CheckInfo, &PageSet<'_>) -> CheckResult;

/// How a rule produces its result
#[derive(Clone, Copy)]
pub enum Evaluator {
    /// Measured from the crawled pages and site context
    Pages(PageCheck),
    /// Needs data the crawl cannot provide; always reports `info`
    Unmeasured {
        current: &'static str,
        con: &'static str,
    },
}

/// One registered rule
#[derive(Clone, Copy)]
pub struct CheckRule {
    pub info: CheckInfo,
    evaluator: Evaluator,
}

impl CheckRule {
    pub fn pages(info: CheckInfo, check: PageCheck) -> Self {
        Self {
            info,
            evaluator: Evaluator::Pages(check),
        }
    }

    pub fn unmeasured(info: CheckInfo, current: &'static str, con: &'static str) -> Self {
        Self {
            info,
            evaluator: Evaluator::Unmeasured { current, con },
        }
    }

    pub fn name(&self) -> &'static str {
        self.info.name
    }

    pub fn category(&self) -> Category {
        self.info.category
    }

    pub fn is_measured(&self) -> bool {
        matches!(self.evaluator, Evaluator::Pages(_))
    }

    pub fn evaluate(&self, pages: &PageSet<'_>) -> CheckResult {
        match self.evaluator {
            Evaluator::Pages(check) => check(&self.info, pages),
            Evaluator::Unmeasured { current, con } => {
                self.info.result(CheckStatus::Info, current).con(con)
            }
        }
    }
}

impl std::fmt::Debug for CheckRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckRule")
            .field("name", &self.info.name)
            .field("category", &self.info.category)
            .field("impact", &self.info.impact)
            .field("measured", &self.is_measured())
            .finish()
    }
}

/// Ordered collection of rules, executed in registration order
#[derive(Debug, Default, Clone)]
pub struct CheckRegistry {
    rules: Vec<CheckRule>,
}

impl CheckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full audit rule set, grouped by category in report order
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for rule in technical::rules()
            .into_iter()
            .chain(performance::rules())
            .chain(on_page::rules())
            .chain(content::rules())
            .chain(social::rules())
            .chain(off_page::rules())
            .chain(analytics::rules())
            .chain(geo::rules())
            .chain(advanced::rules())
        {
            registry.register(rule);
        }
        registry
    }

    /// Appends a rule; a rule whose name is already registered is ignored
    pub fn register(&mut self, rule: CheckRule) -> bool {
        if self.rules.iter().any(|r| r.name() == rule.name()) {
            warn!(check = rule.name(), "Ignoring duplicate check registration");
            return false;
        }
        self.rules.push(rule);
        true
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> &[CheckRule] {
        &self.rules
    }

    pub fn count_in(&self, category: Category) -> usize {
        self.rules.iter().filter(|r| r.category() == category).count()
    }

    /// Runs every rule against the pages
    ///
    /// Returns an empty list when no pages were crawled. A rule that panics
    /// is logged and skipped; the others still run.
    pub fn run(&self, pages: &[PageRecord], site: &SiteContext) -> Vec<CheckResult> {
        if pages.is_empty() {
            debug!("No pages to check");
            return Vec::new();
        }

        let set = PageSet::new(pages, site);
        let mut results = Vec::with_capacity(self.rules.len());
        let mut skipped = 0usize;

        for rule in &self.rules {
            match panic::catch_unwind(AssertUnwindSafe(|| rule.evaluate(&set))) {
                Ok(result) => results.push(result),
                Err(payload) => {
                    skipped += 1;
                    warn!(
                        check = rule.name(),
                        error = panic_message(payload.as_ref()),
                        "Check failed, skipping"
                    );
                }
            }
        }

        info!(
            pages = pages.len(),
            checks = results.len(),
            skipped, "Completed checks"
        );
        results
    }

    /// Rule names, in order
    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(CheckRule::name).collect()
    }

    /// True if every rule name is unique
    pub fn names_are_unique(&self) -> bool {
        let mut seen = HashSet::new();
        self.rules.iter().all(|r| seen.insert(r.name()))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Runs the standard rule set without site context
pub fn run_all_checks(pages: &[PageRecord]) -> Vec<CheckResult> {
    CheckRegistry::standard().run(pages, &SiteContext::default())
}
