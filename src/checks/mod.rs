//! SEO check rules
//!
//! Every rule is a pure function over the crawled pages (plus the typed
//! [`SiteContext`](crate::page::SiteContext)) returning exactly one
//! [`CheckResult`]. Rules are grouped in one module per category and run in
//! registration order by the [`CheckRegistry`].

mod advanced;
mod analytics;
mod content;
mod geo;
mod off_page;
mod on_page;
mod performance;
mod registry;
mod result;
mod social;
mod support;
mod technical;

pub use registry::{run_all_checks, CheckRegistry, CheckRule, Evaluator, PageCheck};
pub use result::{Category, CheckResult, CheckStatus};
pub use support::{CheckInfo, PageSet, MAX_DETAIL_URLS};
